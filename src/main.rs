use clap::Parser;
use lexicon_annotator::{capture, cli, config, error, interactive, scanner, session, store};
use cli::{Cli, Commands};
use config::Layout;
use error::Result;
use interactive::Mode;
use lexicon_common::Field;
use session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "lexicon_annotator=debug"
    } else {
        "lexicon_annotator=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let layout = Layout::new(&cli.root);

    match cli.command {
        Commands::List { strict } => {
            let folder = layout.image_dir();
            let images = if strict {
                scanner::list_source_images(&folder)?
            } else {
                let scan = scanner::scan_source_images(&folder)?;
                for name in &scan.skipped {
                    println!("  (除外) {}", name);
                }
                scan.images
            };

            for (i, image) in images.iter().enumerate() {
                println!(
                    "{:>4}  {}  ({}, {})",
                    i + 1,
                    image.file_name,
                    image.sort_key.0,
                    image.sort_key.1
                );
            }
            println!("✔ {}枚のページ画像", images.len());
        }

        Commands::Status => {
            let scan = scanner::scan_source_images(&layout.image_dir())?;
            let store = store::RecordStore::new(layout.clone());
            let mut saved = 0;
            let mut checked = 0;

            for (i, image) in scan.images.iter().enumerate() {
                let (has_output, has_proofread) = store.sidecar_status(&image.file_name);
                saved += has_output as usize;
                checked += has_proofread as usize;
                println!(
                    "{:>4}  {}  {}  {}",
                    i + 1,
                    if has_output { "保存済" } else { "未保存" },
                    if has_proofread { "校正済" } else { "------" },
                    image.file_name
                );
            }
            println!(
                "\n合計: {}ページ / 保存済 {} / 校正済 {}",
                scan.images.len(),
                saved,
                checked
            );
        }

        Commands::Show { page } => {
            let session = Session::open_at(layout, Some(&page))?;
            println!("{} [{}]", session.title(), session.record_source());
            println!("{}", serde_json::to_string_pretty(session.editor().record())?);
        }

        Commands::Annotate { page, annotator } => {
            println!("📖 lexicon - 注釈入力\n");
            let mut session = Session::open_at(layout, page.as_deref())?;
            if let Some(name) = annotator {
                session.set_field(Field::Annotator, &name)?;
            }
            interactive::run_interactive(session, Mode::Annotate)?;
        }

        Commands::Proofread { page, name } => {
            println!("🔍 lexicon - 校正\n");
            if name.trim().is_empty() {
                return Err(error::AnnotatorError::Validation("校正者名を入力してください".into()));
            }
            let session = Session::open_at(layout, Some(&page))?;
            interactive::run_interactive(session, Mode::Proofread { name })?;
        }

        Commands::Crop { bitmap, x0, y0, x1, y1, scale } => {
            let selection = capture::Selection::new((x0, y0), (x1, y1));
            let path = capture::crop_to_temp(&layout, &bitmap, selection, scale)?;
            println!("✔ 切り抜き画像を保存: {}", path.display());
        }
    }

    Ok(())
}
