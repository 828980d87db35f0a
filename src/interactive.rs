//! 対話式の注釈・校正画面
//!
//! 端末上のフォームとしてセッションを操作する。入力中の値は
//! `FormSnapshot` に保持し、階層の移動・送信の直前にモデルへ反映する。
//! ページを移動すると未送信の入力は破棄される。

use crate::error::{AnnotatorError, Result};
use crate::session::Session;
use dialoguer::Input;
use lexicon_common::{Field, FormSnapshot, Level};
use std::path::PathBuf;

/// 画面のモード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// 通常の注釈（output/ に保存）
    Annotate,
    /// 校正（proofread_file/ に保存）
    Proofread { name: String },
}

/// 階層ごとの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOp {
    Add,
    Delete,
    Next,
    Previous,
}

/// 対話アクション
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// 現在の内容を表示
    Show,
    /// 全項目を順に入力
    EditAll,
    /// 1項目を入力
    Edit(Field),
    /// 読み・品詞・例文の追加・削除・移動
    Level(Level, LevelOp),
    NextPage,
    PreviousPage,
    /// ページ番号を指定して移動
    Jump(String),
    /// 選択中の読みに画像を添付
    Attach(PathBuf),
    /// 保存
    Submit,
    Help,
    /// 終了
    Quit,
}

const HELP: &str = "\
操作:
  [Enter]/l 表示   e 全項目入力   f<番号> 1項目入力 (例: f5)
  p+ p- p> p<  読みの追加/削除/次/前
  c+ c- c> c<  品詞の追加/削除/次/前
  x+ x- x> x<  例文の追加/削除/次/前
  i <パス>     画像を添付      s 保存
  n 次のページ  b 前のページ  g <番号> ページ移動
  ? ヘルプ      q 終了";

/// 入力文字列をアクションに変換
pub fn parse_action(input: &str) -> Option<Action> {
    let trimmed = input.trim();

    match trimmed {
        "" | "l" => return Some(Action::Show),
        "e" => return Some(Action::EditAll),
        "n" => return Some(Action::NextPage),
        "b" => return Some(Action::PreviousPage),
        "s" => return Some(Action::Submit),
        "?" | "h" => return Some(Action::Help),
        "q" | "Q" => return Some(Action::Quit),
        _ => {}
    }

    if let Some(rest) = trimmed.strip_prefix("g ") {
        return Some(Action::Jump(rest.trim().to_string()));
    }
    if let Some(rest) = trimmed.strip_prefix("i ") {
        let path = rest.trim();
        return (!path.is_empty()).then(|| Action::Attach(PathBuf::from(path)));
    }
    if let Some(rest) = trimmed.strip_prefix('f') {
        let n: usize = rest.trim().parse().ok()?;
        return n.checked_sub(1).and_then(|i| Field::ALL.get(i).copied()).map(Action::Edit);
    }

    let mut chars = trimmed.chars();
    let (Some(l), Some(o), None) = (chars.next(), chars.next(), chars.next()) else {
        return None;
    };
    let level = match l {
        'p' => Level::Pronunciation,
        'c' => Level::Entry,
        'x' => Level::Example,
        _ => return None,
    };
    let op = match o {
        '+' => LevelOp::Add,
        '-' => LevelOp::Delete,
        '>' => LevelOp::Next,
        '<' => LevelOp::Previous,
        _ => return None,
    };
    Some(Action::Level(level, op))
}

/// 現在のページとフォームを文字列にする
pub fn render(session: &Session, form: &FormSnapshot) -> String {
    let editor = session.editor();
    let mut out = String::new();

    out.push_str(&format!("━━ {} [{}]\n", session.title(), session.record_source()));
    out.push_str(&format!(
        "   読み {}  品詞 {}  例文 {}\n",
        editor.page_label(Level::Pronunciation),
        editor.page_label(Level::Entry),
        editor.page_label(Level::Example)
    ));

    for (i, field) in Field::ALL.iter().enumerate() {
        out.push_str(&format!(
            "  {:>2}. {}: {}\n",
            i + 1,
            field.label(),
            display_value(*field, form.get(*field))
        ));
    }

    let pron = editor.current_pronunciation();
    if pron.has_pending_attachment() {
        out.push_str(&format!("   添付予定: {}\n", pron.attachment_pending_path));
    } else if let Some(latest) = pron.latest_image() {
        out.push_str(&format!("   添付済み: {}\n", latest));
    }
    out
}

fn display_value(field: Field, value: &str) -> String {
    if field.is_multiline() {
        value.replace('\n', "\\n")
    } else {
        value.to_string()
    }
}

fn prompt(label: &str, initial: &str) -> Result<String> {
    Input::new()
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AnnotatorError::CliExecution(e.to_string()))
}

/// 1項目を入力（複数行項目は `\n` で改行）
fn prompt_field(form: &mut FormSnapshot, field: Field) -> Result<()> {
    let current = display_value(field, form.get(field));
    let value = prompt(field.label(), &current)?;
    let value = if field.is_multiline() {
        value.replace("\\n", "\n")
    } else {
        value
    };
    form.set(field, value);
    Ok(())
}

/// 利用者が修正できるエラーは表示して続行する
fn report<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            println!("⚠ {}", e);
            None
        }
    }
}

/// 階層操作（操作前に入力中の値をモデルへ反映する）
fn apply_level_op(session: &mut Session, form: &FormSnapshot, level: Level, op: LevelOp) -> Result<()> {
    session.commit_form(form)?;
    let moved = match op {
        LevelOp::Add => {
            session.add(level);
            true
        }
        LevelOp::Delete => {
            session.delete(level)?;
            true
        }
        LevelOp::Next => session.next(level),
        LevelOp::Previous => session.previous(level),
    };
    if !moved {
        println!("  → これ以上移動できません");
    }
    Ok(())
}

/// 保存してメッセージを表示
fn submit(session: &mut Session, form: &FormSnapshot, mode: &Mode) -> Result<()> {
    match mode {
        Mode::Annotate => {
            let path = session.submit(form)?;
            println!("✔ 保存しました: {}", path.display());
        }
        Mode::Proofread { name } => {
            let outcome = session.proofread(form, name)?;
            let verdict = if outcome.is_wrong { "修正あり" } else { "修正なし" };
            println!("✔ 校正結果を保存しました ({}): {}", verdict, outcome.path.display());
        }
    }
    Ok(())
}

/// 対話式の画面を実行し、終了時にページ位置を保存する
pub fn run_interactive(mut session: Session, mode: Mode) -> Result<()> {
    println!("{}\n", HELP);
    let mut form = session.editor().form();
    println!("{}", render(&session, &form));

    loop {
        let input = prompt("コマンド", "")?;
        let Some(action) = parse_action(&input) else {
            println!("  不明なコマンド: {} (?でヘルプ)", input.trim());
            continue;
        };

        match action {
            Action::Show => {}
            Action::Help => {
                println!("{}", HELP);
                continue;
            }
            Action::EditAll => {
                for field in Field::ALL {
                    prompt_field(&mut form, field)?;
                }
            }
            Action::Edit(field) => prompt_field(&mut form, field)?,
            Action::Level(level, op) => {
                if report(apply_level_op(&mut session, &form, level, op)).is_some() {
                    form = session.editor().form();
                }
            }
            Action::NextPage => {
                match report(session.goto_next()) {
                    Some(true) => form = session.editor().form(),
                    Some(false) => println!("  → 最後のページです"),
                    None => {}
                }
            }
            Action::PreviousPage => {
                match report(session.goto_previous()) {
                    Some(true) => form = session.editor().form(),
                    Some(false) => println!("  → 最初のページです"),
                    None => {}
                }
            }
            Action::Jump(page) => {
                if report(session.jump_to_page(&page)).is_some() {
                    form = session.editor().form();
                }
            }
            Action::Attach(path) => {
                report(session.attach_pending_image(&path));
            }
            Action::Submit => {
                if report(submit(&mut session, &form, &mode)).is_some() {
                    form = session.editor().form();
                }
            }
            Action::Quit => break,
        }

        println!("{}", render(&session, &form));
    }

    session.shutdown()?;
    println!("終了しました");
    Ok(())
}
