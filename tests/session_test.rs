//! セッション統合テスト
//!
//! 作業フォルダを作り、ページ読み込みから保存・校正までを通しで検証

use lexicon_annotator::config::Layout;
use lexicon_annotator::error::AnnotatorError;
use lexicon_annotator::scanner::ImageInfo;
use lexicon_annotator::session::Session;
use lexicon_annotator::store::{CarryOver, RecordSource, RecordStore};
use lexicon_common::{parse_sidecar, Field, LexicalRecord, Level};
use std::path::Path;
use tempfile::tempdir;

fn create_images(root: &Path, names: &[&str]) {
    let image_dir = root.join("image");
    std::fs::create_dir_all(&image_dir).unwrap();
    for name in names {
        std::fs::write(image_dir.join(name), b"").unwrap();
    }
}

/// 並び順キーを持たない `a.png` だけのセッション
fn single_image_session(root: &Path) -> Session {
    create_images(root, &["a.png"]);
    let image = ImageInfo {
        path: root.join("image/a.png"),
        file_name: "a.png".into(),
        sort_key: (0, 0),
    };
    Session::with_images(RecordStore::new(Layout::new(root)), vec![image], 0)
        .expect("セッションを開けません")
}

fn read_output(root: &Path, name: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(root.join("output").join(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// サイドカーのない画像を開いて保存すると1要素の配列が書かれる
#[test]
fn test_fresh_page_submit() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());

    assert_eq!(session.record_source(), RecordSource::Template);
    assert_eq!(session.count(Level::Pronunciation), 1);
    assert_eq!(session.count(Level::Entry), 1);
    assert_eq!(session.count(Level::Example), 1);

    let form = session.editor().form();
    let path = session.submit(&form).unwrap();
    assert_eq!(path, dir.path().join("output/a.json"));

    let value = read_output(dir.path(), "a.json");
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["image"], "a.png");
    let pron = &array[0]["pronunciations"][0];
    assert_eq!(pron["entries"][0]["examples"][0]["壮文"], "");
    assert!(array[0].get("proofread").is_none());
}

/// 例文の追加と削除（最後の1件は削除できない）
#[test]
fn test_add_and_delete_example() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());

    session.add(Level::Example);
    assert_eq!(session.position(Level::Example), 1);
    assert_eq!(session.count(Level::Example), 2);

    session.delete(Level::Example).unwrap();
    assert_eq!(session.count(Level::Example), 1);
    assert_eq!(session.position(Level::Example), 0);

    let result = session.delete(Level::Example);
    assert!(matches!(result, Err(AnnotatorError::Model(_))));
    assert_eq!(session.count(Level::Example), 1);
}

/// 保存した内容はページを戻ると読み込まれる
#[test]
fn test_submit_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_images(dir.path(), &["word_1_part_1.png", "word_1_part_2.png"]);
    let mut session = Session::open(Layout::new(dir.path())).unwrap();

    let mut form = session.editor().form();
    form.set(Field::Annotator, "甲");
    form.set(Field::Spelling, "raemx");
    form.set(Field::DialectType, "2");
    form.set(Field::Meaning, "水");
    form.set(Field::ExampleZhuang, "gwn raemx");
    form.set(Field::ExampleChinese, "喝水");
    session.submit(&form).unwrap();

    session.goto_next().unwrap();
    assert_eq!(session.record_source(), RecordSource::Template);
    session.goto_previous().unwrap();

    assert_eq!(session.record_source(), RecordSource::Output);
    assert_eq!(session.get_field(Field::Spelling), "raemx");
    assert_eq!(session.get_field(Field::DialectType), "2");
    assert_eq!(session.get_field(Field::ExampleChinese), "喝水");
    assert_eq!(session.get_field(Field::Annotator), "甲");
}

/// 保存→読み込みで構造が一致する（注釈者・ページ情報は引き継ぎ値）
#[test]
fn test_store_round_trip_with_carry_over() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_images(dir.path(), &["word_1_part_1.png"]);
    let store = RecordStore::new(Layout::new(dir.path()));
    let image = dir.path().join("image/word_1_part_1.png");

    let (mut record, _) = store.load_record(&image, &CarryOver::default()).unwrap();
    record.annotator = "保存時".into();
    record.pronunciations[0].ipa = "ɣaːm".into();
    store.save_record(&record).unwrap();

    let carry = CarryOver {
        annotator: "引継ぎ".into(),
        ..Default::default()
    };
    let (loaded, source) = store.load_record(&image, &carry).unwrap();
    assert_eq!(source, RecordSource::Output);
    assert_eq!(loaded.annotator, "引継ぎ");

    let mut expected = record.clone();
    expected.annotator = "引継ぎ".into();
    assert_eq!(loaded, expected);
}

/// 方言フラグが数字でなければ保存しない
#[test]
fn test_submit_rejects_bad_dialect() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());

    let mut form = session.editor().form();
    form.set(Field::DialectType, "北部");
    assert!(session.submit(&form).is_err());
    assert!(!dir.path().join("output/a.json").exists());
}

/// 切り抜き画像を添付して保存すると output_image/ に移動する
#[test]
fn test_submit_commits_attachment() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());

    std::fs::create_dir_all(dir.path().join("temp")).unwrap();
    let crop = dir.path().join("temp/cropped_1.png");
    std::fs::write(&crop, b"png").unwrap();

    session.attach_pending_image(&crop).unwrap();
    let mut form = session.editor().form();
    form.set(Field::Spelling, "raemx");
    session.submit(&form).unwrap();

    assert!(!crop.exists());
    let pron = session.editor().current_pronunciation();
    let name = pron.latest_image().unwrap().to_string();
    assert!(name.starts_with("raemx_"));
    assert!(dir.path().join("output_image").join(&name).exists());
    assert_eq!(pron.attachment_pending_path, pron.attachment_committed_path);

    // 2回目の保存では添付を再処理しない
    let form = session.editor().form();
    session.submit(&form).unwrap();
    assert_eq!(session.editor().current_pronunciation().attachment_images.len(), 1);

    let saved = parse_sidecar(&std::fs::read_to_string(dir.path().join("output/a.json")).unwrap()).unwrap();
    assert_eq!(saved.pronunciations[0].attachment_images, vec![name]);
}

/// 旧添付の削除に失敗しても保存は成功する
#[test]
fn test_submit_succeeds_when_old_attachment_cleanup_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = RecordStore::new(Layout::new(dir.path()));
    std::fs::create_dir_all(dir.path().join("output_image/old")).unwrap();
    std::fs::create_dir_all(dir.path().join("temp")).unwrap();
    std::fs::write(dir.path().join("temp/new.png"), b"png").unwrap();

    let mut record = LexicalRecord::new("a.png");
    record.pronunciations[0].spelling = "raemx".into();
    record.pronunciations[0].attachment_committed_path = "output_image/old".into();
    record.pronunciations[0].attachment_pending_path = "temp/new.png".into();
    store.save_record(&record).unwrap();

    let mut session = single_image_session(dir.path());
    assert_eq!(session.record_source(), RecordSource::Output);

    let form = session.editor().form();
    let path = session.submit(&form).expect("保存は成功する");

    let saved = parse_sidecar(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let pron = &saved.pronunciations[0];
    assert!(pron.attachment_committed_path.starts_with("output_image/raemx_"));
    assert_eq!(pron.attachment_images.len(), 1);
    assert!(dir.path().join("output_image/old").is_dir());
    assert!(!dir.path().join("temp/new.png").exists());
}

/// 添付元が消えていれば保存を中断する
#[test]
fn test_submit_aborts_on_missing_attachment() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());

    std::fs::create_dir_all(dir.path().join("temp")).unwrap();
    let crop = dir.path().join("temp/cropped_1.png");
    std::fs::write(&crop, b"png").unwrap();
    session.attach_pending_image(&crop).unwrap();
    std::fs::remove_file(&crop).unwrap();

    let form = session.editor().form();
    let result = session.submit(&form);
    assert!(matches!(result, Err(AnnotatorError::NotFound(_))));
    assert!(!dir.path().join("output/a.json").exists());
}

/// 校正: 標準サイドカーと差分があれば is_wrong = "1"
#[test]
fn test_proofread_detects_changes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());
    let form = session.editor().form();
    session.submit(&form).unwrap();
    let before = std::fs::read_to_string(dir.path().join("output/a.json")).unwrap();

    let mut form = session.editor().form();
    form.set(Field::Ipa, "ɣaːm");
    let outcome = session.proofread(&form, "乙").unwrap();

    assert!(outcome.is_wrong);
    assert_eq!(outcome.path, dir.path().join("proofread_file/a.json"));
    let saved = parse_sidecar(&std::fs::read_to_string(&outcome.path).unwrap()).unwrap();
    assert_eq!(saved.is_wrong.as_deref(), Some("1"));
    assert_eq!(saved.proofread_by.as_deref(), Some("乙"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("output/a.json")).unwrap(),
        before
    );
}

/// 校正: 差分がなければ is_wrong = "0"、以降は校正済みを優先して読む
#[test]
fn test_proofread_identical() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_images(dir.path(), &["word_1_part_1.png", "word_1_part_2.png"]);
    let mut session = Session::open(Layout::new(dir.path())).unwrap();
    let form = session.editor().form();
    session.submit(&form).unwrap();

    let form = session.editor().form();
    let outcome = session.proofread(&form, "  乙 ").unwrap();
    assert!(!outcome.is_wrong);

    session.goto_next().unwrap();
    session.goto_previous().unwrap();
    assert_eq!(session.record_source(), RecordSource::Proofread);
    assert_eq!(session.editor().record().proofread_by.as_deref(), Some("乙"));
}

/// 校正者名が空なら何も書かない
#[test]
fn test_proofread_requires_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = single_image_session(dir.path());
    let mut form = session.editor().form();
    form.set(Field::Meaning, "変更");

    let result = session.proofread(&form, " ");
    assert!(matches!(result, Err(AnnotatorError::Validation(_))));
    assert!(!dir.path().join("proofread_file").exists());
    assert_eq!(session.get_field(Field::Meaning), "");
}

/// 終了時のページ位置が次回の開始位置になる
#[test]
fn test_resume_from_last_page() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_images(dir.path(), &["word_2_part_1.png", "word_1_part_9.png", "word_1_part_2.png"]);

    let mut session = Session::open(Layout::new(dir.path())).unwrap();
    assert_eq!(session.current_image().file_name, "word_1_part_2.png");
    session.jump_to_page("2").unwrap();
    session.shutdown().unwrap();

    let config = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert_eq!(config, r#"{"last_index":1}"#);

    let session = Session::open(Layout::new(dir.path())).unwrap();
    assert_eq!(session.current_image().file_name, "word_1_part_9.png");
    assert_eq!(session.title(), "word_1_part_9.png (第2页/共3页)");
}

/// 前回のページのサイドカーが壊れていても起動できる
#[test]
fn test_startup_with_corrupt_sidecar_at_last_page() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_images(dir.path(), &["w_1_p_1.png", "w_1_p_2.png"]);
    std::fs::create_dir_all(dir.path().join("output")).unwrap();
    std::fs::write(dir.path().join("output/w_1_p_2.json"), "not json").unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"last_index":1}"#).unwrap();

    let mut session = Session::open(Layout::new(dir.path())).expect("起動できる");
    assert_eq!(session.current_image().file_name, "w_1_p_1.png");

    // 壊れたページへの移動は中断し、現在のページを保つ
    assert!(matches!(session.goto_next(), Err(AnnotatorError::Serialization { .. })));
    assert_eq!(session.current_index(), 0);

    // 指定ページで開く場合は前回のページを経由しない
    std::fs::write(dir.path().join("output/w_1_p_1.json"), "not json").unwrap();
    std::fs::remove_file(dir.path().join("output/w_1_p_2.json")).unwrap();
    let session = Session::open_at(Layout::new(dir.path()), Some("2")).unwrap();
    assert_eq!(session.current_index(), 1);
}
