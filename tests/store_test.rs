//! プロンプト保存テスト
//!
//! all.txt / prompts.csv の追記と読み込みを検証

use ollama_nodes::error::NodeError;
use ollama_nodes::store::{CsvStore, PromptRecord, PromptStore, TextStore};
use ollama_nodes_common::{FieldSet, ParsedFields, ShortMap};
use tempfile::tempdir;

fn record(theme: &str, subject: &str) -> PromptRecord {
    let mut fields = ParsedFields::default();
    fields.insert("subject", subject);
    fields.insert("style", "watercolor, soft light");
    PromptRecord {
        timestamp: "2026-10-18T09:30:00".to_string(),
        model: "gpt-oss:20b".to_string(),
        theme: theme.to_string(),
        fields,
    }
}

/// 保存先ディレクトリがなければ作成
#[test]
fn test_prompt_store_creates_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = PromptStore::new(dir.path().join("a").join("b"));

    store
        .save(&record("spring", "a fox"), &FieldSet::standard())
        .expect("保存失敗");

    assert!(store.text().path().exists());
    assert!(store.csv().path().exists());
}

/// チャンクは空行で区切られる
#[test]
fn test_text_store_chunks() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = TextStore::new(dir.path().join("all.txt"));
    let fields = FieldSet::standard();

    store.append(&record("spring", "a fox"), &fields).unwrap();
    store.append(&record("autumn", "a deer"), &fields).unwrap();

    let chunks = store.read_chunks().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(
        chunks[0],
        "Theme: spring\nSubject: a fox\nStyle: watercolor, soft light"
    );

    let entries = store.read_entries(&fields, &ShortMap::default()).unwrap();
    assert_eq!(entries[1].label, "Thm: autumn, Sub: a deer, Sty: watercolor, soft light");
}

/// 手で書き足した（末尾に改行のない）ファイルにも追記できる
#[test]
fn test_text_store_appends_after_manual_edit() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("all.txt");
    std::fs::write(&path, "Theme: manual\nSubject: hand written").unwrap();

    let store = TextStore::new(&path);
    store.append(&record("spring", "a fox"), &FieldSet::standard()).unwrap();

    let chunks = store.read_chunks().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], "Theme: manual\nSubject: hand written");
}

/// ファイルがなければ空
#[test]
fn test_missing_files_are_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = PromptStore::new(dir.path());

    assert!(store.text().read_chunks().unwrap().is_empty());
    assert!(store
        .csv()
        .read_records(&FieldSet::standard())
        .unwrap()
        .is_empty());
}

/// CSVはヘッダー1行 + レコード、カンマ・改行を含む値も読み戻せる
#[test]
fn test_csv_store_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = CsvStore::new(dir.path().join("prompts.csv"));
    let fields = FieldSet::standard();

    store.append(&record("spring", "a fox"), &fields).unwrap();
    store
        .append(&record("city", "a \"quoted\" sign,\nacross two lines"), &fields)
        .unwrap();

    let content = std::fs::read_to_string(store.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "ヘッダー + 2行");
    assert!(lines[0].starts_with("timestamp,model,theme,subject,composition"));

    let records = store.read_records(&fields).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], record("spring", "a fox"));
    assert_eq!(
        records[1].fields.get("subject"),
        Some("a \"quoted\" sign, across two lines")
    );
    assert_eq!(records[1].fields.get("style"), Some("watercolor, soft light"));
}

/// 列順が変わっていてもヘッダー名で対応付ける
#[test]
fn test_csv_store_maps_by_header_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("prompts.csv");
    std::fs::write(
        &path,
        "subject,theme,model,timestamp\nan owl,night,llama3,2026-01-01T00:00:00\n",
    )
    .unwrap();

    let records = CsvStore::new(&path).read_records(&FieldSet::standard()).unwrap();
    assert_eq!(records[0].theme, "night");
    assert_eq!(records[0].model, "llama3");
    assert_eq!(records[0].fields.get("subject"), Some("an owl"));
}

/// 必須列がないCSVはエラー
#[test]
fn test_csv_store_invalid_header() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("prompts.csv");
    std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

    let result = CsvStore::new(&path).read_records(&FieldSet::standard());
    assert!(matches!(result, Err(NodeError::Common(_))));
}
