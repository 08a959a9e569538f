//! prompts.csv の追記・読み込み
//!
//! 列: timestamp, model, theme, フィールドの内部キー...

use super::PromptRecord;
use crate::error::Result;
use ollama_nodes_common::{csv, Error as CommonError, FieldSet, ParsedFields};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_STORE_FILE_NAME: &str = "prompts.csv";

const FIXED_COLUMNS: [&str; 3] = ["timestamp", "model", "theme"];

#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(fields: &FieldSet) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(fields.iter().map(|def| def.key.clone()))
            .collect()
    }

    /// 1レコードを追記（新規ファイルならヘッダーも書く）
    pub fn append(&self, record: &PromptRecord, fields: &FieldSet) -> Result<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut row = vec![
            single_line(&record.timestamp),
            single_line(&record.model),
            single_line(&record.theme),
        ];
        row.extend(
            fields
                .iter()
                .map(|def| single_line(record.fields.get_or_empty(&def.key))),
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_header {
            writeln!(file, "{}", csv::format_line(&Self::header(fields)))?;
        }
        writeln!(file, "{}", csv::format_line(&row))?;
        Ok(())
    }

    /// 全レコードを読み込み（列はヘッダー名で対応付け）
    pub fn read_records(&self, fields: &FieldSet) -> Result<Vec<PromptRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());
        let Some(header_line) = lines.next() else {
            return Ok(Vec::new());
        };

        let header = csv::parse_line(header_line);
        if !FIXED_COLUMNS.iter().all(|c| header.iter().any(|h| h == c)) {
            return Err(CommonError::Parse(format!(
                "CSVヘッダーが不正です: {}",
                self.path.display()
            ))
            .into());
        }
        let column = |name: &str| header.iter().position(|h| h == name);

        let records = lines
            .map(|line| {
                let values = csv::parse_line(line);
                let value = |name: &str| {
                    column(name)
                        .and_then(|i| values.get(i))
                        .cloned()
                        .unwrap_or_default()
                };

                let mut parsed = ParsedFields::default();
                for def in fields.iter() {
                    let v = value(&def.key);
                    if !v.is_empty() {
                        parsed.insert(def.key.clone(), v);
                    }
                }

                PromptRecord {
                    timestamp: value("timestamp"),
                    model: value("model"),
                    theme: value("theme"),
                    fields: parsed,
                }
            })
            .collect();

        Ok(records)
    }
}

/// 改行を含む値を1行にまとめる（行単位の読み込みを壊さない）
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
