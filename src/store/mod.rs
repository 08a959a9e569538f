//! 生成したプロンプトの保存
//!
//! 同じ内容を all.txt（復元メニュー用）と prompts.csv（一覧・表計算用）に追記する。

mod csv_store;
mod text_store;

pub use csv_store::{CsvStore, CSV_STORE_FILE_NAME};
pub use text_store::{TextStore, TEXT_STORE_FILE_NAME};

use crate::error::Result;
use ollama_nodes_common::{FieldSet, ParsedFields};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// 保存する1件分の構造化プロンプト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub timestamp: String,
    pub model: String,
    pub theme: String,
    pub fields: ParsedFields,
}

impl PromptRecord {
    /// 現在時刻で作成
    pub fn now(model: &str, theme: &str, fields: ParsedFields) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            model: model.to_string(),
            theme: theme.to_string(),
            fields,
        }
    }
}

/// all.txt と prompts.csv をまとめて扱う
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
    text: TextStore,
    csv: CsvStore,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            text: TextStore::new(dir.join(TEXT_STORE_FILE_NAME)),
            csv: CsvStore::new(dir.join(CSV_STORE_FILE_NAME)),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn text(&self) -> &TextStore {
        &self.text
    }

    pub fn csv(&self) -> &CsvStore {
        &self.csv
    }

    /// 両方のファイルに追記
    pub fn save(&self, record: &PromptRecord, fields: &FieldSet) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        self.text.append(record, fields)?;
        self.csv.append(record, fields)?;
        info!("プロンプトを保存: {}", self.dir.display());
        Ok(())
    }
}
