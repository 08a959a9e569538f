//! 保存済みプロンプトの復元ノード

use super::NodeOutput;
use crate::error::{NodeError, Result};
use ollama_nodes_common::{extract, parse_saved_entries, render_prompt, FieldSet, SavedEntry, ShortMap};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RestoreNode {
    fields: FieldSet,
    short_map: ShortMap,
}

impl RestoreNode {
    pub const CLASS_NAME: &'static str = "OllamaCharacterRestore";
    pub const DISPLAY_NAME: &'static str = "Ollama Character Restore";

    pub fn new(fields: FieldSet, short_map: ShortMap) -> Self {
        Self { fields, short_map }
    }

    /// ファイル内のエントリ一覧
    pub fn entries(&self, path: &Path) -> Result<Vec<SavedEntry>> {
        if !path.is_file() {
            return Err(NodeError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let entries = parse_saved_entries(&text, &self.fields, &self.short_map);
        debug!("{}: {}件", path.display(), entries.len());
        Ok(entries)
    }

    /// 選択肢用ラベル（重複なし）
    pub fn labels(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self.entries(path)?.into_iter().map(|e| e.label).collect())
    }

    /// ラベルを指定して復元
    pub fn restore(&self, path: &Path, label: &str) -> Result<NodeOutput> {
        let entry = self
            .entries(path)?
            .into_iter()
            .find(|e| e.label == label)
            .ok_or_else(|| NodeError::EntryNotFound(label.to_string()))?;
        Ok(self.render(&entry))
    }

    /// 番号（0始まり）を指定して復元
    pub fn restore_index(&self, path: &Path, index: usize) -> Result<NodeOutput> {
        let entry = self
            .entries(path)?
            .into_iter()
            .nth(index)
            .ok_or_else(|| NodeError::EntryNotFound(format!("#{}", index + 1)))?;
        Ok(self.render(&entry))
    }

    /// 構造化チャンクは見出しを整形し直す（Theme行・N/Aは除く）
    pub fn render(&self, entry: &SavedEntry) -> NodeOutput {
        if entry.structured {
            let parsed = extract(&entry.text, &self.fields);
            if !parsed.is_empty() {
                return NodeOutput::text(render_prompt(&parsed, &self.fields));
            }
        }
        NodeOutput::text(entry.text.clone())
    }
}
