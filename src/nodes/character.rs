//! キャラクタープロンプト生成ノード
//!
//! テーマ → 指示文付きプロンプト → 生成 → 見出しごとに抽出 → 整形して出力。
//! 保存先が設定されていれば all.txt / prompts.csv に追記する。

use super::{Connection, NodeOutput};
use crate::error::Result;
use crate::store::{PromptRecord, PromptStore};
use ollama_nodes_common::{build_character_prompt, extract, render_prompt, FieldSet, ParsedFields};
use tracing::{debug, warn};

/// 生成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterResult {
    pub output: NodeOutput,
    /// 抽出できたフィールド（生成失敗時は空）
    pub fields: ParsedFields,
    /// モデルの生応答
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct CharacterNode {
    fields: FieldSet,
    store: Option<PromptStore>,
}

impl Default for CharacterNode {
    fn default() -> Self {
        Self::new(FieldSet::standard())
    }
}

impl CharacterNode {
    pub const CLASS_NAME: &'static str = "OllamaNbpCharacter";
    pub const DISPLAY_NAME: &'static str = "Ollama NBP Character";

    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            store: None,
        }
    }

    pub fn with_store(mut self, store: PromptStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// テーマからキャラクタープロンプトを生成
    ///
    /// 通信・デコード失敗は `Error: ...` の出力になる。保存の失敗のみ `Err` を返す。
    pub async fn generate_character_prompt(
        &self,
        theme: &str,
        conn: &Connection,
    ) -> Result<CharacterResult> {
        let theme = theme.trim();
        let prompt = build_character_prompt(theme);
        debug!("キャラクタープロンプト: {}文字", prompt.len());

        let generated = match conn.client() {
            Ok(client) => client.generate(&conn.request(prompt)).await,
            Err(e) => Err(e),
        };

        let raw = match generated {
            Ok(raw) => raw,
            Err(e) => {
                warn!("キャラクター生成に失敗: {}", e);
                return Ok(CharacterResult {
                    output: NodeOutput::error(&e),
                    fields: ParsedFields::default(),
                    raw: String::new(),
                });
            }
        };

        let parsed = extract(&raw, &self.fields);
        if parsed.is_empty() {
            warn!("応答から見出しを抽出できませんでした。生テキストを出力します");
            return Ok(CharacterResult {
                output: NodeOutput::text(raw.trim()),
                fields: parsed,
                raw,
            });
        }

        if let Some(store) = &self.store {
            let record = PromptRecord::now(&conn.model, theme, parsed.clone());
            store.save(&record, &self.fields)?;
        }

        Ok(CharacterResult {
            output: NodeOutput::text(render_prompt(&parsed, &self.fields)),
            fields: parsed,
            raw,
        })
    }
}
