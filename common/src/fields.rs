//! 構造化プロンプトのフィールド抽出モジュール
//!
//! LLMの自由記述レスポンスを、既知の見出し（`Subject:` など）で区切って
//! フィールドごとのテキストに分解する。
//!
//! - FieldSet: (内部キー, 表示名) の順序付きリスト
//! - extract: 見出し行の前方一致でレスポンスを分割
//! - render_prompt / render_chunk: 抽出結果をテキストに戻す

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 標準フィールド（内部キー, 表示名）
pub const STANDARD_FIELDS: [(&str, &str); 9] = [
    ("subject", "Subject"),
    ("composition", "Composition"),
    ("action", "Action"),
    ("location", "Location"),
    ("style", "Style"),
    ("editing_instructions", "Editing Instructions"),
    ("camera_lighting", "Camera and lighting details"),
    ("specific_text", "Specific text integration"),
    ("factual_constraints", "Factual constraints (for diagrams)"),
];

/// 値なしを表すプレースホルダ（モデルが "N/A" と答えた欄）
const PLACEHOLDERS: &[&str] = &["n/a", "na", "none"];

/// フィールド定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// 内部キー（保存・CSV列名に使用）
    pub key: String,
    /// 表示名（見出し行の照合に使用）
    pub display_name: String,
}

/// フィールド定義の順序付きリスト
#[derive(Debug, Clone)]
pub struct FieldSet {
    fields: Vec<FieldDef>,
    /// 表示名の長い順に並べたインデックス（最長一致用）
    matchers: Vec<usize>,
}

impl FieldSet {
    /// (内部キー, 表示名) のリストから生成
    ///
    /// 内部キーまたは表示名（大文字小文字無視）が重複する場合はエラー
    pub fn new<K, D>(defs: impl IntoIterator<Item = (K, D)>) -> Result<Self>
    where
        K: Into<String>,
        D: Into<String>,
    {
        let fields: Vec<FieldDef> = defs
            .into_iter()
            .map(|(key, display_name)| FieldDef {
                key: key.into(),
                display_name: display_name.into(),
            })
            .collect();

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for def in &fields {
            if def.key.is_empty() || def.display_name.trim().is_empty() {
                return Err(Error::Config("空のフィールド定義があります".into()));
            }
            if !keys.insert(def.key.as_str()) {
                return Err(Error::Config(format!("内部キーが重複しています: {}", def.key)));
            }
            if !names.insert(def.display_name.to_ascii_lowercase()) {
                return Err(Error::Config(format!(
                    "表示名が重複しています: {}",
                    def.display_name
                )));
            }
        }

        Ok(Self::from_defs(fields))
    }

    /// 標準の9フィールド
    pub fn standard() -> Self {
        Self::from_defs(
            STANDARD_FIELDS
                .iter()
                .map(|(key, display_name)| FieldDef {
                    key: (*key).to_string(),
                    display_name: (*display_name).to_string(),
                })
                .collect(),
        )
    }

    fn from_defs(fields: Vec<FieldDef>) -> Self {
        let mut matchers: Vec<usize> = (0..fields.len()).collect();
        // 安定ソート: 同じ長さなら定義順
        matchers.sort_by(|&a, &b| {
            fields[b]
                .display_name
                .len()
                .cmp(&fields[a].display_name.len())
        });
        Self { fields, matchers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 内部キーから定義を取得
    pub fn get(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// 表示名から定義を取得（完全一致）
    pub fn by_display_name(&self, display_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.display_name == display_name)
    }

    /// 見出し行の照合
    ///
    /// 一致した場合は (定義, 見出し後の残りテキスト) を返す
    fn match_header<'a>(&self, line: &'a str) -> Option<(&FieldDef, &'a str)> {
        let body = strip_decoration(line);

        self.matchers.iter().find_map(|&idx| {
            let def = &self.fields[idx];
            let name_len = def.display_name.len();
            let head = body.get(..name_len)?;
            if !head.eq_ignore_ascii_case(&def.display_name) {
                return None;
            }
            let rest = &body[name_len..];
            // "Subjective" のような語の途中での一致は見出しではない
            if rest.chars().next().is_some_and(|c| c.is_alphanumeric()) {
                return None;
            }
            Some((def, strip_header_tail(rest)))
        })
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// 抽出結果（内部キー → テキスト）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedFields(HashMap<String, String>);

impl ParsedFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// 値がない場合は空文字
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// レスポンスをフィールドに分割
///
/// 最初の見出しより前の行は無視する。見出しのないテキストは空の結果になる。
///
/// # Examples
/// ```
/// use ollama_nodes_common::{extract, FieldSet};
///
/// let fields = FieldSet::standard();
/// let parsed = extract("Subject: a robot\nwith blue eyes\nAction: waving", &fields);
/// assert_eq!(parsed.get("subject"), Some("a robot with blue eyes"));
/// assert_eq!(parsed.get("action"), Some("waving"));
/// assert_eq!(parsed.get("style"), None);
/// ```
pub fn extract(text: &str, fields: &FieldSet) -> ParsedFields {
    let mut parsed = ParsedFields::default();
    let mut current: Option<&str> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match fields.match_header(line) {
            Some((def, rest)) => {
                flush(&mut parsed, current, &mut buffer);
                current = Some(def.key.as_str());
                if !rest.is_empty() {
                    buffer.push(rest);
                }
            }
            None => {
                if current.is_some() {
                    buffer.push(line);
                }
            }
        }
    }

    flush(&mut parsed, current, &mut buffer);
    parsed
}

fn flush(parsed: &mut ParsedFields, current: Option<&str>, buffer: &mut Vec<&str>) {
    if let Some(key) = current {
        let joined = buffer.join(" ");
        let value = joined.trim();
        if !value.is_empty() {
            parsed.insert(key, value);
        }
    }
    buffer.clear();
}

/// 行頭の箇条書き・見出し記号を除去（"• ", "- ", "**", "## "）
fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '•' | '·' | '-' | '*' | '#') || c.is_whitespace())
}

/// 見出し直後の "**" とコロンを除去
fn strip_header_tail(rest: &str) -> &str {
    let rest = rest.strip_prefix("**").unwrap_or(rest).trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let rest = rest.strip_prefix("**").unwrap_or(rest);
    rest.trim()
}

/// "N/A" などの値なし表記か
pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim().trim_end_matches('.');
    v.is_empty() || PLACEHOLDERS.iter().any(|p| v.eq_ignore_ascii_case(p))
}

/// 抽出結果を画像生成用プロンプトに整形
///
/// FieldSet順に "表示名: 値" を1行ずつ出力。空欄・N/Aは省略
pub fn render_prompt(parsed: &ParsedFields, fields: &FieldSet) -> String {
    fields
        .iter()
        .filter_map(|def| {
            let value = parsed.get(&def.key)?;
            if is_placeholder(value) {
                return None;
            }
            Some(format!("{}: {}", def.display_name, value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 保存用チャンクを生成（Theme行 + 全フィールド）
pub fn render_chunk(theme: &str, parsed: &ParsedFields, fields: &FieldSet) -> String {
    let mut lines = Vec::with_capacity(fields.len() + 1);
    let theme = theme.split_whitespace().collect::<Vec<_>>().join(" ");
    if !theme.is_empty() {
        lines.push(format!("Theme: {}", theme));
    }
    for def in fields.iter() {
        if let Some(value) = parsed.get(&def.key) {
            lines.push(format!("{}: {}", def.display_name, value));
        }
    }
    lines.join("\n")
}
