//! 保存済みプロンプトファイルのチャンク分割
//!
//! `all.txt` は空行区切りのチャンク（"Theme: ...\nSubject: ..."）を追記していく形式。
//! 1行1プロンプトの単純なファイルも読み込めるようにする。

use crate::fields::FieldSet;
use crate::label::{parse_single_line, shorten, unique_labels, ShortMap, CONTEXT_KEY};

/// 空行区切りでチャンクに分割（前後の空白を除去、空チャンクは除外）
pub fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        chunks.push(current.join("\n").trim().to_string());
    }

    chunks
}

/// 構造化チャンク（"Theme:" やフィールド見出しを含む）か
pub fn is_structured(chunk: &str, fields: &FieldSet) -> bool {
    chunk.lines().any(|line| {
        line.split_once(':').is_some_and(|(key, _)| {
            let key = key.trim();
            key == CONTEXT_KEY || fields.by_display_name(key).is_some()
        })
    })
}

/// 保存ファイルの1エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEntry {
    /// 選択メニュー用ラベル（一意）
    pub label: String,
    /// 元テキスト
    pub text: String,
    /// 構造化チャンクか
    pub structured: bool,
}

/// 保存ファイルの内容をエントリに分解
///
/// 構造化チャンクが1つでもあれば空行区切りのチャンクとして、
/// なければ1行1プロンプトとして扱う。
pub fn parse_saved_entries(text: &str, fields: &FieldSet, short_map: &ShortMap) -> Vec<SavedEntry> {
    let chunks = split_chunks(text);
    let structured_file = chunks.iter().any(|c| is_structured(c, fields));

    let raw: Vec<(String, String, bool)> = if structured_file {
        chunks
            .into_iter()
            .map(|chunk| {
                let structured = is_structured(&chunk, fields);
                let label = if structured {
                    shorten(&chunk, short_map)
                } else {
                    parse_single_line(&chunk.replace('\n', " "))
                };
                (label, chunk, structured)
            })
            .collect()
    } else {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| (parse_single_line(line), line.to_string(), false))
            .collect()
    };

    let labels = unique_labels(raw.iter().map(|(label, _, _)| label.clone()).collect());
    raw.into_iter()
        .zip(labels)
        .map(|((_, text, structured), label)| SavedEntry { label, text, structured })
        .collect()
}

/// チャンクから Theme 行の値を取り出す
pub fn chunk_theme(chunk: &str) -> Option<&str> {
    chunk.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == CONTEXT_KEY).then(|| value.trim())
    })
}
