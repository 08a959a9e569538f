//! ラベル生成モジュール
//!
//! 保存済みプロンプトを選択メニューに表示するための短いラベルを作る。
//!
//! - shorten: "Key: Value" 形式のチャンクから "Sub: w1 w2 w3, ..." を生成
//! - parse_single_line: 1行プロンプトを10語までに切り詰め
//!
//! 語の抽出は値そのものをシードにした決定的サンプリングで、
//! 同じ入力からは常に同じラベルが得られる。

use crate::chunk::chunk_theme;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// フィールドごとに抽出する語数
pub const WORDS_PER_FIELD: usize = 3;

/// 1行ラベルの最大語数
pub const SINGLE_LINE_MAX_WORDS: usize = 10;

/// 認識できるフィールドがない場合に使う先頭語数
pub const FALLBACK_WORDS: usize = 5;

/// 省略記号
pub const ELLIPSIS: &str = "...";

/// コンテキスト行（チャンク先頭に出す）のキーと略称
pub const CONTEXT_KEY: &str = "Theme";
pub const CONTEXT_ABBREV: &str = "Thm";

/// 表示名 → 略称の対応表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortMap {
    entries: Vec<(String, String)>,
}

impl ShortMap {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, display_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == display_name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShortMap {
    fn default() -> Self {
        Self::new([
            ("Subject", "Sub"),
            ("Composition", "Com"),
            ("Action", "Act"),
            ("Location", "Loc"),
            ("Style", "Sty"),
        ])
    }
}

/// 値から決定的に語を抽出
///
/// 値のSHA-256を `ChaCha8Rng` のシードにし、`next_u64` による部分Fisher-Yates
/// （`j = i + r % (n - i)`）で位置を`count`個選んで、元の語順のまま連結する。
/// 語数が`count`以下なら全語をそのまま返す。保存済みラベルが変わらないよう
/// 乱数列・選び方ともに固定している。
pub fn sample_words(value: &str, count: usize) -> String {
    let value = value.trim();
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.len() <= count {
        return words.join(" ");
    }

    let seed: [u8; 32] = Sha256::digest(value.as_bytes()).into();
    let mut rng = ChaCha8Rng::from_seed(seed);

    let mut positions: Vec<usize> = (0..words.len()).collect();
    for i in 0..count {
        let remaining = (words.len() - i) as u64;
        let j = i + (rng.next_u64() % remaining) as usize;
        positions.swap(i, j);
    }
    let mut picked = positions[..count].to_vec();
    picked.sort_unstable();

    picked
        .into_iter()
        .map(|i| words[i])
        .collect::<Vec<_>>()
        .join(" ")
}

/// チャンクから表示用ラベルを生成
///
/// # Examples
/// ```
/// use ollama_nodes_common::{shorten, ShortMap};
///
/// let label = shorten("Subject: A B C D\nAction: X Y Z", &ShortMap::default());
/// assert!(label.contains("Sub: "));
/// assert!(label.ends_with("Act: X Y Z"));
/// ```
pub fn shorten(chunk: &str, short_map: &ShortMap) -> String {
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return String::new();
    }

    let mut parts = Vec::new();

    if let Some(value) = chunk_theme(chunk) {
        let short = sample_words(value, WORDS_PER_FIELD);
        if !short.is_empty() {
            parts.push(format!("{}: {}", CONTEXT_ABBREV, short));
        }
    }

    for line in chunk.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key == CONTEXT_KEY {
            continue;
        }
        let Some(abbrev) = short_map.get(key) else {
            continue;
        };
        let short = sample_words(value, WORDS_PER_FIELD);
        if !short.is_empty() {
            parts.push(format!("{}: {}", abbrev, short));
        }
    }

    if parts.is_empty() {
        let head: Vec<&str> = chunk.split_whitespace().take(FALLBACK_WORDS).collect();
        return format!("{}{}", head.join(" "), ELLIPSIS);
    }

    parts.join(", ")
}

/// 1行プロンプトのラベル（10語を超える場合は切り詰め）
pub fn parse_single_line(line: &str) -> String {
    let line = line.trim();
    if line.is_empty() {
        return String::new();
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > SINGLE_LINE_MAX_WORDS {
        return format!("{}{}", words[..SINGLE_LINE_MAX_WORDS].join(" "), ELLIPSIS);
    }
    line.to_string()
}

/// 重複ラベルに " (2)", " (3)" ... を付けて一意にする
///
/// 付けた結果が既存のラベルと衝突する場合は番号を進める
pub fn unique_labels(labels: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = labels.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(labels.len());

    labels
        .into_iter()
        .map(|label| {
            if emitted.insert(label.clone()) {
                return label;
            }
            let mut n = 2;
            loop {
                let candidate = format!("{} ({})", label, n);
                if !taken.contains(&candidate) {
                    taken.insert(candidate.clone());
                    emitted.insert(candidate.clone());
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}
