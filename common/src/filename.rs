//! ファイル名生成モジュール
//!
//! ビジョンモデルが返したキーワードを、保存用ファイル名として安全な形に整える。

use regex::Regex;

/// キーワード部分の最大文字数
pub const MAX_KEYWORD_CHARS: usize = 80;

/// キーワードが空になった場合の代替
pub const FALLBACK_KEYWORD: &str = "image";

/// 出力画像の拡張子
pub const IMAGE_EXTENSION: &str = "png";

/// 英数字・`-`・`_` 以外の連続を `_` 1つにまとめる
fn sanitize(raw: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
        static ref UNDERSCORES_RE: Regex = Regex::new(r"_{2,}").unwrap();
    }

    let replaced = UNSAFE_RE.replace_all(raw.trim(), "_");
    let collapsed = UNDERSCORES_RE.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// キーワードをファイル名用に整形
///
/// # Examples
/// ```
/// use ollama_nodes_common::sanitize_keywords;
///
/// assert_eq!(
///     sanitize_keywords("A_cute_cat_sitting_on_a_fence."),
///     "A_cute_cat_sitting_on_a_fence"
/// );
/// assert_eq!(sanitize_keywords("***"), "image");
/// ```
pub fn sanitize_keywords(raw: &str) -> String {
    // モデルが複数行で答えた場合は最初の行だけを使う
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    let sanitized = sanitize(first_line);
    // ASCIIのみなので文字境界で切れる
    let truncated: String = sanitized.chars().take(MAX_KEYWORD_CHARS).collect();
    let truncated = truncated.trim_end_matches(['_', '-']);

    if truncated.is_empty() {
        FALLBACK_KEYWORD.to_string()
    } else {
        truncated.to_string()
    }
}

/// プレフィックスを整形（空なら空文字）
pub fn sanitize_prefix(prefix: &str) -> String {
    sanitize(prefix)
}

/// 保存ファイル名を組み立てる
///
/// `{prefix}_{keywords}[_{W}x{H}]_{counter:05}.png`
pub fn build_image_filename(
    prefix: &str,
    keywords: &str,
    dimensions: Option<(u32, u32)>,
    counter: u32,
) -> String {
    let mut parts = Vec::with_capacity(4);

    let prefix = sanitize_prefix(prefix);
    if !prefix.is_empty() {
        parts.push(prefix);
    }
    parts.push(sanitize_keywords(keywords));
    if let Some((width, height)) = dimensions {
        parts.push(format!("{}x{}", width, height));
    }
    parts.push(format!("{:05}", counter));

    format!("{}.{}", parts.join("_"), IMAGE_EXTENSION)
}
