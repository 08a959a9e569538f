//! フィールド定義・保存データの検証エラー

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// FieldSet などの定義が不正
    #[error("Config error: {0}")]
    Config(String),

    /// 保存データ（CSVヘッダー等）が読めない
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
