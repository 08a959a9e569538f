use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("保存済みプロンプトが見つかりません: {0}")]
    EntryNotFound(String),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollamaがエラーを返しました (HTTP {status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Failed to decode JSON response from Ollama: {0}")]
    ApiParse(String),

    #[error("画像エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] ollama_nodes_common::Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;
