//! Ollama API のリクエスト/レスポンス型

use ollama_nodes_common::ModelInfo;
use serde::{Deserialize, Serialize};

/// `POST /api/generate` のリクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    /// "5m" 形式
    pub keep_alive: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
    /// base64エンコード済み画像（ビジョンモデル用）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub seed: u64,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            keep_alive: "0m".into(),
            options: None,
            images: Vec::new(),
        }
    }

    pub fn keep_alive_minutes(mut self, minutes: u32) -> Self {
        self.keep_alive = format!("{}m", minutes);
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.options = seed.map(|seed| GenerateOptions { seed });
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// `POST /api/generate` のレスポンス（stream: false）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    pub model: String,
    pub response: String,
    pub done: bool,
}

/// `GET /api/tags` のレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagsResponse {
    pub models: Vec<ModelInfo>,
}
