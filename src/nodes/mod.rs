//! ノード実装
//!
//! 各ノードはホストのノードクラスに相当し、`NodeOutput`（UI表示テキスト + 出力）を返す。
//! 生成はベストエフォート: 通信・デコード失敗は `Error: ...` テキストとして出力する。

mod character;
mod image_saver;
mod llm;
mod restore;

pub use character::{CharacterNode, CharacterResult};
pub use image_saver::{encode_png, ImageSaveOptions, ImageSaverNode, SavedImage};
pub use llm::LlmNode;
pub use restore::RestoreNode;

use crate::config::{Config, MAX_KEEP_ALIVE_MINUTES};
use crate::error::{NodeError, Result};
use crate::ollama::{GenerateRequest, OllamaClient};
use serde::Serialize;
use std::time::Duration;

/// ノードカテゴリ
pub const CATEGORY: &str = "Ollama";

/// ノード定義（クラス名 → 表示名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeSpec {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
}

/// 提供するノードの一覧
pub fn registry() -> Vec<NodeSpec> {
    vec![
        NodeSpec {
            class_name: LlmNode::CLASS_NAME,
            display_name: LlmNode::DISPLAY_NAME,
            category: CATEGORY,
        },
        NodeSpec {
            class_name: CharacterNode::CLASS_NAME,
            display_name: CharacterNode::DISPLAY_NAME,
            category: CATEGORY,
        },
        NodeSpec {
            class_name: RestoreNode::CLASS_NAME,
            display_name: RestoreNode::DISPLAY_NAME,
            category: CATEGORY,
        },
        NodeSpec {
            class_name: ImageSaverNode::CLASS_NAME,
            display_name: ImageSaverNode::DISPLAY_NAME,
            category: CATEGORY,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiText {
    pub text: Vec<String>,
}

/// ノードの出力（`{"ui": {"text": [...]}, "result": [...]}`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeOutput {
    pub ui: UiText,
    pub result: (String,),
}

impl NodeOutput {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            ui: UiText {
                text: vec![text.clone()],
            },
            result: (text,),
        }
    }

    /// エラーを出力テキストに変換
    pub fn error(err: &NodeError) -> Self {
        Self::text(error_text(err))
    }

    pub fn value(&self) -> &str {
        &self.result.0
    }

    pub fn is_error(&self) -> bool {
        self.result.0.starts_with("Error:")
    }
}

/// 失敗の種類ごとの出力テキスト
pub fn error_text(err: &NodeError) -> String {
    match err {
        NodeError::Http(_) | NodeError::ApiStatus { .. } => format!("Error: {}", err),
        NodeError::ApiParse(_) => "Error: Failed to decode JSON response from Ollama.".to_string(),
        _ => format!("Error: An unexpected error occurred: {}", err),
    }
}

/// 接続系の入力（model / url / keep_alive / seed）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub model: String,
    pub url: String,
    /// 分（0〜240）
    pub keep_alive: u32,
    pub seed: Option<u64>,
    pub timeout: Duration,
}

impl Connection {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            url: config.url.clone(),
            keep_alive: config.keep_alive,
            seed: None,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn client(&self) -> Result<OllamaClient> {
        if self.keep_alive > MAX_KEEP_ALIVE_MINUTES {
            return Err(NodeError::Config(format!(
                "keep_alive は0〜{}分で指定してください: {}",
                MAX_KEEP_ALIVE_MINUTES, self.keep_alive
            )));
        }
        OllamaClient::new(&self.url, self.timeout)
    }

    pub fn request(&self, prompt: impl Into<String>) -> GenerateRequest {
        GenerateRequest::new(self.model.clone(), prompt)
            .keep_alive_minutes(self.keep_alive)
            .seed(self.seed)
    }
}
