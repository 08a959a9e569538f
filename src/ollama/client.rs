//! Ollama HTTPクライアント
//!
//! - generate: `POST /api/generate`（stream: false）
//! - list_models: `GET /api/tags`

use super::types::{GenerateRequest, GenerateResponse, TagsResponse};
use crate::error::{NodeError, Result};
use ollama_nodes_common::{fallback_models, is_vision_model, order_models, ModelInfo, DEFAULT_MODEL};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// モデル一覧取得のタイムアウト（ノード定義の読み込みを待たせない）
pub const TAGS_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// テキスト生成（画像付きリクエストも同じエンドポイント）
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(
            "Ollama request: url={} model={} prompt={} chars, images={}",
            url,
            request.model,
            request.prompt.len(),
            request.images.len()
        );

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NodeError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| NodeError::ApiParse(e.to_string()))?;

        let preview: String = parsed.response.chars().take(500).collect();
        debug!("Ollama response: {}", preview);

        Ok(parsed.response)
    }

    /// インストール済みモデル一覧
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).timeout(TAGS_TIMEOUT).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let tags: TagsResponse =
            serde_json::from_str(&body).map_err(|e| NodeError::ApiParse(e.to_string()))?;
        debug!("Ollama models: {}件", tags.models.len());
        Ok(tags.models)
    }

    /// 選択肢用のモデル名一覧
    ///
    /// 取得に失敗した場合は既定モデルのみを返す
    pub async fn model_names(&self, vision_only: bool) -> Vec<String> {
        match self.list_models().await {
            Ok(models) => {
                let models: Vec<ModelInfo> = if vision_only {
                    models.into_iter().filter(is_vision_model).collect()
                } else {
                    models
                };
                let names = order_models(&models, DEFAULT_MODEL);
                if names.is_empty() {
                    fallback_models()
                } else {
                    names
                }
            }
            Err(e) => {
                warn!("モデル一覧の取得に失敗: {}", e);
                fallback_models()
            }
        }
    }
}

/// URLを指定してモデル名一覧を取得（失敗時は既定モデルのみ）
pub async fn fetch_model_names(url: &str, vision_only: bool) -> Vec<String> {
    match OllamaClient::new(url, TAGS_TIMEOUT) {
        Ok(client) => client.model_names(vision_only).await,
        Err(e) => {
            warn!("HTTPクライアントの初期化に失敗: {}", e);
            fallback_models()
        }
    }
}
