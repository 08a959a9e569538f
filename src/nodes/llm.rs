//! 汎用テキスト生成ノード

use super::{Connection, NodeOutput};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default)]
pub struct LlmNode;

impl LlmNode {
    pub const CLASS_NAME: &'static str = "OllamaLLMNode";
    pub const DISPLAY_NAME: &'static str = "Ollama LLM";

    /// プロンプトをそのまま送信し、応答テキストを出力する
    pub async fn generate_text(&self, prompt: &str, conn: &Connection) -> NodeOutput {
        let client = match conn.client() {
            Ok(client) => client,
            Err(e) => return NodeOutput::error(&e),
        };

        match client.generate(&conn.request(prompt)).await {
            Ok(text) => NodeOutput::text(text),
            Err(e) => {
                warn!("生成に失敗: {}", e);
                NodeOutput::error(&e)
            }
        }
    }
}
