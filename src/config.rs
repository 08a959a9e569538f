use crate::error::{NodeError, Result};
use ollama_nodes_common::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ollamaの既定URL
pub const DEFAULT_URL: &str = "http://127.0.0.1:11434";

/// keep_alive（分）の上限
pub const MAX_KEEP_ALIVE_MINUTES: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub url: String,
    pub model: String,
    /// 生成後にモデルをメモリに残す時間（分）
    pub keep_alive: u32,
    pub timeout_seconds: u64,
    /// all.txt / prompts.csv の保存先
    pub store_dir: PathBuf,
    /// 画像保存先
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            model: DEFAULT_MODEL.into(),
            keep_alive: 0,
            timeout_seconds: 120,
            store_dir: PathBuf::from("prompts"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// 設定を読み込み（OLLAMA_HOST が設定されていればURLを上書き）
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;

        // 環境変数を優先
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            if !host.trim().is_empty() {
                config.url = normalize_host(&host);
            }
        }

        Ok(config)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| NodeError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ollama-nodes").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(NodeError::Config("URLが空です".into()));
        }
        if self.model.trim().is_empty() {
            return Err(NodeError::Config("モデル名が空です".into()));
        }
        if self.keep_alive > MAX_KEEP_ALIVE_MINUTES {
            return Err(NodeError::Config(format!(
                "keep_alive は0〜{}分で指定してください: {}",
                MAX_KEEP_ALIVE_MINUTES, self.keep_alive
            )));
        }
        Ok(())
    }

    pub fn set_url(&mut self, url: String) -> Result<()> {
        self.url = normalize_host(&url);
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }
}

/// スキームなしでポートもない場合に補うポート（Ollamaの既定）
pub const DEFAULT_PORT: u16 = 11434;

/// "127.0.0.1:11434" のようなスキームなし指定に http:// を補い、末尾の / を除く
///
/// スキームなしでポートがなければ `DEFAULT_PORT` を付ける（"0.0.0.0" → "http://0.0.0.0:11434"）
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        return host.to_string();
    }

    let (authority, path) = match host.find('/') {
        Some(i) => host.split_at(i),
        None => (host, ""),
    };
    if has_port(authority) {
        format!("http://{}", host)
    } else {
        format!("http://{}:{}{}", authority, DEFAULT_PORT, path)
    }
}

fn has_port(authority: &str) -> bool {
    // "[::1]:11434" の角括弧内は見ない
    let tail = authority.rsplit(']').next().unwrap_or(authority);
    tail.rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
}
