//! モデル一覧の整形
//!
//! `/api/tags` が返すインストール済みモデルを、選択肢として並べ替える。

use serde::{Deserialize, Serialize};

/// 既定モデル（一覧の先頭に固定、取得失敗時の唯一の候補）
pub const DEFAULT_MODEL: &str = "gpt-oss:20b";

/// ビジョン対応モデル名に含まれる目印
const VISION_NAME_MARKERS: &[&str] = &[
    "llava",
    "bakllava",
    "vision",
    "moondream",
    "minicpm-v",
    "-vl",
    "vl:",
];

/// ビジョン対応を示すモデルファミリー
const VISION_FAMILIES: &[&str] = &["clip", "mllama"];

/// モデル詳細
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDetails {
    pub family: String,
    pub families: Option<Vec<String>>,
    pub parameter_size: String,
}

/// インストール済みモデル
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub name: String,
    pub modified_at: String,
    pub details: ModelDetails,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, modified_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified_at: modified_at.into(),
            ..Default::default()
        }
    }
}

/// 更新日時の新しい順に並べ、既定モデルを先頭に移動
///
/// 更新日時はRFC 3339文字列のまま比較する。日時がないモデルは末尾。
pub fn order_models(models: &[ModelInfo], default_model: &str) -> Vec<String> {
    let mut sorted: Vec<&ModelInfo> = models.iter().filter(|m| !m.name.is_empty()).collect();
    sorted.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

    let mut names: Vec<String> = sorted.into_iter().map(|m| m.name.clone()).collect();
    if let Some(pos) = names.iter().position(|n| n == default_model) {
        let default = names.remove(pos);
        names.insert(0, default);
    }
    names
}

/// ビジョン（画像入力）対応モデルか
pub fn is_vision_model(model: &ModelInfo) -> bool {
    let by_family = model
        .details
        .families
        .iter()
        .flatten()
        .any(|f| VISION_FAMILIES.contains(&f.to_ascii_lowercase().as_str()));
    if by_family {
        return true;
    }

    let name = model.name.to_ascii_lowercase();
    VISION_NAME_MARKERS.iter().any(|marker| name.contains(marker))
}

/// 取得失敗時の一覧
pub fn fallback_models() -> Vec<String> {
    vec![DEFAULT_MODEL.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_models_default_first() {
        let models = vec![
            ModelInfo::new("llama2", "2023-01-01"),
            ModelInfo::new("gpt-oss:20b", "2023-01-02"),
            ModelInfo::new("mistral", "2023-01-03"),
        ];
        let names = order_models(&models, DEFAULT_MODEL);
        assert_eq!(names, vec!["gpt-oss:20b", "mistral", "llama2"]);
    }

    #[test]
    fn test_order_models_newest_first_without_default() {
        let models = vec![
            ModelInfo::new("llama2", "2023-01-01"),
            ModelInfo::new("mistral", "2023-01-05"),
        ];
        let names = order_models(&models, DEFAULT_MODEL);
        assert_eq!(names, vec!["mistral", "llama2"]);
    }

    #[test]
    fn test_order_models_missing_timestamp_last() {
        let models = vec![
            ModelInfo::new("undated", ""),
            ModelInfo::new("dated", "2024-06-01T10:00:00Z"),
        ];
        assert_eq!(order_models(&models, DEFAULT_MODEL), vec!["dated", "undated"]);
    }

    #[test]
    fn test_order_models_empty() {
        assert!(order_models(&[], DEFAULT_MODEL).is_empty());
    }

    #[test]
    fn test_is_vision_model_by_name() {
        assert!(is_vision_model(&ModelInfo::new("llava:13b", "")));
        assert!(is_vision_model(&ModelInfo::new("llama3.2-vision:11b", "")));
        assert!(is_vision_model(&ModelInfo::new("qwen2.5vl:7b", "")));
        assert!(!is_vision_model(&ModelInfo::new("mistral:7b", "")));
    }

    #[test]
    fn test_is_vision_model_by_family() {
        let mut model = ModelInfo::new("custom-model", "");
        model.details.families = Some(vec!["llama".into(), "clip".into()]);
        assert!(is_vision_model(&model));
    }

    #[test]
    fn test_model_info_deserialize_tags_entry() {
        let json = r#"{
            "name": "llava:7b",
            "modified_at": "2024-05-01T12:00:00Z",
            "size": 4733363377,
            "details": {"family": "llama", "families": ["llama", "clip"], "parameter_size": "7B"}
        }"#;
        let model: ModelInfo = serde_json::from_str(json).unwrap();
        assert_eq!(model.name, "llava:7b");
        assert_eq!(model.details.parameter_size, "7B");
        assert!(is_vision_model(&model));
    }

    #[test]
    fn test_fallback_models() {
        assert_eq!(fallback_models(), vec!["gpt-oss:20b"]);
    }
}
