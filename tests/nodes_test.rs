//! ノードの結合テスト
//!
//! wiremockのOllamaと一時ディレクトリで、生成 → 保存 → 復元の流れを検証

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ollama_nodes::config::Config;
use ollama_nodes::nodes::{
    CharacterNode, Connection, ImageSaveOptions, ImageSaverNode, LlmNode, RestoreNode,
};
use ollama_nodes::store::PromptStore;
use ollama_nodes_common::FieldSet;
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const CHARACTER_RESPONSE: &str = "Here is your prompt:

• Subject: A stoic robot barista with glowing blue optics
• Composition: Medium shot, centered
• Action: Pouring latte art into a ceramic cup
• Location: A neon-lit cafe in a rainy megacity
• Style: Cinematic cyberpunk illustration
• Editing Instructions: N/A
• Camera and lighting details: 35mm lens, rim lighting from pink signs
• Specific text integration: The sign reads \"OPEN 24H\"
• Factual constraints (for diagrams): N/A";

fn connection_for(server: &MockServer) -> Connection {
    let mut conn = Connection::from_config(&Config::default());
    conn.url = server.uri();
    conn.timeout = Duration::from_secs(5);
    conn
}

async fn mount_generate(server: &MockServer, response: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": response})))
        .mount(server)
        .await;
}

// ============================================
// LLM
// ============================================

/// 応答テキストがそのまま出力になる
#[tokio::test]
async fn test_llm_node_outputs_response() {
    let server = MockServer::start().await;
    mount_generate(&server, "The sky is blue.").await;

    let output = LlmNode
        .generate_text("Why is the sky blue?", &connection_for(&server))
        .await;
    assert_eq!(output.value(), "The sky is blue.");
    assert_eq!(output.ui.text, vec!["The sky is blue."]);
}

/// デコード失敗は固定のエラーテキスト
#[tokio::test]
async fn test_llm_node_decode_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let output = LlmNode.generate_text("p", &connection_for(&server)).await;
    assert_eq!(
        output.value(),
        "Error: Failed to decode JSON response from Ollama."
    );
}

// ============================================
// キャラクター生成 → 保存 → 復元
// ============================================

/// 抽出・整形・保存
#[tokio::test]
async fn test_character_node_extracts_and_saves() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": false, "keep_alive": "0m"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": CHARACTER_RESPONSE})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let store = PromptStore::new(dir.path().join("prompts"));
    let node = CharacterNode::default().with_store(store.clone());

    let result = node
        .generate_character_prompt("cyberpunk cafe", &connection_for(&server))
        .await
        .unwrap();

    assert_eq!(result.fields.len(), 9);
    assert_eq!(
        result.fields.get("subject"),
        Some("A stoic robot barista with glowing blue optics")
    );
    let text = result.output.value();
    assert!(text.starts_with("Subject: A stoic robot barista"));
    assert!(!text.contains("N/A"), "N/Aの欄は出力しない");
    assert!(!text.contains("Here is your prompt"));

    // all.txt
    let saved = std::fs::read_to_string(store.text().path()).unwrap();
    assert!(saved.starts_with("Theme: cyberpunk cafe\nSubject: "));

    // prompts.csv
    let records = store.csv().read_records(node.fields()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].theme, "cyberpunk cafe");
    assert_eq!(records[0].model, "gpt-oss:20b");
    assert_eq!(
        records[0].fields.get("specific_text"),
        Some("The sign reads \"OPEN 24H\"")
    );

    // 復元
    let restore = RestoreNode::default();
    let labels = restore.labels(store.text().path()).unwrap();
    assert_eq!(labels.len(), 1);
    assert!(labels[0].starts_with("Thm: cyberpunk cafe, Sub: "));

    let restored = restore.restore(store.text().path(), &labels[0]).unwrap();
    assert_eq!(restored.value(), text);
}

/// 2回保存すると2エントリ
#[tokio::test]
async fn test_character_node_appends() {
    let server = MockServer::start().await;
    mount_generate(&server, CHARACTER_RESPONSE).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let store = PromptStore::new(dir.path());
    let node = CharacterNode::default().with_store(store.clone());
    let conn = connection_for(&server);

    node.generate_character_prompt("first", &conn).await.unwrap();
    node.generate_character_prompt("second", &conn).await.unwrap();

    assert_eq!(store.text().read_chunks().unwrap().len(), 2);
    assert_eq!(store.csv().read_records(&FieldSet::standard()).unwrap().len(), 2);
}

/// 見出しのない応答は生テキストを出力し、保存しない
#[tokio::test]
async fn test_character_node_unstructured_response() {
    let server = MockServer::start().await;
    mount_generate(&server, "I cannot help with that.").await;

    let dir = tempdir().expect("Failed to create temp dir");
    let store = PromptStore::new(dir.path());
    let node = CharacterNode::default().with_store(store.clone());

    let result = node
        .generate_character_prompt("x", &connection_for(&server))
        .await
        .unwrap();
    assert_eq!(result.output.value(), "I cannot help with that.");
    assert!(result.fields.is_empty());
    assert!(!store.text().path().exists());
}

/// APIエラーはエラーテキスト
#[tokio::test]
async fn test_character_node_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("out of memory"))
        .mount(&server)
        .await;

    let result = CharacterNode::default()
        .generate_character_prompt("x", &connection_for(&server))
        .await
        .unwrap();
    assert!(result.output.is_error());
    assert!(result.output.value().contains("out of memory"));
}

// ============================================
// 画像保存
// ============================================

fn test_image() -> DynamicImage {
    let mut img = RgbImage::new(64, 64);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 4) as u8, (y * 4) as u8, 128]);
    }
    DynamicImage::ImageRgb8(img)
}

/// キーワードをファイル名にして保存
#[tokio::test]
async fn test_image_saver_uses_vision_keywords() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(|req: &Request| {
            serde_json::from_slice::<serde_json::Value>(&req.body)
                .ok()
                .and_then(|v| v["images"].as_array().map(|a| a.len() == 1))
                .unwrap_or(false)
        })
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "A cute cat sitting on a fence.\n"})),
        )
        .mount(&server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let options = ImageSaveOptions {
        folder_path: dir.path().join("saved"),
        filename_prefix: "Test".into(),
        ..Default::default()
    };

    let (output, saved) = ImageSaverNode
        .save_images(&[test_image()], &options, &connection_for(&server))
        .await
        .unwrap();

    assert_eq!(saved.len(), 1);
    let file_name = saved[0].path.file_name().unwrap().to_string_lossy().to_string();
    assert_eq!(file_name, "Test_A_cute_cat_sitting_on_a_fence_64x64_00001.png");
    assert_eq!(saved[0].keywords, "A_cute_cat_sitting_on_a_fence");
    assert_eq!(output.value(), saved[0].path.display().to_string());

    let reloaded = image::open(&saved[0].path).unwrap();
    assert_eq!(reloaded.dimensions(), (64, 64));
}

/// サイズなし指定と連番
#[tokio::test]
async fn test_image_saver_without_dimensions() {
    let server = MockServer::start().await;
    mount_generate(&server, "red_fox_snow").await;

    let dir = tempdir().expect("Failed to create temp dir");
    let options = ImageSaveOptions {
        folder_path: dir.path().to_path_buf(),
        include_dimensions: false,
        ..Default::default()
    };
    let conn = connection_for(&server);

    let first = ImageSaverNode.save_image(&test_image(), &options, &conn).await.unwrap();
    let second = ImageSaverNode.save_image(&test_image(), &options, &conn).await.unwrap();

    assert_eq!(first.path.file_name().unwrap(), "red_fox_snow_00001.png");
    assert_eq!(second.path.file_name().unwrap(), "red_fox_snow_00002.png");
}
