//! Ollama Nodes
//!
//! ローカルのOllamaサーバーでテキスト・キャラクタープロンプトを生成し、
//! 保存・復元・画像のキーワード保存を行うノード集

pub mod cli;
pub mod config;
pub mod error;
pub mod nodes;
pub mod ollama;
pub mod scanner;
pub mod store;
