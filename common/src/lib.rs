//! Ollama Nodes Common Library
//!
//! CLIとノード実装で共有される、I/Oを持たない文字列処理

pub mod chunk;
pub mod csv;
pub mod error;
pub mod fields;
pub mod filename;
pub mod label;
pub mod models;
pub mod prompts;

pub use chunk::{chunk_theme, is_structured, parse_saved_entries, split_chunks, SavedEntry};
pub use error::{Error, Result};
pub use fields::{extract, is_placeholder, render_chunk, render_prompt, FieldDef, FieldSet, ParsedFields};
pub use filename::{build_image_filename, sanitize_keywords, sanitize_prefix};
pub use label::{parse_single_line, sample_words, shorten, unique_labels, ShortMap};
pub use models::{fallback_models, is_vision_model, order_models, ModelInfo, DEFAULT_MODEL};
pub use prompts::{build_character_prompt, CHARACTER_SYSTEM_INSTRUCTION, DEFAULT_KEYWORD_PROMPT};
