mod client;
mod types;

pub use client::{fetch_model_names, OllamaClient, TAGS_TIMEOUT};
pub use types::{GenerateOptions, GenerateRequest, GenerateResponse, TagsResponse};
