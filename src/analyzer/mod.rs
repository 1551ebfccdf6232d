//! AI解析（Gemini API連携）

mod gemini;
mod types;

pub use gemini::{GeminiClient, GEMINI_API_BASE};
