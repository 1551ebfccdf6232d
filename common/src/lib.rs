//! Shelf AI Common Library
//!
//! ウィザードの状態遷移・データモデル・AIサービス契約など、
//! ホスト（CLI）に依存しない共通部分

pub mod analyzer;
pub mod client;
pub mod data_url;
pub mod error;
pub mod parser;
pub mod photos;
pub mod prompts;
pub mod report;
pub mod types;
pub mod wizard;

#[cfg(feature = "excel")]
pub mod export;

pub use analyzer::{categories, filter_by_category, normalize_result, ALL_CATEGORIES};
pub use client::{require_credential, AnalysisClient, CredentialSource};
pub use data_url::{extract_base64_from_data_url, extract_mime_type_from_data_url, to_data_url};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_analysis_response};
pub use photos::{PhotoCollection, MAX_PHOTOS};
pub use report::{BreakdownRow, InventoryReport};
pub use types::{AnalysisResult, Impact, InventoryItem, MerchandisingSuggestion, Photo};
pub use wizard::{Step, WizardController, WizardState};
