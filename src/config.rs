use crate::error::{Result, ShelfAiError};
use serde::{Deserialize, Serialize};
use shelf_ai_common::CredentialSource;
use std::path::PathBuf;

/// 環境変数の探索順
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// 受け付けるAPIキーの最小文字数
pub const MIN_API_KEY_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub mockup_model: String,
    pub max_image_size: u32,
    pub jpeg_quality: u8,
    /// この実行中に入力されたキー（保存せず、環境変数より優先）
    #[serde(skip)]
    pub session_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".into(),
            mockup_model: "gemini-2.0-flash-preview-image-generation".into(),
            max_image_size: 1024,
            jpeg_quality: 70,
            session_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ShelfAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("shelf-ai").join("config.json"))
    }

    /// 有効なAPIキー（入力済みキー → 環境変数 → 保存済みキー）
    pub fn get_api_key(&self) -> Result<String> {
        self.api_key_with(|name| std::env::var(name).ok())
            .ok_or(ShelfAiError::MissingApiKey)
    }

    fn api_key_with<F>(&self, lookup_env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.session_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_usable_key(key))
            .map(str::to_string)
            .or_else(|| resolve_api_key(lookup_env, self.api_key.as_deref()))
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_ok()
    }

    /// APIキーを検証して保存
    ///
    /// 保存に失敗しても、この実行中は入力したキーを使う。
    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.use_api_key(key)?;
        self.save()
    }

    /// 検証したキーをこの実行中だけ有効にする
    pub fn use_api_key(&mut self, key: String) -> Result<()> {
        let key = validate_api_key(&key)?;
        self.api_key = Some(key.clone());
        self.session_key = Some(key);
        Ok(())
    }

    pub fn clear_api_key(&mut self) -> Result<()> {
        self.api_key = None;
        self.session_key = None;
        self.save()
    }
}

impl CredentialSource for Config {
    fn credential(&self) -> Option<String> {
        self.get_api_key().ok()
    }
}

/// 環境変数 → 保存済みキーの順に探す
///
/// 空文字列と "undefined" は未設定扱い。
pub fn resolve_api_key<F>(lookup_env: F, stored: Option<&str>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup_env(name))
        .chain(stored.map(str::to_string))
        .map(|key| key.trim().to_string())
        .find(|key| is_usable_key(key))
}

pub fn validate_api_key(key: &str) -> Result<String> {
    let key = key.trim();
    if key.chars().count() < MIN_API_KEY_LEN {
        return Err(ShelfAiError::Config(format!(
            "APIキーが短すぎます（{}文字以上）",
            MIN_API_KEY_LEN
        )));
    }
    Ok(key.to_string())
}

fn is_usable_key(key: &str) -> bool {
    !key.is_empty() && key != "undefined"
}
