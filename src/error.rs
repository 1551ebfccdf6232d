use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfAiError {
    #[error(transparent)]
    Common(#[from] shelf_ai_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`shelf-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Dialog(#[from] dialoguer::Error),
}

impl ShelfAiError {
    /// APIキーの再設定を促すべきエラーか
    pub fn is_credential(&self) -> bool {
        match self {
            ShelfAiError::MissingApiKey => true,
            ShelfAiError::Common(e) => e.is_credential(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfAiError>;
