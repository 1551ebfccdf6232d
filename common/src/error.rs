//! エラー型定義
//!
//! ウィザード全体で共有するエラー分類:
//! - Decode: 画像1枚ごとの失敗（その画像をスキップして続行）
//! - Credential: APIキー未設定・無効（再入力を促して撮影画面へ戻る）
//! - Service: 通信・パース・空レスポンス（メッセージ表示して撮影画面へ戻る）
//! - Capacity: 写真の上限到達（UI側で拒否、例外にはしない）

use regex::Regex;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Capacity error: up to {max} photos can be captured")]
    Capacity { max: usize },
}

impl Error {
    /// サービスから返された失敗理由を分類する
    ///
    /// APIキー関連の失敗は再入力が必要なので `Credential` に振り分け、
    /// それ以外は `Service` として扱う。
    pub fn classify_service_failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if is_credential_reason(&reason) {
            Error::Credential(reason)
        } else {
            Error::Service(reason)
        }
    }

    /// APIキーの再入力が必要なエラーか
    pub fn is_credential(&self) -> bool {
        matches!(self, Error::Credential(_))
    }
}

fn is_credential_reason(reason: &str) -> bool {
    lazy_static::lazy_static! {
        static ref CREDENTIAL_RE: Regex = Regex::new(
            r"(?i)(api[ _-]?key|API_KEY_INVALID|PERMISSION_DENIED|UNAUTHENTICATED|credential|API error:? (401|403)\b|API configuration is incomplete)"
        ).unwrap();
    }
    CREDENTIAL_RE.is_match(reason)
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_capacity() {
        let error = Error::Capacity { max: 10 };
        assert_eq!(
            format!("{}", error),
            "Capacity error: up to 10 photos can be captured"
        );
    }

    #[test]
    fn test_classify_invalid_key() {
        let err = Error::classify_service_failure(
            "API error 400: API key not valid. Please pass a valid API key. (API_KEY_INVALID)",
        );
        assert!(err.is_credential());
    }

    #[test]
    fn test_classify_forbidden_status() {
        assert!(Error::classify_service_failure("API error 403: forbidden").is_credential());
        assert!(Error::classify_service_failure("API error: 401").is_credential());
    }

    #[test]
    fn test_classify_missing_configuration() {
        let err = Error::classify_service_failure(
            "API configuration is incomplete. Please ensure the key is provided.",
        );
        assert!(err.is_credential());
    }

    #[test]
    fn test_classify_generic_failure() {
        let err = Error::classify_service_failure("API error 500: internal error");
        assert!(matches!(err, Error::Service(_)));
        assert!(!err.is_credential());

        let err = Error::classify_service_failure("connection reset by peer");
        assert!(matches!(err, Error::Service(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }
}
