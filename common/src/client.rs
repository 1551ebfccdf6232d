//! 外部AIサービスとAPIキー供給の境界
//!
//! 実サービスへの接続はホスト側（CLIなど）が実装する。
//! テストでは決定的なフェイク実装に差し替える。

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, MerchandisingSuggestion, Photo};
use async_trait::async_trait;

/// AI解析クライアント
///
/// どちらの呼び出しも1回きり。リトライもタイムアウト制御もしない。
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// 写真から在庫と陳列提案を抽出する
    ///
    /// 写真は撮影順に渡される。失敗時は `Error::Service`、
    /// APIキーが原因なら `Error::Credential`。
    async fn analyze(&self, credential: &str, photos: &[Photo]) -> Result<AnalysisResult>;

    /// 提案1件分のモックアップ画像を生成し、Data URLで返す
    ///
    /// 画像が返ってこなかった場合は `Error::Service`。
    async fn generate_mockup(
        &self,
        credential: &str,
        suggestion: &MerchandisingSuggestion,
    ) -> Result<String>;
}

/// APIキーの供給元
///
/// 環境変数・設定ファイルなどの探索順はホスト側の実装詳細。
pub trait CredentialSource {
    /// 現在のAPIキー。未設定なら `None`
    fn credential(&self) -> Option<String>;
}

impl CredentialSource for Option<String> {
    fn credential(&self) -> Option<String> {
        self.clone()
    }
}

impl CredentialSource for String {
    fn credential(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl CredentialSource for &str {
    fn credential(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// 有効なAPIキーを取り出す
///
/// 空文字列や "undefined" は未設定として扱う。
pub fn require_credential<K: CredentialSource + ?Sized>(source: &K) -> Result<String> {
    source
        .credential()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty() && key != "undefined")
        .ok_or_else(|| Error::Credential("APIキーが設定されていません".into()))
}
