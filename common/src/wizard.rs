//! ウィザードの状態機械
//!
//! 撮影 → 解析中 → 分析 → 再配置 → レポート の5ステップを管理する。
//! 状態の変更はすべて [`WizardController`] の遷移メソッド経由で行い、
//! 非同期処理（解析・モックアップ生成）の結果は完了時に1回でまとめて反映する。

use crate::analyzer::normalize_result;
use crate::client::{require_credential, AnalysisClient, CredentialSource};
use crate::error::{Error, Result};
use crate::photos::PhotoCollection;
use crate::types::{AnalysisResult, InventoryItem, MerchandisingSuggestion, Photo};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// ウィザードのステップ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Capture,
    Processing,
    Analysis,
    Reorganize,
    Report,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Capture,
        Step::Processing,
        Step::Analysis,
        Step::Reorganize,
        Step::Report,
    ];

    /// 0始まりの順番
    pub fn index(&self) -> usize {
        match self {
            Step::Capture => 0,
            Step::Processing => 1,
            Step::Analysis => 2,
            Step::Reorganize => 3,
            Step::Report => 4,
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            Step::Capture => "撮影",
            Step::Processing => "解析中",
            Step::Analysis => "在庫分析",
            Step::Reorganize => "陳列改善",
            Step::Report => "レポート",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// ウィザードの状態（スナップショット可能な値）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    step: Step,
    photos: PhotoCollection,
    items: Vec<InventoryItem>,
    suggestions: Vec<MerchandisingSuggestion>,
    error: Option<String>,
    credential_required: bool,
}

impl WizardState {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// 作業中の提案リスト（スキップした提案は含まない）
    pub fn suggestions(&self) -> &[MerchandisingSuggestion] {
        &self.suggestions
    }

    /// 表示中のエラー（常に最大1件）
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// APIキーの再入力が必要か
    pub fn credential_required(&self) -> bool {
        self.credential_required
    }

    /// 指定ステップへ直接移動できるか
    pub fn can_navigate_to(&self, step: Step) -> bool {
        match step {
            Step::Capture => true,
            Step::Processing => false,
            Step::Analysis | Step::Report => !self.items.is_empty(),
            Step::Reorganize => !self.suggestions.is_empty(),
        }
    }

    fn record_error(&mut self, err: &Error) {
        if err.is_credential() {
            self.credential_required = true;
        }
        self.error = Some(err.to_string());
    }

    /// モックアップ生成がまだの提案
    fn pending_suggestion(&self, id: &str) -> Option<&MerchandisingSuggestion> {
        self.suggestions
            .iter()
            .find(|s| s.id == id && s.mockup_image.is_none())
    }

    fn apply_mockup(&mut self, id: &str, outcome: Result<String>) -> Result<bool> {
        match outcome {
            Ok(image) => match self.suggestions.iter_mut().find(|s| s.id == id) {
                Some(suggestion) => {
                    suggestion.mockup_image = Some(image);
                    suggestion.is_applied = Some(true);
                    debug!(suggestion = id, "mockup applied");
                    Ok(true)
                }
                None => {
                    debug!(suggestion = id, "mockup discarded, suggestion no longer listed");
                    Ok(false)
                }
            },
            Err(err) => {
                warn!(suggestion = id, error = %err, "mockup generation failed");
                self.record_error(&err);
                Err(err)
            }
        }
    }
}

/// ウィザードのコントローラ
///
/// 状態・AIクライアント・APIキー供給元を所有する唯一の変更窓口。
/// 非同期処理中も `&mut self` を握るため、結果の反映が他の遷移と
/// 交錯することはない。
pub struct WizardController<C, K> {
    client: C,
    credentials: K,
    state: WizardState,
    analysis: Option<AnalysisResult>,
}

impl<C, K> WizardController<C, K>
where
    C: AnalysisClient,
    K: CredentialSource,
{
    pub fn new(client: C, credentials: K) -> Self {
        Self {
            client,
            credentials,
            state: WizardState::default(),
            analysis: None,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// 現在の状態のコピー
    pub fn snapshot(&self) -> WizardState {
        self.state.clone()
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn credentials_mut(&mut self) -> &mut K {
        &mut self.credentials
    }

    /// 直近の解析結果（スキップやモックアップの影響を受けない原本）
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// 写真を追加
    ///
    /// 撮影ステップ以外、または上限到達時は何もせず `false`。
    /// 追加に成功するとエラー表示を消す。
    pub fn add_photo(&mut self, photo: Photo) -> bool {
        if self.state.step != Step::Capture {
            debug!(step = ?self.state.step, "add_photo ignored outside capture");
            return false;
        }
        let id = photo.id().to_string();
        if let Err(err) = self.state.photos.try_add(photo) {
            debug!(photo = %id, error = %err, "photo rejected");
            return false;
        }
        self.state.error = None;
        debug!(photo = %id, count = self.state.photos.len(), "photo added");
        true
    }

    /// 写真を削除。見つからなければ `false`
    pub fn remove_photo(&mut self, id: &str) -> bool {
        if self.state.step != Step::Capture {
            return false;
        }
        let removed = self.state.photos.remove(id).is_some();
        if removed {
            debug!(photo = id, count = self.state.photos.len(), "photo removed");
        }
        removed
    }

    /// 解析開始（撮影 → 解析中）
    ///
    /// 写真が1枚もない場合は何もせず `false`。
    pub fn begin_analysis(&mut self) -> bool {
        if self.state.step != Step::Capture || self.state.photos.is_empty() {
            debug!(step = ?self.state.step, photos = self.state.photos.len(), "analysis not started");
            return false;
        }
        self.state.step = Step::Processing;
        self.state.error = None;
        debug!(photos = self.state.photos.len(), "analysis started");
        true
    }

    /// 解析結果を反映（解析中 → 分析 / 撮影）
    ///
    /// 成功時は items と suggestions を丸ごと置き換える。
    /// 失敗時は既存の結果に触れずに撮影ステップへ戻し、エラーを表示する。
    pub fn finish_analysis(&mut self, outcome: Result<AnalysisResult>) -> Result<()> {
        if self.state.step != Step::Processing {
            debug!(step = ?self.state.step, "analysis outcome discarded");
            return Ok(());
        }

        match outcome {
            Ok(result) => {
                let result = normalize_result(result);
                self.state.items = result.items.clone();
                self.state.suggestions = result.suggestions.clone();
                self.state.credential_required = false;
                self.state.step = Step::Analysis;
                debug!(
                    items = result.items.len(),
                    suggestions = result.suggestions.len(),
                    "analysis completed"
                );
                self.analysis = Some(result);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "analysis failed");
                self.state.step = Step::Capture;
                self.state.record_error(&err);
                Err(err)
            }
        }
    }

    /// 在庫解析を実行
    ///
    /// 写真がなく開始できなかった場合は `Ok(false)`。
    /// 失敗時は状態を撮影ステップへ戻したうえでエラーを返す。
    pub async fn analyze(&mut self) -> Result<bool> {
        if !self.begin_analysis() {
            return Ok(false);
        }

        let outcome = match require_credential(&self.credentials) {
            Ok(credential) => {
                self.client
                    .analyze(&credential, self.state.photos.as_slice())
                    .await
            }
            Err(err) => Err(err),
        };

        self.finish_analysis(outcome).map(|_| true)
    }

    /// 分析 → 再配置
    pub fn continue_to_reorganize(&mut self) -> bool {
        self.transition(Step::Analysis, Step::Reorganize)
    }

    /// 再配置 → レポート
    pub fn complete(&mut self) -> bool {
        self.transition(Step::Reorganize, Step::Report)
    }

    fn transition(&mut self, from: Step, to: Step) -> bool {
        if self.state.step != from {
            debug!(step = ?self.state.step, expected = ?from, "transition ignored");
            return false;
        }
        self.state.step = to;
        debug!(?from, ?to, "step changed");
        true
    }

    /// 任意のステップへ移動
    ///
    /// 移動条件を満たさない場合は何もしない（行き止まりを作らないため）。
    /// 解析中に移動した場合、後から届いた解析結果は破棄される。
    pub fn navigate_to(&mut self, step: Step) -> bool {
        if !self.state.can_navigate_to(step) {
            debug!(current = ?self.state.step, requested = ?step, "navigation ignored");
            return false;
        }
        self.state.step = step;
        debug!(?step, "navigated");
        true
    }

    /// 提案を作業リストから外す。2回目以降は何もしない
    pub fn skip_suggestion(&mut self, id: &str) -> bool {
        let before = self.state.suggestions.len();
        self.state.suggestions.retain(|s| s.id != id);
        let removed = self.state.suggestions.len() != before;
        if removed {
            debug!(suggestion = id, "suggestion skipped");
        }
        removed
    }

    /// 提案1件のモックアップを生成
    ///
    /// 対象が存在しない、または生成済みなら `Ok(false)`。
    pub async fn generate_mockup(&mut self, id: &str) -> Result<bool> {
        let mut outcomes = self.generate_mockups(&[id]).await;
        match outcomes.pop() {
            Some((_, outcome)) => outcome,
            None => Ok(false),
        }
    }

    /// 複数提案のモックアップを並行生成
    ///
    /// 完了した順に提案IDをキーにして反映する。各結果は独立しており、
    /// 完了順に依存しない。戻り値は完了順の (提案ID, 結果)。
    pub async fn generate_mockups<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<(String, Result<bool>)> {
        let mut requested = HashSet::new();
        let targets: Vec<MerchandisingSuggestion> = ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| requested.insert(id.to_string()))
            .filter_map(|id| self.state.pending_suggestion(id).cloned())
            .collect();

        if targets.is_empty() {
            return Vec::new();
        }

        let credential = match require_credential(&self.credentials) {
            Ok(credential) => credential,
            Err(err) => {
                self.state.record_error(&err);
                let message = match err {
                    Error::Credential(message) => message,
                    other => other.to_string(),
                };
                return targets
                    .into_iter()
                    .map(|s| (s.id, Err(Error::Credential(message.clone()))))
                    .collect();
            }
        };

        let client = &self.client;
        let credential = credential.as_str();
        let mut pending: FuturesUnordered<_> = targets
            .into_iter()
            .map(|suggestion| async move {
                let outcome = client.generate_mockup(credential, &suggestion).await;
                (suggestion.id, outcome)
            })
            .collect();

        let mut outcomes = Vec::new();
        while let Some((id, outcome)) = pending.next().await {
            let applied = self.state.apply_mockup(&id, outcome);
            outcomes.push((id, applied));
        }
        outcomes
    }

    /// APIキー再設定後に再入力フラグを下ろす
    pub fn acknowledge_credential(&mut self) {
        self.state.credential_required = false;
    }

    /// 新しいセッションを開始（初期状態に戻す）
    pub fn reset(&mut self) {
        self.state = WizardState::default();
        self.analysis = None;
        debug!("wizard reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::MAX_PHOTOS;
    use crate::types::Impact;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// 決定的なフェイククライアント
    struct FakeClient {
        analysis: std::result::Result<AnalysisResult, String>,
        failing_mockups: Vec<String>,
        analyze_calls: AtomicUsize,
        mockup_calls: AtomicUsize,
    }

    impl FakeClient {
        fn returning(result: AnalysisResult) -> Self {
            Self {
                analysis: Ok(result),
                failing_mockups: Vec::new(),
                analyze_calls: AtomicUsize::new(0),
                mockup_calls: AtomicUsize::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                analysis: Err(reason.to_string()),
                ..Self::returning(AnalysisResult::default())
            }
        }
    }

    #[async_trait]
    impl AnalysisClient for FakeClient {
        async fn analyze(&self, _credential: &str, _photos: &[Photo]) -> Result<AnalysisResult> {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            self.analysis.clone().map_err(Error::classify_service_failure)
        }

        async fn generate_mockup(
            &self,
            _credential: &str,
            suggestion: &MerchandisingSuggestion,
        ) -> Result<String> {
            self.mockup_calls.fetch_add(1, Ordering::SeqCst);
            // 先頭の提案ほど遅く完了させ、完了順を入れ替える
            let delay = if suggestion.id == "sug-0" { 30 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.failing_mockups.contains(&suggestion.id) {
                return Err(Error::Service("model returned text instead of image".into()));
            }
            Ok(format!("data:image/png;base64,{}", suggestion.id))
        }
    }

    fn sample_result(items: usize, suggestions: usize) -> AnalysisResult {
        AnalysisResult {
            items: (0..items)
                .map(|i| InventoryItem {
                    category: if i % 2 == 0 { "tops" } else { "bottoms" }.to_string(),
                    color: "black".to_string(),
                    quantity: 4,
                    ..Default::default()
                })
                .collect(),
            suggestions: (0..suggestions)
                .map(|i| MerchandisingSuggestion {
                    title: format!("Suggestion {}", i),
                    impact: Impact::High,
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn controller(client: FakeClient) -> WizardController<FakeClient, Option<String>> {
        WizardController::new(client, Some("test-api-key-123".to_string()))
    }

    fn photo(id: &str) -> Photo {
        Photo::new(id, "data:image/jpeg;base64,AAAA")
    }

    async fn analyzed(items: usize, suggestions: usize) -> WizardController<FakeClient, Option<String>> {
        let mut wizard = controller(FakeClient::returning(sample_result(items, suggestions)));
        wizard.add_photo(photo("p1"));
        wizard.analyze().await.expect("解析失敗");
        wizard
    }

    #[test]
    fn test_initial_state() {
        let wizard = controller(FakeClient::returning(AnalysisResult::default()));
        let state = wizard.state();
        assert_eq!(state.step(), Step::Capture);
        assert!(state.photos().is_empty());
        assert!(state.items().is_empty());
        assert!(state.error().is_none());
        assert!(!state.credential_required());
    }

    #[test]
    fn test_add_photo_respects_capacity() {
        let mut wizard = controller(FakeClient::returning(AnalysisResult::default()));
        for i in 0..MAX_PHOTOS {
            assert!(wizard.add_photo(photo(&format!("p{}", i))));
        }
        assert!(!wizard.add_photo(photo("p10")));
        assert_eq!(wizard.state().photos().size(), MAX_PHOTOS);
    }

    #[test]
    fn test_remove_photo() {
        let mut wizard = controller(FakeClient::returning(AnalysisResult::default()));
        wizard.add_photo(photo("a"));
        wizard.add_photo(photo("b"));
        assert!(wizard.remove_photo("a"));
        assert!(!wizard.remove_photo("a"));
        assert_eq!(wizard.state().photos().size(), 1);
    }

    #[tokio::test]
    async fn test_analyze_without_photos_is_noop() {
        let mut wizard = controller(FakeClient::returning(sample_result(1, 1)));
        assert!(!wizard.analyze().await.unwrap());
        assert_eq!(wizard.step(), Step::Capture);
        assert_eq!(wizard.client().analyze_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_begin_analysis_enters_processing() {
        let mut wizard = controller(FakeClient::returning(AnalysisResult::default()));
        wizard.add_photo(photo("p1"));
        assert!(wizard.begin_analysis());
        assert_eq!(wizard.step(), Step::Processing);

        // 解析中の二重開始はできない
        assert!(!wizard.begin_analysis());
        assert!(!wizard.navigate_to(Step::Processing));
        assert_eq!(wizard.step(), Step::Processing);
    }

    #[tokio::test]
    async fn test_navigation_during_processing_discards_outcome() {
        let mut wizard = analyzed(2, 1).await;
        wizard.navigate_to(Step::Capture);
        assert!(wizard.begin_analysis());

        // 解析中でも移動でき、遅れて届いた結果は反映されない
        assert!(wizard.navigate_to(Step::Capture));
        assert_eq!(wizard.step(), Step::Capture);
        wizard.finish_analysis(Ok(sample_result(5, 4))).unwrap();

        assert_eq!(wizard.step(), Step::Capture);
        assert_eq!(wizard.state().items().len(), 2);
        assert_eq!(wizard.state().suggestions().len(), 1);
        assert_eq!(wizard.analysis().map(|a| a.items.len()), Some(2));

        // 既存の結果があれば分析画面へも移動できる
        assert!(wizard.begin_analysis());
        assert!(wizard.navigate_to(Step::Analysis));
        wizard
            .finish_analysis(Err(Error::Service("late failure".into())))
            .unwrap();
        assert_eq!(wizard.step(), Step::Analysis);
        assert!(wizard.state().error().is_none());
    }

    #[tokio::test]
    async fn test_analyze_success_replaces_results() {
        let mut wizard = analyzed(2, 1).await;
        assert_eq!(wizard.step(), Step::Analysis);
        assert_eq!(wizard.state().items().len(), 2);
        assert_eq!(wizard.state().items()[1].id, "item-1");

        // 2回目の解析は丸ごと置き換え（マージしない）
        wizard.navigate_to(Step::Capture);
        let replacement = FakeClient::returning(sample_result(1, 3));
        wizard.client = replacement;
        wizard.analyze().await.unwrap();
        assert_eq!(wizard.state().items().len(), 1);
        assert_eq!(wizard.state().suggestions().len(), 3);
        assert_eq!(wizard.analysis().map(|a| a.items.len()), Some(1));
    }

    #[tokio::test]
    async fn test_analyze_failure_keeps_previous_results() {
        let mut wizard = analyzed(3, 2).await;
        wizard.navigate_to(Step::Capture);
        wizard.client = FakeClient::failing("API error 500: backend unavailable");

        let err = wizard.analyze().await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
        assert_eq!(wizard.step(), Step::Capture);
        assert_eq!(wizard.state().items().len(), 3);
        assert_eq!(wizard.state().suggestions().len(), 2);
        assert!(wizard.state().error().is_some_and(|e| !e.is_empty()));
        assert!(!wizard.state().credential_required());
    }

    #[tokio::test]
    async fn test_analyze_invalid_key_flags_credential() {
        let mut wizard = controller(FakeClient::failing("API error 400: API key not valid"));
        wizard.add_photo(photo("p1"));

        let err = wizard.analyze().await.unwrap_err();
        assert!(err.is_credential());
        assert!(wizard.state().credential_required());
        assert_eq!(wizard.step(), Step::Capture);

        wizard.acknowledge_credential();
        assert!(!wizard.state().credential_required());
    }

    #[tokio::test]
    async fn test_analyze_missing_key_skips_service() {
        let client = FakeClient::returning(sample_result(1, 1));
        let mut wizard = WizardController::new(client, None::<String>);
        wizard.add_photo(photo("p1"));

        let err = wizard.analyze().await.unwrap_err();
        assert!(err.is_credential());
        assert!(wizard.state().credential_required());
        assert_eq!(wizard.client().analyze_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_photo() {
        let mut wizard = controller(FakeClient::failing("network down"));
        wizard.add_photo(photo("p1"));
        let _ = wizard.analyze().await;
        assert!(wizard.state().error().is_some());

        wizard.add_photo(photo("p2"));
        assert!(wizard.state().error().is_none());
    }

    #[tokio::test]
    async fn test_navigation_guards() {
        let mut wizard = controller(FakeClient::returning(sample_result(0, 0)));
        assert!(!wizard.navigate_to(Step::Analysis));
        assert!(!wizard.navigate_to(Step::Reorganize));
        assert!(!wizard.navigate_to(Step::Report));
        assert!(!wizard.navigate_to(Step::Processing));
        assert_eq!(wizard.step(), Step::Capture);

        let mut wizard = analyzed(2, 0).await;
        assert!(wizard.navigate_to(Step::Report));
        assert!(!wizard.navigate_to(Step::Reorganize));
        assert_eq!(wizard.step(), Step::Report);
        assert!(wizard.navigate_to(Step::Analysis));
        assert_eq!(wizard.step(), Step::Analysis);
    }

    #[tokio::test]
    async fn test_linear_transitions() {
        let mut wizard = analyzed(1, 1).await;
        assert!(!wizard.complete());
        assert!(wizard.continue_to_reorganize());
        assert_eq!(wizard.step(), Step::Reorganize);
        assert!(!wizard.continue_to_reorganize());
        assert!(wizard.complete());
        assert_eq!(wizard.step(), Step::Report);
    }

    #[tokio::test]
    async fn test_skip_suggestion() {
        let mut wizard = analyzed(1, 3).await;
        assert!(wizard.skip_suggestion("sug-1"));
        assert!(!wizard.skip_suggestion("sug-1"));

        let ids: Vec<&str> = wizard.state().suggestions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["sug-0", "sug-2"]);
        // 原本の解析結果には影響しない
        assert_eq!(wizard.analysis().map(|a| a.suggestions.len()), Some(3));
    }

    #[tokio::test]
    async fn test_generate_mockup_updates_only_target() {
        let mut wizard = analyzed(1, 2).await;
        let untouched = wizard.state().suggestions()[1].clone();

        assert!(wizard.generate_mockup("sug-0").await.unwrap());
        let suggestions = wizard.state().suggestions();
        assert_eq!(suggestions[0].mockup_image.as_deref(), Some("data:image/png;base64,sug-0"));
        assert_eq!(suggestions[0].is_applied, Some(true));
        assert_eq!(suggestions[1], untouched);

        // 生成済みは再生成しない
        assert!(!wizard.generate_mockup("sug-0").await.unwrap());
        assert_eq!(wizard.client().mockup_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_mockups_concurrently() {
        let mut wizard = analyzed(1, 3).await;
        let outcomes = wizard.generate_mockups(&["sug-0", "sug-2", "sug-0"]).await;

        assert_eq!(outcomes.len(), 2);
        // sug-0 の方が遅いので後に完了する
        assert_eq!(outcomes[0].0, "sug-2");
        assert_eq!(outcomes[1].0, "sug-0");
        assert!(outcomes.iter().all(|(_, r)| matches!(r, Ok(true))));

        let suggestions = wizard.state().suggestions();
        assert!(suggestions[0].is_applied());
        assert!(!suggestions[1].is_applied());
        assert!(suggestions[2].is_applied());
    }

    #[tokio::test]
    async fn test_generate_mockup_failure_sets_error() {
        let mut wizard = analyzed(1, 2).await;
        wizard.client.failing_mockups = vec!["sug-1".to_string()];
        wizard.continue_to_reorganize();

        let outcomes = wizard.generate_mockups(&["sug-0", "sug-1"]).await;
        let failed = outcomes.iter().find(|(id, _)| id == "sug-1").expect("sug-1 の結果がない");
        assert!(failed.1.is_err());

        assert_eq!(wizard.step(), Step::Reorganize);
        assert!(wizard.state().error().is_some());
        assert!(wizard.state().suggestions()[0].is_applied());
        assert!(wizard.state().suggestions()[1].mockup_image.is_none());
    }

    #[tokio::test]
    async fn test_mockup_for_skipped_suggestion_is_discarded() {
        let mut wizard = analyzed(1, 2).await;
        wizard.skip_suggestion("sug-0");

        let applied = wizard
            .state
            .apply_mockup("sug-0", Ok("data:image/png;base64,late".to_string()))
            .unwrap();
        assert!(!applied);
        assert_eq!(wizard.state().suggestions().len(), 1);
        assert!(wizard.state().suggestions()[0].mockup_image.is_none());
    }

    #[tokio::test]
    async fn test_reset() {
        let mut wizard = analyzed(2, 2).await;
        wizard.reset();
        assert_eq!(wizard.snapshot(), WizardState::default());
        assert!(wizard.analysis().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let wizard = analyzed(1, 1).await;
        let json = serde_json::to_string(&wizard.snapshot()).expect("シリアライズ失敗");
        assert!(json.contains("\"step\":\"Analysis\""));
        assert!(json.contains("\"credentialRequired\":false"));
    }

    #[test]
    fn test_step_order() {
        let indices: Vec<usize> = Step::ALL.iter().map(Step::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(Step::Report.to_string(), "レポート");
    }
}
