//! ウィザードの操作窓口
//!
//! 状態は `WizardState` ひとつ。変更はすべて `reduce` を通す。
//! 非同期の結果（画像取り込み・送信・演出タイマー）もここで状態に反映する。

use crate::error::Result;
use crate::ingest::{self, CompressOptions, IngestReport};
use crate::reveal::RevealTimer;
use crate::service::RecommendationService;
use gift_wizard_common::wizard::{next_enabled, reduce, submit_enabled};
use gift_wizard_common::{
    ApiResponse, FeedbackQuestion, FeedbackReceipt, Gender, GiftRequest, Month, RevealFrame, Step,
    WizardEvent, WizardState,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Default)]
pub struct WizardController {
    state: WizardState,
    reveal: Option<RevealTimer>,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_state(state: WizardState) -> Self {
        Self { state, reveal: None }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    fn dispatch(&mut self, event: WizardEvent) {
        let before = self.state.step;
        self.state = reduce(std::mem::take(&mut self.state), event);
        if before != self.state.step {
            debug!(from = ?before, to = ?self.state.step, "Step changed");
        }
    }

    // --- ステップ移動 ---

    pub fn advance(&mut self) {
        self.dispatch(WizardEvent::Advance);
    }

    pub fn retreat(&mut self) {
        self.dispatch(WizardEvent::Retreat);
    }

    pub fn can_go_next(&self) -> bool {
        next_enabled(&self.state)
    }

    /// 「Next」: 現在のステップの入力が揃っていれば進む
    pub fn next(&mut self) -> bool {
        if self.can_go_next() {
            self.advance();
            true
        } else {
            false
        }
    }

    // --- 入力 ---

    pub fn set_recipient(&mut self, name: impl Into<String>) {
        self.dispatch(WizardEvent::SetRecipient(name.into()));
    }

    pub fn set_age(&mut self, age: u8) {
        self.dispatch(WizardEvent::SetAge(age));
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.dispatch(WizardEvent::SetGender(gender));
    }

    pub fn set_month(&mut self, month: Month) {
        self.dispatch(WizardEvent::SetMonth(month));
    }

    pub fn set_occasion(&mut self, occasion: impl Into<String>) {
        self.dispatch(WizardEvent::SetOccasion(occasion.into()));
    }

    pub fn set_budget(&mut self, budget: impl Into<String>) {
        self.dispatch(WizardEvent::SetBudget(budget.into()));
    }

    /// 画像を取り込む。デコードは並列、状態への追加はここだけ（完了順）
    pub async fn ingest(&mut self, paths: &[PathBuf], options: CompressOptions) -> Result<IngestReport> {
        let files = ingest::collect_candidates(paths)?;
        info!(files = files.len(), "Ingesting outfit images");

        let mut rx = ingest::spawn_ingest(files, options);
        let mut report = IngestReport::default();
        while let Some(event) = rx.recv().await {
            report.record(&event);
            if let ingest::IngestEvent::Added(image) = event {
                self.dispatch(WizardEvent::AddOutfitImage(image));
            }
        }

        if !report.failed.is_empty() {
            warn!(failed = report.failed.len(), "Some images could not be added");
        }
        Ok(report)
    }

    pub fn remove_image(&mut self, index: usize) {
        self.dispatch(WizardEvent::RemoveOutfitImage(index));
    }

    pub fn toggle_image_selection(&mut self, index: usize) {
        self.dispatch(WizardEvent::ToggleImageSelection(index));
    }

    // --- 送信 ---

    pub fn can_submit(&self) -> bool {
        submit_enabled(&self.state)
    }

    /// 結果画面（ローディング）へ移り、送るペイロードを返す
    pub fn begin_submission(&mut self) -> Option<GiftRequest> {
        if !self.can_submit() {
            return None;
        }
        self.close_modal();
        let request = GiftRequest::from_form(&self.state.form);
        self.dispatch(WizardEvent::SubmissionStarted);
        Some(request)
    }

    /// 送信結果を反映（失敗は表示用のエラーレコードにする）
    pub fn finish_submission(&mut self, result: Result<ApiResponse>) {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Gift request failed");
                ApiResponse::failure_from(e)
            }
        };
        self.dispatch(WizardEvent::SubmissionResolved(response));
    }

    /// 送信して結果を待つ。送信できる状態でなければ false
    pub async fn submit<S: RecommendationService>(&mut self, service: &S) -> bool {
        let Some(request) = self.begin_submission() else {
            return false;
        };
        let result = service.recommend(&request).await;
        self.finish_submission(result);
        true
    }

    /// エラー表示から予算ステップへ戻る
    pub fn try_again(&mut self) {
        self.dispatch(WizardEvent::TryAgain);
    }

    /// 最初からやり直し
    pub fn reset(&mut self) {
        self.reveal = None;
        self.dispatch(WizardEvent::Reset);
    }

    // --- 結果カルーセル ---

    pub fn next_bundle(&mut self) {
        self.dispatch(WizardEvent::NextBundle);
    }

    pub fn prev_bundle(&mut self) {
        self.dispatch(WizardEvent::PrevBundle);
    }

    pub fn jump_to_bundle(&mut self, index: usize) {
        self.dispatch(WizardEvent::JumpToBundle(index));
    }

    // --- 演出 ---

    /// バンドルを選んで演出開始（前の演出は止める）
    pub fn select_bundle(&mut self, index: usize) -> bool {
        self.reveal = None;
        self.dispatch(WizardEvent::SelectBundle(index));
        if self.state.modal.reveal_frame().is_some() {
            debug!(bundle = index, "Reveal started");
            self.reveal = Some(RevealTimer::start());
            true
        } else {
            false
        }
    }

    /// 次のフレームまで待って反映。演出が終わっていれば None
    pub async fn wait_reveal_frame(&mut self) -> Option<RevealFrame> {
        let frame = self.reveal.as_mut()?.changed().await?;
        self.dispatch(WizardEvent::RevealAdvanced(frame));
        self.state.modal.reveal_frame()
    }

    pub fn close_modal(&mut self) {
        if let Some(timer) = self.reveal.take() {
            timer.cancel();
        }
        self.dispatch(WizardEvent::CloseModal);
    }

    // --- フィードバック ---

    pub fn open_feedback(&mut self) -> bool {
        self.reveal = None;
        self.dispatch(WizardEvent::OpenFeedback);
        self.state.modal.is_open()
    }

    pub fn answer_feedback(&mut self, question: FeedbackQuestion, option: impl Into<String>) {
        self.dispatch(WizardEvent::AnswerFeedback(question, option.into()));
    }

    pub fn set_feedback_suggestions(&mut self, text: impl Into<String>) {
        self.dispatch(WizardEvent::SetFeedbackSuggestions(text.into()));
    }

    /// フィードバックを送信して閉じる（外部送信はしない）
    pub fn submit_feedback(&mut self) -> Option<FeedbackReceipt> {
        let form = self.state.modal.feedback_mut()?.clone();
        let receipt = form.submit();
        info!(
            satisfaction = %receipt.q1_satisfaction,
            relevance = %receipt.q2_relevance,
            ease = %receipt.q3_ease,
            appeal = %receipt.q4_appeal,
            understanding = %receipt.q5_understanding,
            "Feedback submitted"
        );
        self.close_modal();
        Some(receipt)
    }

    /// 入力内容を捨てて閉じる
    pub fn cancel_feedback(&mut self) {
        self.close_modal();
    }

    pub fn step(&self) -> Step {
        self.state.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WizardError;
    use gift_wizard_common::{Bundle, OutfitImage, Recommendations};
    use std::sync::Mutex;

    /// 受け取ったリクエストを記録するだけのサービス
    struct StubService {
        response: fn() -> Result<ApiResponse>,
        seen: Mutex<Vec<GiftRequest>>,
    }

    impl StubService {
        fn new(response: fn() -> Result<ApiResponse>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecommendationService for StubService {
        async fn recommend(&self, request: &GiftRequest) -> Result<ApiResponse> {
            self.seen.lock().unwrap().push(request.clone());
            (self.response)()
        }
    }

    fn two_bundles() -> Result<ApiResponse> {
        Ok(ApiResponse::Success(Recommendations {
            bundles: vec![Bundle::default(), Bundle::default()],
            ..Default::default()
        }))
    }

    fn server_error() -> Result<ApiResponse> {
        Err(WizardError::ApiStatus {
            status: 500,
            body: "server error".into(),
        })
    }

    fn filled() -> WizardController {
        let mut c = WizardController::new();
        c.advance();
        c.set_recipient("Sam");
        assert!(c.next());
        c.dispatch(WizardEvent::AddOutfitImage(OutfitImage {
            preview_data_uri: "data:image/jpeg;base64,AAAA".into(),
            file_name: "look.jpg".into(),
            ..Default::default()
        }));
        assert!(c.next());
        c.set_age(30);
        assert!(c.next());
        c.set_gender(Gender::Female);
        assert!(c.next());
        c.set_month(Month::June);
        assert!(c.next());
        c.set_occasion("Birthday");
        assert!(c.next());
        c.set_budget("$75");
        assert!(c.next());
        assert_eq!(c.step(), Step::Confirm);
        c
    }

    #[test]
    fn test_next_blocked_until_answered() {
        let mut c = WizardController::new();
        c.advance();
        assert!(!c.next());
        assert_eq!(c.step(), Step::Recipient);
    }

    #[test]
    fn test_begin_submission_moves_to_results_first() {
        let mut c = filled();
        let request = c.begin_submission().unwrap();
        assert_eq!(c.step(), Step::Results);
        assert!(c.state().is_loading);
        assert!(c.state().api_response.is_none());
        assert_eq!(request.budget, 75.0);
        assert_eq!(request.images.len(), 1);

        // 送信中は二重送信できない
        assert!(c.begin_submission().is_none());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mut c = filled();
        let service = StubService::new(two_bundles);
        assert!(c.submit(&service).await);

        assert!(!c.state().is_loading);
        assert_eq!(c.state().carousel.len(), 2);
        assert_eq!(service.seen.lock().unwrap()[0].recipient, "Sam");
    }

    #[tokio::test]
    async fn test_submit_failure_then_try_again() {
        let mut c = filled();
        let service = StubService::new(server_error);
        c.submit(&service).await;

        let error = c.state().api_response.as_ref().and_then(|r| r.error()).unwrap();
        assert_eq!(
            error,
            "Failed to get gift recommendations: API returned 500: server error. Please try again."
        );

        c.try_again();
        assert_eq!(c.step(), Step::Budget);
        // 入力は保持される
        assert_eq!(c.state().form.recipient, "Sam");
        assert_eq!(c.state().form.budget, "$75");
    }

    #[tokio::test]
    async fn test_submit_outside_confirm_is_ignored() {
        let mut c = WizardController::new();
        let service = StubService::new(two_bundles);
        assert!(!c.submit(&service).await);
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut c = filled();
        c.submit(&StubService::new(two_bundles)).await;
        c.reset();
        assert_eq!(c.state(), &WizardState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_runs_to_revealed() {
        let mut c = filled();
        c.submit(&StubService::new(two_bundles)).await;

        assert!(c.select_bundle(1));
        assert_eq!(c.state().modal.reveal_frame(), Some(RevealFrame::Closed));
        assert_eq!(c.wait_reveal_frame().await, Some(RevealFrame::Opening));
        assert_eq!(c.wait_reveal_frame().await, Some(RevealFrame::Revealed));
        assert_eq!(c.wait_reveal_frame().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_reveal_stops_timer() {
        let mut c = filled();
        c.submit(&StubService::new(two_bundles)).await;

        c.select_bundle(0);
        c.close_modal();
        assert!(!c.state().modal.is_open());
        assert_eq!(c.wait_reveal_frame().await, None);
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(!c.state().modal.is_open());

        // 再度開くと1フレーム目から
        c.select_bundle(0);
        assert_eq!(c.state().modal.reveal_frame(), Some(RevealFrame::Closed));
    }

    #[tokio::test]
    async fn test_select_unknown_bundle_is_ignored() {
        let mut c = filled();
        c.submit(&StubService::new(two_bundles)).await;
        assert!(!c.select_bundle(5));
        assert!(!c.state().modal.is_open());
    }

    #[tokio::test]
    async fn test_feedback_submit_and_cancel() {
        let mut c = filled();
        c.submit(&StubService::new(two_bundles)).await;

        assert!(c.open_feedback());
        let option = FeedbackQuestion::Satisfaction.options()[0];
        c.answer_feedback(FeedbackQuestion::Satisfaction, option);
        c.set_feedback_suggestions("More colors");
        let receipt = c.submit_feedback().unwrap();
        assert_eq!(receipt.q1_satisfaction, option);
        assert_eq!(receipt.q6_suggestions, "More colors");
        assert_eq!(receipt.acknowledgement(), "Thank you for your feedback!");
        assert!(!c.state().modal.is_open());

        // キャンセルした回答は残らない
        c.open_feedback();
        c.answer_feedback(FeedbackQuestion::Ease, FeedbackQuestion::Ease.options()[0]);
        c.cancel_feedback();
        c.open_feedback();
        let form = c.state().modal.clone();
        assert_eq!(
            form,
            gift_wizard_common::ActiveModal::Feedback(Default::default())
        );
    }

    #[test]
    fn test_feedback_not_available_before_results() {
        let mut c = filled();
        assert!(!c.open_feedback());
        assert!(c.submit_feedback().is_none());
    }
}
