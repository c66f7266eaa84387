//! ウィザードの状態遷移
//!
//! 画面は (現在のステップ, 回答) だけで決まる。
//! 状態の変更はすべて `reduce(state, event) -> state` を通す。

use crate::carousel::Carousel;
use crate::feedback::{FeedbackForm, FeedbackQuestion};
use crate::form::{FormData, Gender, Month, OutfitImage};
use crate::modal::ActiveModal;
use crate::response::{ApiResponse, Bundle};
use crate::reveal::RevealFrame;

/// 画面（0〜9）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    #[default]
    Welcome = 0,
    Recipient = 1,
    OutfitImages = 2,
    Age = 3,
    Gender = 4,
    Month = 5,
    Occasion = 6,
    Budget = 7,
    Confirm = 8,
    Results = 9,
}

impl Step {
    pub const ALL: [Step; 10] = [
        Step::Welcome,
        Step::Recipient,
        Step::OutfitImages,
        Step::Age,
        Step::Gender,
        Step::Month,
        Step::Occasion,
        Step::Budget,
        Step::Confirm,
        Step::Results,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    /// 次の画面（最後なら同じ）
    pub fn next(&self) -> Step {
        Step::from_index(self.index() + 1).unwrap_or(*self)
    }

    /// 前の画面（最初なら同じ）
    pub fn prev(&self) -> Step {
        self.index()
            .checked_sub(1)
            .and_then(Step::from_index)
            .unwrap_or(*self)
    }

    /// 画面の問いかけ
    pub fn title(&self) -> &'static str {
        match self {
            Step::Welcome => "So you want to buy a gift?",
            Step::Recipient => "Who is it for?",
            Step::OutfitImages => {
                "Please add one or more outfit image that best describes the style"
            }
            Step::Age | Step::Gender | Step::Month | Step::Occasion => "Tell me about them?",
            Step::Budget => "What's your budget?",
            Step::Confirm => "It seems like we are ready.",
            Step::Results => "Perfect Gifts",
        }
    }
}

/// その画面から先へ進めるか
pub fn can_leave(step: Step, form: &FormData) -> bool {
    match step {
        Step::Recipient => !form.recipient.trim().is_empty(),
        Step::OutfitImages => !form.outfit_images.is_empty(),
        Step::Gender => form.gender.is_some(),
        Step::Month => form.month.is_some(),
        Step::Occasion => !form.occasion.trim().is_empty(),
        Step::Budget => !form.budget.trim().is_empty(),
        Step::Welcome | Step::Age | Step::Confirm | Step::Results => true,
    }
}

/// ウィザード全体の状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub step: Step,
    pub form: FormData,
    /// 送信中（同時に1件まで）
    pub is_loading: bool,
    pub api_response: Option<ApiResponse>,
    pub carousel: Carousel,
    pub modal: ActiveModal,
}

impl WizardState {
    /// 表示中のバンドル
    pub fn current_bundle(&self) -> Option<&Bundle> {
        self.api_response
            .as_ref()
            .and_then(|r| r.bundles().get(self.carousel.index()))
    }

    /// 演出中のバンドル
    pub fn revealed_bundle(&self) -> Option<&Bundle> {
        match &self.modal {
            ActiveModal::Reveal { bundle_index, .. } => self
                .api_response
                .as_ref()
                .and_then(|r| r.bundles().get(*bundle_index)),
            _ => None,
        }
    }
}

/// 「Next」ボタンが押せるか（確認画面は送信ボタンなので対象外）
pub fn next_enabled(state: &WizardState) -> bool {
    state.step < Step::Confirm && can_leave(state.step, &state.form)
}

/// 「Find Gifts!」が押せるか
pub fn submit_enabled(state: &WizardState) -> bool {
    state.step == Step::Confirm && !state.is_loading
}

/// 状態を変える操作
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Advance,
    Retreat,
    SetRecipient(String),
    AddOutfitImage(OutfitImage),
    RemoveOutfitImage(usize),
    SetAge(u8),
    SetGender(Gender),
    SetMonth(Month),
    SetOccasion(String),
    ToggleImageSelection(usize),
    SetBudget(String),
    SubmissionStarted,
    SubmissionResolved(ApiResponse),
    TryAgain,
    Reset,
    NextBundle,
    PrevBundle,
    JumpToBundle(usize),
    SelectBundle(usize),
    RevealAdvanced(RevealFrame),
    OpenFeedback,
    AnswerFeedback(FeedbackQuestion, String),
    SetFeedbackSuggestions(String),
    CloseModal,
}

/// 状態遷移（純関数）
pub fn reduce(mut state: WizardState, event: WizardEvent) -> WizardState {
    match event {
        WizardEvent::Advance => state.step = state.step.next(),
        WizardEvent::Retreat => state.step = state.step.prev(),

        WizardEvent::SetRecipient(name) => state.form.recipient = name,
        WizardEvent::AddOutfitImage(image) => state.form.outfit_images.push(image),
        WizardEvent::RemoveOutfitImage(index) => {
            state.form.remove_image(index);
        }
        WizardEvent::SetAge(age) => state.form.set_age(age),
        WizardEvent::SetGender(gender) => state.form.gender = Some(gender),
        WizardEvent::SetMonth(month) => state.form.month = Some(month),
        WizardEvent::SetOccasion(occasion) => state.form.occasion = occasion,
        WizardEvent::ToggleImageSelection(index) => state.form.toggle_image_selection(index),
        WizardEvent::SetBudget(budget) => state.form.budget = budget,

        // 先に結果画面（ローディング）へ、データは後から届く
        WizardEvent::SubmissionStarted => {
            state.step = Step::Results;
            state.is_loading = true;
            state.api_response = None;
            state.carousel = Carousel::default();
            state.modal = ActiveModal::None;
        }
        WizardEvent::SubmissionResolved(response) => {
            if state.is_loading {
                state.carousel = Carousel::new(response.bundles().len());
                state.api_response = Some(response);
                state.is_loading = false;
            }
        }
        WizardEvent::TryAgain => {
            let failed = state
                .api_response
                .as_ref()
                .is_some_and(|r| r.error().is_some());
            if failed && !state.is_loading {
                state.step = Step::Budget;
            }
        }
        WizardEvent::Reset => state = WizardState::default(),

        WizardEvent::NextBundle => state.carousel.next(),
        WizardEvent::PrevBundle => state.carousel.prev(),
        WizardEvent::JumpToBundle(index) => state.carousel.jump(index),

        WizardEvent::SelectBundle(index) => {
            let exists = state
                .api_response
                .as_ref()
                .is_some_and(|r| index < r.bundles().len());
            if exists {
                state.modal = ActiveModal::Reveal {
                    bundle_index: index,
                    frame: RevealFrame::Closed,
                };
            }
        }
        WizardEvent::RevealAdvanced(next) => {
            if let ActiveModal::Reveal { frame, .. } = &mut state.modal {
                if next > *frame {
                    *frame = next;
                }
            }
        }

        WizardEvent::OpenFeedback => {
            if state.step == Step::Results {
                state.modal = ActiveModal::Feedback(FeedbackForm::new());
            }
        }
        WizardEvent::AnswerFeedback(question, option) => {
            if let Some(form) = state.modal.feedback_mut() {
                // 選択肢外は無視
                let _ = form.answer(question, &option);
            }
        }
        WizardEvent::SetFeedbackSuggestions(text) => {
            if let Some(form) = state.modal.feedback_mut() {
                form.set_suggestions(text);
            }
        }
        WizardEvent::CloseModal => state.modal = ActiveModal::None,
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Recommendations;

    fn at(step: Step) -> WizardState {
        WizardState {
            step,
            ..Default::default()
        }
    }

    fn with_bundles(n: usize) -> WizardState {
        let mut state = reduce(at(Step::Confirm), WizardEvent::SubmissionStarted);
        let response = ApiResponse::Success(Recommendations {
            bundles: vec![Bundle::default(); n],
            ..Default::default()
        });
        state = reduce(state, WizardEvent::SubmissionResolved(response));
        state
    }

    #[test]
    fn test_advance_increments_and_saturates() {
        for i in 0..9 {
            let step = Step::from_index(i).unwrap();
            let next = reduce(at(step), WizardEvent::Advance);
            assert_eq!(next.step.index(), i + 1);
        }
        assert_eq!(reduce(at(Step::Results), WizardEvent::Advance).step, Step::Results);
    }

    #[test]
    fn test_retreat_decrements_and_saturates() {
        for i in 1..=9 {
            let step = Step::from_index(i).unwrap();
            let prev = reduce(at(step), WizardEvent::Retreat);
            assert_eq!(prev.step.index(), i - 1);
        }
        assert_eq!(reduce(at(Step::Welcome), WizardEvent::Retreat).step, Step::Welcome);
    }

    #[test]
    fn test_gates_per_step() {
        let mut state = at(Step::Recipient);
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetRecipient("   ".into()));
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetRecipient("Sam".into()));
        assert!(next_enabled(&state));

        state.step = Step::OutfitImages;
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::AddOutfitImage(OutfitImage::default()));
        assert!(next_enabled(&state));

        state.step = Step::Age;
        assert!(next_enabled(&state));

        state.step = Step::Gender;
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetGender(Gender::Other));
        assert!(next_enabled(&state));

        state.step = Step::Month;
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetMonth(Month::June));
        assert!(next_enabled(&state));

        state.step = Step::Occasion;
        state = reduce(state, WizardEvent::SetOccasion(" \t".into()));
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetOccasion("Birthday".into()));
        assert!(next_enabled(&state));

        state.step = Step::Budget;
        assert!(!next_enabled(&state));
        state = reduce(state, WizardEvent::SetBudget("$50".into()));
        assert!(next_enabled(&state));
    }

    #[test]
    fn test_submit_only_from_confirm() {
        assert!(submit_enabled(&at(Step::Confirm)));
        assert!(!submit_enabled(&at(Step::Budget)));

        let mut loading = at(Step::Confirm);
        loading.is_loading = true;
        assert!(!submit_enabled(&loading));
    }

    #[test]
    fn test_submission_shows_loading_first() {
        let state = reduce(at(Step::Confirm), WizardEvent::SubmissionStarted);
        assert_eq!(state.step, Step::Results);
        assert!(state.is_loading);
        assert!(state.api_response.is_none());
    }

    #[test]
    fn test_submission_resolved_resets_carousel() {
        let state = with_bundles(3);
        assert!(!state.is_loading);
        assert_eq!(state.carousel.len(), 3);
        assert_eq!(state.carousel.index(), 0);
        assert!(state.current_bundle().is_some());
    }

    #[test]
    fn test_stale_resolution_ignored() {
        let state = reduce(
            WizardState::default(),
            WizardEvent::SubmissionResolved(ApiResponse::failure_from("late")),
        );
        assert!(state.api_response.is_none());
    }

    #[test]
    fn test_try_again_returns_to_budget() {
        let mut state = reduce(at(Step::Confirm), WizardEvent::SubmissionStarted);
        state = reduce(
            state,
            WizardEvent::SubmissionResolved(ApiResponse::failure_from("boom")),
        );
        state = reduce(state, WizardEvent::TryAgain);
        assert_eq!(state.step, Step::Budget);
    }

    #[test]
    fn test_try_again_ignored_on_success() {
        let state = reduce(with_bundles(1), WizardEvent::TryAgain);
        assert_eq!(state.step, Step::Results);
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut state = with_bundles(2);
        state = reduce(state, WizardEvent::SetRecipient("Sam".into()));
        state = reduce(state, WizardEvent::Reset);
        assert_eq!(state, WizardState::default());
    }

    #[test]
    fn test_carousel_events() {
        let mut state = with_bundles(3);
        state = reduce(state, WizardEvent::PrevBundle);
        assert_eq!(state.carousel.index(), 2);
        state = reduce(state, WizardEvent::NextBundle);
        assert_eq!(state.carousel.index(), 0);
        state = reduce(state, WizardEvent::JumpToBundle(1));
        assert_eq!(state.carousel.index(), 1);
    }

    #[test]
    fn test_select_bundle_opens_reveal() {
        let mut state = with_bundles(2);
        state = reduce(state, WizardEvent::SelectBundle(1));
        assert_eq!(state.modal.reveal_frame(), Some(RevealFrame::Closed));
        assert!(state.revealed_bundle().is_some());

        state = reduce(state, WizardEvent::RevealAdvanced(RevealFrame::Revealed));
        // 後戻りしない
        state = reduce(state, WizardEvent::RevealAdvanced(RevealFrame::Opening));
        assert_eq!(state.modal.reveal_frame(), Some(RevealFrame::Revealed));

        state = reduce(state, WizardEvent::CloseModal);
        assert!(!state.modal.is_open());
    }

    #[test]
    fn test_select_missing_bundle_ignored() {
        let state = reduce(with_bundles(1), WizardEvent::SelectBundle(4));
        assert!(!state.modal.is_open());
    }

    #[test]
    fn test_feedback_replaces_reveal() {
        let mut state = with_bundles(1);
        state = reduce(state, WizardEvent::SelectBundle(0));
        state = reduce(state, WizardEvent::OpenFeedback);
        assert!(matches!(state.modal, ActiveModal::Feedback(_)));
        assert!(state.modal.reveal_frame().is_none());

        state = reduce(
            state,
            WizardEvent::AnswerFeedback(FeedbackQuestion::Ease, "Easy".into()),
        );
        let answer = state
            .modal
            .feedback()
            .and_then(|form| form.answer_for(FeedbackQuestion::Ease));
        assert_eq!(answer, Some("Easy"));
    }

    #[test]
    fn test_step_titles() {
        assert_eq!(Step::Recipient.title(), "Who is it for?");
        assert_eq!(Step::Budget.title(), "What's your budget?");
    }
}
