//! 結果画面に重ねるオーバーレイ
//!
//! 演出とフィードバックは同時に開かない。どちらか一方か、なし。

use crate::feedback::FeedbackForm;
use crate::reveal::RevealFrame;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActiveModal {
    #[default]
    None,
    /// 選択したバンドルのギフトボックス演出
    Reveal {
        bundle_index: usize,
        frame: RevealFrame,
    },
    /// フィードバック入力中
    Feedback(FeedbackForm),
}

impl ActiveModal {
    pub fn is_open(&self) -> bool {
        !matches!(self, ActiveModal::None)
    }

    pub fn reveal_frame(&self) -> Option<RevealFrame> {
        match self {
            ActiveModal::Reveal { frame, .. } => Some(*frame),
            _ => None,
        }
    }

    pub fn feedback(&self) -> Option<&FeedbackForm> {
        match self {
            ActiveModal::Feedback(form) => Some(form),
            _ => None,
        }
    }

    pub fn feedback_mut(&mut self) -> Option<&mut FeedbackForm> {
        match self {
            ActiveModal::Feedback(form) => Some(form),
            _ => None,
        }
    }
}
