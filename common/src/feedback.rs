//! フィードバックフォーム
//!
//! 5つの選択式の質問と1つの自由記述。送信はローカルで受付表示するだけ。

use crate::error::{Error, Result};
use serde::Serialize;

/// 選択式の質問
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackQuestion {
    Satisfaction,
    Relevance,
    Ease,
    Appeal,
    Understanding,
}

impl FeedbackQuestion {
    pub const ALL: [FeedbackQuestion; 5] = [
        FeedbackQuestion::Satisfaction,
        FeedbackQuestion::Relevance,
        FeedbackQuestion::Ease,
        FeedbackQuestion::Appeal,
        FeedbackQuestion::Understanding,
    ];

    fn slot(&self) -> usize {
        match self {
            FeedbackQuestion::Satisfaction => 0,
            FeedbackQuestion::Relevance => 1,
            FeedbackQuestion::Ease => 2,
            FeedbackQuestion::Appeal => 3,
            FeedbackQuestion::Understanding => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackQuestion::Satisfaction => "Q1. Overall Experience",
            FeedbackQuestion::Relevance => "Q2. Bundle Relevance",
            FeedbackQuestion::Ease => "Q3. Ease of Use",
            FeedbackQuestion::Appeal => "Q4. Bundle Appeal",
            FeedbackQuestion::Understanding => "Q5. AI Understanding",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            FeedbackQuestion::Satisfaction => {
                "How satisfied are you with your overall experience using the AI Bundle Assistant?"
            }
            FeedbackQuestion::Relevance => {
                "How well did the recommended bundle match your preferences?"
            }
            FeedbackQuestion::Ease => {
                "How easy was it to use the AI Assistant to build or select your bundle?"
            }
            FeedbackQuestion::Appeal => {
                "How appealing were the items and overall presentation of the bundle?"
            }
            FeedbackQuestion::Understanding => {
                "Do you feel the AI understood your preferences accurately?"
            }
        }
    }

    pub fn options(&self) -> &'static [&'static str] {
        match self {
            FeedbackQuestion::Satisfaction => &[
                "Very Satisfied",
                "Satisfied",
                "Neutral",
                "Unsatisfied",
                "Very Unsatisfied",
            ],
            FeedbackQuestion::Relevance => &[
                "Perfectly matched",
                "Mostly matched",
                "Somewhat matched",
                "Barely matched",
                "Not matched at all",
            ],
            FeedbackQuestion::Ease => &["Very Easy", "Easy", "Neutral", "Difficult", "Very Difficult"],
            FeedbackQuestion::Appeal => &[
                "Extremely appealing",
                "Quite appealing",
                "Somewhat appealing",
                "Slightly appealing",
                "Not appealing",
            ],
            FeedbackQuestion::Understanding => {
                &["Yes, completely", "Mostly", "Partially", "Not really", "Not at all"]
            }
        }
    }
}

pub const SUGGESTIONS_LABEL: &str = "Q6. Suggestions for Improvement";
pub const SUGGESTIONS_TEXT: &str = "What would make your experience better?";
pub const ACKNOWLEDGEMENT: &str = "Thank you for your feedback!";

/// 入力中のフォーム（キャンセル時は破棄するだけ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    answers: [Option<&'static str>; 5],
    suggestions: String,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 選択肢を回答（選択肢にない値はエラー）
    pub fn answer(&mut self, question: FeedbackQuestion, option: &str) -> Result<()> {
        let chosen = question
            .options()
            .iter()
            .copied()
            .find(|o| *o == option)
            .ok_or_else(|| {
                Error::Parse(format!("{}: invalid option {:?}", question.label(), option))
            })?;
        self.answers[question.slot()] = Some(chosen);
        Ok(())
    }

    pub fn answer_for(&self, question: FeedbackQuestion) -> Option<&'static str> {
        self.answers[question.slot()]
    }

    pub fn set_suggestions(&mut self, text: impl Into<String>) {
        self.suggestions = text.into();
    }

    /// 送信（ネットワークなし）
    pub fn submit(self) -> FeedbackReceipt {
        let answer = |q: FeedbackQuestion| self.answers[q.slot()].unwrap_or("").to_string();
        FeedbackReceipt {
            q1_satisfaction: answer(FeedbackQuestion::Satisfaction),
            q2_relevance: answer(FeedbackQuestion::Relevance),
            q3_ease: answer(FeedbackQuestion::Ease),
            q4_appeal: answer(FeedbackQuestion::Appeal),
            q5_understanding: answer(FeedbackQuestion::Understanding),
            q6_suggestions: self.suggestions.clone(),
        }
    }
}

/// 送信済みの回答
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackReceipt {
    pub q1_satisfaction: String,
    pub q2_relevance: String,
    pub q3_ease: String,
    pub q4_appeal: String,
    pub q5_understanding: String,
    pub q6_suggestions: String,
}

impl FeedbackReceipt {
    pub fn acknowledgement(&self) -> &'static str {
        ACKNOWLEDGEMENT
    }
}
