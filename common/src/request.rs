//! 推薦サービスへのリクエスト
//!
//! FormData から送信用ペイロードを組み立てる。

use crate::form::FormData;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 自由入力の予算を数値化
///
/// 数字と "." 以外を取り除き、先頭から読める小数部分だけを使う。
/// 空や読めない場合は 0。
///
/// # Examples
/// ```
/// use gift_wizard_common::parse_budget;
///
/// assert_eq!(parse_budget("$50"), 50.0);
/// assert_eq!(parse_budget("100.50 USD"), 100.5);
/// assert_eq!(parse_budget("abc"), 0.0);
/// ```
pub fn parse_budget(input: &str) -> f64 {
    lazy_static::lazy_static! {
        static ref NON_NUMERIC_RE: Regex = Regex::new(r"[^0-9.]").unwrap();
        static ref LEADING_DECIMAL_RE: Regex = Regex::new(r"^\d*\.?\d*").unwrap();
    }

    let numeric = NON_NUMERIC_RE.replace_all(input, "");
    let prefix = LEADING_DECIMAL_RE
        .find(&numeric)
        .map(|m| m.as_str())
        .unwrap_or("");

    prefix.parse::<f64>().unwrap_or(0.0)
}

/// 送信ペイロード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRequest {
    pub recipient: String,
    /// 圧縮済み画像のData URI（アップロード順）
    pub images: Vec<String>,
    pub age: u8,
    pub gender: String,
    pub occasion: String,
    pub month: String,
    #[serde(rename = "selectedImages")]
    pub selected_images: Vec<usize>,
    pub budget: f64,
}

impl GiftRequest {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            recipient: form.recipient.clone(),
            images: form
                .outfit_images
                .iter()
                .map(|img| img.preview_data_uri.clone())
                .collect(),
            age: form.age,
            gender: form.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
            occasion: form.occasion.clone(),
            month: form.month.map(|m| m.name().to_string()).unwrap_or_default(),
            selected_images: form.selected_images.clone(),
            budget: parse_budget(&form.budget),
        }
    }

    /// ログ用の要約（画像本体は件数だけ）
    pub fn log_summary(&self) -> String {
        format!(
            "recipient={:?} images=[{} images] age={} gender={:?} occasion={:?} month={:?} selectedImages={:?} budget={}",
            self.recipient,
            self.images.len(),
            self.age,
            self.gender,
            self.occasion,
            self.month,
            self.selected_images,
            self.budget
        )
    }
}
