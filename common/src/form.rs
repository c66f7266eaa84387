//! ウィザードの入力データ
//!
//! 1セッション分の回答を保持するFormDataと、その値の型:
//! - Gender: 性別の選択肢
//! - Month: 贈る月（12ヶ月）
//! - OutfitImage: 圧縮済みのコーデ画像

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 年齢スライダーの範囲
pub const AGE_MIN: u8 = 1;
pub const AGE_MAX: u8 = 100;
pub const DEFAULT_AGE: u8 = 18;

/// 性別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// 画面の選択肢の並び順
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// 送信時の文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }

    /// 選択肢の表示名
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer not to say" | "none" => Ok(Gender::PreferNotToSay),
            _ => Err(Error::Parse(format!(
                "unknown gender: {}. Use M, F, Other or \"Prefer not to say\"",
                s
            ))),
        }
    }
}

/// 贈る月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// 月ピッカーの項目（暦順）
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Month {
    type Err = Error;

    /// 月名（大文字小文字不問）、3文字略称、1-12の数字を受け付ける
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            if (1..=12).contains(&n) {
                return Ok(Month::ALL[n - 1]);
            }
        }

        let lower = s.to_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| {
                let name = m.name().to_lowercase();
                name == lower || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| Error::Parse(format!("unknown month: {}", s)))
    }
}

/// 元ファイルの情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    pub path: String,
    pub mime_type: String,
    pub size: u64,
}

/// アップロードされたコーデ画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitImage {
    pub raw_file: RawFile,
    /// "data:image/jpeg;base64,..." 形式の圧縮済み画像
    pub preview_data_uri: String,
    pub file_name: String,
}

/// ウィザードの回答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub recipient: String,
    pub outfit_images: Vec<OutfitImage>,
    pub age: u8,
    pub gender: Option<Gender>,
    pub month: Option<Month>,
    pub occasion: String,
    /// ギャラリーで選択された画像のインデックス（選択順）
    pub selected_images: Vec<usize>,
    /// 自由入力の予算（例: "$50"）。数値化は送信時に行う
    pub budget: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            outfit_images: Vec::new(),
            age: DEFAULT_AGE,
            gender: None,
            month: None,
            occasion: String::new(),
            selected_images: Vec::new(),
            budget: String::new(),
        }
    }
}

impl FormData {
    /// 年齢を範囲内に丸めて設定
    pub fn set_age(&mut self, age: u8) {
        self.age = age.clamp(AGE_MIN, AGE_MAX);
    }

    /// 選択済みなら外し、未選択なら末尾に追加
    pub fn toggle_image_selection(&mut self, index: usize) {
        if let Some(pos) = self.selected_images.iter().position(|&i| i == index) {
            self.selected_images.remove(pos);
        } else {
            self.selected_images.push(index);
        }
    }

    /// 画像を削除（範囲外は何もしない）
    pub fn remove_image(&mut self, index: usize) -> Option<OutfitImage> {
        if index < self.outfit_images.len() {
            Some(self.outfit_images.remove(index))
        } else {
            None
        }
    }
}
