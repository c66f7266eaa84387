//! 推薦サービスのレスポンス型
//!
//! 外部サービスの値はすべて信用しない:
//! - 欠けたフィールドは None / 空
//! - 数値は JSON数値 と 数値文字列("$59.99") の両方を受け付ける
//! - 型が合わないフィールドは None にして他のフィールドは読む

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 失敗時のメッセージ書式
pub fn failure_message(reason: &str) -> String {
    format!(
        "Failed to get gift recommendations: {}. Please try again.",
        reason
    )
}

/// 金額表示（整数なら小数なし）
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// サービスのレスポンス（成功 or エラー）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Failure { error: String },
    Success(Recommendations),
}

impl ApiResponse {
    /// 送信失敗を画面表示用のエラーレコードに変換
    pub fn failure_from(reason: impl std::fmt::Display) -> Self {
        ApiResponse::Failure {
            error: failure_message(&reason.to_string()),
        }
    }

    /// JSON値から変換（"error"が空でなければエラー扱い）
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::Parse("response is not a JSON object".into()));
        };

        if let Some(error) = map.get("error").and_then(error_text) {
            return Ok(ApiResponse::Failure { error });
        }

        let recommendations = serde_json::from_value(Value::Object(map))?;
        Ok(ApiResponse::Success(recommendations))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResponse::Failure { error } => Some(error),
            ApiResponse::Success(_) => None,
        }
    }

    pub fn recommendations(&self) -> Option<&Recommendations> {
        match self {
            ApiResponse::Failure { .. } => None,
            ApiResponse::Success(r) => Some(r),
        }
    }

    /// 返ってきたバンドル（エラー時は空）
    pub fn bundles(&self) -> &[Bundle] {
        self.recommendations()
            .map(|r| r.bundles.as_slice())
            .unwrap_or(&[])
    }
}

/// "error"の中身。null / false / 0 / "" はエラーなし
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<'de> Deserialize<'de> for ApiResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ApiResponse::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// 成功レスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    #[serde(deserialize_with = "lenient_list")]
    pub bundles: Vec<Bundle>,
    #[serde(deserialize_with = "lenient_option")]
    pub context: Option<RequestContext>,
    #[serde(deserialize_with = "lenient_u64")]
    pub outfits_count: Option<u64>,
}

/// サービスが解釈した条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    #[serde(deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub occasion: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub season: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub budget: Option<f64>,
}

/// ギフトバンドル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bundle {
    #[serde(deserialize_with = "lenient_u64")]
    pub bundle_number: Option<u64>,
    #[serde(deserialize_with = "lenient_string")]
    pub bundle_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub bundle_type: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub match_score: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_cost: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<Item>,
    #[serde(deserialize_with = "lenient_string")]
    pub styling_note: Option<String>,
}

impl Bundle {
    /// 名前がなければ "Bundle {番号}"
    pub fn display_name(&self) -> String {
        match (&self.bundle_name, self.bundle_number) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(n)) => format!("Bundle {}", n),
            _ => "Bundle".to_string(),
        }
    }
}

/// バンドル内の商品
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub product_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reason: Option<String>,
}

impl Item {
    pub fn category_kind(&self) -> ItemCategory {
        ItemCategory::from_str_lossy(self.category.as_deref().unwrap_or(""))
    }
}

/// 商品カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Shoes,
    Handbag,
    Clothing,
    Other,
}

impl ItemCategory {
    /// 未知の値は Other
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "shoes" => ItemCategory::Shoes,
            "handbag" => ItemCategory::Handbag,
            "clothing" => ItemCategory::Clothing,
            _ => ItemCategory::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ItemCategory::Shoes => "👠",
            ItemCategory::Handbag => "👜",
            ItemCategory::Clothing => "👔",
            ItemCategory::Other => "🎁",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Shoes => "Shoes",
            ItemCategory::Handbag => "Handbag",
            ItemCategory::Clothing => "Clothing",
            ItemCategory::Other => "Item",
        }
    }
}

// ============================================
// 寛容なデシリアライザ
// ============================================

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).filter(|v| v.is_finite()))
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// 配列でなければ空、要素ごとに読めたものだけ残す
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}
