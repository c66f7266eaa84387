use crate::error::{Result, WizardError};
use gift_wizard_common::image_bounds::{JPEG_QUALITY, MAX_HEIGHT, MAX_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 送信先を上書きする環境変数
pub const ENDPOINT_ENV: &str = "GIFT_WIZARD_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 推薦サービスのURL
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/outfit-bundles".into(),
            timeout_seconds: 120,
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WizardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("gift-wizard").join("config.json"))
    }

    /// 送信先URL（環境変数を優先）
    pub fn endpoint(&self) -> String {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.endpoint.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WizardError::Config(format!(
                "URLは http:// か https:// で始めてください: {}",
                url
            )));
        }
        self.endpoint = url;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(WizardError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}
