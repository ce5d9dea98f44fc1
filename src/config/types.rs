use crate::error::{Result, TimelapseError};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 預設設定檔名稱（位於目前工作目錄）
pub const SETTINGS_FILE_NAME: &str = "timelapse.json";

/// 每張影格的顯示秒數
///
/// `Display` 的輸出會原樣寫入 manifest 與輸出檔名，例如 `0.25`、`0.05`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameDuration(f64);

impl FrameDuration {
    pub fn new(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(TimelapseError::Config(format!(
                "影格秒數必須為正數: {seconds}"
            )));
        }
        Ok(Self(seconds))
    }

    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FrameDuration {
    type Error = TimelapseError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FrameDuration> for f64 {
    fn from(value: FrameDuration) -> Self {
        value.0
    }
}

impl FromStr for FrameDuration {
    type Err = TimelapseError;

    fn from_str(s: &str) -> Result<Self> {
        let seconds = s
            .trim()
            .parse::<f64>()
            .map_err(|_| TimelapseError::Config(format!("無法解析影格秒數: {s}")))?;
        Self::new(seconds)
    }
}

impl fmt::Display for FrameDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 設定檔內容，缺少的欄位使用預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub location: String,
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 未設定時使用系統暫存目錄
    pub manifest_dir: Option<PathBuf>,
    pub durations: Vec<FrameDuration>,
    pub image_extension: String,
    pub video_extension: String,
    pub encoder_program: String,
    /// 附加在輸出路徑之前的編碼參數
    pub encoder_args: Vec<String>,
    /// 0 表示不限時
    pub encode_timeout_secs: u64,
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: "Edinburgh".to_string(),
            base_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("videos"),
            manifest_dir: None,
            durations: vec![FrameDuration(0.25), FrameDuration(0.05)],
            image_extension: "jpg".to_string(),
            video_extension: "mp4".to_string(),
            encoder_program: "ffmpeg".to_string(),
            encoder_args: Vec::new(),
            encode_timeout_secs: 3600,
            parallel: false,
        }
    }
}

/// 命令列可覆寫的欄位
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub location: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub durations: Vec<FrameDuration>,
    pub parallel: bool,
}

/// 單次執行的完整設定，建立後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub location: String,
    pub date: NaiveDate,
    pub full_day: bool,
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub manifest_dir: PathBuf,
    pub durations: Vec<FrameDuration>,
    pub image_extension: String,
    pub video_extension: String,
    pub encoder_program: String,
    pub encoder_args: Vec<String>,
    pub encode_timeout: Option<Duration>,
    pub parallel: bool,
}

impl RunConfig {
    /// 合併設定檔與命令列參數
    pub fn new(
        settings: Settings,
        overrides: SettingsOverrides,
        date: NaiveDate,
        full_day: bool,
    ) -> Result<Self> {
        let durations = if overrides.durations.is_empty() {
            settings.durations
        } else {
            overrides.durations
        };
        if durations.is_empty() {
            return Err(TimelapseError::Config("至少需要一個影格秒數".to_string()));
        }
        let durations = unique_durations(durations);

        let location = overrides.location.unwrap_or(settings.location);
        if location.trim().is_empty() {
            return Err(TimelapseError::Config("地點名稱不可為空".to_string()));
        }

        Ok(Self {
            location,
            date,
            full_day,
            base_dir: overrides.base_dir.unwrap_or(settings.base_dir),
            output_dir: overrides.output_dir.unwrap_or(settings.output_dir),
            manifest_dir: settings.manifest_dir.unwrap_or_else(std::env::temp_dir),
            durations,
            image_extension: settings.image_extension.trim_start_matches('.').to_string(),
            video_extension: settings.video_extension.trim_start_matches('.').to_string(),
            encoder_program: settings.encoder_program,
            encoder_args: settings.encoder_args,
            encode_timeout: (settings.encode_timeout_secs > 0)
                .then(|| Duration::from_secs(settings.encode_timeout_secs)),
            parallel: overrides.parallel || settings.parallel,
        })
    }
}

/// 相同秒數會產生相同的輸出與清單路徑，只保留第一次出現的
fn unique_durations(durations: Vec<FrameDuration>) -> Vec<FrameDuration> {
    let mut unique: Vec<FrameDuration> = Vec::with_capacity(durations.len());
    for duration in durations {
        if unique.contains(&duration) {
            warn!("忽略重複的影格秒數: {duration}");
        } else {
            unique.push(duration);
        }
    }
    unique
}
