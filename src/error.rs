//! 縮時攝影流程的錯誤型別

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelapseError {
    #[error("找不到地點: {0}")]
    UnknownLocation(String),

    #[error("日期格式錯誤（應為 YYYY-MM-DD）: {0}")]
    InvalidDateFormat(String),

    #[error("{location} 在 {date} 沒有{event}")]
    NoSunEvent {
        event: &'static str,
        location: String,
        date: NaiveDate,
    },

    #[error("檔案清單為空，略過編碼")]
    EmptyFileList,

    #[error("無法啟動編碼器: {0}")]
    EncoderLaunchFailure(String),

    #[error("編碼器結束碼 {code:?}: {output}")]
    EncoderNonZeroExit { code: Option<i32>, output: String },

    #[error("編碼器逾時 ({seconds} 秒): {output}")]
    EncoderTimedOut { seconds: u64, output: String },

    #[error("編碼已被中斷")]
    Cancelled,

    #[error("無法清除暫存檔 {}: {source}", path.display())]
    PartialWriteCleanupFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("設定錯誤: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimelapseError {
    /// 是否為整個流程都無法繼續的錯誤
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownLocation(_)
                | Self::InvalidDateFormat(_)
                | Self::NoSunEvent { .. }
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TimelapseError>;
