//! 影像檔案來源
//!
//! 目錄結構: `base/YYYY-MM-DD/HH/YYYY-MM-DD_HH-MM-SS_001.<ext>`

use crate::config::DATE_FORMAT;
use crate::error::{Result, TimelapseError};
use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use walkdir::WalkDir;

/// 每分鐘只取第一張子影格
pub const PRIMARY_SUBFRAME: &str = "001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// 依（日期、小時、分鐘）列出候選影像
///
/// 回傳的項目包含檔案大小，零位元組的過濾由呼叫端負責
pub trait FileStore: Send + Sync {
    fn candidates(&self, date: NaiveDate, hour: u32, minute: u32) -> Vec<FileEntry>;
}

/// 同一小時的檔案清單，依檔名排序並標上分鐘
#[derive(Debug)]
struct HourListing {
    date: NaiveDate,
    hour: u32,
    frames: Vec<(u32, FileEntry)>,
}

/// 讀取本機檔案系統
///
/// 每個小時目錄只掃描一次；列舉依序逐分鐘查詢，因此只保留最近一個小時的清單
#[derive(Debug)]
pub struct FsFileStore {
    base_dir: PathBuf,
    pattern: Regex,
    last_hour: Mutex<Option<HourListing>>,
}

impl FsFileStore {
    /// `base_dir` 會轉為絕對路徑：concat 清單中的相對路徑是以清單檔所在目錄解析
    pub fn new(base_dir: &Path, image_extension: &str) -> Result<Self> {
        let pattern = format!(
            r"^(\d{{4}}-\d{{2}}-\d{{2}})_(\d{{2}})-(\d{{2}})-\d{{2}}_{PRIMARY_SUBFRAME}\.(?i:{})$",
            regex::escape(image_extension.trim_start_matches('.'))
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| TimelapseError::Config(format!("無效的副檔名 {image_extension}: {e}")))?;

        Ok(Self {
            base_dir: std::path::absolute(base_dir)?,
            pattern,
            last_hour: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 符合日期與小時的主影格，回傳其分鐘
    fn minute_of(&self, file_name: &str, day: &str, hour: u32) -> Option<u32> {
        let caps = self.pattern.captures(file_name)?;
        if &caps[1] != day || caps[2].parse::<u32>().ok() != Some(hour) {
            return None;
        }
        caps[3].parse().ok()
    }

    fn scan_hour(&self, date: NaiveDate, hour: u32) -> Vec<(u32, FileEntry)> {
        let day = date.format(DATE_FORMAT).to_string();
        let hour_dir = self.base_dir.join(&day).join(format!("{hour:02}"));
        if !hour_dir.is_dir() {
            debug!("目錄不存在: {}", hour_dir.display());
            return Vec::new();
        }

        WalkDir::new(&hour_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("無法讀取 {}: {e}", hour_dir.display());
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let minute = self.minute_of(entry.file_name().to_str()?, &day, hour)?;
                let metadata = entry.metadata().ok()?;
                Some((
                    minute,
                    FileEntry {
                        path: entry.into_path(),
                        size: metadata.len(),
                    },
                ))
            })
            .collect()
    }
}

impl FileStore for FsFileStore {
    fn candidates(&self, date: NaiveDate, hour: u32, minute: u32) -> Vec<FileEntry> {
        let mut cached = self.last_hour.lock().unwrap_or_else(PoisonError::into_inner);
        let listing = match cached.take() {
            Some(listing) if listing.date == date && listing.hour == hour => listing,
            _ => HourListing {
                date,
                hour,
                frames: self.scan_hour(date, hour),
            },
        };

        let entries = listing
            .frames
            .iter()
            .filter(|(frame_minute, _)| *frame_minute == minute)
            .map(|(_, entry)| entry.clone())
            .collect();
        *cached = Some(listing);
        entries
    }
}
