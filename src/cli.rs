//! 命令列參數

use crate::config::{
    FrameDuration, RunConfig, Settings, SettingsOverrides, default_date, parse_date,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "daylight-timelapse")]
#[command(about = "將固定相機一天內黎明到黃昏的影像組成縮時影片", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 輸出除錯訊息
    #[arg(short, long)]
    pub debug: bool,

    /// 處理日期（YYYY-MM-DD），預設為前一天
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// 收集整天的影像，不限黎明到黃昏
    #[arg(long)]
    pub full_day: bool,

    /// 影像根目錄
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// 影片輸出目錄
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// 地點名稱，用於計算日出日落
    #[arg(long)]
    pub location: Option<String>,

    /// 每張影格秒數，可重複指定
    #[arg(long = "duration", value_name = "SECONDS")]
    pub durations: Vec<FrameDuration>,

    /// 設定檔路徑（預設為 ./timelapse.json）
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 同時編碼所有播放速度
    #[arg(long)]
    pub parallel: bool,

    /// 只輸出太陽時刻後結束
    #[arg(long)]
    pub print_sun: bool,
}

impl Cli {
    /// 決定處理日期；日期格式錯誤在任何檔案存取之前回報
    pub fn resolve_date(&self, today: NaiveDate) -> crate::error::Result<NaiveDate> {
        match &self.date {
            Some(raw) => parse_date(raw),
            None => default_date(today),
        }
    }

    pub fn run_config(&self, today: NaiveDate) -> Result<RunConfig> {
        let date = self.resolve_date(today)?;
        let settings = Settings::load(self.config.as_deref()).context("無法載入設定檔")?;

        let overrides = SettingsOverrides {
            location: self.location.clone(),
            base_dir: self.base_dir.clone(),
            output_dir: self.output_dir.clone(),
            durations: self.durations.clone(),
            parallel: self.parallel,
        };

        Ok(RunConfig::new(settings, overrides, date, self.full_day)?)
    }
}
