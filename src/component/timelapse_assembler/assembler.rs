use super::encoder::{Encoder, ExitOutcome};
use super::file_store::FileEntry;
use super::manifest::{FileManifest, TransientManifest};
use crate::config::FrameDuration;
use crate::error::{Result, TimelapseError};
use crate::tools::{discard_file, ensure_directory_exists};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 單一播放速度的編碼工作
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub date: NaiveDate,
    pub duration: FrameDuration,
    pub manifest_path: PathBuf,
    pub output_path: PathBuf,
    /// 編碼中的暫存輸出，成功後才改名為 `output_path`
    pub staging_path: PathBuf,
}

pub struct TimelapseAssembler<E: Encoder> {
    encoder: E,
    output_dir: PathBuf,
    manifest_dir: PathBuf,
    video_extension: String,
    run_token: Uuid,
    shutdown_signal: Arc<AtomicBool>,
}

impl<E: Encoder> TimelapseAssembler<E> {
    pub fn new(
        encoder: E,
        output_dir: PathBuf,
        manifest_dir: PathBuf,
        video_extension: &str,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            encoder,
            output_dir,
            manifest_dir,
            video_extension: video_extension.trim_start_matches('.').to_string(),
            run_token: Uuid::new_v4(),
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn encoder(&self) -> &E {
        &self.encoder
    }

    /// 輸出路徑 `output_dir/YYYY/MM/YYYY-MM-DD-<duration>.<ext>`，
    /// 清單檔與暫存輸出另加上本次執行的識別碼，避免同日期的平行執行互相覆寫
    #[must_use]
    pub fn job(&self, date: NaiveDate, duration: FrameDuration) -> EncodeJob {
        let day = date.format("%Y-%m-%d");
        let token = self.run_token.simple();
        let month_dir = self
            .output_dir
            .join(date.format("%Y").to_string())
            .join(date.format("%m").to_string());
        let output_path = month_dir.join(format!("{day}-{duration}.{}", self.video_extension));
        // 保留副檔名讓 ffmpeg 判斷輸出格式
        let staging_path =
            month_dir.join(format!("{day}-{duration}.{token}.part.{}", self.video_extension));
        let manifest_path = self.manifest_dir.join(format!("{day}-{duration}-{token}.txt"));

        EncodeJob {
            date,
            duration,
            manifest_path,
            output_path,
            staging_path,
        }
    }

    /// 產生清單檔並呼叫編碼器
    ///
    /// 編碼器寫入暫存輸出，成功後才取代既有的影片；不論結果如何清單檔都會被刪除，
    /// 失敗時只刪除本次的暫存輸出
    pub fn assemble(
        &self,
        files: &[FileEntry],
        date: NaiveDate,
        duration: FrameDuration,
    ) -> Result<PathBuf> {
        if files.is_empty() {
            warn!("{date} ({duration}s): 沒有影像可編碼");
            return Err(TimelapseError::EmptyFileList);
        }
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return Err(TimelapseError::Cancelled);
        }

        let job = self.job(date, duration);
        if let Some(parent) = job.output_path.parent() {
            ensure_directory_exists(parent)?;
        }
        ensure_directory_exists(&self.manifest_dir)?;

        let manifest = FileManifest::new(files, duration);
        let transient = TransientManifest::create(job.manifest_path.clone(), &manifest)?;

        info!(
            "開始編碼 {} 張影像 ({duration}s/張) -> {}",
            manifest.len(),
            job.output_path.display()
        );

        let outcome = self
            .encoder
            .run(transient.path(), &job.staging_path, &self.shutdown_signal);
        let result = Self::interpret(&job, outcome).and_then(|()| Self::publish(&job));

        drop(transient);
        if result.is_err() {
            discard_file(&job.staging_path, "不完整的輸出檔");
        }

        result
    }

    fn publish(job: &EncodeJob) -> Result<PathBuf> {
        fs::rename(&job.staging_path, &job.output_path)?;
        info!("編碼完成: {}", job.output_path.display());
        Ok(job.output_path.clone())
    }

    fn interpret(job: &EncodeJob, outcome: ExitOutcome) -> Result<()> {
        match outcome {
            ExitOutcome::Success => Ok(()),
            ExitOutcome::LaunchFailed(reason) => {
                error!("無法啟動編碼器 ({}s): {reason}", job.duration);
                Err(TimelapseError::EncoderLaunchFailure(reason))
            }
            ExitOutcome::NonZeroExit { code, output } => {
                error!("編碼失敗 ({}s) 結束碼 {code:?}: {output}", job.duration);
                Err(TimelapseError::EncoderNonZeroExit { code, output })
            }
            ExitOutcome::TimedOut { seconds, output } => {
                error!("編碼逾時 ({}s) 超過 {seconds} 秒", job.duration);
                Err(TimelapseError::EncoderTimedOut { seconds, output })
            }
            ExitOutcome::Cancelled => {
                warn!("編碼已中斷 ({}s): {}", job.duration, job.staging_path.display());
                Err(TimelapseError::Cancelled)
            }
        }
    }
}
