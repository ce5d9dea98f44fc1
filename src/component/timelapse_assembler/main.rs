use super::assembler::TimelapseAssembler;
use super::encoder::{Encoder, FfmpegEncoder};
use super::enumerator::enumerate;
use super::file_store::{FileEntry, FileStore, FsFileStore};
use crate::component::daylight_window::{
    CaptureWindow, Ephemeris, SolarEphemeris, SunWindow, resolve,
};
use crate::config::{FrameDuration, RunConfig};
use crate::error::{Result, TimelapseError};
use chrono::NaiveDate;
use log::{info, warn};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 單一播放速度的結果
#[derive(Debug)]
pub struct JobReport {
    pub duration: FrameDuration,
    pub result: Result<PathBuf>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub window: CaptureWindow,
    pub files_found: usize,
    pub jobs: Vec<JobReport>,
}

impl RunSummary {
    /// 時段內沒有任何影像，未呼叫編碼器
    #[must_use]
    pub const fn no_files(&self) -> bool {
        self.files_found == 0
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|job| job.result.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }

    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.jobs
            .iter()
            .any(|job| matches!(job.result, Err(TimelapseError::Cancelled)))
    }
}

/// 串接整個流程：太陽時刻 → 收集時段 → 列出影像 → 逐一編碼
pub struct TimelapseBuilder<P: Ephemeris, S: FileStore, E: Encoder> {
    config: RunConfig,
    ephemeris: P,
    store: S,
    assembler: TimelapseAssembler<E>,
}

impl TimelapseBuilder<SolarEphemeris, FsFileStore, FfmpegEncoder> {
    pub fn from_config(config: RunConfig, shutdown_signal: Arc<AtomicBool>) -> Result<Self> {
        let store = FsFileStore::new(&config.base_dir, &config.image_extension)?;
        let encoder = FfmpegEncoder::new(config.encoder_program.clone(), config.encode_timeout)
            .with_extra_args(config.encoder_args.clone());
        let assembler = TimelapseAssembler::new(
            encoder,
            config.output_dir.clone(),
            config.manifest_dir.clone(),
            &config.video_extension,
            shutdown_signal,
        );

        Ok(Self::new(config, SolarEphemeris, store, assembler))
    }
}

impl<P: Ephemeris, S: FileStore, E: Encoder> TimelapseBuilder<P, S, E> {
    pub const fn new(
        config: RunConfig,
        ephemeris: P,
        store: S,
        assembler: TimelapseAssembler<E>,
    ) -> Self {
        Self {
            config,
            ephemeris,
            store,
            assembler,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn sun_window(&self) -> Result<SunWindow> {
        self.ephemeris
            .sun_window(&self.config.location, self.config.date)
    }

    /// 整天模式仍會驗證地點；極區日期沒有日出日落時直接使用整天
    pub fn capture_window(&self) -> Result<CaptureWindow> {
        match self.sun_window() {
            Ok(sun) => Ok(resolve(&sun, self.config.full_day)),
            Err(err @ TimelapseError::NoSunEvent { .. }) if self.config.full_day => {
                warn!("{err}，使用整天時段");
                Ok(CaptureWindow::FULL_DAY)
            }
            Err(err) => Err(err),
        }
    }

    pub fn collect_files(&self, window: &CaptureWindow) -> Vec<FileEntry> {
        enumerate(&self.store, self.config.date, window)
    }

    pub fn run(&self) -> Result<RunSummary> {
        let date = self.config.date;
        let window = self.capture_window()?;
        info!("{} {date} 收集時段 {window}", self.config.location);

        let files = self.collect_files(&window);
        if files.is_empty() {
            info!("{date} {window} 內沒有影像，略過編碼");
            return Ok(RunSummary {
                date,
                window,
                files_found: 0,
                jobs: Vec::new(),
            });
        }
        info!("找到 {} 張影像", files.len());

        let encode = |duration: &FrameDuration| JobReport {
            duration: *duration,
            result: self.assembler.assemble(&files, date, *duration),
        };

        let jobs = if self.config.parallel {
            self.config.durations.par_iter().map(encode).collect()
        } else {
            self.config.durations.iter().map(encode).collect()
        };

        Ok(RunSummary {
            date,
            window,
            files_found: files.len(),
            jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::timelapse_assembler::ExitOutcome;
    use crate::config::{Settings, SettingsOverrides};
    use chrono::NaiveDateTime;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FixedEphemeris {
        dawn: (u32, u32),
        dusk: (u32, u32),
    }

    impl Ephemeris for FixedEphemeris {
        fn sun_window(&self, location: &str, date: NaiveDate) -> Result<SunWindow> {
            if location != "Edinburgh" {
                return Err(TimelapseError::UnknownLocation(location.to_string()));
            }
            let at = |(h, m): (u32, u32)| -> NaiveDateTime { date.and_hms_opt(h, m, 0).unwrap() };
            Ok(SunWindow {
                dawn: at(self.dawn),
                sunrise: at(self.dawn),
                sunset: at(self.dusk),
                dusk: at(self.dusk),
            })
        }
    }

    struct PolarEphemeris;

    impl Ephemeris for PolarEphemeris {
        fn sun_window(&self, location: &str, date: NaiveDate) -> Result<SunWindow> {
            Err(TimelapseError::NoSunEvent {
                event: "日出",
                location: location.to_string(),
                date,
            })
        }
    }

    /// 每分鐘一張
    struct EveryMinute;

    impl FileStore for EveryMinute {
        fn candidates(&self, _date: NaiveDate, hour: u32, minute: u32) -> Vec<FileEntry> {
            vec![FileEntry {
                path: PathBuf::from(format!("{hour:02}-{minute:02}")),
                size: 1,
            }]
        }
    }

    struct Empty;

    impl FileStore for Empty {
        fn candidates(&self, _date: NaiveDate, _hour: u32, _minute: u32) -> Vec<FileEntry> {
            Vec::new()
        }
    }

    /// 0.05 的工作失敗，其他成功
    #[derive(Default)]
    struct SelectiveEncoder {
        calls: Mutex<Vec<PathBuf>>,
    }

    impl Encoder for SelectiveEncoder {
        fn run(&self, _manifest: &Path, output: &Path, _cancel: &AtomicBool) -> ExitOutcome {
            self.calls.lock().unwrap().push(output.to_path_buf());
            if output.to_string_lossy().contains("-0.05.") {
                return ExitOutcome::NonZeroExit {
                    code: Some(1),
                    output: "boom".into(),
                };
            }
            std::fs::write(output, b"video").unwrap();
            ExitOutcome::Success
        }
    }

    fn config(temp_dir: &TempDir, location: &str, full_day: bool, parallel: bool) -> RunConfig {
        let settings = Settings {
            location: location.to_string(),
            output_dir: temp_dir.path().join("videos"),
            manifest_dir: Some(temp_dir.path().join("manifests")),
            parallel,
            ..Settings::default()
        };
        RunConfig::new(
            settings,
            SettingsOverrides::default(),
            NaiveDate::from_ymd_opt(2025, 12, 21).unwrap(),
            full_day,
        )
        .unwrap()
    }

    fn builder<P: Ephemeris, S: FileStore>(
        config: RunConfig,
        ephemeris: P,
        store: S,
    ) -> TimelapseBuilder<P, S, SelectiveEncoder> {
        let assembler = TimelapseAssembler::new(
            SelectiveEncoder::default(),
            config.output_dir.clone(),
            config.manifest_dir.clone(),
            &config.video_extension,
            Arc::new(AtomicBool::new(false)),
        );
        TimelapseBuilder::new(config, ephemeris, store, assembler)
    }

    fn edinburgh() -> FixedEphemeris {
        FixedEphemeris {
            dawn: (8, 20),
            dusk: (15, 40),
        }
    }

    #[test]
    fn test_failed_duration_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        let builder = builder(config(&temp_dir, "Edinburgh", false, false), edinburgh(), EveryMinute);

        let summary = builder.run().unwrap();

        // 08:20-15:40 共 441 分鐘
        assert_eq!(summary.files_found, 441);
        assert_eq!(summary.jobs.len(), 2);
        assert!(summary.jobs[0].result.is_ok());
        assert!(matches!(
            summary.jobs[1].result,
            Err(TimelapseError::EncoderNonZeroExit { .. })
        ));
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.was_cancelled());
    }

    #[test]
    fn test_parallel_runs_every_duration() {
        let temp_dir = TempDir::new().unwrap();
        let builder = builder(config(&temp_dir, "Edinburgh", true, true), edinburgh(), EveryMinute);

        let summary = builder.run().unwrap();

        assert_eq!(summary.window, CaptureWindow::FULL_DAY);
        assert_eq!(summary.files_found, 1440);
        assert_eq!(builder.assembler_calls(), 2);
        // 報告順序與設定順序一致
        assert_eq!(summary.jobs[0].duration, FrameDuration::new(0.25).unwrap());
        assert_eq!(summary.jobs[1].duration, FrameDuration::new(0.05).unwrap());
    }

    #[test]
    fn test_repeated_duration_encoded_once() {
        let temp_dir = TempDir::new().unwrap();
        let quarter = FrameDuration::new(0.25).unwrap();
        let overrides = SettingsOverrides {
            durations: vec![quarter, quarter],
            parallel: true,
            ..SettingsOverrides::default()
        };
        let settings = Settings {
            output_dir: temp_dir.path().join("videos"),
            manifest_dir: Some(temp_dir.path().join("manifests")),
            ..Settings::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 12, 21).unwrap();
        let config = RunConfig::new(settings, overrides, date, false).unwrap();
        let builder = builder(config, edinburgh(), EveryMinute);

        let summary = builder.run().unwrap();

        assert_eq!(summary.jobs.len(), 1);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(builder.assembler_calls(), 1);
    }

    #[test]
    fn test_no_files_skips_encoder() {
        let temp_dir = TempDir::new().unwrap();
        let builder = builder(config(&temp_dir, "Edinburgh", false, false), edinburgh(), Empty);

        let summary = builder.run().unwrap();

        assert!(summary.no_files());
        assert!(summary.jobs.is_empty());
        assert_eq!(builder.assembler_calls(), 0);
    }

    #[test]
    fn test_unknown_location_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let builder = builder(config(&temp_dir, "Atlantis", false, false), edinburgh(), EveryMinute);

        let result = builder.run();

        assert!(matches!(result, Err(TimelapseError::UnknownLocation(_))));
        assert_eq!(builder.assembler_calls(), 0);
    }

    #[test]
    fn test_full_day_tolerates_polar_dates() {
        let temp_dir = TempDir::new().unwrap();
        let full_day = builder(config(&temp_dir, "Tromso", true, false), PolarEphemeris, Empty);
        assert_eq!(full_day.capture_window().unwrap(), CaptureWindow::FULL_DAY);

        let daylight = builder(config(&temp_dir, "Tromso", false, false), PolarEphemeris, Empty);
        assert!(matches!(
            daylight.capture_window(),
            Err(TimelapseError::NoSunEvent { .. })
        ));
    }

    impl<P: Ephemeris, S: FileStore> TimelapseBuilder<P, S, SelectiveEncoder> {
        fn assembler_calls(&self) -> usize {
            self.assembler.encoder().calls.lock().unwrap().len()
        }
    }
}
