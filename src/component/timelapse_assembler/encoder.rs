use log::{info, warn};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStderr, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 編碼器子程序的結束狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    LaunchFailed(String),
    NonZeroExit { code: Option<i32>, output: String },
    TimedOut { seconds: u64, output: String },
    Cancelled,
}

/// 讀取清單檔並輸出影片
///
/// 實作必須在回傳前回收子程序，包含逾時與中斷的情況
pub trait Encoder: Send + Sync {
    fn run(&self, manifest: &Path, output: &Path, cancel: &AtomicBool) -> ExitOutcome;
}

pub struct FfmpegEncoder {
    program: String,
    timeout: Option<Duration>,
    extra_args: Vec<String>,
}

impl FfmpegEncoder {
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
            extra_args: Vec::new(),
        }
    }

    /// 附加在輸出路徑之前的編碼參數，例如 `-crf 23`
    #[must_use]
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    #[must_use]
    pub fn build_command(&self, manifest: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);

        cmd.args([
            "-hide_banner",
            "-nostdin",
            "-loglevel", "error",
            "-y",
            "-f", "concat",
            "-safe", "0",
        ]);
        cmd.arg("-i").arg(manifest);
        cmd.args([
            "-fps_mode", "vfr",
            "-c:v", "libx264",
            "-pix_fmt", "yuv420p",
            "-movflags", "+faststart",
        ]);
        cmd.args(&self.extra_args);
        cmd.arg(output);

        cmd
    }

    /// 在背景讀取 stderr，避免管線塞滿導致子程序卡住
    fn spawn_output_reader(stderr: Option<ChildStderr>) -> Option<JoinHandle<String>> {
        let stderr = stderr?;
        Some(thread::spawn(move || {
            BufReader::new(stderr)
                .lines()
                .map_while(Result::ok)
                .collect::<Vec<_>>()
                .join("\n")
        }))
    }

    fn collect_output(reader: Option<JoinHandle<String>>) -> String {
        reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }

    fn terminate(child: &mut Child) {
        let pid = child.id();
        warn!("終止編碼器 [{pid}]");
        if let Err(e) = child.kill() {
            warn!("無法終止編碼器 [{pid}]: {e}");
        }
        if let Err(e) = child.wait() {
            warn!("無法回收編碼器 [{pid}]: {e}");
        }
    }
}

impl Encoder for FfmpegEncoder {
    fn run(&self, manifest: &Path, output: &Path, cancel: &AtomicBool) -> ExitOutcome {
        let mut command = self.build_command(manifest, output);
        command.stdin(Stdio::null());
        // -loglevel error 只寫入 stderr
        command.stdout(Stdio::null());
        command.stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return ExitOutcome::LaunchFailed(format!("{}: {e}", self.program)),
        };

        let pid = child.id();
        info!("啟動編碼器 [{pid}]: {}", output.display());

        let reader = Self::spawn_output_reader(child.stderr.take());
        let started = Instant::now();

        let status = loop {
            if cancel.load(Ordering::SeqCst) {
                Self::terminate(&mut child);
                Self::collect_output(reader);
                return ExitOutcome::Cancelled;
            }

            if let Some(limit) = self.timeout.filter(|limit| started.elapsed() >= *limit) {
                Self::terminate(&mut child);
                return ExitOutcome::TimedOut {
                    seconds: limit.as_secs(),
                    output: Self::collect_output(reader),
                };
            }

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    warn!("無法檢查程序狀態 [{pid}]: {e}");
                    Self::terminate(&mut child);
                    return ExitOutcome::NonZeroExit {
                        code: None,
                        output: Self::collect_output(reader),
                    };
                }
            }
        };

        let output = Self::collect_output(reader);
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::NonZeroExit {
                code: status.code(),
                output,
            }
        }
    }
}
