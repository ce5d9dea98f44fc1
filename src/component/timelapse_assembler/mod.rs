//! 縮時影片組裝元件
//!
//! 依收集時段列出影像，為每個播放速度產生 concat 清單並呼叫 ffmpeg 編碼

mod assembler;
mod encoder;
mod enumerator;
mod file_store;
mod main;
mod manifest;

pub use assembler::{EncodeJob, TimelapseAssembler};
pub use encoder::{Encoder, ExitOutcome, FfmpegEncoder};
pub use enumerator::enumerate;
pub use file_store::{FileEntry, FileStore, FsFileStore, PRIMARY_SUBFRAME};
pub use main::{JobReport, RunSummary, TimelapseBuilder};
pub use manifest::{FileManifest, TransientManifest};
