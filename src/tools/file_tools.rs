use crate::error::TimelapseError;
use log::{error, info};
use std::fs;
use std::io;
use std::path::Path;

/// 刪除檔案，檔案本來就不存在時回傳 `Ok(false)`
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// 盡力刪除暫存或不完整的檔案，失敗只記錄不回傳
pub fn discard_file(path: &Path, label: &str) -> bool {
    match remove_file_if_exists(path) {
        Ok(removed) => {
            if removed {
                info!("已刪除{label}: {}", path.display());
            }
            true
        }
        Err(source) => {
            let err = TimelapseError::PartialWriteCleanupFailure {
                path: path.to_path_buf(),
                source,
            };
            error!("{err}");
            false
        }
    }
}
