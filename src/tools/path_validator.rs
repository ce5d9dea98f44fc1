use crate::error::Result;
use std::path::Path;

/// 建立目錄（含上層），已存在時不視為錯誤
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
