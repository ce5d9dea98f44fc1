use crate::config::types::{SETTINGS_FILE_NAME, Settings};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

impl Settings {
    /// 載入設定檔
    ///
    /// 未指定路徑時讀取工作目錄下的 `timelapse.json`，檔案不存在則使用預設值；
    /// 明確指定的路徑不存在時回傳錯誤
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => {
                if !path.exists() {
                    bail!("設定檔不存在: {}", path.display());
                }
                Self::load_from(path)
            }
            None => {
                let path = Path::new(SETTINGS_FILE_NAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::load_from(path)
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}
