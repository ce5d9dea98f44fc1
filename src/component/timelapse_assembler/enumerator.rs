use super::file_store::{FileEntry, FileStore};
use crate::component::daylight_window::CaptureWindow;
use chrono::NaiveDate;
use log::debug;

/// 依時間順序列出收集範圍內的有效影像
///
/// 回傳順序即播放順序：（小時、分鐘、檔名）遞增。零位元組的檔案視為擷取失敗並排除。
/// 沒有任何影像時回傳空清單。
pub fn enumerate<S: FileStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    window: &CaptureWindow,
) -> Vec<FileEntry> {
    let mut files = Vec::new();
    let mut skipped = 0usize;

    for hour in window.hours() {
        for minute in window.minutes_in(hour) {
            let mut candidates = store.candidates(date, hour, minute);
            candidates.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

            for entry in candidates {
                if entry.size == 0 {
                    debug!("略過空檔案: {}", entry.path.display());
                    skipped += 1;
                    continue;
                }
                files.push(entry);
            }
        }
    }

    debug!(
        "{date} {window}: 找到 {} 個影像，略過 {skipped} 個空檔案",
        files.len()
    );
    files
}
