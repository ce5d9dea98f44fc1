//! ffmpeg concat demuxer 的檔案清單
//!
//! 每個影像兩行：`file '<path>'` 與 `duration <seconds>`

use super::file_store::FileEntry;
use crate::config::FrameDuration;
use crate::tools::discard_file;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct FileManifest {
    entries: Vec<(PathBuf, FrameDuration)>,
}

impl FileManifest {
    #[must_use]
    pub fn new(files: &[FileEntry], duration: FrameDuration) -> Self {
        Self {
            entries: files
                .iter()
                .map(|file| (file.path.clone(), duration))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut content = String::new();
        for (path, duration) in &self.entries {
            let _ = writeln!(content, "file '{}'", quote_path(path));
            let _ = writeln!(content, "duration {duration}");
        }
        content
    }
}

/// concat 格式中單引號需寫成 `'\''`
fn quote_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

/// 寫入磁碟的清單檔，離開作用域時自動刪除
#[derive(Debug)]
pub struct TransientManifest {
    path: PathBuf,
}

impl TransientManifest {
    pub fn create(path: PathBuf, manifest: &FileManifest) -> io::Result<Self> {
        if let Err(e) = fs::write(&path, manifest.render()) {
            discard_file(&path, "未寫完的清單檔");
            return Err(e);
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientManifest {
    fn drop(&mut self) {
        discard_file(&self.path, "清單檔");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(names: &[&str]) -> Vec<FileEntry> {
        names
            .iter()
            .map(|name| FileEntry {
                path: PathBuf::from(name),
                size: 1,
            })
            .collect()
    }

    #[test]
    fn test_render_two_lines_per_file() {
        let files = entries(&["10-00", "10-01", "10-02"]);
        let manifest = FileManifest::new(&files, FrameDuration::new(0.25).unwrap());
        let rendered = manifest.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec![
                "file '10-00'",
                "duration 0.25",
                "file '10-01'",
                "duration 0.25",
                "file '10-02'",
                "duration 0.25",
            ]
        );
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn test_render_escapes_single_quotes() {
        let files = entries(&["/cam/it's.jpg"]);
        let manifest = FileManifest::new(&files, FrameDuration::new(0.05).unwrap());
        assert_eq!(
            manifest.render(),
            "file '/cam/it'\\''s.jpg'\nduration 0.05\n"
        );
    }

    #[test]
    fn test_transient_manifest_removed_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("2025-12-21-0.25.txt");
        let manifest = FileManifest::new(&entries(&["a.jpg"]), FrameDuration::new(0.25).unwrap());

        let transient = TransientManifest::create(path.clone(), &manifest).unwrap();
        assert_eq!(
            fs::read_to_string(transient.path()).unwrap(),
            "file 'a.jpg'\nduration 0.25\n"
        );

        drop(transient);
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("manifest.txt");
        let manifest = FileManifest::new(&entries(&["a.jpg"]), FrameDuration::new(0.25).unwrap());

        assert!(TransientManifest::create(path.clone(), &manifest).is_err());
        assert!(!path.exists());
    }
}
