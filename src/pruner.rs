use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: usize,
    pub bytes: u64,
    pub failures: usize,
}

impl PruneReport {
    pub fn kilobytes(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Every file under `root` whose extension is `ext` (case-insensitive).
/// Unreadable directories are logged and skipped.
pub fn find_targets(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read {}: {}", dir.display(), e);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            match entry.file_type() {
                Ok(t) if t.is_dir() => pending.push(path),
                Ok(t) if t.is_file() && has_extension(&path, ext) => found.push(path),
                _ => {}
            }
        }
    }

    found.sort();
    found
}

/// Permanently delete every `ext` file under `root`; everything else is left alone.
pub fn prune(root: &Path, ext: &str) -> PruneReport {
    let mut report = PruneReport::default();
    println!("Scanning for {} files in: {}", ext.to_uppercase(), root.display());

    for path in find_targets(root, ext) {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(&path) {
            Ok(()) => {
                report.deleted += 1;
                report.bytes += size;
                println!("Deleted: {} ({} bytes)", path.display(), size);
            }
            Err(e) => {
                report.failures += 1;
                log::error!("Error deleting {}: {}", path.display(), e);
            }
        }
    }

    report
}

/// Extension test shared with the relocator; case is ignored.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/Apple.wav"), "wav"));
        assert!(has_extension(Path::new("a/Apple.WAV"), "wav"));
        assert!(!has_extension(Path::new("a/Apple.mp3"), "wav"));
        assert!(!has_extension(Path::new("a/wav"), "wav"));
    }

    #[test]
    fn test_find_targets_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("fruits").join("extra");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("top.wav"), "1").unwrap();
        fs::write(nested.join("deep.Wav"), "22").unwrap();
        fs::write(nested.join("keep.mp3"), "333").unwrap();

        let targets = find_targets(dir.path(), "wav");
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|p| has_extension(p, "wav")));
    }
}
