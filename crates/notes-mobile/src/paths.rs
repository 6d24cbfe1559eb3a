//! Mobile filesystem path helpers.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DATA_DIR_ENV: &str = "NOTES_DATA_DIR";
const APP_DIR_NAME: &str = "notes";

static NOTES_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Shared writable app data directory, resolved once per process.
#[must_use]
pub fn notes_data_dir() -> PathBuf {
    NOTES_DATA_DIR
        .get_or_init(|| {
            let selected = first_writable(candidate_base_dirs())
                .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME));
            tracing::info!("Resolved mobile data directory: {}", selected.display());
            selected
        })
        .clone()
}

/// The first `<base>/notes` that can be created and written to.
pub fn first_writable(bases: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    bases
        .into_iter()
        .map(|base| base.join(APP_DIR_NAME))
        .find(|candidate| ensure_writable_dir(candidate))
}

fn candidate_base_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from) {
        candidates.push(path);
    }
    // App-private storage on Android; HOME points at the package files dir.
    if let Some(path) = std::env::var_os("HOME").map(PathBuf::from) {
        candidates.push(path);
    }
    if let Some(path) = dirs::data_local_dir() {
        candidates.push(path);
    }
    if let Some(path) = dirs::data_dir() {
        candidates.push(path);
    }
    if let Some(path) = std::env::var_os("TMPDIR").map(PathBuf::from) {
        candidates.push(path);
    }
    candidates.push(std::env::temp_dir());
    candidates
}

fn ensure_writable_dir(path: &Path) -> bool {
    if std::fs::create_dir_all(path).is_err() {
        return false;
    }

    let test_file = path.join(".notes-write-test");
    let Ok(mut file) = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&test_file)
    else {
        return false;
    };

    let writable = file.write_all(b"ok").is_ok();
    let _ = std::fs::remove_file(&test_file);
    writable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_writable_base() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "not a directory").unwrap();

        let selected = first_writable([blocked, dir.path().to_path_buf()]).unwrap();
        assert_eq!(selected, dir.path().join("notes"));
        assert!(selected.is_dir());
        assert!(!selected.join(".notes-write-test").exists());
    }

    #[test]
    fn no_writable_base_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("file");
        std::fs::write(&blocked, "x").unwrap();
        assert_eq!(first_writable([blocked]), None);
    }
}
