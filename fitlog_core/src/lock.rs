//! Advisory locks on sidecar files.
//!
//! Data files are replaced by rename when rewritten, so a lock taken on the
//! data file itself would be held on an inode that is no longer linked.
//! Every reader and writer locks `<file>.lock` instead; that file is created
//! on first use and never renamed or removed.

use crate::Result;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Held lock on the sidecar of a data file; released on drop
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Block until no other holder has the lock
    pub fn exclusive(data_path: &Path) -> Result<Self> {
        let file = open_sidecar(data_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// Block until no exclusive holder has the lock
    pub fn shared(data_path: &Path) -> Result<Self> {
        let file = open_sidecar(data_path)?;
        file.lock_shared()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release lock: {}", e);
        }
    }
}

/// `workouts.jsonl` -> `workouts.jsonl.lock`
pub fn lock_path(data_path: &Path) -> PathBuf {
    let mut name: OsString = data_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn open_sidecar(data_path: &Path) -> Result<File> {
    if let Some(parent) = data_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path(data_path))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("/data/food/2024-06-10.jsonl")),
            PathBuf::from("/data/food/2024-06-10.jsonl.lock")
        );
    }

    #[test]
    fn test_sidecar_created_with_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data = temp_dir.path().join("nested/workouts.jsonl");

        let _lock = FileLock::shared(&data).unwrap();
        assert!(lock_path(&data).exists());
        assert!(!data.exists());
    }

    #[test]
    fn test_exclusive_lock_blocks_second_holder() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data = temp_dir.path().join("profile.json");
        let held = FileLock::exclusive(&data).unwrap();

        let acquired = Arc::new(AtomicBool::new(false));
        let waiter = {
            let data = data.clone();
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                let _lock = FileLock::exclusive(&data).unwrap();
                acquired.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(100));
        assert!(!acquired.load(Ordering::SeqCst));

        drop(held);
        waiter.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
    }
}
