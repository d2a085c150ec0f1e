//! User profile persistence.
//!
//! The profile holds the user's settings and the calories burned through
//! exercise on each day. It lives in `profile.json`, guarded by the
//! `profile.json.lock` sidecar.

use crate::lock::FileLock;
use crate::{Error, Result, UserSettings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tempfile::NamedTempFile;

/// Persistent per-user state
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// `None` until the user first saves their settings
    #[serde(default)]
    pub settings: Option<UserSettings>,
    #[serde(default)]
    pub burned: BTreeMap<NaiveDate, f64>,
}

impl Profile {
    /// Stored settings, or the defaults if none were saved
    pub fn settings_or_default(&self) -> UserSettings {
        self.settings.clone().unwrap_or_default()
    }

    pub fn burned_on(&self, date: NaiveDate) -> f64 {
        self.burned.get(&date).copied().unwrap_or(0.0)
    }

    /// Add burned calories for a day; non-positive amounts are ignored
    pub fn record_burn(&mut self, date: NaiveDate, amount: f64) -> f64 {
        let total = crate::nutrition::record_burn(self.burned_on(date), amount);
        if total > 0.0 {
            self.burned.insert(date, total);
        }
        total
    }

    /// Read the profile under a shared lock
    ///
    /// A missing file means no profile yet. An unreadable or corrupted file is
    /// reported and replaced by the defaults, so the next save repairs it.
    pub fn load(path: &Path) -> Result<Self> {
        let _lock = FileLock::shared(path)?;
        Ok(read_profile(path))
    }

    /// Write the profile under an exclusive lock
    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = FileLock::exclusive(path)?;
        write_profile(self, path)
    }

    /// Load, modify and save back as one locked step
    ///
    /// Concurrent updates are serialized; none of them is lost.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Profile) -> Result<()>,
    {
        let _lock = FileLock::exclusive(path)?;
        let mut profile = read_profile(path);
        f(&mut profile)?;
        write_profile(&profile, path)?;
        Ok(profile)
    }
}

fn read_profile(path: &Path) -> Profile {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No profile at {:?} yet", path);
            return Profile::default();
        }
        Err(e) => {
            tracing::warn!("Profile {:?} is unreadable ({}), starting fresh", path, e);
            return Profile::default();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!("Profile {:?} is corrupted ({}), starting fresh", path, e);
        Profile::default()
    })
}

/// Replace the file through a synced temp file so readers never see a partial write
fn write_profile(profile: &Profile, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{:?} has no parent directory", path)))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, profile)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!(
        "Wrote profile to {:?} ({} burn days)",
        path,
        profile.burned.len()
    );
    Ok(())
}
