//! File-backed persistence for workout logs and food entries.
//!
//! Records are stored as JSONL (JSON Lines). Every access holds the
//! data file's sidecar lock (see [`crate::lock`]): shared for reads,
//! exclusive for appends and removals. Removals rewrite the file atomically
//! through a temp file. Lines that fail to parse are skipped with a warning.
//!
//! Layout under the data directory:
//! - `workouts.jsonl`
//! - `food/YYYY-MM-DD.jsonl`
//! - a `.lock` sidecar next to each of them

use crate::lock::FileLock;
use crate::{Error, FoodEntry, Result, WorkoutLog};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Persistence for the workout history
pub trait WorkoutStore {
    fn load_logs(&self) -> Result<Vec<WorkoutLog>>;

    fn append_log(&mut self, log: &WorkoutLog) -> Result<()>;

    /// Returns whether a log was removed
    fn remove_log(&mut self, id: Uuid) -> Result<bool>;
}

/// Persistence for per-day food ledgers
pub trait FoodStore {
    fn load_food_entries(&self, date: NaiveDate) -> Result<Vec<FoodEntry>>;

    fn append_food_entry(&mut self, date: NaiveDate, entry: &FoodEntry) -> Result<()>;

    /// Returns whether an entry was removed
    fn remove_food_entry(&mut self, date: NaiveDate, id: Uuid) -> Result<bool>;
}

/// JSONL store rooted at a data directory
pub struct JsonlStore {
    root: PathBuf,
}

impl JsonlStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn workouts_path(&self) -> PathBuf {
        self.root.join("workouts.jsonl")
    }

    pub fn food_path(&self, date: NaiveDate) -> PathBuf {
        self.root
            .join("food")
            .join(format!("{}.jsonl", date.format("%Y-%m-%d")))
    }
}

impl WorkoutStore for JsonlStore {
    fn load_logs(&self) -> Result<Vec<WorkoutLog>> {
        read_records(&self.workouts_path())
    }

    fn append_log(&mut self, log: &WorkoutLog) -> Result<()> {
        append_record(&self.workouts_path(), log)?;
        tracing::debug!("Appended workout {} ({})", log.id, log.date);
        Ok(())
    }

    fn remove_log(&mut self, id: Uuid) -> Result<bool> {
        retain_records(&self.workouts_path(), |log: &WorkoutLog| log.id != id)
    }
}

impl FoodStore for JsonlStore {
    fn load_food_entries(&self, date: NaiveDate) -> Result<Vec<FoodEntry>> {
        read_records(&self.food_path(date))
    }

    fn append_food_entry(&mut self, date: NaiveDate, entry: &FoodEntry) -> Result<()> {
        append_record(&self.food_path(date), entry)?;
        tracing::debug!("Appended food entry {} for {}", entry.id, date);
        Ok(())
    }

    fn remove_food_entry(&mut self, date: NaiveDate, id: Uuid) -> Result<bool> {
        retain_records(&self.food_path(date), |entry: &FoodEntry| entry.id != id)
    }
}

/// Append one record as a JSON line
///
/// The data file is opened only after the lock is held, so the handle always
/// refers to the file currently linked at `path`.
fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let line = serde_json::to_string(record)?;
    let _lock = FileLock::exclusive(path)?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = std::io::BufWriter::new(&file);
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read all records from a JSONL file; a missing file is empty
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let _lock = FileLock::shared(path)?;
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let records = parse_lines(&file, path)?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

fn parse_lines<T: DeserializeOwned>(file: &File, path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping unreadable record at {:?}:{}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    Ok(records)
}

/// Rewrite the file keeping only records matching `keep`
///
/// The exclusive lock spans the read and the rename, so appends either land
/// before the rewrite reads the file or after the new file is in place.
/// Unreadable lines are dropped by the rewrite.
fn retain_records<T, F>(path: &Path, keep: F) -> Result<bool>
where
    T: Serialize + DeserializeOwned,
    F: Fn(&T) -> bool,
{
    if !path.exists() {
        return Ok(false);
    }

    let _lock = FileLock::exclusive(path)?;
    let records: Vec<T> = match File::open(path) {
        Ok(file) => parse_lines(&file, path)?,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let before = records.len();
    let kept: Vec<T> = records.into_iter().filter(|r| keep(r)).collect();
    if kept.len() == before {
        return Ok(false);
    }

    replace_contents(path, &kept)?;
    tracing::info!("Removed {} record(s) from {:?}", before - kept.len(), path);
    Ok(true)
}

/// Write `records` to a temp file beside `path` and rename it over `path`
fn replace_contents<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{:?} has no parent directory", path)))?;
    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for record in records {
            writer.write_all(serde_json::to_string(record)?.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletedExercise, CompletedSet, FoodInfo, WeekLabel};

    fn create_test_log(date: NaiveDate) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            date,
            week: WeekLabel::B,
            day: "Tuesday".into(),
            workout_type: "Upper Body Strength".into(),
            exercises: vec![CompletedExercise {
                name: "T-Bar Rows".into(),
                sets: vec![CompletedSet {
                    reps: 10,
                    weight: 90.0,
                }],
            }],
        }
    }

    fn create_test_entry(name: &str) -> FoodEntry {
        FoodEntry::from_info(FoodInfo {
            name: name.into(),
            calories: 100.0,
            protein: 5.0,
            carbs: 10.0,
            fat: 2.0,
        })
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_append_and_load_logs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());

        let log = create_test_log(date(11));
        store.append_log(&log).unwrap();
        store.append_log(&create_test_log(date(12))).unwrap();

        let logs = store.load_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0], log);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(temp_dir.path().join("nothing"));

        assert!(store.load_logs().unwrap().is_empty());
        assert!(store.load_food_entries(date(1)).unwrap().is_empty());
    }

    #[test]
    fn test_remove_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());

        let keep = create_test_log(date(11));
        let drop = create_test_log(date(12));
        store.append_log(&keep).unwrap();
        store.append_log(&drop).unwrap();

        assert!(store.remove_log(drop.id).unwrap());
        assert!(!store.remove_log(drop.id).unwrap());
        assert_eq!(store.load_logs().unwrap(), vec![keep]);
    }

    #[test]
    fn test_corrupted_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());
        store.append_log(&create_test_log(date(11))).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(store.workouts_path())
            .unwrap();
        writeln!(file, "{{ not json").unwrap();
        drop(file);
        store.append_log(&create_test_log(date(12))).unwrap();

        assert_eq!(store.load_logs().unwrap().len(), 2);
    }

    #[test]
    fn test_food_entries_are_kept_per_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());

        let oats = create_test_entry("oats");
        store.append_food_entry(date(10), &oats).unwrap();
        store
            .append_food_entry(date(11), &create_test_entry("rice"))
            .unwrap();

        assert_eq!(store.load_food_entries(date(10)).unwrap(), vec![oats.clone()]);
        assert_eq!(store.load_food_entries(date(11)).unwrap().len(), 1);
        assert!(store.food_path(date(10)).ends_with("food/2024-06-10.jsonl"));

        assert!(store.remove_food_entry(date(10), oats.id).unwrap());
        assert!(store.load_food_entries(date(10)).unwrap().is_empty());
    }

    #[test]
    fn test_removals_racing_appends_keep_new_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().to_path_buf();
        let day = date(10);

        let seeded: Vec<FoodEntry> = (0..20)
            .map(|i| create_test_entry(&format!("old {}", i)))
            .collect();
        let mut store = JsonlStore::new(&root);
        for entry in &seeded {
            store.append_food_entry(day, entry).unwrap();
        }

        let remover = {
            let root = root.clone();
            let ids: Vec<Uuid> = seeded.iter().map(|e| e.id).collect();
            std::thread::spawn(move || {
                let mut store = JsonlStore::new(root);
                for id in ids {
                    assert!(store.remove_food_entry(day, id).unwrap());
                }
            })
        };

        let appended: Vec<FoodEntry> = (0..20)
            .map(|i| create_test_entry(&format!("new {}", i)))
            .collect();
        let appender = {
            let root = root.clone();
            let appended = appended.clone();
            std::thread::spawn(move || {
                let mut store = JsonlStore::new(root);
                for entry in &appended {
                    store.append_food_entry(day, entry).unwrap();
                }
            })
        };

        remover.join().unwrap();
        appender.join().unwrap();

        let mut remaining: Vec<Uuid> = store
            .load_food_entries(day)
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        let mut expected: Vec<Uuid> = appended.iter().map(|e| e.id).collect();
        remaining.sort();
        expected.sort();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn test_locks_live_in_sidecar_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());
        let log = create_test_log(date(11));
        store.append_log(&log).unwrap();
        store.remove_log(log.id).unwrap();

        assert!(crate::lock::lock_path(&store.workouts_path()).exists());
        assert!(store.load_logs().unwrap().is_empty());
    }

    #[test]
    fn test_remove_from_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(temp_dir.path());
        assert!(!store.remove_food_entry(date(10), Uuid::new_v4()).unwrap());
    }
}
