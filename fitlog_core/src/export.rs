//! CSV export of workout history.
//!
//! Writes one row per performed set (`sets.csv`) and one row per training
//! week (`weekly.csv`). Files are replaced atomically.

use crate::weekly::weekly_summaries;
use crate::{Error, Result, WorkoutLog};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A row in the per-set export
#[derive(Debug, serde::Serialize)]
struct SetRow<'a> {
    log_id: String,
    date: String,
    week: String,
    day: &'a str,
    workout_type: &'a str,
    exercise: &'a str,
    set_number: usize,
    reps: u32,
    weight: f64,
}

/// A row in the weekly export
#[derive(Debug, serde::Serialize)]
struct WeekRow {
    week_start: String,
    workouts: u32,
    volume: f64,
}

/// Paths written by [`export_history`]
#[derive(Debug)]
pub struct ExportPaths {
    pub sets: PathBuf,
    pub weekly: PathBuf,
}

/// Export every set and the weekly summary into `dir`
pub fn export_history(logs: &[WorkoutLog], dir: &Path) -> Result<ExportPaths> {
    std::fs::create_dir_all(dir)?;

    let sets = dir.join("sets.csv");
    let weekly = dir.join("weekly.csv");

    let set_count = write_sets_csv(logs, &sets)?;
    let week_count = write_weekly_csv(logs, &weekly)?;

    tracing::info!(
        "Exported {} sets and {} weeks to {:?}",
        set_count,
        week_count,
        dir
    );

    Ok(ExportPaths { sets, weekly })
}

/// Write one row per set; returns the number of rows
pub fn write_sets_csv(logs: &[WorkoutLog], path: &Path) -> Result<usize> {
    let mut rows = Vec::new();
    for log in logs {
        for exercise in &log.exercises {
            for (index, set) in exercise.sets.iter().enumerate() {
                rows.push(SetRow {
                    log_id: log.id.to_string(),
                    date: log.date.format("%Y-%m-%d").to_string(),
                    week: log.week.to_string(),
                    day: &log.day,
                    workout_type: &log.workout_type,
                    exercise: &exercise.name,
                    set_number: index + 1,
                    reps: set.reps,
                    weight: set.weight,
                });
            }
        }
    }
    write_rows(path, &rows)?;
    Ok(rows.len())
}

/// Write one row per training week; returns the number of rows
pub fn write_weekly_csv(logs: &[WorkoutLog], path: &Path) -> Result<usize> {
    let rows: Vec<WeekRow> = weekly_summaries(logs)
        .into_iter()
        .map(|week| WeekRow {
            week_start: week.week_start.format("%Y-%m-%d").to_string(),
            workouts: week.workout_count,
            volume: week.volume,
        })
        .collect();
    write_rows(path, &rows)?;
    Ok(rows.len())
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{:?} has no parent directory", path)))?;
    let temp = NamedTempFile::new_in(parent)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(temp.as_file());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    drop(writer);

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
