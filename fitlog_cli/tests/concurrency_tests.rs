//! Multi-process tests for fitlog.
//!
//! These tests verify that several processes can safely:
//! - Append to the workout and food logs (file locking)
//! - Remove food entries while others append
//! - Update the profile at the same time without losing changes

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("config.toml"), "").unwrap();
    dir
}

fn cli(dir: &Path, date: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitlog"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--date")
        .arg(date);
    cmd
}

fn count_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .expect("Failed to read log")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

#[test]
fn test_parallel_food_appends() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let dir = dir.clone();
            thread::spawn(move || {
                cli(&dir, "2024-06-10")
                    .args(["food", "add", "--name"])
                    .arg(format!("snack {}", i))
                    .args(["--calories", "100"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(count_lines(&dir.join("data/food/2024-06-10.jsonl")), 5);
}

#[test]
fn test_parallel_workouts_on_different_days() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();

    // Monday through Saturday all have a scheduled workout
    let dates = ["2024-06-10", "2024-06-11", "2024-06-12", "2024-06-13", "2024-06-14", "2024-06-15"];
    let handles: Vec<_> = dates
        .iter()
        .map(|date| {
            let dir = dir.clone();
            let date = date.to_string();
            thread::spawn(move || {
                cli(&dir, &date)
                    .args(["log", "--auto-complete"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(count_lines(&dir.join("data/workouts.jsonl")), 6);

    cli(&dir, "2024-06-15")
        .arg("streak")
        .assert()
        .success()
        .stdout(predicates::str::contains("Current streak: 6 days"));
}

#[test]
fn test_parallel_profile_updates_are_all_kept() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();

    let burners: Vec<_> = (0..4)
        .map(|_| {
            let dir = dir.clone();
            thread::spawn(move || {
                for _ in 0..3 {
                    cli(&dir, "2024-06-10")
                        .args(["burn", "10"])
                        .assert()
                        .success();
                }
            })
        })
        .collect();

    let settings_dir = dir.clone();
    let settings = thread::spawn(move || {
        cli(&settings_dir, "2024-06-10")
            .args(["settings", "set", "--weight", "170"])
            .assert()
            .success();
    });

    for _ in 0..3 {
        cli(&dir, "2024-06-10").arg("calories").assert().success();
    }

    for handle in burners {
        handle.join().expect("burner panicked");
    }
    settings.join().expect("settings writer panicked");

    let contents = std::fs::read_to_string(dir.join("data/profile.json")).unwrap();
    let profile: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(profile["settings"]["weight"], 170.0);
    assert_eq!(profile["burned"]["2024-06-10"], 120.0);
}

#[test]
fn test_food_removal_racing_appends() {
    let temp_dir = setup_test_dir();
    let dir: PathBuf = temp_dir.path().to_path_buf();
    let food_log = dir.join("data/food/2024-06-10.jsonl");

    for i in 0..5 {
        cli(&dir, "2024-06-10")
            .args(["food", "add", "--name"])
            .arg(format!("old {}", i))
            .args(["--calories", "50"])
            .assert()
            .success();
    }
    let ids: Vec<String> = std::fs::read_to_string(&food_log)
        .unwrap()
        .lines()
        .map(|l| {
            let entry: serde_json::Value = serde_json::from_str(l).unwrap();
            entry["id"].as_str().unwrap().to_string()
        })
        .collect();

    let remover_dir = dir.clone();
    let remover = thread::spawn(move || {
        for id in ids {
            cli(&remover_dir, "2024-06-10")
                .args(["food", "remove"])
                .arg(id)
                .assert()
                .success();
        }
    });

    let appenders: Vec<_> = (0..5)
        .map(|i| {
            let dir = dir.clone();
            thread::spawn(move || {
                cli(&dir, "2024-06-10")
                    .args(["food", "add", "--name"])
                    .arg(format!("new {}", i))
                    .args(["--calories", "100"])
                    .assert()
                    .success();
            })
        })
        .collect();

    remover.join().expect("remover panicked");
    for handle in appenders {
        handle.join().expect("appender panicked");
    }

    let contents = std::fs::read_to_string(&food_log).unwrap();
    assert_eq!(count_lines(&food_log), 5);
    assert!(!contents.contains("old "));
}
