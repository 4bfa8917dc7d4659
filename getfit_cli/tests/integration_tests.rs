//! Integration tests for the getfit binary.
//!
//! These tests verify end-to-end behavior including:
//! - Sign-up, bio-data and goal range persistence
//! - Menu logging and dining points
//! - Daily check-in
//! - Workout recommendations and custom workouts

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with a dining menu
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let menus = temp_dir.path().join("menus");
    fs::create_dir_all(&menus).unwrap();
    fs::write(
        menus.join("centers.json"),
        r#"[{"name": "Seasons Marketplace", "slug": "seasons"},
            {"name": "Union Drive Community Center", "slug": "udcc"}]"#,
    )
    .unwrap();
    fs::write(
        menus.join("seasons.json"),
        r#"[{"name": "Pasta Bowl", "totalCal": 900},
            {"name": "Salad", "totalCal": 350}]"#,
    )
    .unwrap();
    temp_dir
}

/// Helper to get the CLI binary, isolated from the user's real config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("getfit").expect("Failed to find getfit binary");
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ada@example.edu");
    cmd
}

fn sign_up(data_dir: &Path) {
    cli(data_dir)
        .args(["signup", "--name", "Ada", "--email", "ada@example.edu"])
        .assert()
        .success();
}

fn biodata(data_dir: &Path, weight: &str, target: &str, intensity: &str) {
    cli(data_dir)
        .args([
            "biodata",
            "--weight",
            weight,
            "--height",
            "175",
            "--target-weight",
            target,
            "--intensity",
            intensity,
        ])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("getfit")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fitness and dining tracker"));
}

#[test]
fn test_signup_creates_profile() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["signup", "--name", "Ada", "--email", "ada@example.edu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Ada"));

    assert!(data_dir.join("profiles/ada_40example.edu.json").exists());
}

#[test]
fn test_biodata_computes_goal_range() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);

    cli(data_dir)
        .args([
            "biodata",
            "--weight",
            "70",
            "--height",
            "175",
            "--target-weight",
            "65",
            "--intensity",
            "Medium",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1848 - 2259"));

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal Range: 1848 - 2259"));

    let raw = fs::read_to_string(data_dir.join("stats/ada_40example.edu.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["calorieGoalLower"], 1848);
    assert_eq!(record["calorieGoalUpper"], 2259);
}

#[test]
fn test_eat_accumulates_calories() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);

    cli(data_dir)
        .args(["eat", "seasons", "Pasta Bowl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Calories: 900"));

    cli(data_dir)
        .args(["eat", "seasons", "salad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Calories: 1250"));
}

#[test]
fn test_dining_awards_points_within_range() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);
    biodata(data_dir, "70", "65", "Moderate");

    cli(data_dir)
        .arg("dining")
        .assert()
        .success()
        .stdout(predicate::str::contains("no points awarded"));

    for item in ["Pasta Bowl", "Pasta Bowl", "Salad"] {
        cli(data_dir).args(["eat", "seasons", item]).assert().success();
    }

    cli(data_dir)
        .arg("dining")
        .assert()
        .success()
        .stdout(predicate::str::contains("+30 points"));

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 30"));
}

#[test]
fn test_check_in_once_per_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);

    cli(data_dir)
        .arg("check-in")
        .assert()
        .success()
        .stdout(predicate::str::contains("earned 20 points"));

    cli(data_dir)
        .arg("check-in")
        .assert()
        .success()
        .stdout(predicate::str::contains("already checked in"));

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in today: yes"));
}

#[test]
fn test_workouts_follow_profile() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);
    biodata(data_dir, "60", "70", "Beginner");

    cli(data_dir)
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bodyweight Squat"))
        .stdout(predicate::str::contains("Strength"))
        .stdout(predicate::str::contains("Cardio").not());
}

#[test]
fn test_custom_workout_is_listed() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);
    biodata(data_dir, "80", "75", "Hard-core");

    cli(data_dir)
        .args([
            "add-workout",
            "--name",
            "Hill Repeats",
            "--muscle-group",
            "Legs",
            "--type",
            "Cardio",
            "--sets",
            "6",
            "--reps",
            "AMRAP",
            "--difficulty",
            "Hard",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added workout #13"));

    assert!(data_dir.join("exercises.csv").exists());

    cli(data_dir)
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hill Repeats"))
        .stdout(predicate::str::contains("AMRAP"));
}

#[test]
fn test_settings_keep_height() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);
    biodata(data_dir, "70", "65", "Low");

    cli(data_dir)
        .args([
            "settings",
            "--name",
            "Ada L.",
            "--weight",
            "68",
            "--target-weight",
            "65",
            "--intensity",
            "Hard-core",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Height: 175 cm"))
        .stdout(predicate::str::contains("Intensity: Hard-core"));
}

#[test]
fn test_reset_points() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    sign_up(data_dir);

    cli(data_dir).arg("check-in").assert().success();
    cli(data_dir).args(["reset", "points"]).assert().success();

    cli(data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 0"))
        .stdout(predicate::str::contains("Checked in today: no"));
}

#[test]
fn test_centers_and_menu_listing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("centers")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seasons Marketplace (seasons)"));

    cli(data_dir)
        .args(["menu", "seasons"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pasta Bowl"));
}
