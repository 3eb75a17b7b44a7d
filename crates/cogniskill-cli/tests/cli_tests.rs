//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ALL_ARTIFACTS: [&str; 6] = [
    "enhanced_student_data.json",
    "enhanced_student_data.csv",
    "dashboard_summary.json",
    "model_data.json",
    "persona_data.json",
    "analysis_summary.json",
];

fn cogniskill() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("cogniskill").unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn run_writes_every_artifact() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote:"));

    for name in ALL_ARTIFACTS {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
}

#[test]
fn no_subcommand_runs_pipeline() {
    let dir = TempDir::new().unwrap();

    cogniskill().current_dir(dir.path()).assert().success();

    assert!(dir.path().join("persona_data.json").exists());
}

#[test]
fn default_run_has_200_sequential_ids() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .args(["run", "--seed", "42"])
        .assert()
        .success();

    let records = read_json(&dir.path().join("enhanced_student_data.json"));
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 200);
    assert_eq!(records[0]["student_id"], "STU001");
    assert_eq!(records[199]["student_id"], "STU200");

    let summary = read_json(&dir.path().join("dashboard_summary.json"));
    assert_eq!(summary["total_students"], 200);
    let class_total: u64 = summary["class_distribution"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(class_total, 200);
    assert_eq!(
        summary["top_performing_students"].as_array().unwrap().len(),
        10
    );
}

#[test]
fn same_seed_gives_identical_files() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    for dir in [&a, &b] {
        cogniskill()
            .current_dir(dir.path())
            .args(["run", "--students", "80", "--seed", "7"])
            .assert()
            .success();
    }

    for name in ALL_ARTIFACTS {
        let left = std::fs::read(a.path().join(name)).unwrap();
        let right = std::fs::read(b.path().join(name)).unwrap();
        assert_eq!(left, right, "{name} differs between runs");
    }
}

#[test]
fn different_seeds_differ() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    for (dir, seed) in [(&a, "1"), (&b, "2")] {
        cogniskill()
            .current_dir(dir.path())
            .args(["generate", "--students", "30", "--seed", seed])
            .assert()
            .success();
    }

    let left = std::fs::read(a.path().join("enhanced_student_data.json")).unwrap();
    let right = std::fs::read(b.path().join("enhanced_student_data.json")).unwrap();
    assert_ne!(left, right);
}

#[test]
fn generate_writes_dataset_only() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    cogniskill()
        .current_dir(dir.path())
        .arg("generate")
        .arg("--students")
        .arg("25")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("enhanced_student_data.json").exists());
    assert!(out.join("enhanced_student_data.csv").exists());
    assert!(out.join("dashboard_summary.json").exists());
    assert!(!out.join("model_data.json").exists());
    assert!(!out.join("persona_data.json").exists());

    let csv = std::fs::read_to_string(out.join("enhanced_student_data.csv")).unwrap();
    assert_eq!(csv.lines().count(), 26);
    assert!(csv.starts_with("student_id,name,class,age,"));
}

#[test]
fn model_and_personas_have_expected_shape() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .args(["run", "--students", "100"])
        .assert()
        .success();

    let model = read_json(&dir.path().join("model_data.json"));
    assert_eq!(model["feature_names"].as_array().unwrap().len(), 5);
    assert_eq!(model["coefficients"].as_object().unwrap().len(), 5);
    assert!(model["mae"].as_f64().unwrap() > 0.0);

    let personas = read_json(&dir.path().join("persona_data.json"));
    let personas = personas.as_object().unwrap();
    assert_eq!(personas.len(), 4);
    let total: u64 = personas
        .values()
        .map(|p| p["student_count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 100);
}

#[test]
fn run_rejects_zero_students() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .args(["run", "--students", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("invalid configuration"));

    assert!(!dir.path().join("enhanced_student_data.json").exists());
}

#[test]
fn run_with_too_few_students_fails() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .args(["run", "--students", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient data"));
}

#[test]
fn bad_weights_fail_validation() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(
        &config,
        r#"
[[classes]]
name = "9A"
weight = 0.7

[[classes]]
name = "10A"
weight = 0.7
"#,
    )
    .unwrap();

    cogniskill()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("sum to 1"));
}

#[test]
fn validate_missing_config_file() {
    cogniskill()
        .arg("validate")
        .arg("--config")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn validate_defaults() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config valid: 200 students"));
}

#[test]
fn config_file_is_picked_up_and_flags_override_it() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cogniskill.toml"), "students = 30\nseed = 5\n").unwrap();

    cogniskill()
        .current_dir(dir.path())
        .args(["generate", "--students", "20"])
        .assert()
        .success();

    let summary = read_json(&dir.path().join("dashboard_summary.json"));
    assert_eq!(summary["total_students"], 20);
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    cogniskill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created cogniskill.toml"));

    assert!(dir.path().join("cogniskill.toml").exists());

    // The starter config must itself be valid.
    cogniskill()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cogniskill.toml"), "students = 10\n").unwrap();

    cogniskill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(dir.path().join("cogniskill.toml")).unwrap();
    assert_eq!(content, "students = 10\n");
}

#[test]
fn help_lists_subcommands() {
    cogniskill()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("init"));
}
