use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn report_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("expense-report"))
}

fn init_config(temp_dir: &TempDir) -> PathBuf {
    let config_path = temp_dir.path().join("expense-config");
    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
    config_path
}

#[test]
fn test_help() {
    report_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Customizable expense report builder",
        ));
}

#[test]
fn test_version() {
    report_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("expense-report"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("expense-config");

    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized expense-report config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("output").is_dir());
    assert!(config_path.join("data").is_dir());
    assert!(config_path.join("metrics").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("missing");

    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status_shows_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"))
        .stdout(predicate::str::contains("USD"))
        .stdout(predicate::str::contains("ER-10001"));
}

#[test]
fn test_row_add_and_list() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args([
            "-C", dir, "row", "add",
            "--date", "2026-02-03",
            "--description", "Team lunch",
            "--merchant", "Cafe Rio",
            "--amount", "42.75",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added row 4."));

    report_cmd()
        .args(["-C", dir, "row", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cafe Rio"))
        .stdout(predicate::str::contains("$42.75"))
        .stdout(predicate::str::contains("Total: $42.75"));
}

#[test]
fn test_row_set_rejects_bad_position() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    report_cmd()
        .args([
            "-C", config_path.to_str().unwrap(),
            "row", "set", "99", "--merchant", "Nowhere",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No expense row at position 99"));
}

#[test]
fn test_customize_color_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args(["-C", dir, "customize", "color", "header-background", "#112233"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated."));

    report_cmd()
        .args(["-C", dir, "customize", "color", "header-background", "purple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid color"));
}

#[test]
fn test_customize_persists_across_invocations() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args(["-C", dir, "customize", "label", "total", "SUM"])
        .assert()
        .success();

    report_cmd()
        .args(["-C", dir, "settings", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": \"SUM\""));
}

#[test]
fn test_number_increments_with_auto_increment() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args(["-C", dir, "number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ER-10001"));

    report_cmd()
        .args(["-C", dir, "number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ER-10002"));
}

#[test]
fn test_settings_roundtrip_and_reset() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args(["-C", dir, "customize", "header-style", "modern"])
        .assert()
        .success();

    let exported = report_cmd()
        .args(["-C", dir, "settings", "export"])
        .output()
        .unwrap();
    let settings_file = temp_dir.path().join("settings.json");
    fs::write(&settings_file, &exported.stdout).unwrap();

    report_cmd()
        .args(["-C", dir, "settings", "reset"])
        .assert()
        .success();

    report_cmd()
        .args(["-C", dir, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"));

    report_cmd()
        .args(["-C", dir, "settings", "import", settings_file.to_str().unwrap()])
        .assert()
        .success();

    report_cmd()
        .args(["-C", dir, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Modern"));
}

#[test]
fn test_settings_import_rejects_bad_json() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    let bad_file = temp_dir.path().join("broken.json");
    fs::write(&bad_file, "{not json").unwrap();

    report_cmd()
        .args([
            "-C", config_path.to_str().unwrap(),
            "settings", "import", bad_file.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings file"));
}

#[test]
fn test_logo_rejects_non_image() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    let text_file = temp_dir.path().join("not-an-image.txt");
    fs::write(&text_file, "plain text").unwrap();

    report_cmd()
        .args([
            "-C", config_path.to_str().unwrap(),
            "logo", "set", text_file.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not look like a PNG or JPEG"));
}

#[test]
fn test_logo_remove_without_logo_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    report_cmd()
        .args(["-C", config_path.to_str().unwrap(), "logo", "remove"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No company logo is set"));
}

#[test]
fn test_export_writes_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    report_cmd()
        .args([
            "-C", dir, "row", "set", "1",
            "--date", "2026-02-03",
            "--description", "Flight",
            "--merchant", "Air Co",
            "--amount", "120.00",
        ])
        .assert()
        .success();

    let pdf_path = temp_dir.path().join("report.pdf");
    report_cmd()
        .args(["-C", dir, "export", "--output", pdf_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDF saved to"));

    let bytes = fs::read(&pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn test_export_default_name_lands_in_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let dir = config_path.to_str().unwrap();

    // Point the output dir inside the temp config so the test stays
    // self-contained.
    let config_file = config_path.join("config.toml");
    let content = fs::read_to_string(&config_file).unwrap();
    let output_dir = config_path.join("output");
    let content = content.replace(
        "output_dir = \"~/.expense-report/output\"",
        &format!("output_dir = \"{}\"", output_dir.display()),
    );
    fs::write(&config_file, content).unwrap();

    report_cmd()
        .args(["-C", dir, "export"])
        .assert()
        .success();

    let exported: Vec<_> = fs::read_dir(&output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("expense-report-") && name.ends_with(".pdf")
        })
        .collect();
    assert_eq!(exported.len(), 1);
}
