use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "starport-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_upgrades_writes_output() {
    let exe = env!("CARGO_BIN_EXE_starport-cli");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-upgrades", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    assert!(content.contains("Station upgrades"));
    assert!(content.contains("extraDock"));
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_json_report_covers_every_seed() {
    let exe = env!("CARGO_BIN_EXE_starport-cli");
    let output_path = temp_path("json");
    let output = Command::new(exe)
        .args([
            "--seeds",
            "1,2",
            "--duration",
            "60",
            "--policy",
            "cheapest",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Starport Forever Station Runner"));
    let content = std::fs::read_to_string(&output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let runs = parsed["runs"].as_array().expect("runs array");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[1]["seed"], 2);
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_rejects_bad_seed() {
    let exe = env!("CARGO_BIN_EXE_starport-cli");
    let output = Command::new(exe)
        .args(["--seeds", "not-a-seed", "--duration", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}

#[test]
fn cli_save_dir_resumes_with_offline_gains() {
    let exe = env!("CARGO_BIN_EXE_starport-cli");
    let save_dir = temp_path("saves");
    let run = |away: &str| {
        Command::new(exe)
            .args([
                "--seeds",
                "9",
                "--duration",
                "30",
                "--policy",
                "idle",
                "--report",
                "markdown",
                "--away-secs",
                away,
                "--save-dir",
            ])
            .arg(&save_dir)
            .output()
            .expect("run cli")
    };
    assert!(run("0").status.success());
    assert!(save_dir.join("seed-9").join("starport_save.json").exists());
    let resumed = run("3600");
    assert!(resumed.status.success());
    let stdout = String::from_utf8_lossy(&resumed.stdout);
    assert!(stdout.contains("# Starport Station Runs"));
    assert!(stdout.contains("**Offline gains**:"));
    assert!(!stdout.contains("**Offline gains**: 0\n"));
    let _ = std::fs::remove_dir_all(save_dir);
}
