use std::fs;
use std::process::Command;

fn csvreport() -> Command {
    Command::new(env!("CARGO_BIN_EXE_csvreport"))
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = csvreport()
        .current_dir(dir.path())
        .arg("--quiet")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File data.csv not found!"));
    assert!(!dir.path().join("report.pdf").exists());
}

#[test]
fn default_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("data.csv"),
        "name,age,salary\nAnna,31,4200.5\nBoris,45,5100\nVera,28,3900.25\n",
    )
    .unwrap();
    let output = csvreport().current_dir(dir.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("completed successfully"));
    let pdf = fs::read(dir.path().join("report.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn explicit_paths() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    let report = dir.path().join("out.pdf");
    fs::write(&input, "region,total\nnorth,10\nsouth,\n").unwrap();
    let output = csvreport()
        .arg("-i")
        .arg(&input)
        .arg("--output")
        .arg(&report)
        .arg("--font-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(report.is_file());
}

#[test]
fn malformed_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.csv"), "a,b\n1,2,3\n").unwrap();
    let output = csvreport().current_dir(dir.path()).output().unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("An error occurred"));
    assert!(!dir.path().join("report.pdf").exists());
}
