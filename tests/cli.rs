use std::process::Command;

use keygrid::board::MemoryBoard;

const LAYOUT: &str = r#"[["Q", "W", "E"], [{"y": 0.25}, "A", {"w": 2}, "S"]]"#;

fn write_layout(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("layout.json");
    std::fs::write(&path, LAYOUT).unwrap();
    path
}

#[test]
fn dry_run_prints_mapping_and_writes_nothing() {
    let exe = env!("CARGO_BIN_EXE_keygrid");
    let temp = tempfile::tempdir().unwrap();
    let layout = write_layout(temp.path());

    let output = Command::new(exe)
        .current_dir(temp.path())
        .arg(layout.to_str().unwrap())
        .output()
        .expect("run keygrid");
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 = Q"));
    assert!(stdout.contains("2 = W"));
    assert!(stdout.contains("17 = A"));
    assert!(stdout.contains("Dry run"));
    assert!(!temp.path().join("board.out.json").exists());
}

#[test]
fn commit_writes_a_routed_board_model() {
    let exe = env!("CARGO_BIN_EXE_keygrid");
    let temp = tempfile::tempdir().unwrap();
    let layout = write_layout(temp.path());
    let out = temp.path().join("board.out.json");

    let output = Command::new(exe)
        .current_dir(temp.path())
        .args([
            layout.to_str().unwrap(),
            "--commit",
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("run keygrid");
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let board = MemoryBoard::from_json_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(!board.tracks.is_empty());
    assert!(!board.vias.is_empty());
}

#[test]
fn malformed_spacing_directive_fails_the_run() {
    let exe = env!("CARGO_BIN_EXE_keygrid");
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("layout.json");
    std::fs::write(&path, r#"[["Q", {}]]"#).unwrap();

    let output = Command::new(exe)
        .current_dir(temp.path())
        .arg(path.to_str().unwrap())
        .output()
        .expect("run keygrid");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("spacing directive"), "stderr: {stderr}");
}
