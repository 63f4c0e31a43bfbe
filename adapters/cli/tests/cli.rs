use std::{path::PathBuf, process::Command};

fn crypt() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/crypt.toml")
}

fn dungeon_vision(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dungeon-vision"))
        .arg("--scenario")
        .arg(crypt())
        .args(args)
        .output()
        .expect("failed to invoke dungeon-vision binary")
}

#[test]
fn crypt_scenario_renders_rogue_view() {
    let output = dungeon_vision(&[]);

    assert!(output.status.success(), "dungeon-vision should succeed");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert_eq!(
        stdout,
        "rogue at 1,1: 29 of 45 tiles fogged\n\
         ####\n\
         #@..#\n\
         #.,\n\
         #..\n\
         \x20#\n"
    );
}

#[test]
fn command_line_overrides_scenario_choices() {
    let output = dungeon_vision(&["--profession", "Hunter", "--origin", "5,1"]);

    assert!(output.status.success(), "dungeon-vision should succeed");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.starts_with("hunter at 5,1: "), "unexpected header: {stdout}");
}

#[test]
fn out_of_range_level_is_rejected() {
    let output = dungeon_vision(&["--level", "4000000000"]);

    assert!(!output.status.success());
    let zero = dungeon_vision(&["--level", "0"]);
    assert!(!zero.status.success());
}

#[test]
fn unknown_profession_is_rejected() {
    let output = dungeon_vision(&["--profession", "bard"]);

    assert!(!output.status.success());
}

#[test]
fn missing_scenario_fails_with_context() {
    let output = Command::new(env!("CARGO_BIN_EXE_dungeon-vision"))
        .args(["--scenario", "does/not/exist.toml"])
        .output()
        .expect("failed to invoke dungeon-vision binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"), "unexpected stderr: {stderr}");
}
