//! End-to-end tests of the `lotc` binary. None of them reach the network
//! or need ffmpeg installed: each fails (or finishes) before an external
//! program would run.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use lotc::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// `lotc` running in `dir` with no user configuration in reach
fn lotc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lotc").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    lotc(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("trim"))
        .stdout(predicate::str::contains("merge"));
}

#[test]
fn test_trim_without_timestamps_leaves_file_alone() {
    let dir = TempDir::new().unwrap();
    let video = dir.path().join("video.mp4");
    fs::write(&video, b"not really a video").unwrap();

    lotc(dir.path())
        .args(["trim", "video.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "There's no specified duration(s). The video.mp4 will not be trimmed.",
        ));

    assert_eq!(fs::read(&video).unwrap(), b"not really a video");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_trim_rejects_bad_output_extension() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("video.mp4"), b"x").unwrap();

    lotc(dir.path())
        .args(["trim", "video.mp4", "0:10-0:20", "-o", "out.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"out.mkv\" must be in \".mp4\" format!"));
}

#[test]
fn test_trim_missing_file() {
    let dir = TempDir::new().unwrap();

    lotc(dir.path())
        .args(["trim", "gone.mp4", "0:10-0:20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"gone.mp4\" could not be found!"));
}

#[test]
fn test_trim_rejects_reversed_range() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("video.mp4"), b"x").unwrap();

    lotc(dir.path())
        .args(["trim", "video.mp4", "0:45-0:30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be before end"));
}

#[test]
fn test_merge_rejects_bad_output_extension() {
    let dir = TempDir::new().unwrap();

    lotc(dir.path())
        .args(["merge", "a.mp4", "b.mp4", "--output", "ab.avi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be in \".mp4\" format!"));
}

#[test]
fn test_merge_missing_clip() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.mp4"), b"x").unwrap();

    lotc(dir.path())
        .args(["merge", "a.mp4", "b.mp4"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Merging these video clips:"))
        .stderr(predicate::str::contains("\"b.mp4\" could not be found!"));
}

#[test]
fn test_merge_requires_clips() {
    let dir = TempDir::new().unwrap();
    lotc(dir.path()).arg("merge").assert().failure();
}

#[test]
fn test_download_validates_before_fetching() {
    let dir = TempDir::new().unwrap();

    lotc(dir.path())
        .args(["download", "https://www.youtube.com/watch?v=jSRHpA2giUk", "-o", "clip.webm"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Downloading").not())
        .stderr(predicate::str::contains("\"clip.webm\" must be in \".mp4\" format!"));

    lotc(dir.path())
        .args(["download", "https://www.youtube.com/watch?v=jSRHpA2giUk", "1:00"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Downloading").not())
        .stderr(predicate::str::contains("START-END"));
}

#[test]
fn test_config_file_is_validated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lotc.toml"), "[lotc]\nfacebook_fallback = \"sometimes\"\n").unwrap();

    lotc(dir.path())
        .args(["trim", "video.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("facebook_fallback"));
}

#[test]
fn test_missing_explicit_config_file() {
    let dir = TempDir::new().unwrap();

    lotc(dir.path())
        .args(["--config", "nowhere.toml", "trim", "video.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.toml"));
}

#[test]
fn test_timestamp_range_from_library() {
    let range = TimestampRange::parse(" 1:10 - 1:40.8 ").unwrap();
    assert_eq!(range.to_string(), "1:10-1:40.8");
    assert!((range.end.as_seconds() - 100.8).abs() < 1e-9);
    assert!(matches!(
        TimestampRange::parse("1:70-2:00"),
        Err(DomainError::InvalidTimestamp(_))
    ));
}
