//! Integration tests for the nanoshell binary

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const USAGE_HEAD: &str = "\nnanoshell: An extremely lightweight shell used for working with\n";

fn nanoshell() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("nanoshell"))
}

#[test]
fn test_no_command_prints_usage_to_stderr() {
    nanoshell()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(USAGE_HEAD))
        .stderr(predicate::str::ends_with(
            "Wildcards are not supported\n\n*** ERROR: Command expected\n\n",
        ));
}

#[test]
fn test_help() {
    nanoshell()
        .arg("help")
        .assert()
        .success()
        .stdout(nanoshell::USAGE)
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_help_ignores_trailing_args() {
    nanoshell()
        .args(["help", "mv", "--version"])
        .assert()
        .success()
        .stdout(nanoshell::USAGE);
}

#[test]
fn test_unknown_command() {
    nanoshell()
        .args(["foo", "bar"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr("\n*** ERROR: Unexpected command: foo\n\n");
}

#[test]
fn test_logging_is_opt_in() {
    nanoshell()
        .env_remove("NANOSHELL_LOG")
        .arg("help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    nanoshell()
        .env("NANOSHELL_LOG", "debug")
        .arg("help")
        .assert()
        .success()
        .stdout(nanoshell::USAGE)
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("executing help"));
}

#[test]
#[cfg(target_os = "linux")]
fn test_help_fails_when_stdout_cannot_be_written() {
    let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
    let status = std::process::Command::new(cargo::cargo_bin!("nanoshell"))
        .arg("help")
        .stdout(full)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_run_missing_path() {
    nanoshell()
        .arg("run")
        .assert()
        .code(1)
        .stderr("\n*** ERROR: Missing PATH argument.\n\n");
}

#[test]
fn test_run_nonexistent() {
    nanoshell()
        .args(["run", "/nonexistent/program"])
        .assert()
        .code(1)
        .stderr("\n*** ERROR: Run failed.\n\n");
}

#[test]
#[cfg(unix)]
fn test_run_does_not_search_path() {
    let temp = TempDir::new().unwrap();
    nanoshell()
        .args(["run", "sh", "-c", "exit 0"])
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Run failed."));
}

#[test]
#[cfg(unix)]
fn test_run_forwards_exit_code() {
    nanoshell()
        .args(["run", "/bin/sh", "-c", "exit 7"])
        .assert()
        .code(7)
        .stderr(predicate::str::is_empty());
}

#[test]
#[cfg(target_os = "linux")]
fn test_run_passes_own_name_as_argv0() {
    // cat prints its own argument vector, NUL separated.
    nanoshell()
        .args(["run", "/bin/cat", "/proc/self/cmdline"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("nanoshell\0/proc/self/cmdline\0"));
}

#[test]
fn test_mv_missing_source_argument() {
    nanoshell()
        .arg("mv")
        .assert()
        .code(1)
        .stderr("\n*** ERROR: Missing SOURCE-PATH argument.\n\n");
}

#[test]
fn test_mv_missing_target_argument() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a");
    fs::write(&source, b"data").unwrap();

    nanoshell()
        .arg("mv")
        .arg(&source)
        .assert()
        .code(1)
        .stderr("\n*** ERROR: Missing TARGET-PATH argument.\n\n");
    assert!(source.exists());
}

#[test]
fn test_mv_moves_files_of_any_size() {
    let temp = TempDir::new().unwrap();
    for len in [0, nanoshell::COPY_BUFFER_SIZE, 5 * nanoshell::COPY_BUFFER_SIZE + 3] {
        let source = temp.path().join(format!("src-{len}"));
        let target = temp.path().join(format!("dst-{len}"));
        let data: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
        fs::write(&source, &data).unwrap();

        nanoshell()
            .arg("mv")
            .arg(&source)
            .arg(&target)
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());

        assert!(!source.exists(), "source of {len} bytes still present");
        assert_eq!(fs::read(&target).unwrap(), data);
    }
}

#[test]
fn test_mv_relative_paths() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("from.txt"), b"relative").unwrap();

    nanoshell()
        .args(["mv", "from.txt", "to.txt"])
        .current_dir(temp.path())
        .assert()
        .success();

    assert_eq!(fs::read(temp.path().join("to.txt")).unwrap(), b"relative");
    assert!(!temp.path().join("from.txt").exists());
}

#[test]
fn test_mv_missing_source_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");

    nanoshell()
        .arg("mv")
        .arg(temp.path().join("missing"))
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("*** ERROR: Cannot open SOURCE-PATH"));
    assert!(!target.exists());
}

#[test]
fn test_mv_is_not_idempotent() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a");
    let target = temp.path().join("b");
    fs::write(&source, b"once").unwrap();

    nanoshell().arg("mv").arg(&source).arg(&target).assert().success();
    nanoshell()
        .arg("mv")
        .arg(&source)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot open SOURCE-PATH"));

    assert_eq!(fs::read(&target).unwrap(), b"once");
}

#[test]
fn test_mv_directory_source_keeps_existing_target() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("adir");
    fs::create_dir(&source).unwrap();
    let target = temp.path().join("keep.txt");
    fs::write(&target, b"precious").unwrap();

    nanoshell()
        .arg("mv")
        .arg(&source)
        .arg(&target)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("*** ERROR: Cannot open SOURCE-PATH"));
    assert_eq!(fs::read(&target).unwrap(), b"precious");
    assert!(source.is_dir());
}

#[test]
fn test_mv_unwritable_target() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("a");
    fs::write(&source, b"stay").unwrap();

    nanoshell()
        .arg("mv")
        .arg(&source)
        .arg(temp.path().join("missing-dir").join("b"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("*** ERROR: Cannot open TARGET-PATH"));
    assert_eq!(fs::read(&source).unwrap(), b"stay");
}
