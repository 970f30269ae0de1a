use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Fixed author identity so commit digests are reproducible within a test
pub const AUTHOR_NAME: &str = "Test Author";
pub const AUTHOR_EMAIL: &str = "test@example.com";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// A repository with one committed file (`base.txt`) on `main`
#[fixture]
pub fn committed_repository_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("base.txt"),
        "base".to_string(),
    ));

    run_kit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_kit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("failed to find kit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn kit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_kit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("KIT_AUTHOR_NAME", AUTHOR_NAME),
        ("KIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
    ]);
    cmd
}

/// Read the digest recorded in `.kit/index` for the given path
pub fn index_digest_for(dir: &Path, path: &str) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(".kit/index")).ok()?;

    content.lines().skip(1).find_map(|line| {
        let mut parts = line.splitn(3, ' ');
        let _mode = parts.next()?;
        let digest = parts.next()?;
        let entry_path = parts.next()?;

        (entry_path == path).then(|| digest.to_string())
    })
}

/// Resolve the digest HEAD currently points at, following a symbolic ref
pub fn head_digest(dir: &Path) -> Option<String> {
    let head = std::fs::read_to_string(dir.join(".kit/HEAD")).ok()?;
    let head = head.trim();

    match head.strip_prefix("ref: ") {
        Some(ref_path) => {
            let content = std::fs::read_to_string(dir.join(".kit").join(ref_path)).ok()?;
            Some(content.trim().to_string())
        }
        None => Some(head.to_string()),
    }
}
