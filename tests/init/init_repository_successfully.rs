use crate::common::command::{repository_dir, run_kit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_kit_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty kit repository in",
        ));

    assert!(dir.path().join(".kit/objects").is_dir());
    assert!(dir.path().join(".kit/refs/heads").is_dir());

    let head = std::fs::read_to_string(dir.path().join(".kit/HEAD"))?;
    assert_eq!(head, "ref: refs/heads/main\n");

    // the default branch has no backing file before the first commit
    assert!(!dir.path().join(".kit/refs/heads/main").exists());

    Ok(())
}
