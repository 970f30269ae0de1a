use crate::common::command::{committed_repository_dir, head_digest, run_kit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_and_list_branches(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    // the new branch file holds the HEAD digest plus newline
    let head = head_digest(dir.path()).unwrap();
    let branch_file = std::fs::read_to_string(dir.path().join(".kit/refs/heads/feature"))?;
    assert_eq!(branch_file, format!("{}\n", head));

    run_kit_command(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  feature"))
        .stdout(predicate::str::contains("* main"));

    Ok(())
}
