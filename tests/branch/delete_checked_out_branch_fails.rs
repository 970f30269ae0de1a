use crate::common::command::{committed_repository_dir, run_kit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn delete_checked_out_branch_fails(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["branch", "-d", "main"])
        .assert()
        .failure();

    // a branch that is not checked out deletes fine
    run_kit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_kit_command(dir.path(), &["branch", "-d", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted branch feature"));

    Ok(())
}
