use crate::common::command::{committed_repository_dir, run_kit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn report_clean_after_commit(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On branch main"))
        .stdout(predicate::str::contains(
            "nothing to commit, working tree clean",
        ));

    Ok(())
}
