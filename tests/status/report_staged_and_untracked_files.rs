use crate::common::command::{committed_repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn report_staged_and_untracked_files(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    write_file(FileSpec::new(
        dir.path().join("staged.txt"),
        "staged".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "staged.txt"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("untracked.txt"),
        "untracked".to_string(),
    ));

    run_kit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes to be committed:"))
        .stdout(predicate::str::contains("new file: staged.txt"))
        .stdout(predicate::str::contains("Untracked files:"))
        .stdout(predicate::str::contains("untracked.txt"));

    Ok(())
}
