use crate::common::command::{committed_repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn report_modified_and_deleted_files(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    // a second committed file so both change kinds show up at once
    write_file(FileSpec::new(
        dir.path().join("doomed.txt"),
        "to be deleted".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    crate::common::command::kit_commit(dir.path(), "add doomed.txt")
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("base.txt"),
        "changed on disk".to_string(),
    ));
    std::fs::remove_file(dir.path().join("doomed.txt"))?;

    run_kit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes not staged for commit:"))
        .stdout(predicate::str::contains("modified: base.txt"))
        .stdout(predicate::str::contains("deleted: doomed.txt"));

    Ok(())
}
