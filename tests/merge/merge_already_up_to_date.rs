use crate::common::command::{committed_repository_dir, head_digest, kit_commit, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn merge_already_up_to_date(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    // a branch left behind at the first commit
    run_kit_command(dir.path(), &["branch", "stale"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("more.txt"),
        "more".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "advance main").assert().success();
    let tip = head_digest(dir.path()).unwrap();

    // merging an ancestor changes nothing
    run_kit_command(dir.path(), &["merge", "stale"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date."));

    assert_eq!(head_digest(dir.path()).unwrap(), tip);

    // merging the branch into itself changes nothing either
    run_kit_command(dir.path(), &["merge", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date."));

    Ok(())
}
