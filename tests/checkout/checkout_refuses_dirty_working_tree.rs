use crate::common::command::{committed_repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn checkout_refuses_dirty_working_tree(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    // modify a tracked file without staging it
    write_file(FileSpec::new(
        dir.path().join("base.txt"),
        "uncommitted edit".to_string(),
    ));

    run_kit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .failure();

    // the local edit survived untouched
    assert_eq!(
        std::fs::read_to_string(dir.path().join("base.txt"))?,
        "uncommitted edit"
    );

    Ok(())
}
