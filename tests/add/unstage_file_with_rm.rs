use crate::common::command::{index_digest_for, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn unstage_file_with_rm(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    write_file(FileSpec::new(dir.path().join("b.txt"), "two".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();

    run_kit_command(dir.path(), &["rm", "a.txt"])
        .assert()
        .success();

    assert!(index_digest_for(dir.path(), "a.txt").is_none());
    assert!(index_digest_for(dir.path(), "b.txt").is_some());

    // the working-tree file is untouched
    assert!(dir.path().join("a.txt").is_file());

    Ok(())
}
