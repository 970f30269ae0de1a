use crate::common::command::{repository_dir, run_kit_command};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn staging_a_non_existent_file_is_ignored(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    run_kit_command(dir.path(), &["add", "does-not-exist.txt"])
        .assert()
        .success();

    // nothing was staged
    let index_path = dir.path().join(".kit/index");
    if index_path.exists() {
        let content = std::fs::read_to_string(index_path)?;
        assert_eq!(content.lines().count(), 1, "only the header line expected");
    }

    Ok(())
}
