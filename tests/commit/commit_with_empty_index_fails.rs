use crate::common::command::{kit_commit, repository_dir, run_kit_command};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn commit_with_empty_index_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    kit_commit(dir.path(), "nothing staged").assert().failure();

    Ok(())
}
