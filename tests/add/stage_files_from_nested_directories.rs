use crate::common::command::{index_digest_for, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn stage_files_from_nested_directories(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(
        dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_kit_command(dir.path(), &["add", "."]).assert().success();

    // stored paths are forward-slash relative, no leading slash
    assert!(index_digest_for(dir.path(), "1.txt").is_some());
    assert!(index_digest_for(dir.path(), "a/2.txt").is_some());
    assert!(index_digest_for(dir.path(), "a/b/3.txt").is_some());

    Ok(())
}
