use crate::common::command::{head_digest, kit_commit, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn commit_records_parent_chain(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("a.txt"), "one".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "first").assert().success();
    let first = head_digest(dir.path()).unwrap();

    write_file(FileSpec::new(dir.path().join("a.txt"), "two".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "second").assert().success();
    let second = head_digest(dir.path()).unwrap();

    assert_ne!(first, second);

    let cat = run_kit_command(dir.path(), &["cat-file", "-p", &second]).output()?;
    let commit_text = String::from_utf8(cat.stdout)?;
    assert!(commit_text.contains(&format!("parent {}", first)));

    Ok(())
}
