use crate::common::command::{repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn hash_object_reports_stable_digest(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("hello.txt"),
        "hello world".to_string(),
    ));

    let first = run_kit_command(dir.path(), &["hash-object", "hello.txt"]).output()?;
    let first = String::from_utf8(first.stdout)?.trim().to_string();

    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

    // re-running yields the same digest
    let second = run_kit_command(dir.path(), &["hash-object", "hello.txt"]).output()?;
    let second = String::from_utf8(second.stdout)?.trim().to_string();
    assert_eq!(first, second);

    // a file with different content hashes differently
    write_file(FileSpec::new(
        dir.path().join("other.txt"),
        "hello world!".to_string(),
    ));
    let other = run_kit_command(dir.path(), &["hash-object", "other.txt"]).output()?;
    let other = String::from_utf8(other.stdout)?.trim().to_string();
    assert_ne!(first, other);

    Ok(())
}
