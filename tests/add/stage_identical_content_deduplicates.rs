use crate::common::command::{index_digest_for, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;
use walkdir::WalkDir;

#[rstest]
fn stage_identical_content_deduplicates(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("a.txt"),
        "same content".to_string(),
    ));
    write_file(FileSpec::new(
        dir.path().join("b.txt"),
        "same content".to_string(),
    ));

    run_kit_command(dir.path(), &["add", "."]).assert().success();

    // both index entries carry the same digest
    let digest_a = index_digest_for(dir.path(), "a.txt").expect("a.txt not in index");
    let digest_b = index_digest_for(dir.path(), "b.txt").expect("b.txt not in index");
    assert_eq!(digest_a, digest_b);

    // identical content collapsed to exactly one stored object
    let object_count = WalkDir::new(dir.path().join(".kit/objects"))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count();
    assert_eq!(object_count, 1);

    Ok(())
}
