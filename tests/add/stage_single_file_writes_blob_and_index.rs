use crate::common::command::{index_digest_for, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn stage_single_file_writes_blob_and_index(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("hello.txt"),
        "hello world".to_string(),
    ));

    run_kit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    let digest = index_digest_for(dir.path(), "hello.txt").expect("hello.txt not in index");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));

    // the blob landed at the fan-out path derived from its digest
    let object_path = dir
        .path()
        .join(".kit/objects")
        .join(&digest[..2])
        .join(&digest[2..]);
    assert!(object_path.is_file());

    Ok(())
}
