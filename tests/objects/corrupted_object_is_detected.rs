use crate::common::command::{repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn corrupted_object_is_detected(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("hello.txt"),
        "hello".to_string(),
    ));

    let output = run_kit_command(dir.path(), &["hash-object", "-w", "hello.txt"]).output()?;
    let digest = String::from_utf8(output.stdout)?.trim().to_string();

    // reading back works before corruption
    run_kit_command(dir.path(), &["cat-file", "-p", &digest])
        .assert()
        .success();

    // flip one byte of the stored object
    let object_path = dir
        .path()
        .join(".kit/objects")
        .join(&digest[..2])
        .join(&digest[2..]);
    let mut bytes = std::fs::read(&object_path)?;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&object_path, &bytes)?;

    run_kit_command(dir.path(), &["cat-file", "-p", &digest])
        .assert()
        .failure();

    Ok(())
}
