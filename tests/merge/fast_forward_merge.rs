use crate::common::command::{committed_repository_dir, head_digest, kit_commit, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn fast_forward_merge(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();
    run_kit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("feature.txt"),
        "feature work".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "feature commit").assert().success();
    let feature_tip = head_digest(dir.path()).unwrap();

    run_kit_command(dir.path(), &["checkout", "main"])
        .assert()
        .success();
    assert!(!dir.path().join("feature.txt").exists());

    run_kit_command(dir.path(), &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    // main now holds the feature tip; no merge commit was created
    let main_ref = std::fs::read_to_string(dir.path().join(".kit/refs/heads/main"))?;
    assert_eq!(main_ref.trim(), feature_tip);

    assert_eq!(
        std::fs::read_to_string(dir.path().join("feature.txt"))?,
        "feature work"
    );

    Ok(())
}
