use crate::common::command::{committed_repository_dir, head_digest, kit_commit, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

/// History:
///       A (base.txt)
///      / \
///     B   C
///   main  feature
///
/// B adds ours.txt, C adds theirs.txt; the merge commits with both files
/// present and parents [B, C].
#[rstest]
fn three_way_merge_without_conflicts(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir;

    run_kit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    // advance main with ours.txt
    write_file(FileSpec::new(
        dir.path().join("ours.txt"),
        "ours\n".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "add ours.txt").assert().success();
    let ours_tip = head_digest(dir.path()).unwrap();

    // advance feature with theirs.txt
    run_kit_command(dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        dir.path().join("theirs.txt"),
        "theirs\n".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "add theirs.txt").assert().success();
    let theirs_tip = head_digest(dir.path()).unwrap();

    run_kit_command(dir.path(), &["checkout", "main"])
        .assert()
        .success();
    run_kit_command(dir.path(), &["merge", "feature"])
        .assert()
        .success();

    // both sides landed in the working tree
    assert_eq!(std::fs::read_to_string(dir.path().join("ours.txt"))?, "ours\n");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("theirs.txt"))?,
        "theirs\n"
    );

    // the merge commit lists ours first, theirs second
    let merge_tip = head_digest(dir.path()).unwrap();
    let cat = run_kit_command(dir.path(), &["cat-file", "-p", &merge_tip]).output()?;
    let commit_text = String::from_utf8(cat.stdout)?;
    let parents = commit_text
        .lines()
        .filter_map(|line| line.strip_prefix("parent "))
        .collect::<Vec<_>>();
    assert_eq!(parents, vec![ours_tip.as_str(), theirs_tip.as_str()]);

    Ok(())
}
