use crate::common::command::{
    head_digest, index_digest_for, kit_commit, repository_dir, run_kit_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// From a base where x.txt is "A\n": main changes it to "B\n", feat changes
/// it to "C\n". Merging feat into main must conflict, leave marker text on
/// disk, stage the conflict blob, and write no merge commit.
#[rstest]
fn three_way_merge_with_conflict(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("x.txt"), "A\n".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "base").assert().success();

    run_kit_command(dir.path(), &["branch", "feat"])
        .assert()
        .success();

    // main: A -> B
    write_file(FileSpec::new(dir.path().join("x.txt"), "B\n".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "change to B").assert().success();
    let main_tip = head_digest(dir.path()).unwrap();

    // feat: A -> C
    run_kit_command(dir.path(), &["checkout", "feat"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.path().join("x.txt"), "C\n".to_string()));
    run_kit_command(dir.path(), &["add", "."]).assert().success();
    kit_commit(dir.path(), "change to C").assert().success();

    run_kit_command(dir.path(), &["checkout", "main"])
        .assert()
        .success();

    run_kit_command(dir.path(), &["merge", "feat"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "CONFLICT (content): Merge conflict in x.txt",
        ));

    // no merge commit was written
    assert_eq!(head_digest(dir.path()).unwrap(), main_tip);

    // the working file carries the conflict markers verbatim
    let conflicted = std::fs::read_to_string(dir.path().join("x.txt"))?;
    assert_eq!(conflicted, "<<<<<<< HEAD\nB\n=======\nC\n>>>>>>> feat\n");

    // the index holds the digest of the conflict blob
    let staged_digest = index_digest_for(dir.path(), "x.txt").expect("x.txt not in index");
    let hashed = run_kit_command(dir.path(), &["hash-object", "x.txt"]).output()?;
    let disk_digest = String::from_utf8(hashed.stdout)?.trim().to_string();
    assert_eq!(staged_digest, disk_digest);

    Ok(())
}
