use crate::common::command::{head_digest, kit_commit, repository_dir, run_kit_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn commit_writes_tree_and_commit_objects(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_kit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("b.js"),
        "console.log('b')".to_string(),
    ));
    write_file(FileSpec::new(
        dir.path().join("a.js"),
        "console.log('a')".to_string(),
    ));
    run_kit_command(dir.path(), &["add", "."]).assert().success();

    kit_commit(dir.path(), "Initial commit")
        .assert()
        .success()
        .stdout(predicate::str::contains("[main (root-commit) "))
        .stdout(predicate::str::contains("Initial commit"));

    let head = head_digest(dir.path()).expect("HEAD should resolve after commit");

    // the commit object carries the expected headers and message
    let cat = run_kit_command(dir.path(), &["cat-file", "-p", &head]).output()?;
    let commit_text = String::from_utf8(cat.stdout)?;
    assert!(commit_text.starts_with("tree "));
    assert!(commit_text.contains("author Test Author <test@example.com>"));
    assert!(commit_text.contains("committer Test Author <test@example.com>"));
    assert!(commit_text.ends_with("Initial commit"));
    assert!(!commit_text.contains("parent "));

    // the tree lists entries in byte-wise name order
    let ls = run_kit_command(dir.path(), &["ls-tree", &head]).output()?;
    let tree_text = String::from_utf8(ls.stdout)?;
    let names = tree_text
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["a.js", "b.js"]);

    Ok(())
}
