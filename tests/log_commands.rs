use assert_fs::TempDir;
use common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, gel_stdout, get_head_commit_sha, repository_dir,
    repository_with_multiple_commits, run_gel_command,
};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn oneline_lists_newest_first(repository_with_multiple_commits: TempDir) {
    let log = gel_stdout(repository_with_multiple_commits.path(), &["log", "--oneline"]);
    let titles: Vec<&str> = log
        .lines()
        .map(|line| line.split_once(' ').map(|(_, title)| title).unwrap_or(""))
        .collect();

    assert_eq!(
        titles,
        vec!["Fourth commit", "Third commit", "Second commit", "First commit"]
    );
    let head = get_head_commit_sha(repository_with_multiple_commits.path());
    assert!(log.starts_with(&format!("{} ", &head[..7])));
}

#[rstest]
fn medium_format_shows_author_and_date(repository_with_multiple_commits: TempDir) {
    let dir = repository_with_multiple_commits.path();
    let head = get_head_commit_sha(dir);

    let log = gel_stdout(dir, &["log", "HEAD"]);

    assert!(log.starts_with(&format!(
        "commit {head}\n\
         Author: {AUTHOR_NAME} <{AUTHOR_EMAIL}>\n\
         Date:   Sun Jan 1 12:00:00 2023 +0000\n\
         \n    Fourth commit\n\
         \ncommit "
    )));
    assert_eq!(log.lines().filter(|line| line.starts_with("commit ")).count(), 4);
    assert!(log.ends_with("\n    First commit\n"));
}

#[rstest]
fn log_starts_from_the_given_revision(repository_with_multiple_commits: TempDir) {
    let log = gel_stdout(
        repository_with_multiple_commits.path(),
        &["log", "--oneline", "HEAD~1"],
    );

    assert_eq!(log.lines().count(), 3);
    assert!(log.lines().next().is_some_and(|line| line.ends_with(" Third commit")));
}

#[rstest]
fn log_with_several_starts_shows_each_commit_once(repository_with_multiple_commits: TempDir) {
    let log = gel_stdout(
        repository_with_multiple_commits.path(),
        &["log", "--oneline", "HEAD", "HEAD~2"],
    );

    assert_eq!(log.lines().count(), 4);
}

#[rstest]
fn log_on_an_unborn_branch_fails(repository_dir: TempDir) {
    run_gel_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gel_command(repository_dir.path(), &["log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "your current branch 'master' does not have any commits yet",
        ));
}
