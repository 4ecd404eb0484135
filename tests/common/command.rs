use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with one commit holding `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gel_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_gel_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    gel_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// Repository with four linear commits, each adding `file<n>.txt`
#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_gel_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (n, title) in ["First", "Second", "Third", "Fourth"].iter().enumerate() {
        write_file(FileSpec::new(
            repository_dir.path().join(format!("file{}.txt", n + 1)),
            format!("content {}", n + 1),
        ));
        run_gel_command(repository_dir.path(), &["add", "."])
            .assert()
            .success();
        gel_commit(repository_dir.path(), &format!("{title} commit"))
            .assert()
            .success();
    }

    repository_dir
}

pub fn run_gel_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gel").expect("Failed to find gel binary");
    cmd.current_dir(dir);
    cmd.env_remove("GEL_LOG");
    cmd.envs(vec![
        ("GEL_AUTHOR_NAME", AUTHOR_NAME),
        ("GEL_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GEL_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gel_commit(dir: &Path, message: &str) -> Command {
    run_gel_command(dir, &["commit", "-m", message])
}

/// Run a command that must succeed and return its stdout
pub fn gel_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_gel_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}

/// Commit HEAD points at, read straight from the ref files
pub fn get_head_commit_sha(dir: &Path) -> String {
    let gel_dir = dir.join(".gel");
    let head = crate::common::read_to_string(&gel_dir.join("HEAD"));

    match head.strip_prefix("ref: ") {
        Some(ref_path) => crate::common::read_to_string(&gel_dir.join(ref_path.trim()))
            .trim()
            .to_string(),
        None => head.trim().to_string(),
    }
}

/// Object id of a commit's parent, parsed from `cat-file -p`
pub fn get_parent_commit_id(dir: &Path, commit_id: &str) -> Option<String> {
    gel_stdout(dir, &["cat-file", "-p", commit_id])
        .lines()
        .find_map(|line| line.strip_prefix("parent ").map(str::to_string))
}
