use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{
    gel_commit, gel_stdout, get_head_commit_sha, init_repository_dir, run_gel_command,
};
use common::file::delete_path;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

/// `topic` branch holding one extra commit: `1.txt` changed, `a/b/3.txt`
/// removed and `topic.txt` added. HEAD is back on master afterwards.
fn create_topic_branch(dir: &TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(dir.path(), &["branch", "topic"])
        .assert()
        .success();
    run_gel_command(dir.path(), &["switch", "topic"])
        .assert()
        .success();

    dir.child("1.txt").write_str("one on topic")?;
    dir.child("topic.txt").write_str("topic")?;
    delete_path(&dir.path().join("a").join("b"));
    run_gel_command(dir.path(), &["add", "."]).assert().success();
    gel_commit(dir.path(), "Topic work").assert().success();

    run_gel_command(dir.path(), &["switch", "master"])
        .assert()
        .success()
        .stdout("Switched to branch 'master'\n");

    Ok(())
}

#[rstest]
fn lists_branches_marking_the_current_one(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["branch", "topic"])
        .assert()
        .success();
    run_gel_command(init_repository_dir.path(), &["branch", "feature/login", "HEAD"])
        .assert()
        .success();

    assert_eq!(
        gel_stdout(init_repository_dir.path(), &["branch"]),
        "  feature/login\n* master\n  topic\n"
    );
    init_repository_dir
        .child(".gel/refs/heads/topic")
        .assert(format!("{}\n", get_head_commit_sha(init_repository_dir.path())));

    Ok(())
}

#[rstest]
fn duplicate_branch_is_rejected(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["branch", "topic"])
        .assert()
        .success();

    run_gel_command(init_repository_dir.path(), &["branch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a branch named 'topic' already exists"));

    Ok(())
}

#[rstest]
#[case("bad..name")]
#[case(".hidden")]
#[case("ends.lock")]
#[case("has space")]
fn invalid_branch_names_are_rejected(
    init_repository_dir: TempDir,
    #[case] name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));

    Ok(())
}

#[rstest]
fn deletes_a_branch(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["branch", "topic"])
        .assert()
        .success();
    let short = get_head_commit_sha(init_repository_dir.path())[..7].to_string();

    run_gel_command(init_repository_dir.path(), &["branch", "-d", "topic"])
        .assert()
        .success()
        .stdout(format!("Deleted branch topic (was {short}).\n"));

    assert_eq!(gel_stdout(init_repository_dir.path(), &["branch"]), "* master\n");

    Ok(())
}

#[rstest]
fn current_branch_cannot_be_deleted(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["branch", "-d", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("while it is checked out"));

    Ok(())
}

#[rstest]
fn switching_rewrites_the_workspace(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    create_topic_branch(&init_repository_dir)?;

    init_repository_dir.child("1.txt").assert("one");
    init_repository_dir.child("a/b/3.txt").assert("three");
    init_repository_dir
        .child("topic.txt")
        .assert(predicate::path::missing());

    run_gel_command(init_repository_dir.path(), &["switch", "topic"])
        .assert()
        .success()
        .stdout("Switched to branch 'topic'\n");

    init_repository_dir.child("1.txt").assert("one on topic");
    init_repository_dir.child("topic.txt").assert("topic");
    init_repository_dir
        .child("a/b")
        .assert(predicate::path::missing());
    init_repository_dir
        .child(".gel/HEAD")
        .assert("ref: refs/heads/topic\n");
    assert_eq!(
        gel_stdout(init_repository_dir.path(), &["ls-files"]),
        "1.txt\na/2.txt\ntopic.txt\n"
    );
    assert_eq!(gel_stdout(init_repository_dir.path(), &["status", "--porcelain"]), "");

    Ok(())
}

#[rstest]
fn switching_to_the_current_branch_is_a_no_op(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["switch", "master"])
        .assert()
        .success()
        .stdout("Already on 'master'\n");

    Ok(())
}

#[rstest]
fn switching_to_a_missing_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gel_command(init_repository_dir.path(), &["switch", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    init_repository_dir
        .child(".gel/HEAD")
        .assert("ref: refs/heads/master\n");

    Ok(())
}

#[rstest]
fn local_changes_block_the_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    create_topic_branch(&init_repository_dir)?;
    init_repository_dir.child("1.txt").write_str("local edit")?;

    run_gel_command(init_repository_dir.path(), &["switch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Your local changes to the following files would be overwritten by switch:",
        ))
        .stderr(predicate::str::contains("\t1.txt"))
        .stderr(predicate::str::contains("Aborting"));

    // nothing was touched
    init_repository_dir.child("1.txt").assert("local edit");
    init_repository_dir
        .child(".gel/HEAD")
        .assert("ref: refs/heads/master\n");

    Ok(())
}

#[rstest]
fn untracked_file_in_the_way_blocks_the_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    create_topic_branch(&init_repository_dir)?;
    init_repository_dir.child("topic.txt").write_str("mine")?;

    run_gel_command(init_repository_dir.path(), &["switch", "topic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The following untracked working tree files would be overwritten by switch:",
        ))
        .stderr(predicate::str::contains("\ttopic.txt"));

    init_repository_dir.child("topic.txt").assert("mine");

    Ok(())
}

#[rstest]
fn unrelated_local_changes_survive_the_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    create_topic_branch(&init_repository_dir)?;
    init_repository_dir.child("a/2.txt").write_str("edited")?;

    run_gel_command(init_repository_dir.path(), &["switch", "topic"])
        .assert()
        .success();

    init_repository_dir.child("a/2.txt").assert("edited");
    assert_eq!(
        gel_stdout(init_repository_dir.path(), &["status", "--porcelain"]),
        " M a/2.txt\n"
    );

    Ok(())
}
