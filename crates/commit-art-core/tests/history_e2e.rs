//! End-to-end runs against a real `git` binary.

use std::path::Path;
use std::process::Command;

use chrono::{NaiveDate, NaiveDateTime};
use commit_art_core::{
    current_branch, ingest_str, run_pipeline, GitCli, LifecycleResult, RepositoryHandle,
    RepositoryLifecycle, SynthConfig,
};

fn run_git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// `GitCli` plus a local committer identity so commits work on bare CI hosts.
struct TestGit(GitCli);

impl RepositoryLifecycle for TestGit {
    fn create_repository(&self, path: &Path) -> LifecycleResult<RepositoryHandle> {
        let handle = self.0.create_repository(path)?;
        run_git(handle.path(), &["config", "user.name", "test-user"]);
        run_git(handle.path(), &["config", "user.email", "test@example.com"]);
        run_git(handle.path(), &["config", "commit.gpgsign", "false"]);
        Ok(handle)
    }

    fn commit(&self, handle: &RepositoryHandle, date: &str, message: &str) -> LifecycleResult<()> {
        self.0.commit(handle, date, message)
    }

    fn rename_branch(&self, handle: &RepositoryHandle, name: &str) -> LifecycleResult<()> {
        self.0.rename_branch(handle, name)
    }

    fn add_remote(&self, handle: &RepositoryHandle, name: &str, url: &str) -> LifecycleResult<()> {
        self.0.add_remote(handle, name, url)
    }

    fn push(&self, handle: &RepositoryHandle, remote: &str, branch: &str) -> LifecycleResult<()> {
        self.0.push(handle, remote, branch)
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn coordinates_become_ordered_dated_commits() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("art");
    let config = SynthConfig::default();
    let ingestion = ingest_str("0,0\n1,3\n0,0\n52,6\n53,0\n", &config.grid);

    let report = run_pipeline(
        &TestGit(GitCli::new()),
        &config,
        &ingestion.plan,
        &target,
        None,
        now(),
    )
    .unwrap();

    assert_eq!(report.commits_created, 3);
    assert!(report.is_clean());
    assert_eq!(current_branch(&target).unwrap(), "commit-art-dummy");

    let dates = run_git(&target, &["log", "--reverse", "--format=%ad", "--date=short"]);
    assert_eq!(
        dates.lines().collect::<Vec<_>>(),
        ["2023-06-18", "2023-06-28", "2024-06-22"]
    );

    let timestamps: Vec<i64> = run_git(&target, &["log", "--reverse", "--format=%at"])
        .lines()
        .map(|l| l.parse().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));

    let subjects = run_git(&target, &["log", "--format=%s"]);
    assert!(subjects.lines().all(|s| s == "update history"));
}

#[test]
fn empty_plan_leaves_commitless_renamed_repository() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("empty-art");
    let config = SynthConfig::default();
    let ingestion = ingest_str("nope\n5,9\n", &config.grid);
    assert_eq!(ingestion.diagnostics.len(), 2);

    let report = run_pipeline(
        &TestGit(GitCli::new()),
        &config,
        &ingestion.plan,
        &target,
        None,
        now(),
    )
    .unwrap();

    assert_eq!(report.commits_created, 0);
    assert!(report.is_clean());
    assert_eq!(current_branch(&target).unwrap(), "commit-art-dummy");
    let head = Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .current_dir(&target)
        .output()
        .unwrap();
    assert!(!head.status.success());
}

#[test]
fn existing_directory_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("taken");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep.txt"), "mine").unwrap();

    let config = SynthConfig::default();
    let ingestion = ingest_str("0,0\n", &config.grid);
    let result = run_pipeline(
        &TestGit(GitCli::new()),
        &config,
        &ingestion.plan,
        &target,
        None,
        now(),
    );

    assert!(result.is_err());
    assert!(!target.join(".git").exists());
    assert_eq!(std::fs::read_to_string(target.join("keep.txt")).unwrap(), "mine");
}

#[test]
fn history_is_pushed_to_remote() {
    let dir = tempfile::tempdir().unwrap();
    let remote = dir.path().join("remote.git");
    std::fs::create_dir(&remote).unwrap();
    run_git(&remote, &["init", "--bare", "--quiet"]);

    let target = dir.path().join("art");
    let config = SynthConfig::default();
    let ingestion = ingest_str("10,1\n10,2\n", &config.grid);
    let report = run_pipeline(
        &TestGit(GitCli::new()),
        &config,
        &ingestion.plan,
        &target,
        Some(remote.to_str().unwrap()),
        now(),
    )
    .unwrap();

    assert!(report.is_clean(), "{:?}", report.failures);
    let count = run_git(&remote, &["rev-list", "--count", "commit-art-dummy"]);
    assert_eq!(count, "2");
}
