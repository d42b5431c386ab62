//! `git` command-line backend for the repository lifecycle.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::LifecycleError;
use crate::lifecycle::{LifecycleResult, RepositoryHandle, RepositoryLifecycle};

/// Runs the `git` binary, by default the one found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Run `<program> <args>` in `dir`, mapping spawn failures and non-zero
/// exits to [`LifecycleError::Command`] tagged with `step`.
fn run_git(
    program: &OsStr,
    dir: &Path,
    step: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> LifecycleResult<String> {
    debug!(step = %step, ?args, "running git");
    let output = Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .current_dir(dir)
        .output()
        .map_err(|e| LifecycleError::Command {
            step: step.to_string(),
            reason: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LifecycleError::Command {
            step: step.to_string(),
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `true` once the current branch has at least one commit.
fn head_is_born(program: &OsStr, dir: &Path) -> bool {
    Command::new(program)
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Outermost ancestor of `path` (or `path` itself) that does not exist yet,
/// i.e. the directory `create_dir_all(path)` is about to create first.
fn first_missing_ancestor(path: &Path) -> PathBuf {
    path.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .unwrap_or(path)
        .to_path_buf()
}

impl RepositoryLifecycle for GitCli {
    fn create_repository(&self, path: &Path) -> LifecycleResult<RepositoryHandle> {
        if path.exists() {
            return Err(LifecycleError::DirectoryExists(path.to_path_buf()));
        }
        let created = first_missing_ancestor(path);
        std::fs::create_dir_all(path).map_err(|e| LifecycleError::DirectoryInit {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Err(e) = run_git(&self.program, path, "init", &["init", "--quiet"], &[]) {
            // Leave no trace so a retry is not refused as DirectoryExists.
            if let Err(cleanup) = std::fs::remove_dir_all(&created) {
                warn!(path = %created.display(), error = %cleanup, "failed to remove directory");
            }
            return Err(LifecycleError::DirectoryInit {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }

        Ok(RepositoryHandle::new(path))
    }

    fn commit(&self, handle: &RepositoryHandle, date: &str, message: &str) -> LifecycleResult<()> {
        let date_arg = format!("--date={date}");
        run_git(
            &self.program,
            handle.path(),
            "commit",
            &["commit", "--allow-empty", "--quiet", &date_arg, "-m", message],
            &[("GIT_COMMITTER_DATE", date)],
        )?;
        Ok(())
    }

    fn rename_branch(&self, handle: &RepositoryHandle, name: &str) -> LifecycleResult<()> {
        if head_is_born(&self.program, handle.path()) {
            run_git(
                &self.program,
                handle.path(),
                "rename branch",
                &["branch", "-m", name],
                &[],
            )?;
        } else {
            // Nothing to rename yet; repoint the unborn HEAD instead.
            let target = format!("refs/heads/{name}");
            run_git(
                &self.program,
                handle.path(),
                "rename branch",
                &["symbolic-ref", "HEAD", &target],
                &[],
            )?;
        }
        Ok(())
    }

    fn add_remote(&self, handle: &RepositoryHandle, name: &str, url: &str) -> LifecycleResult<()> {
        run_git(
            &self.program,
            handle.path(),
            "add remote",
            &["remote", "add", name, url],
            &[],
        )?;
        Ok(())
    }

    fn push(&self, handle: &RepositoryHandle, remote: &str, branch: &str) -> LifecycleResult<()> {
        run_git(
            &self.program,
            handle.path(),
            "push",
            &["push", "--quiet", remote, branch],
            &[],
        )?;
        Ok(())
    }
}

/// Check whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Name of the branch HEAD points at, born or not.
pub fn current_branch(dir: &Path) -> LifecycleResult<String> {
    run_git(
        OsStr::new("git"),
        dir,
        "read branch",
        &["symbolic-ref", "--short", "HEAD"],
        &[],
    )
}
