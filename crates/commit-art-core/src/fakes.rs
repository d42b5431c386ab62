//! In-memory fake for the repository lifecycle (testing only)
//!
//! `RecordingLifecycle` records every call in order and can be scripted to
//! fail specific operations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::LifecycleError;
use crate::lifecycle::{LifecycleResult, RepositoryHandle, RepositoryLifecycle};

/// One recorded lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCall {
    Create { path: PathBuf },
    Commit { date: String, message: String },
    RenameBranch { name: String },
    AddRemote { name: String, url: String },
    Push { remote: String, branch: String },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<LifecycleCall>,
    existing: HashSet<PathBuf>,
    commits_seen: usize,
    failing_commits: HashSet<usize>,
    failing_steps: HashSet<&'static str>,
}

/// Lifecycle fake that never touches the filesystem.
#[derive(Debug, Default)]
pub struct RecordingLifecycle {
    state: Mutex<State>,
}

impl RecordingLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `path` as already present on disk.
    pub fn with_existing(self, path: impl Into<PathBuf>) -> Self {
        self.state.lock().unwrap().existing.insert(path.into());
        self
    }

    /// Fail the commit with this 0-based sequence number.
    pub fn failing_commit(self, nth: usize) -> Self {
        self.state.lock().unwrap().failing_commits.insert(nth);
        self
    }

    /// Fail every call of one step: `"init"`, `"rename branch"`,
    /// `"add remote"` or `"push"`.
    pub fn failing_step(self, step: &'static str) -> Self {
        self.state.lock().unwrap().failing_steps.insert(step);
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<LifecycleCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Dates of the commits that succeeded, in order.
    pub fn commit_dates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                LifecycleCall::Commit { date, .. } => Some(date),
                _ => None,
            })
            .collect()
    }

    fn check_step(state: &State, step: &str) -> LifecycleResult<()> {
        if state.failing_steps.contains(step) {
            return Err(LifecycleError::Command {
                step: step.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

impl RepositoryLifecycle for RecordingLifecycle {
    fn create_repository(&self, path: &Path) -> LifecycleResult<RepositoryHandle> {
        let mut state = self.state.lock().unwrap();
        if state.existing.contains(path) {
            return Err(LifecycleError::DirectoryExists(path.to_path_buf()));
        }
        if state.failing_steps.contains("init") {
            return Err(LifecycleError::DirectoryInit {
                path: path.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        state.existing.insert(path.to_path_buf());
        state.calls.push(LifecycleCall::Create {
            path: path.to_path_buf(),
        });
        Ok(RepositoryHandle::new(path))
    }

    fn commit(&self, _handle: &RepositoryHandle, date: &str, message: &str) -> LifecycleResult<()> {
        let mut state = self.state.lock().unwrap();
        let nth = state.commits_seen;
        state.commits_seen += 1;
        if state.failing_commits.contains(&nth) {
            return Err(LifecycleError::Command {
                step: "commit".to_string(),
                reason: format!("scripted failure of commit #{nth}"),
            });
        }
        state.calls.push(LifecycleCall::Commit {
            date: date.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn rename_branch(&self, _handle: &RepositoryHandle, name: &str) -> LifecycleResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_step(&state, "rename branch")?;
        state.calls.push(LifecycleCall::RenameBranch {
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_remote(&self, _handle: &RepositoryHandle, name: &str, url: &str) -> LifecycleResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_step(&state, "add remote")?;
        state.calls.push(LifecycleCall::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn push(&self, _handle: &RepositoryHandle, remote: &str, branch: &str) -> LifecycleResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_step(&state, "push")?;
        state.calls.push(LifecycleCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }
}
