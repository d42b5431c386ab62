//! Repository lifecycle boundary.
//!
//! The synthesizer only ever talks to a repository through
//! [`RepositoryLifecycle`]. [`GitCli`](crate::GitCli) drives the `git` binary;
//! [`RecordingLifecycle`](crate::fakes::RecordingLifecycle) is an in-memory
//! fake for tests.

use std::path::{Path, PathBuf};

use crate::error::LifecycleError;

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

/// An initialized working directory, owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    path: PathBuf,
}

impl RepositoryHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Operations the synthesizer needs from a version-control backend.
///
/// Every call blocks until the underlying operation completes.
pub trait RepositoryLifecycle {
    /// Create and initialize a new repository. Never overwrites: an existing
    /// path yields [`LifecycleError::DirectoryExists`].
    fn create_repository(&self, path: &Path) -> LifecycleResult<RepositoryHandle>;

    /// Record an empty commit with both author and committer date set to `date`.
    fn commit(&self, handle: &RepositoryHandle, date: &str, message: &str) -> LifecycleResult<()>;

    /// Rename the current branch. Must also work before the first commit.
    fn rename_branch(&self, handle: &RepositoryHandle, name: &str) -> LifecycleResult<()>;

    /// Register `url` under the alias `name`.
    fn add_remote(&self, handle: &RepositoryHandle, name: &str, url: &str) -> LifecycleResult<()>;

    /// Push `branch` to the remote `remote`.
    fn push(&self, handle: &RepositoryHandle, remote: &str, branch: &str) -> LifecycleResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_keeps_path() {
        let handle = RepositoryHandle::new("art/history");
        assert_eq!(handle.path(), Path::new("art/history"));
    }
}
