//! History synthesizer: one dated empty commit per planned coordinate.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::error::{ArtError, LifecycleError, Result};
use crate::grid::{coordinate_to_date, GridConfig};
use crate::ingest::CommitPlan;
use crate::lifecycle::{RepositoryHandle, RepositoryLifecycle};
use crate::obs::{emit_command_failed, emit_commit_created, emit_synthesis_finished};

pub const DEFAULT_BRANCH_NAME: &str = "commit-art-dummy";
pub const DEFAULT_REMOTE_NAME: &str = "origin";
pub const DEFAULT_COMMIT_MESSAGE: &str = "update history";

/// Format accepted by `git commit --date`, e.g. `Sun Jun 18 10:30:00 2023`.
pub const COMMIT_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y";

/// What to do when a version-control step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next step.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Settings for one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    pub grid: GridConfig,
    pub branch_name: String,
    pub remote_name: String,
    pub message: String,
    pub policy: FailurePolicy,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            branch_name: DEFAULT_BRANCH_NAME.to_string(),
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
            policy: FailurePolicy::Continue,
        }
    }
}

/// A step that failed under [`FailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub step: String,
    pub reason: String,
}

/// Outcome of a synthesis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthReport {
    pub commits_created: usize,
    pub failures: Vec<CommandFailure>,
}

impl SynthReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Render a mapped date as a `git commit --date` string.
pub fn format_commit_date(date: NaiveDateTime) -> String {
    date.format(COMMIT_DATE_FORMAT).to_string()
}

/// A coordinate together with the commit date it will receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommit {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub date: String,
}

/// Resolve every coordinate in the plan to its commit date, in plan order.
pub fn plan_commits(
    plan: &CommitPlan,
    now: NaiveDateTime,
    grid: &GridConfig,
) -> Vec<PlannedCommit> {
    plan.iter()
        .map(|coord| PlannedCommit {
            coordinate: *coord,
            date: format_commit_date(coordinate_to_date(coord, now, grid)),
        })
        .collect()
}

/// Drives commit creation against a [`RepositoryLifecycle`].
pub struct HistorySynthesizer<'a, L: RepositoryLifecycle> {
    lifecycle: &'a L,
    config: &'a SynthConfig,
}

impl<'a, L: RepositoryLifecycle> HistorySynthesizer<'a, L> {
    pub fn new(lifecycle: &'a L, config: &'a SynthConfig) -> Self {
        Self { lifecycle, config }
    }

    /// Commit every coordinate in plan order, then rename the branch.
    ///
    /// Commit dates are strictly increasing because the plan is ordered by
    /// linear index and `now` is fixed for the whole pass.
    pub fn synthesize(
        &self,
        handle: &RepositoryHandle,
        plan: &CommitPlan,
        now: NaiveDateTime,
    ) -> Result<SynthReport> {
        let mut report = SynthReport::default();

        for coord in plan {
            let date = coordinate_to_date(coord, now, &self.config.grid);
            let date_str = format_commit_date(date);
            match self.lifecycle.commit(handle, &date_str, &self.config.message) {
                Ok(()) => {
                    report.commits_created += 1;
                    emit_commit_created(coord, date);
                }
                Err(e) => self.record_failure(&mut report, &format!("commit {coord}"), e)?,
            }
        }

        if let Err(e) = self.lifecycle.rename_branch(handle, &self.config.branch_name) {
            self.record_failure(&mut report, "rename branch", e)?;
        }

        emit_synthesis_finished(report.commits_created, report.failures.len());
        Ok(report)
    }

    /// Register `remote_url` under the configured alias and push the branch.
    /// The push is skipped when the remote could not be added.
    pub fn publish(
        &self,
        handle: &RepositoryHandle,
        remote_url: &str,
        report: &mut SynthReport,
    ) -> Result<()> {
        let remote = &self.config.remote_name;
        if let Err(e) = self.lifecycle.add_remote(handle, remote, remote_url) {
            return self.record_failure(report, "add remote", e);
        }
        if let Err(e) = self.lifecycle.push(handle, remote, &self.config.branch_name) {
            self.record_failure(report, "push", e)?;
        }
        Ok(())
    }

    fn record_failure(
        &self,
        report: &mut SynthReport,
        step: &str,
        error: LifecycleError,
    ) -> Result<()> {
        emit_command_failed(step, &error);
        let reason = error.to_string();
        match self.config.policy {
            FailurePolicy::Abort => Err(ArtError::Aborted {
                step: step.to_string(),
                reason,
            }),
            FailurePolicy::Continue => {
                report.failures.push(CommandFailure {
                    step: step.to_string(),
                    reason,
                });
                Ok(())
            }
        }
    }
}
