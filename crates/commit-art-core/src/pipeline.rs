//! End-to-end run: create the repository, synthesize history, publish.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::Result;
use crate::ingest::CommitPlan;
use crate::lifecycle::RepositoryLifecycle;
use crate::obs::RunSpan;
use crate::synth::{HistorySynthesizer, SynthConfig, SynthReport};

/// Build a fresh history for `plan` at `target`, optionally pushing it.
///
/// Repository creation errors are returned before any commit is attempted.
/// Later command failures follow `config.policy`.
pub fn run_pipeline<L: RepositoryLifecycle>(
    lifecycle: &L,
    config: &SynthConfig,
    plan: &CommitPlan,
    target: &Path,
    remote_url: Option<&str>,
    now: NaiveDateTime,
) -> Result<SynthReport> {
    let _span = RunSpan::enter(&target.display().to_string());

    let handle = lifecycle.create_repository(target)?;
    info!(path = %handle.path().display(), "repository initialized");

    let synthesizer = HistorySynthesizer::new(lifecycle, config);
    let mut report = synthesizer.synthesize(&handle, plan, now)?;

    if let Some(url) = remote_url {
        info!(remote = %config.remote_name, url = %url, "publishing");
        synthesizer.publish(&handle, url, &mut report)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::error::{ArtError, LifecycleError};
    use crate::fakes::{LifecycleCall, RecordingLifecycle};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
    }

    #[test]
    fn test_existing_directory_stops_before_commits() {
        let fake = RecordingLifecycle::new().with_existing("art");
        let plan = CommitPlan::from_coordinates([Coordinate::new(0, 0)]);

        let err = run_pipeline(
            &fake,
            &SynthConfig::default(),
            &plan,
            Path::new("art"),
            None,
            now(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ArtError::Lifecycle(LifecycleError::DirectoryExists(_))
        ));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_init_failure_is_fatal() {
        let fake = RecordingLifecycle::new().failing_step("init");
        let err = run_pipeline(
            &fake,
            &SynthConfig::default(),
            &CommitPlan::default(),
            Path::new("art"),
            None,
            now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ArtError::Lifecycle(LifecycleError::DirectoryInit { .. })
        ));
    }

    #[test]
    fn test_without_remote_nothing_is_pushed() {
        let fake = RecordingLifecycle::new();
        let plan = CommitPlan::from_coordinates([Coordinate::new(3, 2)]);
        let report = run_pipeline(
            &fake,
            &SynthConfig::default(),
            &plan,
            Path::new("art"),
            None,
            now(),
        )
        .unwrap();

        assert_eq!(report.commits_created, 1);
        assert!(!fake
            .calls()
            .iter()
            .any(|c| matches!(c, LifecycleCall::AddRemote { .. } | LifecycleCall::Push { .. })));
    }

    #[test]
    fn test_with_remote_publishes_after_rename() {
        let fake = RecordingLifecycle::new();
        run_pipeline(
            &fake,
            &SynthConfig::default(),
            &CommitPlan::default(),
            Path::new("art"),
            Some("https://example.com/art.git"),
            now(),
        )
        .unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[1], LifecycleCall::RenameBranch { .. }));
        assert!(matches!(calls[2], LifecycleCall::AddRemote { .. }));
        assert_eq!(
            calls[3],
            LifecycleCall::Push {
                remote: "origin".to_string(),
                branch: "commit-art-dummy".to_string(),
            }
        );
    }
}
