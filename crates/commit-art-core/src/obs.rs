//! Structured events for the ingestion and synthesis lifecycle.
//!
//! Every event carries an `event` field so log pipelines can filter on it.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::coordinate::Coordinate;
use crate::ingest::LineDiagnostic;

/// RAII guard that tags every event of one run with its target directory.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(target: &str) -> Self {
        let span = tracing::info_span!("commit_art.run", target = %target);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: an input line was rejected and skipped.
pub fn emit_line_skipped(diagnostic: &LineDiagnostic) {
    warn!(
        event = "ingest.line_skipped",
        line_number = diagnostic.line_number,
        line = %diagnostic.line,
        error = %diagnostic.error,
        "skipping invalid line"
    );
}

/// Emit event: one dated commit was written.
pub fn emit_commit_created(coord: &Coordinate, date: NaiveDateTime) {
    debug!(
        event = "synth.commit_created",
        column = coord.column,
        row = coord.row,
        date = %date.date(),
    );
}

/// Emit event: a version-control step failed.
pub fn emit_command_failed(step: &str, error: &dyn std::fmt::Display) {
    warn!(event = "synth.command_failed", step = %step, error = %error);
}

/// Emit event: the synthesis pass finished.
pub fn emit_synthesis_finished(commits_created: usize, failures: usize) {
    info!(
        event = "synth.finished",
        commits_created = commits_created,
        failures = failures,
    );
}
