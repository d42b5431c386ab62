//! commit-art core library
//!
//! Maps `column,row` coordinates on a contribution heatmap to calendar days
//! and replays them as dated empty commits in a fresh repository.
//!
//! Data flows one way: [`ingest`] builds an ordered [`CommitPlan`], [`grid`]
//! dates each coordinate, and [`HistorySynthesizer`] turns the plan into
//! commits through a [`RepositoryLifecycle`].

pub mod coordinate;
pub mod error;
pub mod fakes;
pub mod git;
pub mod grid;
pub mod ingest;
pub mod lifecycle;
pub mod obs;
pub mod pipeline;
pub mod synth;
pub mod telemetry;

pub use coordinate::{Coordinate, DAYS_IN_WEEK};
pub use error::{ArtError, LifecycleError, LineFormatError, Result};
pub use git::{current_branch, is_git_repo, GitCli};
pub use grid::{
    compute_origin, coordinate_to_date, is_valid_coordinate, GridConfig, DEFAULT_GRID_WIDTH,
    MAX_GRID_WIDTH,
};
pub use ingest::{
    ingest_file, ingest_lines, ingest_str, parse_line, CommitPlan, Ingestion, LineDiagnostic,
};
pub use lifecycle::{LifecycleResult, RepositoryHandle, RepositoryLifecycle};
pub use obs::RunSpan;
pub use pipeline::run_pipeline;
pub use synth::{
    format_commit_date, plan_commits, CommandFailure, FailurePolicy, HistorySynthesizer,
    PlannedCommit, SynthConfig, SynthReport, COMMIT_DATE_FORMAT, DEFAULT_BRANCH_NAME,
    DEFAULT_COMMIT_MESSAGE, DEFAULT_REMOTE_NAME,
};
pub use telemetry::init_tracing;

/// commit-art version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
