//! Coordinate ingestion: raw `column,row` lines into an ordered commit plan.
//!
//! Bad lines never fail the run. Each one is skipped and reported as a
//! [`LineDiagnostic`]; the remaining lines still produce a plan, which may be
//! empty.

use std::collections::HashSet;
use std::path::Path;

use crate::coordinate::Coordinate;
use crate::error::{LineFormatError, Result};
use crate::grid::GridConfig;
use crate::obs::emit_line_skipped;

/// Parse one `column,row` line and check it against the grid.
pub fn parse_line(
    line: &str,
    grid: &GridConfig,
) -> std::result::Result<Coordinate, LineFormatError> {
    let fields: Vec<&str> = line.split(',').collect();
    let [column, row] = fields.as_slice() else {
        return Err(LineFormatError::WrongFieldCount {
            found: fields.len(),
        });
    };

    let column = parse_field(column)?;
    let row = parse_field(row)?;

    grid.checked_coordinate(column, row).ok_or(LineFormatError::OutOfRange {
        column,
        row,
        width: grid.width(),
    })
}

fn parse_field(field: &str) -> std::result::Result<i64, LineFormatError> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| LineFormatError::NotAnInteger {
            field: field.trim().to_string(),
        })
}

/// Deduplicated coordinates, strictly increasing by [`Coordinate::linear_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPlan {
    coordinates: Vec<Coordinate>,
}

impl CommitPlan {
    /// Collapse duplicates and order by linear index (oldest day first).
    pub fn from_coordinates(coords: impl IntoIterator<Item = Coordinate>) -> Self {
        let unique: HashSet<Coordinate> = coords.into_iter().collect();
        let mut coordinates: Vec<Coordinate> = unique.into_iter().collect();
        coordinates.sort_unstable_by_key(Coordinate::linear_index);
        Self { coordinates }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.coordinates.iter()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommitPlan {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.coordinates.iter()
    }
}

/// A skipped input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number.
    pub line_number: usize,
    pub line: String,
    pub error: LineFormatError,
}

impl std::fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {:?}: {}", self.line_number, self.line, self.error)
    }
}

/// Outcome of ingesting a coordinate source.
#[derive(Debug, Clone, Default)]
pub struct Ingestion {
    pub plan: CommitPlan,
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Ingest a sequence of lines.
pub fn ingest_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    grid: &GridConfig,
) -> Ingestion {
    let mut valid = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        match parse_line(line, grid) {
            Ok(coord) => valid.push(coord),
            Err(error) => {
                let diagnostic = LineDiagnostic {
                    line_number: idx + 1,
                    line: line.to_string(),
                    error,
                };
                emit_line_skipped(&diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    Ingestion {
        plan: CommitPlan::from_coordinates(valid),
        diagnostics,
    }
}

/// Ingest the contents of a coordinates file.
pub fn ingest_str(text: &str, grid: &GridConfig) -> Ingestion {
    ingest_lines(text.lines(), grid)
}

/// Read and ingest a UTF-8 coordinates file.
pub fn ingest_file(path: &Path, grid: &GridConfig) -> Result<Ingestion> {
    let text = std::fs::read_to_string(path)?;
    Ok(ingest_str(&text, grid))
}
