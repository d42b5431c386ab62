//! Grid coordinates.

use serde::Serialize;

/// Number of rows in the grid, one per day of the week.
pub const DAYS_IN_WEEK: u32 = 7;

/// A cell on the contribution grid: `column` counts weeks from the left edge,
/// `row` counts days from the row-0 weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coordinate {
    pub column: u32,
    pub row: u32,
}

impl Coordinate {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Days between the grid origin and this cell.
    ///
    /// Injective over valid coordinates and strictly increasing with the
    /// mapped calendar date, so it doubles as the plan sort key.
    pub fn linear_index(&self) -> u64 {
        u64::from(self.column) * u64::from(DAYS_IN_WEEK) + u64::from(self.row)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}
