//! Grid geometry: maps a grid cell to the calendar day it represents.
//!
//! The grid is `width` columns by 7 rows. The rightmost column is the current
//! week and row 0 is the configured first weekday (Sunday by default). All
//! mapping functions take `now` explicitly; a run computes it once so that a
//! run straddling midnight still maps every cell against the same origin.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

use crate::coordinate::{Coordinate, DAYS_IN_WEEK};
use crate::error::{ArtError, Result};

/// Default number of columns (weeks) on the grid.
pub const DEFAULT_GRID_WIDTH: u32 = 53;

/// Widest accepted grid: 10,000 weeks (about 190 years). Keeps the origin
/// well inside chrono's date range for any `now` in the common era.
pub const MAX_GRID_WIDTH: u32 = 10_000;

/// Shape of the contribution grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    width: u32,
    first_weekday: Weekday,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            first_weekday: Weekday::Sun,
        }
    }
}

impl GridConfig {
    /// A grid of `width` columns with Sunday as row 0.
    pub fn new(width: u32) -> Result<Self> {
        if width == 0 {
            return Err(ArtError::InvalidConfig(
                "grid width must be at least 1".to_string(),
            ));
        }
        if width > MAX_GRID_WIDTH {
            return Err(ArtError::InvalidConfig(format!(
                "grid width {width} exceeds the maximum of {MAX_GRID_WIDTH}"
            )));
        }
        Ok(Self {
            width,
            first_weekday: Weekday::Sun,
        })
    }

    /// Use a different weekday for row 0.
    pub fn with_first_weekday(mut self, first_weekday: Weekday) -> Self {
        self.first_weekday = first_weekday;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Validate a raw (possibly negative) pair and convert it to a coordinate.
    pub fn checked_coordinate(&self, column: i64, row: i64) -> Option<Coordinate> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        let coord = Coordinate::new(column, row);
        is_valid_coordinate(&coord, self).then_some(coord)
    }
}

/// `true` when the coordinate lies inside the grid.
pub fn is_valid_coordinate(coord: &Coordinate, grid: &GridConfig) -> bool {
    coord.column < grid.width && coord.row < DAYS_IN_WEEK
}

/// Days elapsed since the most recent row-0 weekday (0 if `now` is one).
fn days_since_row_zero(now: NaiveDateTime, first_weekday: Weekday) -> i64 {
    let today = i64::from(now.weekday().num_days_from_monday());
    let first = i64::from(first_weekday.num_days_from_monday());
    (today - first).rem_euclid(i64::from(DAYS_IN_WEEK))
}

/// Date of cell (0,0): the row-0 day of the current week, moved back
/// `width - 1` whole weeks. Keeps `now`'s time of day.
pub fn compute_origin(now: NaiveDateTime, grid: &GridConfig) -> NaiveDateTime {
    let weeks_back = i64::from(grid.width) - 1;
    now - Duration::days(days_since_row_zero(now, grid.first_weekday))
        - Duration::days(weeks_back * i64::from(DAYS_IN_WEEK))
}

/// Calendar date of a grid cell for the run anchored at `now`.
pub fn coordinate_to_date(
    coord: &Coordinate,
    now: NaiveDateTime,
    grid: &GridConfig,
) -> NaiveDateTime {
    compute_origin(now, grid) + Duration::days(coord.linear_index() as i64)
}
