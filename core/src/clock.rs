//! Quarter calendar — maps trajectory positions to presentation labels.

use crate::types::QuarterIndex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_YEAR: i32 = 2022;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuarterCalendar {
    pub start_year: i32,
}

impl Default for QuarterCalendar {
    fn default() -> Self {
        Self { start_year: DEFAULT_START_YEAR }
    }
}

impl QuarterCalendar {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Calendar year of the quarter at `index`.
    pub fn year(&self, index: QuarterIndex) -> i32 {
        self.start_year + (index / 4) as i32
    }

    /// Quarter-of-year (1..=4) of the quarter at `index`.
    pub fn quarter_of_year(&self, index: QuarterIndex) -> u8 {
        (index % 4) as u8 + 1
    }

    /// `Q{1..4}-{year}`. Index 0 is `Q1-{start_year}`.
    pub fn label(&self, index: QuarterIndex) -> String {
        format!("Q{}-{}", self.quarter_of_year(index), self.year(index))
    }
}
