use serde::{Deserialize, Serialize};

/// Counters from one ranking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Records offered to the matcher
    pub candidates: usize,
    /// Records excluded for missing or invalid coordinates
    pub skipped: usize,
    /// Valid records that found a nearest path point
    pub matched: usize,
    /// Matches left after top-K truncation
    pub returned: usize,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}

/// Counters from one partitioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    /// Cells produced by the fixed-step tiling
    pub coarse_cells: usize,
    /// Number of halvings performed during refinement
    pub splits: usize,
    /// Cells in the final output
    pub leaf_cells: usize,
    /// Deepest split level reached
    pub max_depth: u32,
}

impl PartitionStats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Counters from fetching records cell by cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStats {
    pub requested: usize,
    pub failed: usize,
    pub records: usize,
    /// Records dropped because an earlier cell already returned them
    pub duplicates: usize,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, records: usize) {
        self.requested += 1;
        self.records += records;
    }

    pub fn record_failure(&mut self) {
        self.requested += 1;
        self.failed += 1;
    }
}
