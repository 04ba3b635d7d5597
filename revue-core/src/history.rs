//! In-memory log of reviews completed during this run.
//!
//! Entries live only as long as the process. Nothing is written to disk.

use std::time::SystemTime;

use crate::types::ReviewOutcome;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    pub file_name: String,
    pub score: f32,
    pub issue_count: usize,
    pub completed_at: SystemTime,
}

/// Completed reviews, newest first, capped at `capacity` entries.
#[derive(Debug, Clone)]
pub struct ReviewHistory {
    entries: Vec<HistoryEntry>,
    next_id: u64,
    capacity: usize,
}

impl Default for ReviewHistory {
    fn default() -> Self {
        Self::with_capacity(50)
    }
}

impl ReviewHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::new(), next_id: 1, capacity: capacity.max(1) }
    }

    /// Records a completed review at the front, evicting the oldest entry when full.
    pub fn record(
        &mut self,
        file_name: &str,
        outcome: &ReviewOutcome,
        completed_at: SystemTime,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            0,
            HistoryEntry {
                id,
                file_name: file_name.to_owned(),
                score: outcome.overall_score,
                issue_count: outcome.issues.len(),
                completed_at,
            },
        );
        self.entries.truncate(self.capacity);
        id
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
