//! History of committed pattern configs.
//!
//! The log is append-only, skips near-duplicates, keeps at most
//! [`MAX_HISTORY`] entries and exposes a clamped cursor for back/forward
//! navigation. It persists as a JSON array of configs.

use crate::constants::MAX_HISTORY;
use crate::error::{Error, Result};
use crate::types::PatternConfig;
use serde::{Deserialize, Serialize};

/// Decides when a commit is too similar to an existing entry.
///
/// The threshold is a fraction of the compared fields, so adding fields to
/// [`PatternConfig`] keeps the filter's strictness roughly constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuplicateFilter {
    /// Share of compared fields that must match for a duplicate
    pub fraction: f64,
}

impl Default for DuplicateFilter {
    /// Half of the twelve compared fields, i.e. six or more identical fields.
    fn default() -> Self {
        Self { fraction: 0.5 }
    }
}

impl DuplicateFilter {
    /// Minimum number of identical fields that marks a duplicate.
    pub fn min_matches(&self, field_count: usize) -> usize {
        ((self.fraction * field_count as f64).ceil() as usize).max(1)
    }

    /// Whether `candidate` duplicates `entry`.
    pub fn is_duplicate(&self, entry: &PatternConfig, candidate: &PatternConfig) -> bool {
        entry.matching_fields(candidate) >= self.min_matches(PatternConfig::COMPARED_FIELDS)
    }
}

/// Size-bounded, de-duplicated log of past configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    entries: Vec<PatternConfig>,
    #[serde(skip)]
    cursor: usize,
    #[serde(skip)]
    filter: DuplicateFilter,
}

impl HistoryStore {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history with a custom duplicate filter.
    pub fn with_filter(filter: DuplicateFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Restores a history from its persisted JSON.
    ///
    /// Missing data yields an empty history. Entries are sanitized, the
    /// restored log is capped and the cursor points at the newest entry.
    pub fn recover(data: Option<&str>) -> Result<Self> {
        let Some(json) = data.filter(|json| !json.trim().is_empty()) else {
            return Ok(Self::new());
        };
        let entries: Vec<PatternConfig> =
            serde_json::from_str(json).map_err(|e| Error::HistoryRecovery(e.to_string()))?;
        let mut store = Self {
            entries: entries.into_iter().map(PatternConfig::sanitized).collect(),
            ..Self::default()
        };
        store.truncate();
        store.cursor = store.entries.len().saturating_sub(1);
        Ok(store)
    }

    /// Serializes the log for persistence.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Records a snapshot of `config` unless a near-duplicate is already logged.
    ///
    /// The snapshot always has `satisfy` cleared. Returns whether an entry was
    /// appended; on append the cursor moves to the newest entry.
    pub fn commit(&mut self, config: &PatternConfig) -> bool {
        if self
            .entries
            .iter()
            .any(|entry| self.filter.is_duplicate(entry, config))
        {
            log::debug!("Skipping history commit: near-duplicate of an existing entry");
            return false;
        }

        self.entries.push(config.history_snapshot());
        self.truncate();
        self.cursor = self.entries.len() - 1;
        true
    }

    fn truncate(&mut self) {
        if self.entries.len() > MAX_HISTORY {
            let excess = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..excess);
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[PatternConfig] {
        &self.entries
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&PatternConfig> {
        self.entries.get(self.cursor)
    }

    /// Moves the cursor to `index`, clamped to the valid range.
    pub fn go_to(&mut self, index: usize) -> Option<&PatternConfig> {
        self.cursor = index.min(self.entries.len().saturating_sub(1));
        self.current()
    }

    /// Steps the cursor one entry towards the oldest.
    pub fn back(&mut self) -> Option<&PatternConfig> {
        self.go_to(self.cursor.saturating_sub(1))
    }

    /// Steps the cursor one entry towards the newest.
    pub fn forward(&mut self) -> Option<&PatternConfig> {
        self.go_to(self.cursor.saturating_add(1))
    }

    /// Returns true if there is an older entry to step back to.
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there is a newer entry to step forward to.
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Up to `count` entries, newest first, excluding the newest one itself.
    ///
    /// Each item carries its index into [`HistoryStore::entries`].
    pub fn recent(&self, count: usize) -> impl Iterator<Item = (usize, &PatternConfig)> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .skip(1)
            .take(count)
    }
}
