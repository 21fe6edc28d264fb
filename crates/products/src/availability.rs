//! Per-product availability set.
//!
//! Persisted as a single text value holding a JSON array of interval literals
//! (`["2024-01-01T00:00:00.000Z/2024-01-02T00:00:00.000Z"]`). The set is an
//! append-only log: windows are never merged, sorted, or de-duplicated, so
//! overlapping or identical entries are expected.

use chrono::{DateTime, Utc};

use kitshelf_core::{DomainError, DomainResult};

use crate::interval::{Interval, IntervalProjection};

/// Stored form of a product without any availability window.
pub const EMPTY_AVAILABILITY: &str = "[]";

/// Ordered availability windows of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilitySet {
    intervals: Vec<Interval>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set seeded with exactly one window.
    pub fn single(interval: Interval) -> Self {
        Self {
            intervals: vec![interval],
        }
    }

    /// Decode the stored text.
    ///
    /// Anything other than a JSON array of valid interval literals is reported
    /// as `MalformedStore`; corrupt data is never dropped or repaired.
    pub fn decode(stored: &str) -> DomainResult<Self> {
        let raw: Vec<String> = serde_json::from_str(stored).map_err(|e| {
            DomainError::malformed_store(format!("availability is not a JSON array of strings: {e}"))
        })?;

        let intervals = raw
            .iter()
            .enumerate()
            .map(|(idx, literal)| {
                literal.parse::<Interval>().map_err(|e| {
                    DomainError::malformed_store(format!("availability[{idx}]: {e}"))
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self { intervals })
    }

    /// Encode back to the stored text. An empty set encodes to `[]`.
    pub fn encode(&self) -> String {
        let literals = self
            .intervals
            .iter()
            .map(Interval::encode)
            .collect::<Vec<_>>();
        serde_json::Value::from(literals).to_string()
    }

    /// Add a window at the end. No merge, no sort, no duplicate check.
    pub fn append(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn project_all(&self) -> Vec<IntervalProjection> {
        self.intervals.iter().map(Interval::to_projection).collect()
    }

    /// True iff any window contains `instant`.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.intervals.iter().any(|i| i.contains(instant))
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }
}
