//! Sequential inventory code allocation ("A-001", "B-014", ...).
//!
//! Counters are the only shared mutable state on the intake path, so
//! allocation is the sole write operation on an owned, mutex-guarded table.
//! Reads for diagnostics are snapshot copies, never live references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::entities::InventoryRecord;
use super::taxonomy;

/// Highest issued sequence number per category letter.
///
/// Derived state: it can always be rebuilt from the record set and must
/// never regress below the max sequence present in current records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTable {
    counters: BTreeMap<char, u32>,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recovers counters from existing records: max parsed sequence per
    /// letter. Malformed codes are skipped, not fatal.
    pub fn rebuild_from_records(records: &[InventoryRecord]) -> Self {
        let mut table = Self::new();
        for record in records {
            if let Some((letter, sequence)) = parse_code(&record.code) {
                table.record(letter, sequence);
            }
        }
        table
    }

    /// Current max sequence for a letter, 0 if none issued.
    pub fn peek(&self, letter: char) -> u32 {
        self.counters
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(0)
    }

    /// Raises the counter for `letter` to at least `sequence`.
    pub fn record(&mut self, letter: char, sequence: u32) {
        let entry = self.counters.entry(letter.to_ascii_uppercase()).or_insert(0);
        *entry = (*entry).max(sequence);
    }

    /// Merge-by-max. Never overwrites a counter with a smaller number.
    pub fn absorb(&mut self, other: &CounterTable) {
        for (&letter, &sequence) in &other.counters {
            self.record(letter, sequence);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.counters.iter().map(|(&letter, &seq)| (letter, seq))
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Parses "A-001" style codes into (letter, sequence). Returns `None` for
/// anything malformed: wrong segment count, multi-char prefix, non-numeric
/// suffix.
fn parse_code(code: &str) -> Option<(char, u32)> {
    let (prefix, suffix) = code.split_once('-')?;
    let mut chars = prefix.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_alphabetic() {
        return None;
    }
    let sequence: u32 = suffix.parse().ok()?;
    Some((letter.to_ascii_uppercase(), sequence))
}

/// Issues inventory codes, at most once per call.
///
/// The table lives behind a `tokio::sync::Mutex` so concurrent analysis
/// tasks serialize on allocation; two calls can never observe the same
/// counter value.
#[derive(Debug, Default)]
pub struct CodeAllocator {
    counters: Mutex<CounterTable>,
}

impl CodeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: CounterTable) -> Self {
        Self {
            counters: Mutex::new(table),
        }
    }

    /// Resolves the category to its taxonomy letter and issues the next
    /// code for it.
    pub async fn allocate(&self, category_label: &str) -> String {
        self.allocate_letter(taxonomy::letter_for(category_label))
            .await
    }

    /// Issues the next code for a letter directly.
    pub async fn allocate_letter(&self, letter: char) -> String {
        let letter = letter.to_ascii_uppercase();
        let mut counters = self.counters.lock().await;
        let next = counters.peek(letter) + 1;
        counters.record(letter, next);
        format_code(letter, next)
    }

    /// Merges recovered counters in, keeping the max per letter. Used after
    /// a rebuild so the allocator never re-issues a code present in the
    /// record set.
    pub async fn absorb(&self, table: &CounterTable) {
        self.counters.lock().await.absorb(table);
    }

    /// Snapshot copy of the current table for diagnostics and persistence.
    pub async fn snapshot(&self) -> CounterTable {
        self.counters.lock().await.clone()
    }
}

fn format_code(letter: char, sequence: u32) -> String {
    format!("{letter}-{sequence:03}")
}
