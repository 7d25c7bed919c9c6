//! Folding pending header operations into the headers of one request.
//!
//! WHY: SET, REPLACE and REMOVE operations at two lifetimes have to collapse
//! into one deterministic header set per request, and the all-requests part
//! has to survive for the requests after it.
//!
//! WHAT: `resolve` is a pure function from `PendingHeaders` to a
//! `Resolution` holding the winning entries and the pending state for the
//! following request. Nothing is computed or mutated here.
//!
//! HOW: Entries are grouped by header name in first-encounter order. Each
//! group is folded left to right starting from "no header":
//!
//! | entry   | nothing resolved | header resolved |
//! |---------|------------------|-----------------|
//! | SET     | becomes resolved | no-op           |
//! | REPLACE | no-op            | replaces it     |
//! | REMOVE  | no-op            | clears it       |
//!
//! Every all-requests entry is carried forward whatever its operation and
//! whether or not it won, so all-requests overrides and removals keep
//! applying to later requests. Next-request entries are never carried.

use crate::headers::{HeaderEntry, HeaderOperation};
use std::collections::HashMap;

/// Pending entries of one header name, in registration order.
#[derive(Debug, Clone)]
pub struct PendingGroup {
    name: String,
    entries: Vec<HeaderEntry>,
}

impl PendingGroup {
    /// Name the group was first registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }
}

/// Header name to ordered pending entries.
///
/// Groups keep the order their names were first encountered in, which is
/// the order resolved headers are emitted in.
#[derive(Debug, Clone, Default)]
pub struct PendingHeaders {
    groups: Vec<PendingGroup>,
    index: HashMap<String, usize>,
}

impl PendingHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the group of its name.
    pub fn push(&mut self, entry: HeaderEntry) {
        let key = entry.key();
        if let Some(&position) = self.index.get(&key) {
            self.groups[position].entries.push(entry);
            return;
        }

        self.index.insert(key, self.groups.len());
        self.groups.push(PendingGroup {
            name: entry.name().to_string(),
            entries: vec![entry],
        });
    }

    /// Returns true if any entry of that name is pending.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    /// Pending entries for a header name.
    #[must_use]
    pub fn entries_for(&self, name: &str) -> &[HeaderEntry] {
        self.index
            .get(&name.to_ascii_lowercase())
            .map_or(&[], |&position| self.groups[position].entries.as_slice())
    }

    pub fn groups(&self) -> impl Iterator<Item = &PendingGroup> + '_ {
        self.groups.iter()
    }

    /// Total number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Result of folding the pending state once.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Winning entry per header name, in first-encounter order.
    pub resolved: Vec<HeaderEntry>,
    /// Pending state for the request after this one.
    pub carry_forward: PendingHeaders,
}

/// Folds the pending state into the headers of the next request.
#[must_use]
pub fn resolve(pending: &PendingHeaders) -> Resolution {
    let mut resolved = Vec::with_capacity(pending.groups.len());
    let mut carry_forward = PendingHeaders::new();

    for group in &pending.groups {
        let mut current: Option<&HeaderEntry> = None;

        for entry in &group.entries {
            current = match (entry.operation(), current) {
                (HeaderOperation::Set, None) | (HeaderOperation::Replace, Some(_)) => Some(entry),
                (HeaderOperation::Set, Some(winner)) => Some(winner),
                (HeaderOperation::Remove, _) | (HeaderOperation::Replace, None) => None,
            };

            if entry.scope().is_all_requests() {
                carry_forward.push(entry.clone());
            }
        }

        if let Some(winner) = current {
            resolved.push(winner.clone());
        }
    }

    Resolution {
        resolved,
        carry_forward,
    }
}
