//! Change history tracking.
//!
//! Every change the store applies gets a [`Change`] record with a monotonic
//! revision. The store keeps the most recent records in a bounded
//! [`ChangeHistory`] and hands the same records to its observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// What produced a change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A mutation applied by the root committer.
    Commit { mutation: String },
    /// The whole tree replaced from a snapshot.
    Restore { snapshot_id: String },
}

/// Record of a single applied change.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{Change, ChangeKind};
/// use chrono::Utc;
///
/// let change = Change {
///     revision: 1,
///     kind: ChangeKind::Commit { mutation: "Increment".to_string() },
///     timestamp: Utc::now(),
/// };
/// assert_eq!(change.mutation(), Some("Increment"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Revision of the state after this change. The initial state is revision 0.
    pub revision: u64,
    /// What produced the change
    pub kind: ChangeKind,
    /// When the change was applied
    pub timestamp: DateTime<Utc>,
}

impl Change {
    pub(crate) fn commit(revision: u64, mutation: &str) -> Self {
        Self {
            revision,
            kind: ChangeKind::Commit {
                mutation: mutation.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn restore(revision: u64, snapshot_id: &str) -> Self {
        Self {
            revision,
            kind: ChangeKind::Restore {
                snapshot_id: snapshot_id.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    /// Name of the committed mutation, `None` for restores.
    pub fn mutation(&self) -> Option<&str> {
        match &self.kind {
            ChangeKind::Commit { mutation } => Some(mutation),
            ChangeKind::Restore { .. } => None,
        }
    }
}

/// Bounded, ordered log of changes.
///
/// Once `capacity` records are held the oldest one is evicted. A capacity of
/// zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{Change, ChangeHistory, ChangeKind};
/// use chrono::Utc;
///
/// let mut history = ChangeHistory::with_capacity(2);
/// for (revision, name) in [(1, "A"), (2, "B"), (3, "C")] {
///     history.record(Change {
///         revision,
///         kind: ChangeKind::Commit { mutation: name.to_string() },
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.mutation_names(), vec!["B", "C"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredHistory")]
pub struct ChangeHistory {
    capacity: usize,
    changes: VecDeque<Change>,
}

// Wire shape of `ChangeHistory`; loading trims to the newest `capacity` changes.
#[derive(Deserialize)]
struct StoredHistory {
    capacity: usize,
    changes: VecDeque<Change>,
}

impl From<StoredHistory> for ChangeHistory {
    fn from(stored: StoredHistory) -> Self {
        let mut history = Self {
            capacity: stored.capacity,
            changes: stored.changes,
        };
        history.evict_to(history.capacity);
        history
    }
}

impl Default for ChangeHistory {
    fn default() -> Self {
        Self::with_capacity(crate::builder::DEFAULT_HISTORY_CAPACITY)
    }
}

impl ChangeHistory {
    /// Create an empty history holding at most `capacity` changes.
    ///
    /// Storage grows with use; nothing is reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            changes: VecDeque::new(),
        }
    }

    /// Record a change, evicting the oldest ones if full.
    pub fn record(&mut self, change: Change) {
        if self.capacity == 0 {
            return;
        }
        self.evict_to(self.capacity - 1);
        self.changes.push_back(change);
    }

    fn evict_to(&mut self, len: usize) {
        while self.changes.len() > len {
            self.changes.pop_front();
        }
    }

    /// Changes from oldest to newest.
    pub fn changes(&self) -> impl Iterator<Item = &Change> + '_ {
        self.changes.iter()
    }

    /// Most recent change.
    pub fn last(&self) -> Option<&Change> {
        self.changes.back()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Names of the committed mutations still held, oldest first. Restores are skipped.
    pub fn mutation_names(&self) -> Vec<&str> {
        self.changes.iter().filter_map(Change::mutation).collect()
    }

    /// Time between the oldest and newest held change.
    ///
    /// Returns `None` if the history is empty.
    pub fn span(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.changes.front(), self.changes.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
