//! Append-only log of successful evaluations.
//!
//! The log is an ordinary value owned by whoever drives the calculator. It
//! locks internally, so one `Arc<History>` can be shared by several threads;
//! each `record` and `snapshot` holds the lock exactly once.

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Expression with whitespace removed.
    pub expression: String,
    pub postfix: String,
    pub result: f64,
}

impl HistoryEntry {
    /// The result with 8 decimal places.
    pub fn formatted_result(&self) -> String {
        format!("{:.8}", self.result)
    }
}

impl Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expression: {}, Postfix: {}, Result: {:.8}",
            self.expression, self.postfix, self.result
        )
    }
}

#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, expression: impl Into<String>, postfix: impl Into<String>, result: f64) {
        let entry = HistoryEntry {
            expression: expression.into(),
            postfix: postfix.into(),
            result,
        };
        trace!(%entry, "recording evaluation");
        self.entries().push(entry);
    }

    /// Copy of every entry, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries().clone()
    }

    pub fn last(&self) -> Option<HistoryEntry> {
        self.entries().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // An interrupted push leaves the vector intact, so poisoning is ignored.
    fn entries(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_insertion_order() {
        let history = History::new();
        history.record("2+3", "2 3 +", 5.0);
        history.record("4*5", "4 5 *", 20.0);

        let expressions: Vec<_> = history
            .snapshot()
            .into_iter()
            .map(|entry| entry.expression)
            .collect();
        assert_eq!(expressions, vec!["2+3", "4*5"]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|entry| entry.result), Some(20.0));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let history = History::new();
        history.record("1+1", "1 1 +", 2.0);

        let mut snapshot = history.snapshot();
        snapshot.clear();
        snapshot.push(HistoryEntry {
            expression: "9".to_string(),
            postfix: "9".to_string(),
            result: 9.0,
        });

        let fresh = history.snapshot();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].expression, "1+1");
    }

    #[test]
    fn results_render_with_eight_decimals() {
        let entry = HistoryEntry {
            expression: "sin(30)".to_string(),
            postfix: "30 sin".to_string(),
            result: 0.49999999999999994,
        };
        assert_eq!(entry.formatted_result(), "0.50000000");
        assert_eq!(
            entry.to_string(),
            "Expression: sin(30), Postfix: 30 sin, Result: 0.50000000"
        );
    }

    #[test]
    fn new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
        assert_eq!(history.last(), None);
    }
}
