//! Record of client calls made against a [`MemStore`](crate::MemStore).
//!
//! Tests use the journal to check which store operations a shell command
//! issued, e.g. that `enable` on an enabled table makes no call at all.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One call made on the store client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCall {
    /// Operation name, e.g. `enable_table`
    pub op: String,
    /// Table, region or row the call targeted; empty for cluster-wide calls
    pub target: String,
}

/// Append-only list of client calls.
#[derive(Debug, Default)]
pub struct CallJournal {
    calls: Mutex<Vec<ClientCall>>,
}

impl CallJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, op: &str, target: &str) {
        tracing::trace!(target: "colshell::store", op, target, "client call");
        self.calls.lock().push(ClientCall {
            op: op.to_string(),
            target: target.to_string(),
        });
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().clone()
    }

    /// Number of calls of one operation.
    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.op == op).count()
    }

    /// Number of calls of one operation on one target.
    pub fn count_on(&self, op: &str, target: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.op == op && c.target == target)
            .count()
    }

    /// Operation names in call order.
    pub fn ops(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.op.clone()).collect()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}
