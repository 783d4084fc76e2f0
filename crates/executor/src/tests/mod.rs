//! Behaviour tests for the executor crate, run against the in-process store.

pub mod options;
pub mod session;

use std::sync::Arc;

use colshell_core::{Arg, ShellConfig};
use colshell_storage::MemStore;

use crate::{CaptureFormatter, Dispatcher, Outcome, SessionState};

/// A dispatcher over a fresh store, with the store kept for spying.
pub(crate) struct Harness {
    pub store: Arc<MemStore>,
    pub shell: Dispatcher,
    pub out: CaptureFormatter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MemStore::new())
    }

    pub fn with_store(store: MemStore) -> Self {
        let store = Arc::new(store);
        let session = SessionState::new(store.clone(), ShellConfig::default());
        Self {
            store,
            shell: Dispatcher::new(session),
            out: CaptureFormatter::new(),
        }
    }

    /// Run a command, clearing previous output first.
    pub fn run(&mut self, name: &str, args: Vec<Arg>) -> Outcome {
        self.out.clear();
        self.shell.execute(name, &args, &mut self.out)
    }

    /// Run a command that must succeed.
    pub fn ok(&mut self, name: &str, args: Vec<Arg>) {
        let outcome = self.run(name, args);
        assert_eq!(
            outcome,
            Outcome::Success,
            "{} failed: {:?}",
            name,
            self.out.events()
        );
    }
}

/// Shorthand for a string argument.
pub(crate) fn s(value: &str) -> Arg {
    Arg::from(value)
}
