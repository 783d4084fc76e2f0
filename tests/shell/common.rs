//! Shared helpers for the shell test suite.

#![allow(dead_code)]

use std::sync::Arc;

use colshell::{Arg, CaptureFormatter, Dispatcher, Outcome, SessionState, ShellConfig};
use colshell_storage::{ClusterLayout, MemStore};

/// A shell session with its store and captured output.
pub struct TestShell {
    pub store: Arc<MemStore>,
    pub shell: Dispatcher,
    pub out: CaptureFormatter,
}

impl TestShell {
    pub fn new() -> Self {
        Self::with_layout(ClusterLayout::single())
    }

    pub fn with_layout(layout: ClusterLayout) -> Self {
        let store = Arc::new(MemStore::with_layout(layout));
        let session = SessionState::new(store.clone(), ShellConfig::default());
        Self {
            store,
            shell: Dispatcher::new(session),
            out: CaptureFormatter::new(),
        }
    }

    /// Run a command with fresh output.
    pub fn run(&mut self, name: &str, args: &[Arg]) -> Outcome {
        self.out.clear();
        self.shell.execute(name, args, &mut self.out)
    }

    /// Run a command that must succeed.
    pub fn ok(&mut self, name: &str, args: &[Arg]) {
        let outcome = self.run(name, args);
        assert_eq!(
            outcome,
            Outcome::Success,
            "{} {:?} failed: {:?}",
            name,
            args,
            self.out.events()
        );
    }

    /// Rows of the last command.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.out.rows().into_iter().map(|r| r.to_vec()).collect()
    }
}

/// String argument.
pub fn s(value: &str) -> Arg {
    Arg::from(value)
}

/// Dictionary argument.
pub fn dict<const N: usize>(pairs: [(&str, Arg); N]) -> Arg {
    Arg::dict(pairs)
}
