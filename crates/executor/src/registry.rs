//! Command registry.
//!
//! Commands are registered once at startup and dispatched by exact name
//! lookup. Names are kept sorted so help listings and completion are stable.

use std::collections::BTreeMap;

use crate::command::{CommandGroup, ShellCommand};
use crate::handlers;

/// Name to command mapping.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn ShellCommand>>,
}

impl CommandRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        handlers::register_all(&mut registry);
        registry
    }

    /// Add a command, replacing any command of the same name.
    pub fn register(&mut self, command: Box<dyn ShellCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Look up a command.
    pub fn get(&self, name: &str) -> Option<&dyn ShellCommand> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Commands of one help section, sorted by name.
    pub fn in_group(&self, group: CommandGroup) -> Vec<&dyn ShellCommand> {
        self.commands
            .values()
            .filter(|c| c.group() == group)
            .map(|c| c.as_ref())
            .collect()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
