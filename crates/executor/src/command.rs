//! The shell command contract.
//!
//! Every command is a [`ShellCommand`] registered by name in the
//! [`CommandRegistry`](crate::CommandRegistry). A command validates its
//! positional arguments with [`Args`], calls the admin or table facade and
//! returns a typed [`Output`]. Commands never catch their own errors; the
//! dispatcher reports them.

use colshell_core::{Arg, ColumnSpec, Error, OptionMap, Result};

use crate::format::Formatter;
use crate::output::Output;
use crate::registry::CommandRegistry;
use crate::session::SessionState;

/// Help section a command is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandGroup {
    /// Session and cluster commands
    General,
    /// Schema and table lifecycle
    Ddl,
    /// Data reads and writes
    Dml,
    /// Region surgery for experts
    Tools,
}

impl CommandGroup {
    /// Every group, in help order.
    pub const ALL: [CommandGroup; 4] = [
        CommandGroup::General,
        CommandGroup::Ddl,
        CommandGroup::Dml,
        CommandGroup::Tools,
    ];

    /// Heading used in help output.
    pub fn title(&self) -> &'static str {
        match self {
            CommandGroup::General => "GENERAL",
            CommandGroup::Ddl => "DDL",
            CommandGroup::Dml => "DML",
            CommandGroup::Tools => "TOOLS",
        }
    }
}

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    /// Session state (client, config, admin handle)
    pub session: &'a mut SessionState,
    /// Output sink, for commands that stream rows while running
    pub out: &'a mut dyn Formatter,
    /// Registry the command was found in
    pub registry: &'a CommandRegistry,
}

/// A named shell command.
pub trait ShellCommand: Send + Sync {
    /// Name typed at the prompt.
    fn name(&self) -> &'static str;

    /// Help section.
    fn group(&self) -> CommandGroup;

    /// Usage text shown by `help <name>` and after a failed invocation.
    fn help(&self) -> &'static str;

    /// Run the command.
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[Arg]) -> Result<Output>;
}

// =============================================================================
// Positional arguments
// =============================================================================

/// Positional argument accessor for one command invocation.
pub struct Args<'a> {
    command: &'static str,
    args: &'a [Arg],
}

impl<'a> Args<'a> {
    /// Wrap the arguments of `command`, checking their count.
    ///
    /// # Errors
    ///
    /// `WrongArgumentCount` outside `min..=max` (`max = None` is unbounded).
    pub fn new(
        command: &'static str,
        args: &'a [Arg],
        min: usize,
        max: Option<usize>,
    ) -> Result<Self> {
        let ok = args.len() >= min && max.map_or(true, |max| args.len() <= max);
        if !ok {
            let expected = match max {
                Some(max) if max == min => min.to_string(),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            return Err(Error::WrongArgumentCount {
                command: command.to_string(),
                expected,
                actual: args.len(),
            });
        }
        Ok(Self { command, args })
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether no argument was given.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn present(&self, idx: usize) -> Option<&'a Arg> {
        self.args.get(idx).filter(|a| !a.is_nil())
    }

    fn missing(&self, what: &str) -> Error {
        Error::WrongArgumentCount {
            command: self.command.to_string(),
            expected: format!("a {}", what),
            actual: self.args.len(),
        }
    }

    /// Required string argument, e.g. a table or region name.
    pub fn string(&self, idx: usize, what: &str) -> Result<String> {
        let arg = self.present(idx).ok_or_else(|| self.missing(what))?;
        arg.as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_type(what, "String", arg.type_name()))
    }

    /// Optional string argument.
    pub fn opt_string(&self, idx: usize, what: &str) -> Result<Option<String>> {
        match self.present(idx) {
            None => Ok(None),
            Some(_) => self.string(idx, what).map(Some),
        }
    }

    /// Required byte-string argument, e.g. a row key.
    pub fn bytes(&self, idx: usize, what: &str) -> Result<Vec<u8>> {
        let arg = self.present(idx).ok_or_else(|| self.missing(what))?;
        arg.as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::invalid_type(what, "String", arg.type_name()))
    }

    /// Cell value: a string, or an integer written as its decimal text.
    pub fn value(&self, idx: usize) -> Result<Vec<u8>> {
        match self.present(idx) {
            Some(Arg::Int(i)) => Ok(i.to_string().into_bytes()),
            _ => self.bytes(idx, "value"),
        }
    }

    /// Required column specifier.
    pub fn column(&self, idx: usize) -> Result<ColumnSpec> {
        ColumnSpec::parse(&self.bytes(idx, "column")?)
    }

    /// Optional column specifier; `nil` counts as absent.
    pub fn opt_column(&self, idx: usize) -> Result<Option<ColumnSpec>> {
        match self.present(idx) {
            None => Ok(None),
            Some(_) => self.column(idx).map(Some),
        }
    }

    /// Optional integer argument.
    pub fn opt_int(&self, idx: usize, what: &str) -> Result<Option<i64>> {
        match self.present(idx) {
            None => Ok(None),
            Some(arg) => arg
                .as_int()
                .map(Some)
                .ok_or_else(|| Error::invalid_type(what, "Int", arg.type_name())),
        }
    }

    /// Optional timestamp argument.
    pub fn opt_timestamp(&self, idx: usize) -> Result<Option<u64>> {
        match self.opt_int(idx, "timestamp")? {
            Some(ts) if ts < 0 => Err(Error::invalid_type(
                "timestamp",
                "a non-negative Int",
                ts.to_string(),
            )),
            other => Ok(other.map(|ts| ts as u64)),
        }
    }

    /// Optional option dictionary.
    pub fn opt_dict(&self, idx: usize) -> Result<Option<&'a OptionMap>> {
        match self.present(idx) {
            None => Ok(None),
            Some(arg) => arg
                .as_dict()
                .map(Some)
                .ok_or_else(|| Error::invalid_type("options", "Dictionary", arg.type_name())),
        }
    }

    /// Arguments from `from` onwards.
    pub fn rest(&self, from: usize) -> &'a [Arg] {
        self.args.get(from..).unwrap_or(&[])
    }
}
