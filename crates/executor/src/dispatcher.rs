//! Shell dispatcher.
//!
//! [`Dispatcher::execute`] is the single boundary where command failures
//! are handled. Each invocation goes through
//! `Parsing -> Dispatching -> Executing -> Reporting` and always ends back
//! at the prompt:
//!
//! - success renders the command [`Output`](crate::Output) with the elapsed
//!   time measured from dispatch start;
//! - a user error (bad input, table state) prints `ERROR: <message>` followed
//!   by the help text of the command;
//! - a store or internal failure prints `INTERNAL ERROR: <message>` and is
//!   logged at `error` level, so it is never confused with bad input.
//!
//! The formatter is flushed on every path. Session state is never changed
//! by a failed command.

use std::time::Instant;

use tracing::{debug, error};

use colshell_core::{Arg, Error};

use crate::command::CommandContext;
use crate::format::Formatter;
use crate::registry::CommandRegistry;
use crate::session::SessionState;

/// Result of one dispatched command. The session continues after every
/// outcome except [`Outcome::Exit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Command completed
    Success,
    /// Command rejected its input or the table state
    UserError(Error),
    /// The store or the shell failed
    InternalError(Error),
    /// `exit` was called with this code
    Exit(i32),
}

impl Outcome {
    /// Whether the command failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::UserError(_) | Outcome::InternalError(_))
    }
}

/// Routes command names to registered commands and reports the result.
pub struct Dispatcher {
    registry: CommandRegistry,
    session: SessionState,
}

impl Dispatcher {
    /// Dispatcher with every built-in command.
    pub fn new(session: SessionState) -> Self {
        Self::with_registry(CommandRegistry::standard(), session)
    }

    /// Dispatcher over a custom registry.
    pub fn with_registry(registry: CommandRegistry, session: SessionState) -> Self {
        Self { registry, session }
    }

    /// Registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Execute one command and report its result through `out`.
    pub fn execute(&mut self, name: &str, args: &[Arg], out: &mut dyn Formatter) -> Outcome {
        let start = Instant::now();
        debug!(target: "colshell::dispatch", command = name, args = args.len(), "Dispatching");

        let Some(command) = self.registry.get(name) else {
            let err = Error::UnknownCommand {
                name: name.to_string(),
            };
            out.error(&format!("ERROR: {}", err), None);
            out.flush();
            return Outcome::UserError(err);
        };

        let result = {
            let mut ctx = CommandContext {
                session: &mut self.session,
                out: &mut *out,
                registry: &self.registry,
            };
            command.execute(&mut ctx, args)
        };

        let outcome = match result {
            Ok(output) => {
                output.render(out, start.elapsed());
                match output.exit_code() {
                    Some(code) => Outcome::Exit(code),
                    None => Outcome::Success,
                }
            }
            Err(err) if err.is_user_error() => {
                debug!(target: "colshell::dispatch", command = name, kind = err.kind(), "Command rejected");
                out.error(&format!("ERROR: {}", err), Some(command.help()));
                Outcome::UserError(err)
            }
            Err(err) => {
                error!(target: "colshell::dispatch", command = name, kind = err.kind(), error = %err, "Command failed");
                out.error(&format!("INTERNAL ERROR: {}", err), None);
                if self.session.config().debug {
                    out.line(&format!("{:#?}", err));
                }
                Outcome::InternalError(err)
            }
        };

        debug!(
            target: "colshell::dispatch",
            command = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Command finished"
        );
        out.flush();
        outcome
    }
}
