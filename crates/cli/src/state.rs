//! Line-level shell state.
//!
//! Wraps the dispatcher and the formatter, counts input lines for the
//! prompt and remembers whether any command failed (the pipe mode exit
//! code).

use colshell_executor::{Dispatcher, Formatter, Outcome};
use tracing::debug;

use crate::parse::{parse_line, ShellAction};

/// What the input loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineResult {
    /// Read the next line
    Continue,
    /// Stop with this exit code
    Exit(i32),
}

/// Dispatcher plus formatter for one shell process.
pub struct ShellState<F: Formatter> {
    dispatcher: Dispatcher,
    out: F,
    line_no: usize,
    failed: bool,
}

impl<F: Formatter> ShellState<F> {
    /// Shell over `dispatcher`, rendering through `out`.
    pub fn new(dispatcher: Dispatcher, out: F) -> Self {
        Self {
            dispatcher,
            out,
            line_no: 0,
            failed: false,
        }
    }

    /// Parse and run one input line.
    pub fn run_line(&mut self, line: &str) -> LineResult {
        self.line_no += 1;
        let result = match parse_line(line) {
            Ok(ShellAction::Skip) => LineResult::Continue,
            Ok(ShellAction::Run { name, args }) => {
                match self.dispatcher.execute(&name, &args, &mut self.out) {
                    Outcome::Exit(code) => LineResult::Exit(code),
                    outcome => {
                        if outcome.is_failure() {
                            self.failed = true;
                        }
                        LineResult::Continue
                    }
                }
            }
            Err(reason) => {
                debug!(target: "colshell::dispatch", line = self.line_no, %reason, "Syntax error");
                self.failed = true;
                self.out
                    .error(&format!("SyntaxError: line {}: {}", self.line_no, reason), None);
                self.out.flush();
                LineResult::Continue
            }
        };
        if self.out.write_failed() {
            self.failed = true;
        }
        result
    }

    /// Whether output can no longer be written.
    pub fn output_broken(&self) -> bool {
        self.out.write_failed()
    }

    /// Whether any line failed so far.
    pub fn any_failed(&self) -> bool {
        self.failed
    }

    /// Registered command names, for completion.
    pub fn command_names(&self) -> Vec<String> {
        self.dispatcher
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// The formatter.
    #[cfg(test)]
    pub fn formatter(&self) -> &F {
        &self.out
    }

    /// Prompt for the next line: `colshell(main):001:0> `.
    pub fn prompt(&self) -> String {
        format!("colshell(main):{:03}:0> ", self.line_no + 1)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use colshell_core::ShellConfig;
    use colshell_executor::{CaptureFormatter, SessionState};
    use colshell_storage::MemStore;

    use super::*;
    use crate::format::ConsoleFormatter;

    fn shell() -> ShellState<CaptureFormatter> {
        let session = SessionState::new(Arc::new(MemStore::new()), ShellConfig::default());
        ShellState::new(Dispatcher::new(session), CaptureFormatter::new())
    }

    #[test]
    fn test_runs_lines_and_tracks_failures() {
        let mut shell = shell();
        assert_eq!(shell.prompt(), "colshell(main):001:0> ");
        assert_eq!(shell.run_line("create 't1', 'x'"), LineResult::Continue);
        assert!(!shell.any_failed());
        assert_eq!(shell.run_line("drop 't1'"), LineResult::Continue);
        assert!(shell.any_failed());
        assert_eq!(shell.prompt(), "colshell(main):003:0> ");
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        let mut shell = shell();
        shell.run_line("put 't1', ");
        assert!(shell.any_failed());
        assert!(shell.formatter().errors()[0].starts_with("SyntaxError: line 1:"));
    }

    #[test]
    fn test_exit() {
        let mut shell = shell();
        assert_eq!(shell.run_line("# comment"), LineResult::Continue);
        assert_eq!(shell.run_line("exit 2"), LineResult::Exit(2));
    }

    #[test]
    fn test_write_failure_marks_the_session_failed() {
        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let session = SessionState::new(Arc::new(MemStore::new()), ShellConfig::default());
        let out = ConsoleFormatter::new(Closed, Vec::new(), 80);
        let mut shell = ShellState::new(Dispatcher::new(session), out);
        assert!(!shell.output_broken());

        assert_eq!(shell.run_line("create 't1', 'x'"), LineResult::Continue);
        assert!(shell.output_broken());
        assert!(shell.any_failed());
    }

    #[test]
    fn test_command_names() {
        let names = shell().command_names();
        assert!(names.contains(&"scan".to_string()));
        assert!(names.contains(&"close_region".to_string()));
    }
}
