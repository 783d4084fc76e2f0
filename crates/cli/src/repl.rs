//! Input loops.
//!
//! Interactive mode: rustyline prompt, history, TAB completion of command
//! names. Pipe mode: one command per line from stdin. Script mode: the
//! lines of a file, run before the prompt.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::{debug, warn};

use colshell_executor::Formatter;

use crate::state::{LineResult, ShellState};

/// Run the interactive prompt. Returns the process exit code.
pub fn run_repl<F: Formatter>(state: &mut ShellState<F>, history: Option<PathBuf>) -> i32 {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<ShellHelper, DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("ERROR: cannot start the line editor: {}", e);
            return 1;
        }
    };
    rl.set_helper(Some(ShellHelper::new(state.command_names())));

    if let Some(ref path) = history {
        if let Err(e) = rl.load_history(path) {
            debug!(target: "colshell::config", path = %path.display(), error = %e, "No history loaded");
        }
    }

    let code = loop {
        match rl.readline(&state.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if let LineResult::Exit(code) = state.run_line(trimmed) {
                    break code;
                }
            }
            // Ctrl-C drops the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break 0,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                break 1;
            }
        }
    };

    if let Some(ref path) = history {
        if let Err(e) = rl.save_history(path) {
            warn!(target: "colshell::config", path = %path.display(), error = %e, "Could not save history");
        }
    }
    code
}

/// Run every line of `input`. Returns 1 if any command failed, the code
/// given to `exit` if one is called, else 0.
pub fn run_pipe<F: Formatter, R: BufRead>(state: &mut ShellState<F>, input: R) -> i32 {
    match run_lines(state, input) {
        Some(code) => code,
        None if state.any_failed() => 1,
        None => 0,
    }
}

/// Run a script file. `Ok(Some(code))` when the script called `exit`.
pub fn run_script<F: Formatter>(
    state: &mut ShellState<F>,
    path: &Path,
) -> Result<Option<i32>, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("cannot read script '{}': {}", path.display(), e))?;
    Ok(run_lines(state, std::io::BufReader::new(file)))
}

fn run_lines<F: Formatter, R: BufRead>(state: &mut ShellState<F>, input: R) -> Option<i32> {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(target: "colshell::dispatch", error = %e, "Input read failed");
                break;
            }
        };
        if let LineResult::Exit(code) = state.run_line(&line) {
            return Some(code);
        }
        if state.output_broken() {
            warn!(target: "colshell::dispatch", "Output closed, stopping");
            break;
        }
    }
    None
}

// =========================================================================
// TAB Completion
// =========================================================================

struct ShellHelper {
    commands: Vec<String>,
}

impl ShellHelper {
    fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    fn candidates(&self, prefix: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect()
    }
}

impl Helper for ShellHelper {}
impl Validator for ShellHelper {}
impl Highlighter for ShellHelper {}
impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_pos = &line[..pos];
        let prefix = line_to_pos.trim_start();
        // Only the command name is completed
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((pos - prefix.len(), self.candidates(prefix)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};
    use std::sync::Arc;

    use colshell_core::ShellConfig;
    use colshell_executor::{CaptureFormatter, Dispatcher, FormatEvent, SessionState};
    use colshell_storage::MemStore;

    use super::*;
    use crate::format::JsonFormatter;

    fn shell() -> ShellState<CaptureFormatter> {
        let session = SessionState::new(Arc::new(MemStore::new()), ShellConfig::default());
        ShellState::new(Dispatcher::new(session), CaptureFormatter::new())
    }

    #[test]
    fn test_pipe_success() {
        let mut state = shell();
        let input = "# setup\ncreate 't1', 'x'\n\nput 't1', 'r1', 'x:a', 'v1'\nscan 't1'\n";
        assert_eq!(run_pipe(&mut state, Cursor::new(input)), 0);
        assert_eq!(state.formatter().last_footer(), Some(1));
    }

    #[test]
    fn test_pipe_failure_sets_exit_code_and_continues() {
        let mut state = shell();
        let input = "get 'missing', 'r1'\ncreate 't1', 'x'\nexists 't1'\n";
        assert_eq!(run_pipe(&mut state, Cursor::new(input)), 1);
        assert_eq!(state.formatter().rows(), vec![&["true".to_string()][..]]);
    }

    #[test]
    fn test_pipe_exit_stops_reading() {
        let mut state = shell();
        let input = "exit 3\ncreate 't1', 'x'\n";
        assert_eq!(run_pipe(&mut state, Cursor::new(input)), 3);
        assert_eq!(state.formatter().events(), &[FormatEvent::Flush]);
    }

    #[test]
    fn test_pipe_stops_when_output_is_closed() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
        }

        let session = SessionState::new(Arc::new(MemStore::new()), ShellConfig::default());
        let out = JsonFormatter::new(Closed);
        let mut state = ShellState::new(Dispatcher::new(session), out);
        let input = "create 't1', 'x'\ncreate 't2', 'y'\n";
        assert_eq!(run_pipe(&mut state, Cursor::new(input)), 1);
        assert!(state.output_broken());
    }

    #[test]
    fn test_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.cs");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "create 't1', {{NAME => 'x', VERSIONS => 5}}").unwrap();
        writeln!(file, "describe 't1'").unwrap();
        drop(file);

        let mut state = shell();
        assert_eq!(run_script(&mut state, &path), Ok(None));
        assert!(state.formatter().rows()[0][0].contains("VERSIONS => '5'"));

        assert!(run_script(&mut state, &dir.path().join("missing.cs")).is_err());
    }

    #[test]
    fn test_completion_candidates() {
        let helper = ShellHelper::new(vec![
            "delete".into(),
            "deleteall".into(),
            "describe".into(),
            "drop".into(),
        ]);
        let names: Vec<String> = helper.candidates("dele").into_iter().map(|p| p.display).collect();
        assert_eq!(names, vec!["delete", "deleteall"]);
        assert_eq!(helper.candidates("").len(), 4);
    }
}
