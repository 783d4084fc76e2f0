//! Input line → shell action.
//!
//! A line is a command name followed by comma separated arguments:
//!
//! ```text
//! put 't1', 'r1', 'x:a', 'v1'
//! scan 't1', {COLUMNS => ['x', 'y:q'], LIMIT => 10}
//! ```
//!
//! Blank lines and `#` comments parse to [`ShellAction::Skip`]. `quit` is
//! an alias of `exit`.

use colshell_executor::Arg;

use crate::value::Lexer;

/// The result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Nothing to run
    Skip,
    /// Run a command
    Run {
        /// Command name
        name: String,
        /// Parsed arguments
        args: Vec<Arg>,
    },
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Result<ShellAction, String> {
    let mut lexer = Lexer::new(line);
    if lexer.at_end() {
        return Ok(ShellAction::Skip);
    }
    let name = lexer.word();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(format!("expected a command name, found '{}'", lexer.rest().trim()));
    }
    let name = match name {
        "quit" => "exit",
        other => other,
    };
    let args = lexer.args()?;
    Ok(ShellAction::Run {
        name: name.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), ShellAction::Skip);
        assert_eq!(parse_line("   ").unwrap(), ShellAction::Skip);
        assert_eq!(parse_line("# setup").unwrap(), ShellAction::Skip);
    }

    #[test]
    fn test_command_with_args() {
        let action = parse_line("get 't1', 'r1', {COLUMN => 'x:a'}").unwrap();
        assert_eq!(
            action,
            ShellAction::Run {
                name: "get".into(),
                args: vec![
                    Arg::from("t1"),
                    Arg::from("r1"),
                    Arg::dict([("COLUMN", Arg::from("x:a"))]),
                ],
            }
        );
    }

    #[test]
    fn test_command_without_args() {
        assert_eq!(
            parse_line("  list  ").unwrap(),
            ShellAction::Run {
                name: "list".into(),
                args: vec![]
            }
        );
        assert_eq!(
            parse_line("quit").unwrap(),
            ShellAction::Run {
                name: "exit".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_bad_lines() {
        assert!(parse_line("'t1'").is_err());
        assert!(parse_line("Scan 't1'").is_err());
        assert!(parse_line("put 't1',").is_err());
    }
}
