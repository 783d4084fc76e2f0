//! Command results.
//!
//! Every command produces exactly one [`Output`]. The dispatcher renders it
//! through the active [`Formatter`] once the command has returned, passing
//! the elapsed time measured from dispatch start. Commands that stream their
//! rows while executing (`scan`, `count`) return [`Output::Streamed`], which
//! only closes the table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::Formatter;

/// Successful command results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    // ==================== Tabular ====================
    /// No result rows; renders an empty table and its footer
    Done,

    /// Result table
    Table {
        /// Column headings; empty for a header-less table
        columns: Vec<String>,
        /// Column width hints, as percentages of the output width
        widths: Vec<usize>,
        /// Result rows
        rows: Vec<Vec<String>>,
    },

    /// Rows were already written while the command ran
    Streamed {
        /// Rows reported in the footer
        row_count: u64,
    },

    /// New value of a counter
    Counter(i64),

    // ==================== Text ====================
    /// Plain lines without a footer (help, status, version)
    Text(Vec<String>),

    // ==================== Session ====================
    /// Leave the session with this exit code
    Exit(i32),
}

impl Output {
    /// Single-column table with one row per value.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Output::Table {
            columns: Vec::new(),
            widths: Vec::new(),
            rows: values.into_iter().map(|v| vec![v.into()]).collect(),
        }
    }

    /// Exit code requested by the command, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Output::Exit(code) => Some(*code),
            _ => None,
        }
    }

    /// Render through `out`.
    pub fn render(&self, out: &mut dyn Formatter, elapsed: Duration) {
        match self {
            Output::Done => {
                out.header(&[], &[]);
                out.footer(elapsed, None);
            }
            Output::Table {
                columns,
                widths,
                rows,
            } => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                out.header(&columns, widths);
                for row in rows {
                    out.row(row);
                }
                out.footer(elapsed, None);
            }
            Output::Streamed { row_count } => out.footer(elapsed, Some(*row_count)),
            Output::Counter(value) => {
                out.header(&[], &[]);
                out.line(&format!("COUNTER VALUE = {}", value));
                out.footer(elapsed, None);
            }
            Output::Text(lines) => {
                for line in lines {
                    out.line(line);
                }
            }
            Output::Exit(_) => {}
        }
    }
}
