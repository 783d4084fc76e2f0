//! Result formatter contract.
//!
//! Every command renders through a [`Formatter`]: a header with optional
//! column widths, zero or more rows, and a footer carrying the elapsed time
//! and row count. Free-form lines (help, status, progress) and error
//! reports go through the same sink so output ordering is preserved.
//!
//! [`CaptureFormatter`] records every call and is what tests assert on.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sink for command output.
pub trait Formatter {
    /// Start a result table. Empty `columns` means a header-less result;
    /// `widths` are percentages of the output width, per column.
    fn header(&mut self, columns: &[&str], widths: &[usize]);

    /// One result row.
    fn row(&mut self, cells: &[String]);

    /// End a result table. `None` counts the rows written since the header.
    fn footer(&mut self, elapsed: Duration, row_count: Option<u64>);

    /// A free-form line.
    fn line(&mut self, text: &str);

    /// Report a failed command, with the command help if it has one.
    fn error(&mut self, message: &str, help: Option<&str>);

    /// Push buffered output to the terminal.
    fn flush(&mut self);

    /// Whether output could not be written, e.g. a closed pipe.
    fn write_failed(&self) -> bool {
        false
    }
}

/// One recorded formatter call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatEvent {
    /// `header`
    Header(Vec<String>),
    /// `row`
    Row(Vec<String>),
    /// `footer`, with the resolved row count
    Footer(u64),
    /// `line`
    Line(String),
    /// `error`
    Error {
        /// Error message
        message: String,
        /// Command help
        help: Option<String>,
    },
    /// `flush`
    Flush,
}

/// Formatter that records events instead of printing them.
#[derive(Debug, Default)]
pub struct CaptureFormatter {
    events: Vec<FormatEvent>,
    rows_since_header: u64,
}

impl CaptureFormatter {
    /// Empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event, in order.
    pub fn events(&self) -> &[FormatEvent] {
        &self.events
    }

    /// Recorded rows.
    pub fn rows(&self) -> Vec<&[String]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FormatEvent::Row(cells) => Some(cells.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Recorded free-form lines.
    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FormatEvent::Line(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded error messages.
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FormatEvent::Error { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Row count of the last footer.
    pub fn last_footer(&self) -> Option<u64> {
        self.events.iter().rev().find_map(|e| match e {
            FormatEvent::Footer(n) => Some(*n),
            _ => None,
        })
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.rows_since_header = 0;
    }
}

impl Formatter for CaptureFormatter {
    fn header(&mut self, columns: &[&str], _widths: &[usize]) {
        self.rows_since_header = 0;
        self.events.push(FormatEvent::Header(
            columns.iter().map(|c| c.to_string()).collect(),
        ));
    }

    fn row(&mut self, cells: &[String]) {
        self.rows_since_header += 1;
        self.events.push(FormatEvent::Row(cells.to_vec()));
    }

    fn footer(&mut self, _elapsed: Duration, row_count: Option<u64>) {
        let count = row_count.unwrap_or(self.rows_since_header);
        self.events.push(FormatEvent::Footer(count));
    }

    fn line(&mut self, text: &str) {
        self.events.push(FormatEvent::Line(text.to_string()));
    }

    fn error(&mut self, message: &str, help: Option<&str>) {
        self.events.push(FormatEvent::Error {
            message: message.to_string(),
            help: help.map(str::to_string),
        });
    }

    fn flush(&mut self) {
        self.events.push(FormatEvent::Flush);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_defaults_to_rows_since_header() {
        let mut out = CaptureFormatter::new();
        out.header(&["ROW"], &[]);
        out.row(&["a".into()]);
        out.row(&["b".into()]);
        out.footer(Duration::ZERO, None);
        assert_eq!(out.last_footer(), Some(2));

        out.header(&[], &[]);
        out.footer(Duration::ZERO, Some(7));
        assert_eq!(out.last_footer(), Some(7));
        assert_eq!(out.rows().len(), 2);
    }
}
