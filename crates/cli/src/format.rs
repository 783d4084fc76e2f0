//! Terminal formatters.
//!
//! Two modes:
//! - **Console** (default): width-limited columns, long cells wrapped onto
//!   continuation lines, footer `N row(s) in S.SSSS seconds`
//! - **JSON** (`--format json`): one JSON document per command with
//!   `columns`, `rows`, `lines`, `elapsed_secs`, `row_count` and `error`

use std::io::{self, Write};
use std::time::Duration;

use colshell_executor::Formatter;
use tracing::error;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Console,
    Json,
}

// =========================================================================
// Console
// =========================================================================

/// Human readable output. Results go to `out`, error reports to `err`.
pub struct ConsoleFormatter<W: Write, E: Write> {
    out: W,
    err: E,
    width: usize,
    widths: Vec<usize>,
    rows: u64,
    write_failed: bool,
}

impl<W: Write, E: Write> ConsoleFormatter<W, E> {
    /// Console formatter at `width` characters.
    pub fn new(out: W, err: E, width: usize) -> Self {
        Self {
            out,
            err,
            width: width.max(10),
            widths: Vec::new(),
            rows: 0,
            write_failed: false,
        }
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            note_write_error(&mut self.write_failed, &e);
        }
    }

    /// The result and error writers.
    #[cfg(test)]
    pub fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Character widths of the columns of a `columns`-wide row.
    fn column_widths(&self, columns: usize) -> Vec<usize> {
        match columns {
            0 => Vec::new(),
            1 => vec![self.width],
            2 => {
                let first = match self.widths.first() {
                    Some(pct) => self.width * pct.min(&100) / 100,
                    None => self.width / 4,
                };
                vec![first, self.width.saturating_sub(first + 2).max(1)]
            }
            n => vec![(self.width / n).saturating_sub(1).max(1); n],
        }
    }

    fn print_row(&mut self, cells: &[String]) {
        let widths = self.column_widths(cells.len());
        let splits: Vec<Vec<String>> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| split_width(cell, w))
            .collect();
        let height = splits.iter().map(Vec::len).max().unwrap_or(0);
        for line in 0..height {
            let mut text = String::new();
            for (col, (split, &w)) in splits.iter().zip(&widths).enumerate() {
                let piece = split.get(line).map(String::as_str).unwrap_or("");
                text.push(' ');
                if col + 1 < splits.len() {
                    text.push_str(&format!("{:<width$}", piece, width = w));
                } else {
                    text.push_str(piece);
                }
            }
            let result = writeln!(self.out, "{}", text.trim_end());
            self.check(result);
        }
    }
}

/// Chop `text` into pieces of at most `width` characters.
fn split_width(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

impl<W: Write, E: Write> Formatter for ConsoleFormatter<W, E> {
    fn header(&mut self, columns: &[&str], widths: &[usize]) {
        self.rows = 0;
        self.widths = widths.to_vec();
        if !columns.is_empty() {
            let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
            self.print_row(&columns);
        }
    }

    fn row(&mut self, cells: &[String]) {
        self.rows += 1;
        self.print_row(cells);
    }

    fn footer(&mut self, elapsed: Duration, row_count: Option<u64>) {
        let count = row_count.unwrap_or(self.rows);
        let result = writeln!(
            self.out,
            "{} row(s) in {:.4} seconds",
            count,
            elapsed.as_secs_f64()
        );
        self.check(result);
    }

    fn line(&mut self, text: &str) {
        let result = writeln!(self.out, "{}", text);
        self.check(result);
    }

    fn error(&mut self, message: &str, help: Option<&str>) {
        let result = match help {
            Some(help) => writeln!(
                self.err,
                "{}\n\nHere is some help for this command:\n{}\n",
                message, help
            ),
            None => writeln!(self.err, "{}", message),
        };
        self.check(result);
    }

    fn flush(&mut self) {
        let result = self.out.flush().and_then(|_| self.err.flush());
        self.check(result);
    }

    fn write_failed(&self) -> bool {
        self.write_failed
    }
}

/// Log the first failed write; later ones would only repeat it.
fn note_write_error(failed: &mut bool, e: &io::Error) {
    if !*failed {
        error!(target: "colshell::dispatch", error = %e, "Cannot write output");
        *failed = true;
    }
}

// =========================================================================
// JSON
// =========================================================================

/// Machine readable output: the calls of one command are collected and
/// written as a single JSON line on `flush`.
pub struct JsonFormatter<W: Write> {
    out: W,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    lines: Vec<String>,
    elapsed: Option<f64>,
    row_count: Option<u64>,
    error: Option<serde_json::Value>,
    write_failed: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// JSON formatter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            columns: Vec::new(),
            rows: Vec::new(),
            lines: Vec::new(),
            elapsed: None,
            row_count: None,
            error: None,
            write_failed: false,
        }
    }

    /// The underlying writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn document(&mut self) -> serde_json::Value {
        let mut doc = serde_json::Map::new();
        if !self.columns.is_empty() {
            doc.insert("columns".into(), serde_json::json!(self.columns));
        }
        if !self.rows.is_empty() || self.row_count.is_some() {
            doc.insert("rows".into(), serde_json::json!(self.rows));
        }
        if !self.lines.is_empty() {
            doc.insert("lines".into(), serde_json::json!(self.lines));
        }
        if let Some(elapsed) = self.elapsed {
            doc.insert("elapsed_secs".into(), serde_json::json!(elapsed));
        }
        if let Some(count) = self.row_count {
            doc.insert("row_count".into(), serde_json::json!(count));
        }
        if let Some(error) = self.error.take() {
            doc.insert("error".into(), error);
        }
        self.columns.clear();
        self.rows.clear();
        self.lines.clear();
        self.elapsed = None;
        self.row_count = None;
        serde_json::Value::Object(doc)
    }
}

impl<W: Write> Formatter for JsonFormatter<W> {
    fn header(&mut self, columns: &[&str], _widths: &[usize]) {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self.rows.clear();
    }

    fn row(&mut self, cells: &[String]) {
        self.rows.push(cells.to_vec());
    }

    fn footer(&mut self, elapsed: Duration, row_count: Option<u64>) {
        self.elapsed = Some(elapsed.as_secs_f64());
        self.row_count = Some(row_count.unwrap_or(self.rows.len() as u64));
    }

    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn error(&mut self, message: &str, help: Option<&str>) {
        self.error = Some(serde_json::json!({
            "message": message,
            "help": help,
        }));
    }

    fn flush(&mut self) {
        let doc = self.document();
        let mut result = Ok(());
        if doc.as_object().is_some_and(|d| !d.is_empty()) {
            result = writeln!(self.out, "{}", doc);
        }
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            note_write_error(&mut self.write_failed, &e);
        }
    }

    fn write_failed(&self) -> bool {
        self.write_failed
    }
}
