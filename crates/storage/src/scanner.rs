//! Lazy row scanner.
//!
//! The scanner keeps only a cursor. Each `next()` takes the read lock, finds
//! the next non-empty row after the cursor and releases the lock again, so
//! a consumer that stops early never reads the rest of the table.

use std::ops::Bound;

use colshell_core::{Result, RowResult, ScanRequest};

use crate::store::MemStore;

/// Scanner over one table of a [`MemStore`].
pub struct MemScanner<'a> {
    store: &'a MemStore,
    table: String,
    request: ScanRequest,
    cursor: Bound<Vec<u8>>,
    done: bool,
}

impl<'a> MemScanner<'a> {
    pub(crate) fn new(store: &'a MemStore, table: &str, request: ScanRequest) -> Self {
        let cursor = Bound::Included(request.start_row.clone());
        Self {
            store,
            table: table.to_string(),
            request,
            cursor,
            done: false,
        }
    }
}

impl Iterator for MemScanner<'_> {
    type Item = Result<RowResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self
            .store
            .next_scan_row(&self.table, &self.request, &self.cursor)
        {
            Ok(Some(row)) => {
                self.cursor = Bound::Excluded(row.row.clone());
                Some(Ok(row))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
