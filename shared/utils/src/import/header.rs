//! Header row location.

use tracing::debug;

use super::grid::Grid;
use crate::error::FormatError;

pub const DEFAULT_HEADER_SCAN_ROWS: usize = 50;

/// Header cells written by the native export, matched exactly.
const NATIVE_SIGNALS: &[&str] = &["ID", "Name", "Category", "Description", "Min Stock Level"];

/// Marketplace header tokens (item code, model number, serial no), matched
/// as substrings.
const MARKETPLACE_SIGNALS: &[&str] = &["商品编号", "型号", "序号"];

/// The located header row and its position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRow<'a> {
    pub index: usize,
    pub cells: &'a [String],
}

/// Returns the first of the leading `scan_rows` rows carrying a native or
/// marketplace header signal.
pub fn locate_header(grid: &Grid, scan_rows: usize) -> Result<HeaderRow<'_>, FormatError> {
    grid.iter()
        .take(scan_rows)
        .enumerate()
        .filter(|(_, row)| !row.is_empty())
        .find(|(_, row)| has_header_signal(row))
        .map(|(index, cells)| {
            debug!(index, headers = ?cells, "Located header row");
            HeaderRow { index, cells }
        })
        .ok_or_else(|| FormatError::new("header row not found"))
}

fn has_header_signal(row: &[String]) -> bool {
    row.iter().map(|cell| cell.trim()).any(|text| {
        NATIVE_SIGNALS.contains(&text)
            || MARKETPLACE_SIGNALS.iter().any(|token| text.contains(token))
    })
}
