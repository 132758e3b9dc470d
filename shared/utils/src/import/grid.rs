//! Tabular extraction.
//!
//! Turns a binary workbook, a spreadsheet saved as HTML, or comma-delimited
//! text into a grid of trimmed string cells.

use calamine::{open_workbook_from_rs, DataType, Reader, Xls, Xlsx};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use tracing::debug;

use crate::error::FormatError;

/// Rows of trimmed cells; blank cells are empty strings.
pub type Grid = Vec<Vec<String>>;

static TABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<table[^>]*>(.*?)</table>").expect("valid table pattern"));
static ROW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid row pattern"));
static CELL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<t[hd][^>]*>(.*?)</t[hd]>").expect("valid cell pattern"));
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Reads the first sheet of an xlsx or legacy xls workbook.
pub fn from_spreadsheet(data: &[u8]) -> Result<Grid, FormatError> {
    first_sheet::<Xlsx<Cursor<&[u8]>>>(data)
        .or_else(|| first_sheet::<Xls<Cursor<&[u8]>>>(data))
        .ok_or_else(|| FormatError::new("unreadable binary sheet"))
}

fn first_sheet<'a, R>(data: &'a [u8]) -> Option<Grid>
where
    R: Reader<Cursor<&'a [u8]>>,
{
    let mut workbook: R = match open_workbook_from_rs(Cursor::new(data)) {
        Ok(workbook) => workbook,
        Err(e) => {
            debug!(error = ?e, "Workbook could not be opened");
            return None;
        }
    };

    let sheet_name = workbook.sheet_names().first().cloned()?;
    let range = match workbook.worksheet_range(&sheet_name)? {
        Ok(range) => range,
        Err(e) => {
            debug!(error = ?e, sheet = %sheet_name, "Worksheet could not be read");
            return None;
        }
    };

    debug!(sheet = %sheet_name, rows = range.height(), "Read first worksheet");

    Some(
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell: &DataType| cell.to_string().trim().to_string())
                    .collect()
            })
            .collect(),
    )
}

/// Reads `<tr>` rows of the first `<table>`, or of the whole document when it
/// has no table element.
pub fn from_html(content: &str) -> Result<Grid, FormatError> {
    let table = match TABLE_PATTERN.captures(content).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => {
            debug!("No table element found, scanning the whole document for rows");
            content
        }
    };

    let grid: Grid = ROW_PATTERN
        .captures_iter(table)
        .filter_map(|caps| caps.get(1))
        .map(|row| {
            CELL_PATTERN
                .captures_iter(row.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|cell| cell_text(cell.as_str()))
                .collect()
        })
        .collect();

    if grid.len() < 2 {
        return Err(FormatError::new("no rows found"));
    }

    Ok(grid)
}

fn cell_text(markup: &str) -> String {
    TAG_PATTERN
        .replace_all(markup, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Splits comma-delimited text into lines and cells.
///
/// Double quotes only toggle whether commas separate cells; they are dropped
/// from the cell text and a doubled quote is not unescaped.
pub fn from_delimited(content: &str) -> Result<Grid, FormatError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(FormatError::new("insufficient rows"));
    }

    Ok(lines.into_iter().map(split_line).collect())
}

fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());

    cells
}
