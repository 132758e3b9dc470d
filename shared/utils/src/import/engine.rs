//! Import entry point.
//!
//! Runs a file through extraction, header location, dialect classification,
//! row normalization and duplicate merging, returning the final records with
//! a short report of what happened along the way.

use partbin_models::ComponentRecord;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::backup::{read_backup, BackupContents};
use super::dialect::Dialect;
use super::fields::HeaderIndexMap;
use super::grid::{self, Grid};
use super::header::{locate_header, DEFAULT_HEADER_SCAN_ROWS};
use super::merger::merge_duplicates;
use super::normalizer::RowNormalizer;
use crate::config::ImportConfig;
use crate::error::FormatError;

/// Import file shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    /// xlsx or xls workbook. Marketplace `.xls` downloads are often HTML in
    /// disguise and are read as such when the binary decode fails.
    Spreadsheet,
    Html,
    /// Comma-delimited text
    Delimited,
    /// `{"components": [...]}` backup written by the tracker
    Backup,
}

impl ImportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Delimited),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            "htm" | "html" => Some(Self::Html),
            "json" => Some(Self::Backup),
            _ => None,
        }
    }

    /// Detect format from content type header
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence {
            "text/csv" | "application/csv" => Some(Self::Delimited),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Spreadsheet),
            "application/vnd.ms-excel" => Some(Self::Spreadsheet),
            "text/html" => Some(Self::Html),
            "application/json" => Some(Self::Backup),
            _ => None,
        }
    }
}

/// Raw input handed to [`ImportEngine::parse`].
#[derive(Debug, Clone, Copy)]
pub enum ImportSource<'a> {
    Binary(&'a [u8]),
    Html(&'a str),
    Delimited(&'a str),
    Backup(&'a str),
}

/// Heuristic constants of the row normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub header_scan_rows: usize,
    pub default_min_stock_level: u32,
    pub reorder_ratio: f64,
    pub min_reorder_level: u32,
    pub sequence_number_ceiling: u64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            default_min_stock_level: 10,
            reorder_ratio: 0.2,
            min_reorder_level: 5,
            sequence_number_ceiling: 100,
        }
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            header_scan_rows: config.header_scan_rows,
            default_min_stock_level: config.default_min_stock_level,
            reorder_ratio: config.reorder_ratio,
            min_reorder_level: config.min_reorder_level,
            sequence_number_ceiling: config.sequence_number_ceiling,
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Merged records in first-seen order
    pub records: Vec<ComponentRecord>,
    pub dialect: Dialect,
    /// 0-based grid index of the header row
    pub header_row: usize,
    /// Rows below the header, blank rows included
    pub data_rows: usize,
    pub dropped_rows: usize,
    pub records_before_merge: usize,
}

/// Normalizes import files into inventory records.
///
/// Holds no state between calls; one engine can serve concurrent imports.
#[derive(Debug, Clone, Default)]
pub struct ImportEngine {
    options: ImportOptions,
}

impl ImportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Parse an uploaded file, picking the format from `format` or else the
    /// file name's extension.
    pub fn parse_bytes(
        &self,
        filename: &str,
        data: &[u8],
        format: Option<ImportFormat>,
    ) -> Result<ImportReport, FormatError> {
        let format = format
            .or_else(|| ImportFormat::from_extension(Path::new(filename)))
            .ok_or_else(|| FormatError::new("unsupported file format"))?;

        debug!(filename, ?format, bytes = data.len(), "Parsing import file");

        match format {
            ImportFormat::Spreadsheet => {
                let grid = match grid::from_spreadsheet(data) {
                    Ok(grid) => grid,
                    Err(binary_error) => {
                        let text = String::from_utf8_lossy(data);
                        if !text.to_ascii_lowercase().contains("<tr") {
                            return Err(binary_error);
                        }
                        debug!(filename, "Spreadsheet holds HTML markup, reading it as a table");
                        grid::from_html(&text)?
                    }
                };
                self.normalize_grid(&grid)
            }
            ImportFormat::Html => self.parse(ImportSource::Html(&String::from_utf8_lossy(data))),
            ImportFormat::Delimited => {
                self.parse(ImportSource::Delimited(&String::from_utf8_lossy(data)))
            }
            ImportFormat::Backup => self.parse(ImportSource::Backup(&String::from_utf8_lossy(data))),
        }
    }

    pub fn parse(&self, source: ImportSource<'_>) -> Result<ImportReport, FormatError> {
        let grid = match source {
            ImportSource::Binary(data) => grid::from_spreadsheet(data)?,
            ImportSource::Html(content) => grid::from_html(content)?,
            ImportSource::Delimited(content) => grid::from_delimited(content)?,
            ImportSource::Backup(content) => return self.restore_backup(content),
        };
        self.normalize_grid(&grid)
    }

    /// Backups hold canonical records already; they are defaulted but not
    /// merged, so every saved component comes back as its own record.
    fn restore_backup(&self, content: &str) -> Result<ImportReport, FormatError> {
        let BackupContents { entries, records } = read_backup(content, &self.options)?;

        if records.is_empty() {
            return Err(FormatError::new("no valid records"));
        }

        info!(
            dialect = Dialect::Backup.label(),
            entries,
            records = records.len(),
            "Backup restored"
        );

        Ok(ImportReport {
            dialect: Dialect::Backup,
            header_row: 0,
            data_rows: entries,
            dropped_rows: entries - records.len(),
            records_before_merge: records.len(),
            records,
        })
    }

    /// Runs an already extracted grid through the rest of the pipeline.
    pub fn normalize_grid(&self, grid: &Grid) -> Result<ImportReport, FormatError> {
        let header = locate_header(grid, self.options.header_scan_rows)?;
        let fields = HeaderIndexMap::from_headers(header.cells);
        let dialect = Dialect::detect(&fields)?;

        debug!(located = ?fields.located(), "Mapped header fields");

        let normalizer = RowNormalizer::new(dialect, &fields, &self.options);
        let data_rows = &grid[header.index + 1..];
        let records: Vec<ComponentRecord> = data_rows
            .iter()
            .filter_map(|row| normalizer.normalize(row))
            .collect();

        if records.is_empty() {
            return Err(FormatError::new("no valid records"));
        }

        let records_before_merge = records.len();
        let records = merge_duplicates(records);

        info!(
            dialect = dialect.label(),
            header_row = header.index,
            data_rows = data_rows.len(),
            records = records.len(),
            merged = records_before_merge - records.len(),
            "Import normalized"
        );

        Ok(ImportReport {
            records,
            dialect,
            header_row: header.index,
            data_rows: data_rows.len(),
            dropped_rows: data_rows.len() - records_before_merge,
            records_before_merge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partbin_models::Category;

    const NATIVE_CSV: &str = "ID,Name,Description,Category,Quantity,Location,Min Stock Level,Specifications\n\
        a1,ATmega328P-PU,8-bit MCU 5V,Integrated Circuits,45,A1-01,10,\n\
        a2,10k,10kΩ ±5% 1/4W,Resistors,500,B2-03,100,\n";

    const MARKETPLACE_HTML: &str = r#"<html><body><table>
        <tr><td>立创商城订单详情</td></tr>
        <tr><th>序号</th><th>商品编号</th><th>品牌</th><th>厂家型号</th><th>封装</th><th>商品名称</th><th>订购数量</th></tr>
        <tr><td>1</td><td>C14663</td><td>SAMSUNG</td><td>CL10B104KB8NNNC</td><td>0603</td><td>100nF ±10% 50V</td><td>3</td></tr>
        <tr><td>2</td><td>C14663</td><td>SAMSUNG</td><td>CL10B104KB8NNNC</td><td>0603</td><td>100nF ±10% 50V</td><td>7</td></tr>
        <tr><td>3</td><td>C8734</td><td>ST</td><td>STM32F103C8T6</td><td>LQFP-48</td><td>单片机</td><td>0</td></tr>
    </table></body></html>"#;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImportFormat::from_extension(Path::new("order.XLS")), Some(ImportFormat::Spreadsheet));
        assert_eq!(ImportFormat::from_extension(Path::new("parts.csv")), Some(ImportFormat::Delimited));
        assert_eq!(ImportFormat::from_extension(Path::new("order.htm")), Some(ImportFormat::Html));
        assert_eq!(ImportFormat::from_extension(Path::new("notes.txt")), None);
        assert_eq!(
            ImportFormat::from_content_type("text/csv; charset=utf-8"),
            Some(ImportFormat::Delimited)
        );
        assert_eq!(ImportFormat::from_content_type("application/pdf"), None);
        assert_eq!(ImportFormat::from_extension(Path::new("backup.json")), Some(ImportFormat::Backup));
        assert_eq!(ImportFormat::from_content_type("application/json"), Some(ImportFormat::Backup));
    }

    #[test]
    fn test_native_delimited_import() {
        let report = ImportEngine::new()
            .parse(ImportSource::Delimited(NATIVE_CSV))
            .unwrap();

        assert_eq!(report.dialect, Dialect::NativeExport);
        assert_eq!(report.header_row, 0);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.dropped_rows, 0);

        let mcu = &report.records[0];
        assert_eq!(mcu.id.as_deref(), Some("a1"));
        assert_eq!(mcu.category, Category::IntegratedCircuits);
        assert_eq!(mcu.specifications.as_ref().unwrap().get("voltage"), Some("5V"));
        assert_eq!(report.records[1].min_stock_level, 100);
    }

    #[test]
    fn test_marketplace_html_import_merges_duplicates() {
        let report = ImportEngine::new()
            .parse(ImportSource::Html(MARKETPLACE_HTML))
            .unwrap();

        assert_eq!(report.dialect, Dialect::MarketplaceOrder);
        assert_eq!(report.header_row, 1);
        assert_eq!(report.data_rows, 3);
        assert_eq!(report.records_before_merge, 2);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.records.len(), 1);

        let capacitor = &report.records[0];
        assert_eq!(capacitor.quantity, 10);
        assert_eq!(capacitor.category, Category::Capacitors);
        assert_eq!(capacitor.description, "SAMSUNG - CL10B104KB8NNNC | 0603 | 100nF ±10% 50V");
        assert_eq!(capacitor.min_stock_level, 5);
    }

    #[test]
    fn test_xls_extension_holding_html() {
        let report = ImportEngine::new()
            .parse_bytes("order.xls", MARKETPLACE_HTML.as_bytes(), None)
            .unwrap();

        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_unreadable_spreadsheet() {
        let error = ImportEngine::new()
            .parse_bytes("order.xlsx", b"PK\x03\x04 truncated", None)
            .unwrap_err();

        assert_eq!(error.reason, "unreadable binary sheet");
    }

    #[test]
    fn test_unsupported_format() {
        let error = ImportEngine::new()
            .parse_bytes("notes.txt", b"Name,Quantity\nR1,1", None)
            .unwrap_err();
        assert_eq!(error.reason, "unsupported file format");

        let report = ImportEngine::new()
            .parse_bytes("notes.txt", b"Name,Quantity\nR1,1", Some(ImportFormat::Delimited))
            .unwrap();
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_header_without_data_rows() {
        let grid: Grid = vec![vec!["ID".to_string(), "Name".to_string(), "Quantity".to_string()]];

        let error = ImportEngine::new().normalize_grid(&grid).unwrap_err();
        assert_eq!(error.reason, "no valid records");
    }

    #[test]
    fn test_options_from_config() {
        let config = ImportConfig {
            reorder_ratio: 0.5,
            min_reorder_level: 1,
            ..ImportConfig::default()
        };
        let engine = ImportEngine::with_options(ImportOptions::from(&config));
        assert_eq!(engine.options().reorder_ratio, 0.5);

        let report = engine
            .parse(ImportSource::Delimited("商品编号,订购数量,封装\nC1,30,0603\n"))
            .unwrap();

        assert_eq!(report.records[0].min_stock_level, 15);
    }

    #[test]
    fn test_backup_restores_without_merging() {
        let backup = r#"{"components": [
            {"id": "a", "name": "10k", "category": "Resistors", "quantity": 5},
            {"id": "b", "name": "10k", "category": "Resistors", "quantity": 7},
            {"name": "", "quantity": 1}
        ]}"#;

        let report = ImportEngine::new()
            .parse_bytes("partbin-backup.json", backup.as_bytes(), None)
            .unwrap();

        assert_eq!(report.dialect, Dialect::Backup);
        assert_eq!(report.data_rows, 3);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].quantity, 7);
    }

    #[test]
    fn test_empty_backup_has_no_valid_records() {
        let error = ImportEngine::new()
            .parse(ImportSource::Backup(r#"{"components": []}"#))
            .unwrap_err();
        assert_eq!(error.reason, "no valid records");
    }
}
