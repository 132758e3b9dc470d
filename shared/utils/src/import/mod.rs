//! Import Normalization Engine
//!
//! Ingests third-party order files and produces canonical inventory records.
//! Two undeclared schemas are recognised: the tracker's own native export and
//! marketplace purchase orders with free-text part descriptions. Both arrive
//! as xlsx/xls workbooks, spreadsheets saved as HTML, or comma-delimited text.
//! JSON backups of the tracker's own store are restored alongside them.
//!
//! Pipeline: grid extraction, header location, dialect classification,
//! per-row normalization (category inference and specification extraction),
//! then duplicate merging. The only error raised is [`FormatError`], which
//! aborts the whole import.
//!
//! [`FormatError`]: crate::error::FormatError

pub mod backup;
pub mod category;
pub mod dialect;
pub mod engine;
pub mod fields;
pub mod grid;
pub mod header;
pub mod merger;
pub mod normalizer;
pub mod specs;


pub use backup::{read_backup, BackupContents};
pub use category::infer_category;
pub use dialect::Dialect;
pub use engine::{ImportEngine, ImportFormat, ImportOptions, ImportReport, ImportSource};
pub use fields::{CanonicalField, HeaderIndexMap};
pub use grid::Grid;
pub use header::{locate_header, HeaderRow};
pub use merger::merge_duplicates;
pub use normalizer::{compose_description, parse_quantity, Placement, RowNormalizer, Segment};
pub use specs::extract_specifications;
