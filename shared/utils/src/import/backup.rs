//! JSON backups.
//!
//! The tracker saves its whole inventory as `{"components": [...]}` with one
//! object per stored component. Restoring a backup skips the sheet pipeline:
//! entries already carry canonical fields, so they are only checked and
//! defaulted, never merged.

use partbin_models::{Category, ComponentRecord, Specifications};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::category::infer_category;
use super::engine::ImportOptions;
use crate::error::FormatError;

#[derive(Debug, Deserialize)]
struct Backup {
    components: Vec<BackupEntry>,
}

/// One saved component. Everything but the array shape is optional so that
/// hand-edited or older backups still load.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BackupEntry {
    id: Option<Value>,
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    quantity: Option<u32>,
    location: Option<String>,
    min_stock_level: Option<u32>,
    specifications: Option<Value>,
}

/// Records restored from a backup file.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupContents {
    /// Entries in the `components` array
    pub entries: usize,
    pub records: Vec<ComponentRecord>,
}

/// Reads a backup file. Fails when the text is not JSON or has no
/// `components` array; entries without a name are skipped.
pub fn read_backup(content: &str, options: &ImportOptions) -> Result<BackupContents, FormatError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let backup: Backup = serde_json::from_str(content).map_err(|e| {
        debug!(error = %e, "Backup file rejected");
        FormatError::new("invalid backup file")
    })?;

    let entries = backup.components.len();
    let records = backup
        .components
        .into_iter()
        .filter_map(|entry| restore(entry, options))
        .collect();

    Ok(BackupContents { entries, records })
}

fn restore(entry: BackupEntry, options: &ImportOptions) -> Option<ComponentRecord> {
    let name = entry.name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        debug!("Skipping backup entry without a name");
        return None;
    }

    let description = entry.description.unwrap_or_default();
    let category = entry
        .category
        .as_deref()
        .and_then(Category::from_label)
        .unwrap_or_else(|| infer_category(&name, &description));

    let specifications = entry
        .specifications
        .and_then(|value| saved_specifications(category, value));

    let id = match entry.id {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };

    Some(ComponentRecord {
        id,
        name,
        description,
        category,
        quantity: entry.quantity.unwrap_or(0),
        location: entry.location.unwrap_or_default(),
        min_stock_level: entry
            .min_stock_level
            .unwrap_or(options.default_min_stock_level),
        specifications,
    })
}

fn saved_specifications(category: Category, value: Value) -> Option<Specifications> {
    let json = match value {
        Value::Object(_) => value.to_string(),
        Value::String(text) if !text.is_empty() => text,
        _ => return None,
    };

    match Specifications::from_json(category, &json) {
        Ok(specifications) => specifications,
        Err(e) => {
            warn!(error = %e, "Unreadable specifications in backup entry");
            None
        }
    }
}
