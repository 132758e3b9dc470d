//! Row normalization.
//!
//! Turns each data row of a classified sheet into at most one
//! [`ComponentRecord`]. Row-level problems never fail the import: unparsable
//! numbers fall back to defaults and unusable rows are dropped.

use partbin_models::{Category, ComponentRecord, Specifications};
use tracing::{debug, warn};

use super::category::infer_category;
use super::dialect::Dialect;
use super::engine::ImportOptions;
use super::fields::{CanonicalField, HeaderIndexMap};
use super::specs::extract_specifications;

/// Where a segment joins the description built so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `"{segment} - {description}"`
    Prefix,
    /// `"{description} | {segment}"`
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub placement: Placement,
}

impl<'a> Segment<'a> {
    pub fn prefix(text: &'a str) -> Self {
        Self { text, placement: Placement::Prefix }
    }

    pub fn suffix(text: &'a str) -> Self {
        Self { text, placement: Placement::Suffix }
    }
}

/// Folds `segments` onto `seed`, skipping any segment that is empty or
/// already contained in the description built so far.
pub fn compose_description(seed: &str, segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .fold(seed.to_string(), |description, segment| {
            if segment.text.is_empty() || description.contains(segment.text) {
                return description;
            }
            if description.is_empty() {
                return segment.text.to_string();
            }
            match segment.placement {
                Placement::Prefix => format!("{} - {}", segment.text, description),
                Placement::Suffix => format!("{} | {}", description, segment.text),
            }
        })
}

/// Parses the digits of a cell, ignoring every other character, so that
/// `"1,000"` reads as 1000. Returns `None` when there are no digits or the
/// value overflows.
pub fn parse_digits(cell: &str) -> Option<u32> {
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Quantity of a cell, 0 when it cannot be read.
pub fn parse_quantity(cell: &str) -> u32 {
    parse_digits(cell).unwrap_or(0)
}

/// Normalizes the data rows of one sheet.
pub struct RowNormalizer<'a> {
    dialect: Dialect,
    fields: &'a HeaderIndexMap,
    options: &'a ImportOptions,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(dialect: Dialect, fields: &'a HeaderIndexMap, options: &'a ImportOptions) -> Self {
        Self { dialect, fields, options }
    }

    pub fn normalize(&self, row: &[String]) -> Option<ComponentRecord> {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return None;
        }

        match self.dialect {
            Dialect::NativeExport | Dialect::Backup => self.normalize_native(row),
            Dialect::MarketplaceOrder => self.normalize_marketplace(row),
        }
    }

    fn cell<'r>(&self, field: CanonicalField, row: &'r [String]) -> &'r str {
        self.fields.cell(field, row)
    }

    fn normalize_native(&self, row: &[String]) -> Option<ComponentRecord> {
        let name = self.cell(CanonicalField::Name, row);
        if name.is_empty() {
            debug!("Dropping native row without a name");
            return None;
        }

        let description = self.cell(CanonicalField::Description, row);
        let category =
            self.native_category(self.cell(CanonicalField::Category, row), name, description);

        let min_stock_level = if self.fields.has(CanonicalField::MinStockLevel) {
            parse_digits(self.cell(CanonicalField::MinStockLevel, row))
                .unwrap_or(self.options.default_min_stock_level)
        } else {
            self.options.default_min_stock_level
        };

        let specifications = self
            .explicit_specifications(category, self.cell(CanonicalField::Specifications, row))
            .or_else(|| {
                if description.is_empty() {
                    None
                } else {
                    extract_specifications(category, "", description, "")
                }
            });

        let id = self.cell(CanonicalField::Id, row);

        Some(ComponentRecord {
            id: (!id.is_empty()).then(|| id.to_string()),
            name: name.to_string(),
            description: description.to_string(),
            category,
            quantity: parse_quantity(self.cell(CanonicalField::Quantity, row)),
            location: self.cell(CanonicalField::Location, row).to_string(),
            min_stock_level,
            specifications,
        })
    }

    /// A native export names its category; labels the catalogue does not know
    /// are inferred from the part's text instead.
    fn native_category(&self, label: &str, name: &str, description: &str) -> Category {
        match Category::from_label(label) {
            Some(category) => category,
            None => {
                let inferred = infer_category(name, description);
                debug!(label, category = %inferred, "Unknown category label, inferred from text");
                inferred
            }
        }
    }

    fn explicit_specifications(&self, category: Category, cell: &str) -> Option<Specifications> {
        if cell.is_empty() || cell == "{}" {
            return None;
        }

        match Specifications::from_json(category, cell) {
            Ok(specifications) => specifications,
            Err(e) => {
                warn!(error = %e, value = cell, "Unreadable specifications cell, extracting from description");
                None
            }
        }
    }

    fn normalize_marketplace(&self, row: &[String]) -> Option<ComponentRecord> {
        let name = self.cell(CanonicalField::Name, row);
        if name.is_empty() {
            return None;
        }
        if self.is_sequence_number(name) {
            debug!(name, "Dropping row whose part number is a sequence number");
            return None;
        }

        let brand = self.cell(CanonicalField::Brand, row);
        let package = self.cell(CanonicalField::Package, row);
        let raw_description = self.cell(CanonicalField::Description, row);
        let attributes = self.cell(CanonicalField::Attributes, row);
        let model = self.cell(CanonicalField::ModelNumber, row);

        let seed = [model, attributes, raw_description]
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or("");
        let description = compose_description(
            seed,
            &[
                Segment::prefix(brand),
                Segment::suffix(package),
                Segment::suffix(raw_description),
            ],
        );

        let quantity = parse_quantity(self.cell(CanonicalField::Quantity, row));
        if quantity == 0 {
            debug!(name, "Dropping marketplace row with zero quantity");
            return None;
        }

        let category = infer_category(name, &description);
        let specifications = extract_specifications(category, package, &description, model);

        Some(ComponentRecord {
            id: None,
            name: name.to_string(),
            description: if description.is_empty() { name.to_string() } else { description },
            category,
            quantity,
            location: String::new(),
            min_stock_level: self.reorder_level(quantity),
            specifications,
        })
    }

    /// Marketplace sheets often carry a row counter in the part-number column.
    fn is_sequence_number(&self, name: &str) -> bool {
        name.chars().all(|c| c.is_ascii_digit())
            && name
                .parse::<u64>()
                .map(|n| n < self.options.sequence_number_ceiling)
                .unwrap_or(false)
    }

    fn reorder_level(&self, quantity: u32) -> u32 {
        let scaled = (f64::from(quantity) * self.options.reorder_ratio).floor() as u32;
        scaled.max(self.options.min_reorder_level)
    }
}
