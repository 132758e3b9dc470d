//! Dialect classification.

use serde::Serialize;

use super::fields::{CanonicalField, HeaderIndexMap};
use crate::error::FormatError;

/// Which of the two undeclared schemas a sheet follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// The tracker's own export: one column per record field
    NativeExport,
    /// A marketplace purchase order with free-text part descriptions
    MarketplaceOrder,
    /// A JSON backup of the tracker's store. Never the result of
    /// classifying a sheet.
    Backup,
}

impl Dialect {
    /// Native when identity, category and description columns are present and
    /// none of the marketplace-only columns are. Every other sheet is parsed
    /// as a marketplace order.
    pub fn classify(map: &HeaderIndexMap) -> Self {
        let has_native_fields = map.has(CanonicalField::Id)
            && map.has(CanonicalField::Category)
            && map.has(CanonicalField::Description);
        let has_marketplace_fields = map.has(CanonicalField::Brand)
            || map.has(CanonicalField::Package)
            || map.has(CanonicalField::ModelNumber);

        if has_native_fields && !has_marketplace_fields {
            Self::NativeExport
        } else {
            Self::MarketplaceOrder
        }
    }

    /// Classifies the sheet and checks that it has the columns every record
    /// needs.
    pub fn detect(map: &HeaderIndexMap) -> Result<Self, FormatError> {
        if !map.has(CanonicalField::Name) || !map.has(CanonicalField::Quantity) {
            return Err(FormatError::new("required fields missing"));
        }
        Ok(Self::classify(map))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NativeExport => "native export",
            Self::MarketplaceOrder => "marketplace order",
            Self::Backup => "backup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(headers: &[&str]) -> HeaderIndexMap {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        HeaderIndexMap::from_headers(&headers)
    }

    #[test]
    fn test_native_export() {
        let map = map(&["ID", "Name", "Description", "Category", "Quantity"]);
        assert_eq!(Dialect::detect(&map).unwrap(), Dialect::NativeExport);
    }

    #[test]
    fn test_package_column_disqualifies_native() {
        let map = map(&["ID", "Name", "Description", "Category", "Quantity", "Package"]);
        assert_eq!(Dialect::detect(&map).unwrap(), Dialect::MarketplaceOrder);
    }

    #[test]
    fn test_native_without_id_falls_back_to_marketplace() {
        let map = map(&["Name", "Description", "Category", "Quantity"]);
        assert_eq!(Dialect::detect(&map).unwrap(), Dialect::MarketplaceOrder);
    }

    #[test]
    fn test_missing_quantity_is_rejected() {
        let error = Dialect::detect(&map(&["ID", "Name", "Description", "Category"])).unwrap_err();
        assert_eq!(error.reason, "required fields missing");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let error = Dialect::detect(&map(&["序号", "订购数量", "封装"])).unwrap_err();
        assert_eq!(error.reason, "required fields missing");
    }
}
