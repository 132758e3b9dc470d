//! Field dictionary and header index map.
//!
//! Maps each canonical record field to the header spellings that denote it in
//! native exports (English) and marketplace orders (Chinese).

/// Logical record attribute, independent of how a sheet spells its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Id,
    Name,
    Description,
    Category,
    Quantity,
    Location,
    MinStockLevel,
    Specifications,
    Brand,
    Package,
    Attributes,
    ModelNumber,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Id,
        CanonicalField::Name,
        CanonicalField::Description,
        CanonicalField::Category,
        CanonicalField::Quantity,
        CanonicalField::Location,
        CanonicalField::MinStockLevel,
        CanonicalField::Specifications,
        CanonicalField::Brand,
        CanonicalField::Package,
        CanonicalField::Attributes,
        CanonicalField::ModelNumber,
    ];

    /// Header substrings denoting this field, in priority order
    pub fn header_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["ID", "id"],
            Self::Name => &["Name", "name", "商品编号", "LCSC Part"],
            Self::Description => &["Description", "description", "商品名称"],
            Self::Category => &["Category", "category", "类别"],
            Self::Quantity => &["Quantity", "quantity", "订购数量", "数量", "订购数量（修改后）"],
            Self::Location => &["Location", "location", "位置"],
            Self::MinStockLevel => &["Min Stock Level", "minStockLevel", "Min Stock", "minStock"],
            Self::Specifications => &["Specifications", "specifications", "specs"],
            Self::Brand => &["品牌", "Brand"],
            Self::Package => &["封装", "Package"],
            Self::Attributes => &["商品属性", "规格", "属性"],
            Self::ModelNumber => &["厂家型号", "型号"],
        }
    }

    /// Serialized record key
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Location => "location",
            Self::MinStockLevel => "minStockLevel",
            Self::Specifications => "specifications",
            Self::Brand => "brand",
            Self::Package => "package",
            Self::Attributes => "attributes",
            Self::ModelNumber => "modelNumber",
        }
    }

    fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        self.header_candidates()
            .iter()
            .any(|candidate| header.contains(candidate))
    }
}

/// Column index of every canonical field within one sheet's header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndexMap {
    indices: [Option<usize>; 12],
}

impl HeaderIndexMap {
    /// For each field, the leftmost header containing any of its candidates.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut map = Self::default();
        for field in CanonicalField::ALL {
            map.indices[field as usize] = headers
                .iter()
                .position(|header| field.matches_header(header));
        }
        map
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.indices[field as usize]
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }

    /// The row's trimmed cell for `field`; empty when the column was not
    /// located or the row is shorter than the header.
    pub fn cell<'a>(&self, field: CanonicalField, row: &'a [String]) -> &'a str {
        self.get(field)
            .and_then(|index| row.get(index))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }

    /// Located fields, for diagnostics
    pub fn located(&self) -> Vec<(&'static str, usize)> {
        CanonicalField::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|index| (field.key(), index)))
            .collect()
    }
}
