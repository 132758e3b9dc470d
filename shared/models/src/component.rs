//! Component domain models for the PartBin inventory.
//!
//! This module defines the part category set, the normalized record produced
//! by an import, and the stored component kept by the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::specifications::Specifications;

/// Closed set of part categories. `Other` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Resistors,
    Capacitors,
    #[serde(rename = "Integrated Circuits")]
    IntegratedCircuits,
    Transistors,
    Diodes,
    Connectors,
    Inductors,
    Switches,
    Sensors,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Resistors,
        Category::Capacitors,
        Category::IntegratedCircuits,
        Category::Transistors,
        Category::Diodes,
        Category::Connectors,
        Category::Inductors,
        Category::Switches,
        Category::Sensors,
        Category::Other,
    ];

    /// Display label, as written in native exports
    pub fn label(self) -> &'static str {
        match self {
            Self::Resistors => "Resistors",
            Self::Capacitors => "Capacitors",
            Self::IntegratedCircuits => "Integrated Circuits",
            Self::Transistors => "Transistors",
            Self::Diodes => "Diodes",
            Self::Connectors => "Connectors",
            Self::Inductors => "Inductors",
            Self::Switches => "Switches",
            Self::Sensors => "Sensors",
            Self::Other => "Other",
        }
    }

    /// Parses a display label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A canonical inventory record produced by an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    pub description: String,
    pub category: Category,
    pub quantity: u32,
    pub location: String,
    pub min_stock_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
}

impl ComponentRecord {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            category,
            quantity: 0,
            location: String::new(),
            min_stock_level: default_min_stock_level(),
            specifications: None,
        }
    }

    /// Key under which two records count as the same part: every field except
    /// the quantity and the row-local id.
    pub fn identity_key(&self) -> String {
        let specs = self
            .specifications
            .as_ref()
            .map(Specifications::to_json)
            .unwrap_or_default();

        format!(
            "{}|{}|{}|{}|{}|{}",
            self.name,
            self.category.label(),
            self.description,
            self.location,
            self.min_stock_level,
            specs
        )
    }
}

/// Body of a manual create request. Omitted counts default the way the
/// native export does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_min_stock_level")]
    pub min_stock_level: u32,
}

fn default_min_stock_level() -> u32 {
    10
}

impl From<NewComponent> for ComponentRecord {
    fn from(new: NewComponent) -> Self {
        Self {
            id: None,
            name: new.name,
            description: new.description,
            category: new.category,
            quantity: new.quantity,
            location: new.location,
            min_stock_level: new.min_stock_level,
            specifications: None,
        }
    }
}

/// A component held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub quantity: u32,
    pub location: String,
    pub min_stock_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Component {
    /// Stores a record under a freshly generated id. Any id carried by the
    /// record is ignored.
    pub fn from_record(record: ComponentRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: record.name,
            description: record.description,
            category: record.category,
            quantity: record.quantity,
            location: record.location,
            min_stock_level: record.min_stock_level,
            specifications: record.specifications,
            created_at: now,
            updated_at: now,
        }
    }

    /// The stored fields as a record carrying this component's id.
    pub fn to_record(&self) -> ComponentRecord {
        ComponentRecord {
            id: Some(self.id.to_string()),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            quantity: self.quantity,
            location: self.location.clone(),
            min_stock_level: self.min_stock_level,
            specifications: self.specifications.clone(),
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: ComponentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(min_stock_level) = update.min_stock_level {
            self.min_stock_level = min_stock_level;
        }
        if let Some(specifications) = update.specifications {
            self.specifications = Some(specifications);
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring search over name, description, category and
    /// location.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [
            self.name.as_str(),
            self.description.as_str(),
            self.category.label(),
            self.location.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Partial update of a stored component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdate {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub quantity: Option<u32>,
    pub location: Option<String>,
    pub min_stock_level: Option<u32>,
    #[serde(skip)]
    pub specifications: Option<Specifications>,
}

impl From<ComponentRecord> for ComponentUpdate {
    fn from(record: ComponentRecord) -> Self {
        Self {
            name: Some(record.name),
            description: Some(record.description),
            category: Some(record.category),
            quantity: Some(record.quantity),
            location: Some(record.location),
            min_stock_level: Some(record.min_stock_level),
            specifications: record.specifications,
        }
    }
}
