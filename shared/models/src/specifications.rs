//! Per-category part specifications.
//!
//! Each category family carries its own closed set of optional attributes.
//! The serialized form is a flat JSON object holding only the attributes that
//! are present, `package` first, which is also the form used when building a
//! record's identity key.

use serde::Serialize;
use serde_json::Value;

use crate::component::Category;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapacitorSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacitance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResistorSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegratedCircuitSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
}

/// Shared by transistors and diodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SemiconductorSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectorSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InductorSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inductance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

/// Switches, sensors and uncategorised parts only record their package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenericSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// Structured attributes of a part, one variant per category family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Specifications {
    Capacitor(CapacitorSpecs),
    Resistor(ResistorSpecs),
    IntegratedCircuit(IntegratedCircuitSpecs),
    Transistor(SemiconductorSpecs),
    Diode(SemiconductorSpecs),
    Connector(ConnectorSpecs),
    Inductor(InductorSpecs),
    Generic(GenericSpecs),
}

impl Specifications {
    /// Attribute-less specifications of the variant selected by `category`.
    pub fn empty_for(category: Category) -> Self {
        match category {
            Category::Capacitors => Self::Capacitor(CapacitorSpecs::default()),
            Category::Resistors => Self::Resistor(ResistorSpecs::default()),
            Category::IntegratedCircuits => Self::IntegratedCircuit(IntegratedCircuitSpecs::default()),
            Category::Transistors => Self::Transistor(SemiconductorSpecs::default()),
            Category::Diodes => Self::Diode(SemiconductorSpecs::default()),
            Category::Connectors => Self::Connector(ConnectorSpecs::default()),
            Category::Inductors => Self::Inductor(InductorSpecs::default()),
            Category::Switches | Category::Sensors | Category::Other => {
                Self::Generic(GenericSpecs::default())
            }
        }
    }

    /// Builds the category's variant from a JSON object such as the
    /// `Specifications` column of a native export.
    ///
    /// Keys the variant does not know are ignored, as are nested values.
    /// Returns `Ok(None)` when no known attribute was present.
    pub fn from_json(category: Category, json: &str) -> Result<Option<Self>, serde_json::Error> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut specs = Self::empty_for(category);

        for (key, value) in object {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            if !value.is_empty() {
                specs.set(&key, value);
            }
        }

        Ok(specs.non_empty())
    }

    /// Sets an attribute by its serialized key. Returns `false` when the
    /// variant has no such attribute.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.slots_mut().into_iter().find(|(name, _)| *name == key) {
            Some((_, slot)) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Present attributes in serialization order.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        self.slots()
            .into_iter()
            .filter_map(|(name, slot)| slot.as_deref().map(|value| (name, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(|(_, slot)| slot.is_none())
    }

    /// `None` when no attribute is present.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn slots(&self) -> Vec<(&'static str, &Option<String>)> {
        match self {
            Self::Capacitor(s) => vec![
                ("package", &s.package),
                ("capacitance", &s.capacitance),
                ("tolerance", &s.tolerance),
                ("voltage", &s.voltage),
            ],
            Self::Resistor(s) => vec![
                ("package", &s.package),
                ("resistance", &s.resistance),
                ("tolerance", &s.tolerance),
                ("power", &s.power),
            ],
            Self::IntegratedCircuit(s) => vec![
                ("package", &s.package),
                ("model", &s.model),
                ("voltage", &s.voltage),
            ],
            Self::Transistor(s) | Self::Diode(s) => vec![
                ("package", &s.package),
                ("type", &s.kind),
                ("voltage", &s.voltage),
                ("current", &s.current),
            ],
            Self::Connector(s) => vec![
                ("package", &s.package),
                ("type", &s.kind),
                ("pins", &s.pins),
                ("pitch", &s.pitch),
                ("current", &s.current),
            ],
            Self::Inductor(s) => vec![
                ("package", &s.package),
                ("inductance", &s.inductance),
                ("tolerance", &s.tolerance),
                ("current", &s.current),
            ],
            Self::Generic(s) => vec![("package", &s.package)],
        }
    }

    fn slots_mut(&mut self) -> Vec<(&'static str, &mut Option<String>)> {
        match self {
            Self::Capacitor(s) => vec![
                ("package", &mut s.package),
                ("capacitance", &mut s.capacitance),
                ("tolerance", &mut s.tolerance),
                ("voltage", &mut s.voltage),
            ],
            Self::Resistor(s) => vec![
                ("package", &mut s.package),
                ("resistance", &mut s.resistance),
                ("tolerance", &mut s.tolerance),
                ("power", &mut s.power),
            ],
            Self::IntegratedCircuit(s) => vec![
                ("package", &mut s.package),
                ("model", &mut s.model),
                ("voltage", &mut s.voltage),
            ],
            Self::Transistor(s) | Self::Diode(s) => vec![
                ("package", &mut s.package),
                ("type", &mut s.kind),
                ("voltage", &mut s.voltage),
                ("current", &mut s.current),
            ],
            Self::Connector(s) => vec![
                ("package", &mut s.package),
                ("type", &mut s.kind),
                ("pins", &mut s.pins),
                ("pitch", &mut s.pitch),
                ("current", &mut s.current),
            ],
            Self::Inductor(s) => vec![
                ("package", &mut s.package),
                ("inductance", &mut s.inductance),
                ("tolerance", &mut s.tolerance),
                ("current", &mut s.current),
            ],
            Self::Generic(s) => vec![("package", &mut s.package)],
        }
    }
}
