//! Specification extraction from free-text descriptions.
//!
//! Every attribute is read with a single pattern and the first match in the
//! description wins. A description carrying two ratings of the same unit
//! (say `16V/25V`) only yields the first one.

use once_cell::sync::Lazy;
use partbin_models::{
    CapacitorSpecs, Category, ConnectorSpecs, GenericSpecs, InductorSpecs, IntegratedCircuitSpecs,
    ResistorSpecs, SemiconductorSpecs, Specifications,
};
use regex::Regex;

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("valid specification pattern")
}

static CAPACITANCE: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)([0-9]+\.?[0-9]*)\s*(pF|nF|µF|uF|mF)"));
static TOLERANCE: Lazy<Regex> = Lazy::new(|| pattern(r"±\s*([0-9]+)%"));
// A rating such as `50V` not running into a longer token like `50VDC`
static CAPACITOR_VOLTAGE: Lazy<Regex> =
    Lazy::new(|| pattern(r"([0-9]+\.?[0-9]*)\s*V(?:[^0-9A-Za-z_]|$)"));
static VOLTAGE: Lazy<Regex> = Lazy::new(|| pattern(r"([0-9]+\.?[0-9]*)\s*V"));
static WHOLE_VOLTAGE: Lazy<Regex> = Lazy::new(|| pattern(r"([0-9]+)\s*V"));
static CURRENT: Lazy<Regex> = Lazy::new(|| pattern(r"([0-9]+\.?[0-9]*)\s*(mA|A)"));
static RESISTANCE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)([0-9]+\.?[0-9]*)\s*(Ω|ohm|kΩ|kohm|MΩ|Mohm)"));
static OHM: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)ohm"));
static POWER: Lazy<Regex> = Lazy::new(|| pattern(r"(1/[0-9]+W|[0-9]+/[0-9]+W|[0-9]+W)"));
static PINS: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)([0-9]+)\s*(pin|P|位|芯|脚)"));
static PITCH: Lazy<Regex> = Lazy::new(|| pattern(r"([0-9]+\.?[0-9]*)\s*mm"));
static INDUCTANCE: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)([0-9]+\.?[0-9]*)\s*(nH|uH|µH|mH)"));

/// Ordered `(pattern, type)` keyword rules; the first match names the type.
type KindRules = Lazy<Vec<(Regex, &'static str)>>;

static TRANSISTOR_KINDS: KindRules = Lazy::new(|| {
    vec![
        (pattern(r"(?i)NPN"), "NPN"),
        (pattern(r"(?i)PNP"), "PNP"),
        (pattern(r"(?i)N-Channel|NMOS"), "N-Channel MOSFET"),
        (pattern(r"(?i)P-Channel|PMOS"), "P-Channel MOSFET"),
    ]
});

static DIODE_KINDS: KindRules = Lazy::new(|| {
    vec![
        (pattern(r"(?i)Schottky|肖特基"), "Schottky"),
        (pattern(r"(?i)Zener|稳压"), "Zener"),
        (pattern(r"(?i)LED|发光"), "LED"),
        (pattern(r"(?i)TVS"), "TVS"),
    ]
});

static CONNECTOR_KINDS: KindRules = Lazy::new(|| {
    vec![
        (pattern(r"(?i)USB"), "USB"),
        (pattern(r"(?i)Type-C"), "Type-C"),
        (pattern(r"(?i)Type-A"), "Type-A"),
        (pattern(r"(?i)Header|排针"), "Header"),
        (pattern(r"(?i)Socket|排母"), "Socket"),
    ]
});

/// Extracts the category's attributes from a description.
///
/// A non-empty package hint is always recorded. The model hint is only used
/// for integrated circuits. Returns `None` when nothing was found.
pub fn extract_specifications(
    category: Category,
    package: &str,
    description: &str,
    model: &str,
) -> Option<Specifications> {
    let package = present(package);

    let specs = match category {
        Category::Capacitors => Specifications::Capacitor(CapacitorSpecs {
            package,
            capacitance: CAPACITANCE
                .captures(description)
                .map(|caps| format!("{}{}", &caps[1], micro_as_u(&caps[2]))),
            tolerance: tolerance(description),
            voltage: with_suffix(&CAPACITOR_VOLTAGE, description, "V"),
        }),
        Category::Resistors => Specifications::Resistor(ResistorSpecs {
            package,
            resistance: RESISTANCE
                .captures(description)
                .map(|caps| format!("{}{}", &caps[1], OHM.replace(&caps[2], "Ω"))),
            tolerance: tolerance(description),
            power: POWER.captures(description).map(|caps| caps[1].to_string()),
        }),
        Category::IntegratedCircuits => Specifications::IntegratedCircuit(IntegratedCircuitSpecs {
            package,
            model: present(model),
            voltage: with_suffix(&VOLTAGE, description, "V"),
        }),
        Category::Transistors => Specifications::Transistor(SemiconductorSpecs {
            package,
            kind: kind(&TRANSISTOR_KINDS, description),
            voltage: with_suffix(&WHOLE_VOLTAGE, description, "V"),
            current: current(description),
        }),
        Category::Diodes => Specifications::Diode(SemiconductorSpecs {
            package,
            kind: kind(&DIODE_KINDS, description),
            voltage: with_suffix(&VOLTAGE, description, "V"),
            current: current(description),
        }),
        Category::Connectors => Specifications::Connector(ConnectorSpecs {
            package,
            kind: kind(&CONNECTOR_KINDS, description),
            pins: PINS.captures(description).map(|caps| caps[1].to_string()),
            pitch: with_suffix(&PITCH, description, "mm"),
            current: current(description),
        }),
        Category::Inductors => Specifications::Inductor(InductorSpecs {
            package,
            inductance: INDUCTANCE
                .captures(description)
                .map(|caps| format!("{}{}", &caps[1], micro_as_u(&caps[2]))),
            tolerance: tolerance(description),
            current: current(description),
        }),
        Category::Switches | Category::Sensors | Category::Other => {
            Specifications::Generic(GenericSpecs { package })
        }
    };

    specs.non_empty()
}

fn present(hint: &str) -> Option<String> {
    let hint = hint.trim();
    (!hint.is_empty()).then(|| hint.to_string())
}

fn with_suffix(pattern: &Regex, text: &str, suffix: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| format!("{}{}", &caps[1], suffix))
}

fn tolerance(text: &str) -> Option<String> {
    TOLERANCE
        .captures(text)
        .map(|caps| format!("±{}%", &caps[1]))
}

fn current(text: &str) -> Option<String> {
    CURRENT.captures(text).map(|caps| format!("{}{}", &caps[1], &caps[2]))
}

fn kind(rules: &[(Regex, &'static str)], text: &str) -> Option<String> {
    rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, kind)| kind.to_string())
}

fn micro_as_u(unit: &str) -> String {
    unit.replace(&['µ', 'μ'][..], "u")
}
