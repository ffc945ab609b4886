//! Units definitions, the standard-unit set, and dimensional compatibility.

use super::Model;

/// One multiplicative term of a units definition, e.g. `second^-1` or
/// `milli·litre`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTerm {
    /// Name of the referenced units (standard or defined elsewhere).
    pub units: String,
    /// SI prefix name, e.g. `milli`.
    pub prefix: Option<String>,
    /// Exponent applied to the referenced units.
    pub exponent: f64,
    /// Plain scale factor.
    pub multiplier: f64,
}

impl UnitTerm {
    /// A bare reference to other units (exponent 1, multiplier 1).
    pub fn of(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            prefix: None,
            exponent: 1.0,
            multiplier: 1.0,
        }
    }
}

/// Whether a units entry carries its own definition or forwards to an
/// imported one.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitsKind {
    /// Defined in place as a product of terms.
    Defined(Vec<UnitTerm>),
    /// Forwarding entry pointing at a definition in an import source.
    Imported {
        /// Import-source url (the library filename).
        source: String,
        /// Name of the definition inside the import source.
        reference: String,
    },
}

/// A named units entry of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Units {
    /// Units name, unique within a model.
    pub name: String,
    /// Definition or import forward.
    pub kind: UnitsKind,
}

impl Units {
    /// A units entry defined in place.
    pub fn defined(name: impl Into<String>, terms: Vec<UnitTerm>) -> Self {
        Self {
            name: name.into(),
            kind: UnitsKind::Defined(terms),
        }
    }

    /// A forwarding entry for units imported from a library.
    pub fn imported(
        name: impl Into<String>,
        source: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: UnitsKind::Imported {
                source: source.into(),
                reference: reference.into(),
            },
        }
    }

    /// Whether this entry forwards to an import source.
    pub fn is_imported(&self) -> bool {
        matches!(self.kind, UnitsKind::Imported { .. })
    }
}

/// SI base-dimension exponents: [metre, kilogram, second, ampere, kelvin,
/// mole, candela].
pub type Dimension = [f64; 7];

/// The fixed set of standard unit names the engine recognizes without
/// import, with their SI dimension vectors.
const STANDARD: &[(&str, Dimension)] = &[
    ("ampere", [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
    ("becquerel", [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0]),
    ("candela", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("coulomb", [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]),
    ("dimensionless", [0.0; 7]),
    ("farad", [-2.0, -1.0, 4.0, 2.0, 0.0, 0.0, 0.0]),
    ("gram", [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("gray", [2.0, 0.0, -2.0, 0.0, 0.0, 0.0, 0.0]),
    ("henry", [2.0, 1.0, -2.0, -2.0, 0.0, 0.0, 0.0]),
    ("hertz", [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0]),
    ("joule", [2.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0]),
    ("kat", [0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0]),
    ("kelvin", [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
    ("kilogram", [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("liter", [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("litre", [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("lumen", [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("lux", [-2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("meter", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("metre", [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("mole", [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("newton", [1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0]),
    ("ohm", [2.0, 1.0, -3.0, -2.0, 0.0, 0.0, 0.0]),
    ("pascal", [-1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0]),
    ("radian", [0.0; 7]),
    ("second", [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
    ("siemens", [-2.0, -1.0, 3.0, 2.0, 0.0, 0.0, 0.0]),
    ("sievert", [2.0, 0.0, -2.0, 0.0, 0.0, 0.0, 0.0]),
    ("steradian", [0.0; 7]),
    ("tesla", [0.0, 1.0, -2.0, -1.0, 0.0, 0.0, 0.0]),
    ("volt", [2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0]),
    ("watt", [2.0, 1.0, -3.0, 0.0, 0.0, 0.0, 0.0]),
    ("weber", [2.0, 1.0, -2.0, -1.0, 0.0, 0.0, 0.0]),
];

/// Whether `name` is one of the standard units, available without import.
pub fn is_standard_unit(name: &str) -> bool {
    STANDARD.iter().any(|(n, _)| *n == name)
}

/// SI dimension vector of a units name, when computable.
///
/// Standard units come from the fixed table; model-defined units are
/// expanded term by term (prefixes and multipliers do not affect
/// dimension). Unresolved import forwards have no computable dimension.
pub fn dimension_of(model: &Model, name: &str) -> Option<Dimension> {
    resolve_dimension(model, name, &mut Vec::new())
}

fn resolve_dimension(model: &Model, name: &str, visiting: &mut Vec<String>) -> Option<Dimension> {
    if let Some((_, dim)) = STANDARD.iter().find(|(n, _)| *n == name) {
        return Some(*dim);
    }
    // cycle guard
    if visiting.iter().any(|n| n == name) {
        return None;
    }
    let units = model.units_by_name(name)?;
    let UnitsKind::Defined(terms) = &units.kind else {
        return None;
    };
    visiting.push(name.to_string());
    let mut total = [0.0; 7];
    for term in terms {
        let dim = resolve_dimension(model, &term.units, visiting)?;
        for (acc, d) in total.iter_mut().zip(dim) {
            *acc += term.exponent * d;
        }
    }
    visiting.pop();
    Some(total)
}

/// Whether two units names are dimensionally compatible within a model.
///
/// Equal names are always compatible; otherwise both dimensions must be
/// computable and equal.
pub fn compatible(model: &Model, a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (dimension_of(model, a), dimension_of(model, b)) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}
