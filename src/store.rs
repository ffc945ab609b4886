//! Project store: the read-only catalogue the compiler draws from.
//!
//! Holds module sources keyed by filename, the ordered unit-library
//! catalogue, and previously assigned global parameter values. The compiler
//! never writes back; the store is populated by the host (CLI, browser
//! shell, or tests) before a compile run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A unit-library file in catalogue order.
#[derive(Debug, Clone)]
pub struct UnitsEntry {
    /// Library filename, used as the import-source url.
    pub filename: String,
    /// Raw model text of the library.
    pub source: String,
}

/// A previously assigned global parameter value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalParameter {
    /// Assigned value (may be a placeholder; see [`is_unset`]).
    pub value: String,
    /// Units the value was recorded in.
    pub units: String,
}

/// Read-only project catalogue.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    modules: IndexMap<String, String>,
    unit_libraries: Vec<UnitsEntry>,
    globals: IndexMap<String, GlobalParameter>,
}

impl ProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a module file.
    pub fn add_module_file(&mut self, filename: impl Into<String>, source: impl Into<String>) {
        self.modules.insert(filename.into(), source.into());
    }

    /// Whether a module file is loaded.
    pub fn has_module_file(&self, filename: &str) -> bool {
        self.modules.contains_key(filename)
    }

    /// Raw source text of a module file.
    pub fn module_source(&self, filename: &str) -> Option<&str> {
        self.modules.get(filename).map(String::as_str)
    }

    /// Append a unit-library file; scan order is insertion order.
    pub fn add_units_file(&mut self, filename: impl Into<String>, source: impl Into<String>) {
        let filename = filename.into();
        let source = source.into();
        if let Some(entry) = self.unit_libraries.iter_mut().find(|e| e.filename == filename) {
            entry.source = source;
        } else {
            self.unit_libraries.push(UnitsEntry { filename, source });
        }
    }

    /// The unit-library catalogue, in catalogue order.
    pub fn unit_libraries(&self) -> &[UnitsEntry] {
        &self.unit_libraries
    }

    /// Record a global parameter value for a variable name.
    ///
    /// Numeric values are canonicalized so that `"1.50"` and `"1.5"` compare
    /// equal; non-numeric text is stored as given.
    pub fn set_global_parameter(
        &mut self,
        variable_name: impl Into<String>,
        value: impl Into<String>,
        units: impl Into<String>,
    ) {
        self.globals.insert(
            variable_name.into(),
            GlobalParameter {
                value: normalize_value(&value.into()),
                units: units.into(),
            },
        );
    }

    /// Look up the global value assigned to a variable name.
    pub fn global_parameter(&self, variable_name: &str) -> Option<&GlobalParameter> {
        self.globals.get(variable_name)
    }
}

/// Canonicalize a parameter value: trim, and render numeric strings through
/// a float parse so equal numbers serialize identically. Placeholders pass
/// through untouched.
pub fn normalize_value(value: &str) -> String {
    let trimmed = value.trim();
    if is_unset(trimmed) {
        return trimmed.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(num) => format!("{num}"),
        Err(_) => trimmed.to_string(),
    }
}

/// Whether a parameter value counts as absent: empty or the `-` placeholder.
pub fn is_unset(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "-"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_catalogue() {
        let mut store = ProjectStore::new();
        store.add_module_file("vessels.xml", "<model name=\"vessels\"/>");
        assert!(store.has_module_file("vessels.xml"));
        assert!(!store.has_module_file("nerves.xml"));
        assert_eq!(
            store.module_source("vessels.xml"),
            Some("<model name=\"vessels\"/>")
        );
    }

    #[test]
    fn test_units_catalogue_keeps_order_and_replaces() {
        let mut store = ProjectStore::new();
        store.add_units_file("a.xml", "first");
        store.add_units_file("b.xml", "second");
        store.add_units_file("a.xml", "updated");
        let names: Vec<_> = store.unit_libraries().iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
        assert_eq!(store.unit_libraries()[0].source, "updated");
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value(" 1.50 "), "1.5");
        assert_eq!(normalize_value("3"), "3");
        assert_eq!(normalize_value("textual"), "textual");
        assert_eq!(normalize_value("-"), "-");
    }

    #[test]
    fn test_is_unset() {
        assert!(is_unset(""));
        assert!(is_unset("  "));
        assert!(is_unset("-"));
        assert!(!is_unset("0"));
    }
}
