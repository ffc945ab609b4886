//! Import resolution and flattening.
//!
//! The importer holds the library models registered during unit resolution,
//! keyed by their source url (the library filename). Flattening replaces
//! every import forward with the concrete definition from its source,
//! pulling in any non-standard units that definition transitively
//! references, and yields a self-contained copy of the model.

use indexmap::IndexMap;

use super::{units, Model, Units, UnitsKind};
use crate::error::Issue;

/// Registry of import-source models.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    library: IndexMap<String, Model>,
}

impl Importer {
    /// Create an empty importer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parsed model under its source url.
    pub fn register(&mut self, url: impl Into<String>, model: Model) {
        self.library.insert(url.into(), model);
    }

    /// Whether a source url has been registered.
    pub fn has_source(&self, url: &str) -> bool {
        self.library.contains_key(url)
    }

    /// Resolve all import forwards and return a flattened, import-free copy.
    ///
    /// All resolution problems are accumulated; any of them fails the call.
    pub fn resolve_and_flatten(&self, model: &Model) -> Result<Model, Vec<Issue>> {
        let mut issues = Vec::new();
        let mut resolved: Vec<Units> = Vec::new();

        for entry in model.units() {
            match &entry.kind {
                UnitsKind::Defined(_) => {
                    if !contains(&resolved, &entry.name) {
                        resolved.push(entry.clone());
                    }
                }
                UnitsKind::Imported { source, reference } => {
                    let Some(library) = self.library.get(source) else {
                        issues.push(Issue::new(format!(
                            "import source '{source}' for units '{}' is not registered",
                            entry.name
                        )));
                        continue;
                    };
                    self.copy_definition(library, source, reference, &entry.name, &mut resolved, &mut issues);
                }
            }
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        let mut flattened = model.clone();
        flattened.set_units(resolved);
        Ok(flattened)
    }

    /// Copy `reference` from `library` into `resolved` under `name`, then
    /// recursively copy any non-standard units the definition mentions.
    fn copy_definition(
        &self,
        library: &Model,
        source: &str,
        reference: &str,
        name: &str,
        resolved: &mut Vec<Units>,
        issues: &mut Vec<Issue>,
    ) {
        if contains(resolved, name) {
            return;
        }
        let Some(definition) = library.units_by_name(reference) else {
            issues.push(Issue::new(format!(
                "import source '{source}' does not define units '{reference}'"
            )));
            return;
        };
        let UnitsKind::Defined(terms) = &definition.kind else {
            issues.push(Issue::new(format!(
                "units '{reference}' in import source '{source}' is itself an import and cannot be flattened"
            )));
            return;
        };

        resolved.push(Units::defined(name, terms.clone()));
        for term in terms {
            if units::is_standard_unit(&term.units) || contains(resolved, &term.units) {
                continue;
            }
            self.copy_definition(library, source, &term.units, &term.units, resolved, issues);
        }
    }
}

fn contains(resolved: &[Units], name: &str) -> bool {
    resolved.iter().any(|u| u.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitTerm;

    fn pressure_library() -> Model {
        let mut lib = Model::new("pressure_units");
        lib.add_units(Units::defined(
            "mmHg",
            vec![UnitTerm {
                multiplier: 133.322,
                ..UnitTerm::of("pascal")
            }],
        ));
        lib.add_units(Units::defined(
            "mmHg_per_ml",
            vec![UnitTerm::of("mmHg"), UnitTerm {
                exponent: -1.0,
                ..UnitTerm::of("millilitre")
            }],
        ));
        lib.add_units(Units::defined(
            "millilitre",
            vec![UnitTerm {
                prefix: Some("milli".into()),
                ..UnitTerm::of("litre")
            }],
        ));
        lib
    }

    #[test]
    fn test_flatten_replaces_forward_with_definition() {
        let mut importer = Importer::new();
        importer.register("units/pressure.xml", pressure_library());

        let mut model = Model::new("m");
        model.add_units(Units::imported("mmHg", "units/pressure.xml", "mmHg"));

        let flat = importer.resolve_and_flatten(&model).unwrap();
        let units = flat.units_by_name("mmHg").unwrap();
        assert!(!units.is_imported());
    }

    #[test]
    fn test_flatten_pulls_transitive_definitions() {
        let mut importer = Importer::new();
        importer.register("units/pressure.xml", pressure_library());

        let mut model = Model::new("m");
        model.add_units(Units::imported(
            "mmHg_per_ml",
            "units/pressure.xml",
            "mmHg_per_ml",
        ));

        let flat = importer.resolve_and_flatten(&model).unwrap();
        // the definition plus both non-standard units it references
        assert!(flat.units_by_name("mmHg_per_ml").is_some());
        assert!(flat.units_by_name("mmHg").is_some());
        assert!(flat.units_by_name("millilitre").is_some());
        assert_eq!(flat.units().len(), 3);
    }

    #[test]
    fn test_unregistered_source_fails() {
        let importer = Importer::new();
        let mut model = Model::new("m");
        model.add_units(Units::imported("mmHg", "units/missing.xml", "mmHg"));

        let issues = importer.resolve_and_flatten(&model).unwrap_err();
        assert!(issues[0].description.contains("'units/missing.xml'"));
        assert!(issues[0].description.contains("not registered"));
    }

    #[test]
    fn test_missing_reference_fails() {
        let mut importer = Importer::new();
        importer.register("units/pressure.xml", pressure_library());

        let mut model = Model::new("m");
        model.add_units(Units::imported("kPa", "units/pressure.xml", "kPa"));

        let issues = importer.resolve_and_flatten(&model).unwrap_err();
        assert!(issues[0].description.contains("does not define units 'kPa'"));
    }
}
