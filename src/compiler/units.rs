//! Units resolver: on-demand import of units from the library catalogue.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{CompileError, Issue, Result};
use crate::model::{units, Importer, Model, Units};
use crate::store::ProjectStore;

/// Resolves units names against the project's unit-library catalogue.
///
/// Libraries are parsed lazily, in catalogue order, the first time a lookup
/// reaches them; the first library defining a name wins. Each library is
/// registered with the importer at most once, no matter how many of its
/// definitions end up imported.
#[derive(Debug, Default)]
pub(crate) struct UnitsResolver {
    parsed: IndexMap<String, Model>,
    registered: HashSet<String>,
    unresolved: HashSet<String>,
}

impl UnitsResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `name` available in `model`, importing it if necessary.
    ///
    /// Standard units and names the model already holds need no work. An
    /// unresolvable name is a warning, not an error: the model keeps the
    /// dangling reference and validation reports it downstream. A unit
    /// library that fails to parse is fatal.
    pub(crate) fn ensure_imported(
        &mut self,
        store: &ProjectStore,
        model: &mut Model,
        importer: &mut Importer,
        warnings: &mut Vec<Issue>,
        name: &str,
    ) -> Result<()> {
        if name.is_empty() || units::is_standard_unit(name) || model.has_units(name) {
            return Ok(());
        }

        for entry in store.unit_libraries() {
            if !self.parsed.contains_key(&entry.filename) {
                let library =
                    Model::from_xml(&entry.source).map_err(|issues| CompileError::Parse {
                        filename: entry.filename.clone(),
                        issues,
                    })?;
                self.parsed.insert(entry.filename.clone(), library);
            }
            let library = &self.parsed[&entry.filename];
            if library.units_by_name(name).is_some() {
                if self.registered.insert(entry.filename.clone()) {
                    importer.register(entry.filename.clone(), library.clone());
                }
                model.add_units(Units::imported(name, entry.filename.clone(), name));
                return Ok(());
            }
        }

        if self.unresolved.insert(name.to_string()) {
            let issue = Issue::new(format!("units '{name}' not found in any unit library"));
            log::warn!("{issue}");
            warnings.push(issue);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESSURE_LIB: &str = r#"
        <model name="pressure_units">
          <units name="mmHg">
            <unit units="pascal" multiplier="133.322"/>
          </units>
        </model>
    "#;

    const FLOW_LIB: &str = r#"
        <model name="flow_units">
          <units name="ml_per_s">
            <unit units="litre" prefix="milli"/>
            <unit units="second" exponent="-1"/>
          </units>
          <units name="mmHg">
            <unit units="pascal"/>
          </units>
        </model>
    "#;

    fn catalogue() -> ProjectStore {
        let mut store = ProjectStore::new();
        store.add_units_file("pressure.xml", PRESSURE_LIB);
        store.add_units_file("flow.xml", FLOW_LIB);
        store
    }

    #[test]
    fn test_standard_and_present_units_are_skipped() {
        let store = catalogue();
        let mut resolver = UnitsResolver::new();
        let mut model = Model::new("m");
        let mut importer = Importer::new();
        let mut warnings = Vec::new();

        for name in ["", "second", "dimensionless"] {
            resolver
                .ensure_imported(&store, &mut model, &mut importer, &mut warnings, name)
                .unwrap();
        }
        assert!(model.units().is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_first_library_wins_and_registers_once() {
        let store = catalogue();
        let mut resolver = UnitsResolver::new();
        let mut model = Model::new("m");
        let mut importer = Importer::new();
        let mut warnings = Vec::new();

        // mmHg exists in both libraries; catalogue order decides
        resolver
            .ensure_imported(&store, &mut model, &mut importer, &mut warnings, "mmHg")
            .unwrap();
        let units = model.units_by_name("mmHg").unwrap();
        assert_eq!(
            units.kind,
            crate::model::UnitsKind::Imported {
                source: "pressure.xml".into(),
                reference: "mmHg".into()
            }
        );
        assert!(importer.has_source("pressure.xml"));
        assert!(!importer.has_source("flow.xml"));

        // second lookup is a no-op
        resolver
            .ensure_imported(&store, &mut model, &mut importer, &mut warnings, "mmHg")
            .unwrap();
        assert_eq!(model.units().len(), 1);
    }

    #[test]
    fn test_unresolved_units_warn_once() {
        let store = catalogue();
        let mut resolver = UnitsResolver::new();
        let mut model = Model::new("m");
        let mut importer = Importer::new();
        let mut warnings = Vec::new();

        for _ in 0..2 {
            resolver
                .ensure_imported(&store, &mut model, &mut importer, &mut warnings, "furlong")
                .unwrap();
        }
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].description.contains("'furlong'"));
        assert!(model.units().is_empty());
    }

    #[test]
    fn test_broken_library_is_fatal() {
        let mut store = ProjectStore::new();
        store.add_units_file("broken.xml", "<model");
        let mut resolver = UnitsResolver::new();
        let mut model = Model::new("m");
        let mut importer = Importer::new();
        let mut warnings = Vec::new();

        let err = resolver
            .ensure_imported(&store, &mut model, &mut importer, &mut warnings, "mmHg")
            .unwrap_err();
        assert!(matches!(err, CompileError::Parse { filename, .. } if filename == "broken.xml"));
    }
}
