//! Module cache: parsed module files, keyed by filename.

use indexmap::IndexMap;

use crate::error::{CompileError, Result};
use crate::model::Model;
use crate::store::ProjectStore;

/// Parse-once cache over the project store's module files.
///
/// Every node referencing the same module file shares one parsed model;
/// repeated instantiations never re-parse.
#[derive(Debug, Default)]
pub(crate) struct ModuleCache {
    parsed: IndexMap<String, Model>,
}

impl ModuleCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The parsed model of a module file, loading it on first use.
    pub(crate) fn load(&mut self, store: &ProjectStore, filename: &str) -> Result<&Model> {
        if !self.parsed.contains_key(filename) {
            let source =
                store
                    .module_source(filename)
                    .ok_or_else(|| CompileError::MissingFile {
                        filename: filename.to_string(),
                    })?;
            let model = Model::from_xml(source).map_err(|issues| CompileError::Parse {
                filename: filename.to_string(),
                issues,
            })?;
            self.parsed.insert(filename.to_string(), model);
        }
        Ok(&self.parsed[filename])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_parses_once() {
        let mut store = ProjectStore::new();
        store.add_module_file(
            "vessels.xml",
            "<model name=\"vessels\"><component name=\"artery\"/></model>",
        );
        let mut cache = ModuleCache::new();
        assert!(cache.load(&store, "vessels.xml").is_ok());

        // a later store update is not observed; the cache owns the parse
        store.add_module_file("vessels.xml", "<model name=\"changed\"/>");
        let model = cache.load(&store, "vessels.xml").unwrap();
        assert_eq!(model.name(), "vessels");
    }

    #[test]
    fn test_missing_file() {
        let store = ProjectStore::new();
        let mut cache = ModuleCache::new();
        let err = cache.load(&store, "nerves.xml").unwrap_err();
        assert!(matches!(err, CompileError::MissingFile { filename } if filename == "nerves.xml"));
    }

    #[test]
    fn test_parse_error_carries_filename() {
        let mut store = ProjectStore::new();
        store.add_module_file("broken.xml", "<model");
        let mut cache = ModuleCache::new();
        let err = cache.load(&store, "broken.xml").unwrap_err();
        assert!(matches!(err, CompileError::Parse { filename, .. } if filename == "broken.xml"));
    }
}
