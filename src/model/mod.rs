//! In-memory model algebra.
//!
//! This module is the compiler's model engine: the document structures
//! (models, components, variables, units), equivalence bookkeeping, the XML
//! reader/printer, structural validation, import resolution/flattening, and
//! the non-fatal dependency analysis. Everything is plain owned data; a model
//! and all its parts are dropped together when the compile invocation ends.

pub mod analysis;
pub mod component;
pub mod flatten;
pub mod math;
pub mod units;
pub mod validate;
pub mod xml;

pub use component::{Component, Interface, Variable};
pub use flatten::Importer;
pub use units::{UnitTerm, Units, UnitsKind};

use crate::error::{CompileError, Issue, Result};

/// Reference to a variable by component and variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableRef {
    /// Owning component name.
    pub component: String,
    /// Variable name within the component.
    pub variable: String,
}

impl VariableRef {
    /// Create a reference from component and variable names.
    pub fn new(component: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            variable: variable.into(),
        }
    }
}

impl std::fmt::Display for VariableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.component, self.variable)
    }
}

/// An unordered pair of variables declared mathematically identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    /// One endpoint.
    pub a: VariableRef,
    /// The other endpoint.
    pub b: VariableRef,
}

impl Equivalence {
    /// Whether this equivalence connects the same unordered pair as (a, b).
    pub fn connects(&self, a: &VariableRef, b: &VariableRef) -> bool {
        (&self.a == a && &self.b == b) || (&self.a == b && &self.b == a)
    }
}

/// The top-level model aggregate: components, units, and equivalences.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    units: Vec<Units>,
    components: Vec<Component>,
    equivalences: Vec<Equivalence>,
}

impl Model {
    /// Create an empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the model.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Add a units entry; duplicates are caught by validation.
    pub fn add_units(&mut self, units: Units) {
        self.units.push(units);
    }

    /// Whether the model holds a units entry with this name.
    pub fn has_units(&self, name: &str) -> bool {
        self.units.iter().any(|u| u.name == name)
    }

    /// Look up a units entry by name.
    pub fn units_by_name(&self, name: &str) -> Option<&Units> {
        self.units.iter().find(|u| u.name == name)
    }

    /// All units entries, in insertion order.
    pub fn units(&self) -> &[Units] {
        &self.units
    }

    /// Replace the units list wholesale (used by flattening).
    pub(crate) fn set_units(&mut self, units: Vec<Units>) {
        self.units = units;
    }

    /// Add a component; duplicate names are caught by validation.
    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    /// Look up a component by name, mutably.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.name() == name)
    }

    /// Look up a component by name, inserting an empty one if absent.
    pub fn component_mut_or_insert(&mut self, name: &str) -> &mut Component {
        let idx = match self.components.iter().position(|c| c.name() == name) {
            Some(idx) => idx,
            None => {
                self.components.push(Component::new(name));
                self.components.len() - 1
            }
        };
        &mut self.components[idx]
    }

    /// All components, in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Remove a component by name, along with any equivalences touching it.
    /// Returns whether a component was removed.
    pub fn remove_component(&mut self, name: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.name() != name);
        if self.components.len() == before {
            return false;
        }
        self.equivalences
            .retain(|eq| eq.a.component != name && eq.b.component != name);
        true
    }

    /// Move the named component to the front of the component list.
    /// Returns whether the component was found.
    pub fn move_component_first(&mut self, name: &str) -> bool {
        match self.components.iter().position(|c| c.name() == name) {
            Some(idx) => {
                let component = self.components.remove(idx);
                self.components.insert(0, component);
                true
            }
            None => false,
        }
    }

    /// Declare two variables mathematically identical.
    ///
    /// Endpoint existence and visibility are enforced by validation, not at
    /// declaration time.
    pub fn add_equivalence(&mut self, a: VariableRef, b: VariableRef) {
        self.equivalences.push(Equivalence { a, b });
    }

    /// All declared equivalences, in declaration order.
    pub fn equivalences(&self) -> &[Equivalence] {
        &self.equivalences
    }

    /// Parse a model document.
    pub fn from_xml(text: &str) -> std::result::Result<Self, Vec<Issue>> {
        xml::parse(text)
    }

    /// Print this model as an XML document.
    pub fn to_xml(&self) -> Result<String> {
        xml::print(self).map_err(|err| CompileError::Print {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_lookup_and_removal() {
        let mut model = Model::new("m");
        model.add_component(Component::new("a"));
        model.add_component(Component::new("b"));
        model.add_equivalence(VariableRef::new("a", "x"), VariableRef::new("b", "y"));

        assert!(model.component("a").is_some());
        assert!(model.remove_component("a"));
        assert!(model.component("a").is_none());
        // equivalences touching the removed component go with it
        assert!(model.equivalences().is_empty());
        assert!(!model.remove_component("a"));
    }

    #[test]
    fn test_move_component_first() {
        let mut model = Model::new("m");
        model.add_component(Component::new("a"));
        model.add_component(Component::new("b"));
        model.add_component(Component::new("environment"));
        assert!(model.move_component_first("environment"));
        assert_eq!(model.components()[0].name(), "environment");
        assert_eq!(model.components()[1].name(), "a");
        assert!(!model.move_component_first("missing"));
    }

    #[test]
    fn test_equivalence_connects_unordered() {
        let eq = Equivalence {
            a: VariableRef::new("a", "x"),
            b: VariableRef::new("b", "y"),
        };
        assert!(eq.connects(&VariableRef::new("b", "y"), &VariableRef::new("a", "x")));
        assert!(!eq.connects(&VariableRef::new("a", "x"), &VariableRef::new("b", "z")));
    }

    #[test]
    fn test_component_mut_or_insert() {
        let mut model = Model::new("m");
        model.component_mut_or_insert("hub").add_variable(Variable::new("v", "second"));
        // second call reuses the existing component
        assert_eq!(model.component_mut_or_insert("hub").variables().len(), 1);
        assert_eq!(model.components().len(), 1);
    }
}
