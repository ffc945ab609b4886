//! Components and their variables.

/// Interface visibility of a variable.
///
/// Only public variables may participate in cross-component equivalences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interface {
    /// Visible to other components.
    Public,
    /// Internal to the owning component.
    #[default]
    Private,
}

impl Interface {
    /// Whether the variable may be connected across components.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

/// A variable owned by exactly one component.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Name, unique within the owning component.
    pub name: String,
    /// Name of the units this variable is expressed in.
    pub units: String,
    /// Interface visibility.
    pub interface: Interface,
    /// Fixed initial value; a set value marks the variable a constant.
    pub initial_value: Option<String>,
}

impl Variable {
    /// Create a private variable with no initial value.
    pub fn new(name: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            interface: Interface::Private,
            initial_value: None,
        }
    }

    /// Create a public variable with no initial value.
    pub fn public(name: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            interface: Interface::Public,
            ..Self::new(name, units)
        }
    }
}

/// A named bundle of variables and equations; the unit of instantiation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    name: String,
    variables: Vec<Variable>,
    math: Vec<String>,
}

impl Component {
    /// Create an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the component.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// All variables, in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Look up a variable by name, mutably.
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// Whether a variable with this name exists.
    pub fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    /// Add a variable; duplicate names are caught by validation.
    pub fn add_variable(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    /// Equation lines, in insertion order.
    pub fn math(&self) -> &[String] {
        &self.math
    }

    /// Append an equation line.
    pub fn append_math(&mut self, equation: impl Into<String>) {
        self.math.push(equation.into());
    }

    /// An independent renamed copy of this component.
    pub fn clone_as(&self, name: impl Into<String>) -> Self {
        let mut clone = self.clone();
        clone.name = name.into();
        clone
    }

    /// First variable name starting from `base` that is not yet taken,
    /// trying `base`, `base_1`, `base_2`, ...
    pub fn next_available_name(&self, base: &str) -> String {
        if !self.has_variable(base) {
            return base.to_string();
        }
        let mut index = 1;
        loop {
            let candidate = format!("{base}_{index}");
            if !self.has_variable(&candidate) {
                return candidate;
            }
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_as_is_independent() {
        let mut original = Component::new("artery");
        original.add_variable(Variable::public("pressure", "pascal"));
        original.append_math("pressure = 2{pascal}");

        let mut clone = original.clone_as("aorta");
        clone.add_variable(Variable::new("extra", "second"));

        assert_eq!(clone.name(), "aorta");
        assert_eq!(original.name(), "artery");
        assert_eq!(original.variables().len(), 1);
        assert_eq!(clone.variables().len(), 2);
        assert_eq!(clone.math(), original.math());
    }

    #[test]
    fn test_next_available_name() {
        let mut comp = Component::new("sums");
        assert_eq!(comp.next_available_name("op_flow"), "op_flow");
        comp.add_variable(Variable::new("op_flow", "litre"));
        assert_eq!(comp.next_available_name("op_flow"), "op_flow_1");
        comp.add_variable(Variable::new("op_flow_1", "litre"));
        assert_eq!(comp.next_available_name("op_flow"), "op_flow_2");
    }
}
