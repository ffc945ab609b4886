//! Parameter binding through holder components.
//!
//! A bound variable keeps its place in the instance; its value lives on a
//! public variable of the holder component (`parameters` for instance
//! constants, `parameters_global` for shared ones) and reaches the instance
//! through an equivalence. Several instances binding the same variable name
//! share one holder variable; the first recorded value stands.

use crate::model::{Model, Variable, VariableRef};

/// One requested binding of an instance variable to a held value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Binding {
    /// Holder component name.
    pub holder: &'static str,
    /// The instance variable being bound.
    pub variable: VariableRef,
    /// Normalized value, stored as the holder variable's initial value.
    pub value: String,
    /// Units of the holder variable.
    pub units: String,
}

/// Apply a binding: materialize the holder variable if needed and connect
/// the instance variable to it.
pub(crate) fn bind(model: &mut Model, binding: &Binding) {
    let holder = model.component_mut_or_insert(binding.holder);
    if !holder.has_variable(&binding.variable.variable) {
        let mut variable = Variable::public(&binding.variable.variable, &binding.units);
        variable.initial_value = Some(binding.value.clone());
        holder.add_variable(variable);
    }
    super::link(
        model,
        VariableRef::new(binding.holder, &binding.variable.variable),
        binding.variable.clone(),
    );
}
