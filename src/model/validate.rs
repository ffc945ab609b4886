//! Structural model validation.
//!
//! All findings are accumulated and reported together; the caller decides
//! whether any of them abort the compile.

use std::collections::HashSet;

use super::{math, units, Model, VariableRef};
use crate::error::Issue;

/// Validate a model, returning every structural issue found.
///
/// Checks:
/// - model, component, and variable naming (presence and uniqueness)
/// - units references resolve to a standard unit or a model units entry
/// - units entries are unique and do not shadow standard units
/// - equivalences connect two existing, public variables of two different
///   components
/// - equations assign to a variable of their component and only annotate
///   known units
pub fn validate(model: &Model) -> Vec<Issue> {
    let mut issues = Vec::new();

    if model.name().is_empty() {
        issues.push(Issue::new("model has no name"));
    }

    let mut seen_units: HashSet<&str> = HashSet::new();
    for entry in model.units() {
        if units::is_standard_unit(&entry.name) {
            issues.push(Issue::new(format!(
                "units '{}' shadows a standard unit",
                entry.name
            )));
        }
        if !seen_units.insert(&entry.name) {
            issues.push(Issue::new(format!(
                "units '{}' is defined more than once in the model",
                entry.name
            )));
        }
    }

    let mut seen_components: HashSet<&str> = HashSet::new();
    for component in model.components() {
        if !seen_components.insert(component.name()) {
            issues.push(Issue::new(format!(
                "component '{}' is defined more than once in the model",
                component.name()
            )));
        }

        let mut seen_variables: HashSet<&str> = HashSet::new();
        for variable in component.variables() {
            if !seen_variables.insert(&variable.name) {
                issues.push(Issue::new(format!(
                    "variable '{}' is defined more than once in component '{}'",
                    variable.name,
                    component.name()
                )));
            }
            if variable.units.is_empty() {
                issues.push(Issue::new(format!(
                    "variable '{}' in component '{}' has no units",
                    variable.name,
                    component.name()
                )));
            } else if !units_known(model, &variable.units) {
                issues.push(Issue::new(format!(
                    "units '{}' referenced by variable '{}' in component '{}' are not defined in the model",
                    variable.units,
                    variable.name,
                    component.name()
                )));
            }
        }

        for equation in component.math() {
            match math::assigned_variable(equation) {
                Some(lhs) if component.has_variable(lhs) => {}
                Some(lhs) => issues.push(Issue::new(format!(
                    "equation in component '{}' assigns to '{lhs}', which is not a variable of the component",
                    component.name()
                ))),
                None => issues.push(Issue::new(format!(
                    "equation '{equation}' in component '{}' is not an assignment to a variable",
                    component.name()
                ))),
            }
            for name in math::referenced_units(equation) {
                if !units_known(model, &name) {
                    issues.push(Issue::new(format!(
                        "units '{name}' annotated in an equation of component '{}' are not defined in the model",
                        component.name()
                    )));
                }
            }
        }
    }

    for eq in model.equivalences() {
        check_endpoint(model, &eq.a, &mut issues);
        check_endpoint(model, &eq.b, &mut issues);
        if eq.a.component == eq.b.component {
            issues.push(Issue::new(format!(
                "equivalence between '{}' and '{}' connects variables of the same component",
                eq.a, eq.b
            )));
        }
    }

    issues
}

fn units_known(model: &Model, name: &str) -> bool {
    units::is_standard_unit(name) || model.has_units(name)
}

fn check_endpoint(model: &Model, endpoint: &VariableRef, issues: &mut Vec<Issue>) {
    let Some(component) = model.component(&endpoint.component) else {
        issues.push(Issue::new(format!(
            "equivalence references unknown component '{}'",
            endpoint.component
        )));
        return;
    };
    let Some(variable) = component.variable(&endpoint.variable) else {
        issues.push(Issue::new(format!(
            "equivalence references unknown variable '{endpoint}'"
        )));
        return;
    };
    if !variable.interface.is_public() {
        issues.push(Issue::new(format!(
            "equivalence references non-public variable '{endpoint}'"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, UnitTerm, Units, Variable};

    fn base_model() -> Model {
        let mut model = Model::new("m");
        let mut comp = Component::new("artery");
        comp.add_variable(Variable::public("flow", "ml_per_s"));
        comp.add_variable(Variable::new("resistance", "second"));
        model.add_component(comp);
        model.add_units(Units::defined(
            "ml_per_s",
            vec![UnitTerm::of("litre"), UnitTerm {
                exponent: -1.0,
                ..UnitTerm::of("second")
            }],
        ));
        model
    }

    #[test]
    fn test_valid_model_has_no_issues() {
        assert!(validate(&base_model()).is_empty());
    }

    #[test]
    fn test_unknown_units_reported() {
        let mut model = base_model();
        model
            .component_mut("artery")
            .unwrap()
            .add_variable(Variable::new("p", "mmHg"));
        let issues = validate(&model);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("units 'mmHg'"));
    }

    #[test]
    fn test_duplicate_units_reported() {
        let mut model = base_model();
        model.add_units(Units::imported("ml_per_s", "lib.xml", "ml_per_s"));
        let issues = validate(&model);
        assert!(issues
            .iter()
            .any(|i| i.description.contains("defined more than once in the model")));
    }

    #[test]
    fn test_standard_unit_shadowing_reported() {
        let mut model = base_model();
        model.add_units(Units::defined("second", vec![]));
        let issues = validate(&model);
        assert!(issues.iter().any(|i| i.description.contains("shadows a standard unit")));
    }

    #[test]
    fn test_equivalence_endpoints_checked() {
        let mut model = base_model();
        let mut other = Component::new("vein");
        other.add_variable(Variable::public("flow", "ml_per_s"));
        model.add_component(other);

        // fine: two public variables of two components
        model.add_equivalence(
            VariableRef::new("artery", "flow"),
            VariableRef::new("vein", "flow"),
        );
        assert!(validate(&model).is_empty());

        // non-public endpoint
        model.add_equivalence(
            VariableRef::new("artery", "resistance"),
            VariableRef::new("vein", "flow"),
        );
        // unknown component and same-component pair
        model.add_equivalence(
            VariableRef::new("nerve", "x"),
            VariableRef::new("artery", "flow"),
        );
        model.add_equivalence(
            VariableRef::new("artery", "flow"),
            VariableRef::new("artery", "flow"),
        );

        let issues = validate(&model);
        assert!(issues.iter().any(|i| i.description.contains("non-public")));
        assert!(issues.iter().any(|i| i.description.contains("unknown component 'nerve'")));
        assert!(issues
            .iter()
            .any(|i| i.description.contains("same component")));
    }

    #[test]
    fn test_equation_checks() {
        let mut model = base_model();
        let comp = model.component_mut("artery").unwrap();
        comp.append_math("flow = resistance * 2{ml_per_s}");
        comp.append_math("missing = 1");
        comp.append_math("not an equation");
        comp.append_math("flow = 3{undefined_units}");

        let issues = validate(&model);
        assert!(issues.iter().any(|i| i.description.contains("assigns to 'missing'")));
        assert!(issues
            .iter()
            .any(|i| i.description.contains("not an assignment")));
        assert!(issues
            .iter()
            .any(|i| i.description.contains("units 'undefined_units' annotated")));
        assert_eq!(issues.len(), 3);
    }
}
