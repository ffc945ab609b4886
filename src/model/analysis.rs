//! Post-flattening model analysis.
//!
//! A best-effort mathematical check run after validation: every variable
//! (more precisely, every class of variables connected by equivalences)
//! should be computed by exactly one initial value or equation. Findings
//! are advisory; computed initial values in particular are a known
//! limitation of this check, so callers report them as warnings rather
//! than failing the compile.

use std::collections::HashMap;

use super::{math, Model, VariableRef};
use crate::error::Issue;

/// Analyse a model, returning advisory findings.
///
/// `variable_of_integration` names the free variable of the model (time);
/// its equivalence class is exempt from the undercomputed check.
pub fn analyse(model: &Model, variable_of_integration: Option<&VariableRef>) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut refs: Vec<VariableRef> = Vec::new();
    for component in model.components() {
        for variable in component.variables() {
            let key = (component.name().to_string(), variable.name.clone());
            index.entry(key).or_insert_with(|| {
                refs.push(VariableRef::new(component.name(), &variable.name));
                refs.len() - 1
            });
        }
    }

    let mut dsu = Dsu::new(refs.len());
    for eq in model.equivalences() {
        let a = index.get(&(eq.a.component.clone(), eq.a.variable.clone()));
        let b = index.get(&(eq.b.component.clone(), eq.b.variable.clone()));
        if let (Some(&a), Some(&b)) = (a, b) {
            dsu.union(a, b);
        }
    }

    // count definitions per equivalence class
    let mut definitions: HashMap<usize, Vec<String>> = HashMap::new();
    for component in model.components() {
        for variable in component.variables() {
            let Some(&idx) = index.get(&(component.name().to_string(), variable.name.clone()))
            else {
                continue;
            };
            if let Some(value) = &variable.initial_value {
                if value.parse::<f64>().is_err() {
                    issues.push(Issue::new(format!(
                        "initial value '{value}' of variable '{}.{}' is not a number and cannot be checked",
                        component.name(),
                        variable.name
                    )));
                }
                definitions
                    .entry(dsu.find(idx))
                    .or_default()
                    .push(format!("initial value of '{}.{}'", component.name(), variable.name));
            }
        }
        for equation in component.math() {
            let Some(lhs) = math::assigned_variable(equation) else {
                continue;
            };
            let Some(&idx) = index.get(&(component.name().to_string(), lhs.to_string())) else {
                continue;
            };
            definitions
                .entry(dsu.find(idx))
                .or_default()
                .push(format!("equation for '{}.{lhs}'", component.name()));
        }
    }

    let voi_root = variable_of_integration
        .and_then(|voi| index.get(&(voi.component.clone(), voi.variable.clone())))
        .map(|&idx| dsu.find(idx));

    // one finding per class, reported through its first member
    let mut reported: Vec<usize> = Vec::new();
    for (idx, var) in refs.iter().enumerate() {
        let root = dsu.find(idx);
        if reported.contains(&root) {
            continue;
        }
        reported.push(root);
        if Some(root) == voi_root {
            continue;
        }
        match definitions.get(&root).map(Vec::len).unwrap_or(0) {
            0 => issues.push(Issue::new(format!(
                "variable '{var}' is not computed by any equation or initial value"
            ))),
            1 => {}
            _ => {
                let sources = definitions[&root].join(", ");
                issues.push(Issue::new(format!(
                    "variable '{var}' is computed more than once ({sources})"
                )));
            }
        }
    }

    issues
}

struct Dsu {
    parent: Vec<usize>,
}

impl Dsu {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}
