//! Node instantiation: module lookup, cloning, and parameter binding.

use crate::error::{CompileError, Result};
use crate::graph::VariableKind;
use crate::model::{math, VariableRef};
use crate::store;

use super::{params, Compiler, GLOBAL_PARAMETERS, MODEL_PARAMETERS};

impl Compiler<'_> {
    /// Turn every graph node into a renamed component clone, resolving the
    /// units it needs and binding its configured parameters.
    pub(crate) fn instantiate_nodes(&mut self) -> Result<()> {
        for node in &self.graph.nodes {
            if self.instances.contains_key(&node.id) {
                log::debug!("node '{}' appears twice in the graph, skipping", node.id);
                continue;
            }

            let module = self.modules.load(self.store, &node.source_file)?;
            let Some(definition) = module.component(&node.component_name) else {
                return Err(CompileError::MissingComponent {
                    component: node.component_name.clone(),
                    filename: node.source_file.clone(),
                });
            };
            let clone = definition.clone_as(&node.name);

            // units the clone needs: equation literals first, then variables
            let mut needed: Vec<String> = Vec::new();
            for equation in clone.math() {
                for name in math::referenced_units(equation) {
                    push_unique(&mut needed, name);
                }
            }

            let mut bindings: Vec<params::Binding> = Vec::new();
            for variable in clone.variables() {
                push_unique(&mut needed, variable.units.clone());

                let Some(config) = node.variable_config(&variable.name) else {
                    continue;
                };
                match config.kind {
                    VariableKind::GlobalConstant => {
                        let Some(global) = self.store.global_parameter(&variable.name) else {
                            continue;
                        };
                        if store::is_unset(&global.value) {
                            continue;
                        }
                        let units = if global.units.is_empty() {
                            variable.units.clone()
                        } else {
                            global.units.clone()
                        };
                        bindings.push(params::Binding {
                            holder: GLOBAL_PARAMETERS,
                            variable: VariableRef::new(&node.name, &variable.name),
                            value: global.value.clone(),
                            units,
                        });
                    }
                    VariableKind::Constant => {
                        let Some(value) = config.value.as_deref() else {
                            continue;
                        };
                        if store::is_unset(value) {
                            continue;
                        }
                        let units = match config.units.as_deref() {
                            Some(units) if !units.is_empty() => units.to_string(),
                            _ => variable.units.clone(),
                        };
                        bindings.push(params::Binding {
                            holder: MODEL_PARAMETERS,
                            variable: VariableRef::new(&node.name, &variable.name),
                            value: store::normalize_value(value),
                            units,
                        });
                    }
                    VariableKind::Variable | VariableKind::BoundaryCondition => {}
                }
            }
            for binding in &bindings {
                push_unique(&mut needed, binding.units.clone());
            }

            self.instances.insert(node.id.clone(), node.name.clone());
            self.model.add_component(clone);

            for name in &needed {
                self.units.ensure_imported(
                    self.store,
                    &mut self.model,
                    &mut self.importer,
                    &mut self.warnings,
                    name,
                )?;
            }
            for binding in &bindings {
                params::bind(&mut self.model, binding);
            }
        }
        Ok(())
    }
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.contains(&name) {
        names.push(name);
    }
}
