//! Summation synthesis: the generated aggregation hub.
//!
//! Every registered aggregation point gets one output variable and one
//! input variable per inflow on the shared hub component, plus the equation
//! making the output the sum of the inputs. Variable names are made unique
//! with a numeric suffix, so repeated operand names coexist.

use crate::error::{CompileError, Result};
use crate::model::{math, Variable, VariableRef};

use super::{Compiler, SUMMATION_COMPONENT};

impl Compiler<'_> {
    pub(crate) fn synthesize_summations(&mut self) -> Result<()> {
        let sums = std::mem::take(&mut self.sums);
        for (key, request) in sums {
            // aggregation carries exactly one variable per side
            if request.options.len() != 1 {
                return Err(CompileError::unsupported(format!(
                    "aggregation port '{}' of '{}' must carry exactly one variable, found {}",
                    key.label,
                    key.component,
                    request.options.len()
                )));
            }
            for operand in &request.operands {
                if operand.options.len() != 1 {
                    return Err(CompileError::unsupported(format!(
                        "port of '{}' feeding aggregation port '{}' of '{}' must carry exactly one variable, found {}",
                        operand.component,
                        key.label,
                        key.component,
                        operand.options.len()
                    )));
                }
            }

            let output_var = &request.options[0];
            // a missing or unitless source variable still gets a valid hub
            let units = self
                .model
                .component(&request.component)
                .and_then(|c| c.variable(output_var))
                .map(|v| v.units.clone())
                .filter(|units| !units.is_empty())
                .unwrap_or_else(|| "dimensionless".to_string());

            let hub = self.model.component_mut_or_insert(SUMMATION_COMPONENT);
            let output_name = hub.next_available_name(&format!("sum_of_{output_var}"));
            hub.add_variable(Variable::public(&output_name, &units));
            let mut operand_names = Vec::with_capacity(request.operands.len());
            for operand in &request.operands {
                let name = hub.next_available_name(&format!("op_{}", operand.options[0]));
                hub.add_variable(Variable::public(&name, &units));
                operand_names.push(name);
            }
            hub.append_math(math::sum_equation(&output_name, &operand_names));

            let output_ref = VariableRef::new(&request.component, output_var);
            if self.has_variable(&output_ref) {
                super::link(
                    &mut self.model,
                    VariableRef::new(SUMMATION_COMPONENT, &output_name),
                    output_ref,
                );
            } else {
                log::debug!(
                    "aggregation output '{output_ref}' is not a variable of its component"
                );
            }
            for (operand, name) in request.operands.iter().zip(&operand_names) {
                let operand_ref = VariableRef::new(&operand.component, &operand.options[0]);
                if self.has_variable(&operand_ref) {
                    super::link(
                        &mut self.model,
                        VariableRef::new(SUMMATION_COMPONENT, name),
                        operand_ref,
                    );
                } else {
                    log::debug!(
                        "aggregation operand '{operand_ref}' is not a variable of its component"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::{Compiler, SUMMATION_COMPONENT};
    use crate::graph::{Edge, Graph, Node, PortKind, PortLabel};
    use crate::store::ProjectStore;

    const PLUMBING: &str = r#"
        <model name="plumbing">
          <component name="drain">
            <variable name="total" interface="public"/>
          </component>
          <component name="pipe">
            <variable name="flow" units="second" interface="public"/>
          </component>
        </model>
    "#;

    fn node(id: &str, name: &str, component: &str, port: PortLabel) -> Node {
        Node {
            id: id.into(),
            source_file: "plumbing.xml".into(),
            component_name: component.into(),
            name: name.into(),
            port_labels: vec![port],
            variables: Vec::new(),
        }
    }

    #[test]
    fn test_unitless_aggregation_source_falls_back_to_dimensionless() {
        let mut store = ProjectStore::new();
        store.add_module_file("plumbing.xml", PLUMBING);
        let graph = Graph {
            nodes: vec![
                node(
                    "n0",
                    "inlet",
                    "pipe",
                    PortLabel {
                        label: "join".into(),
                        option: vec!["flow".into()],
                        kind: PortKind::Exit,
                        multi_port_sum: false,
                    },
                ),
                node(
                    "n1",
                    "sink",
                    "drain",
                    PortLabel {
                        label: "join".into(),
                        option: vec!["total".into()],
                        kind: PortKind::Entrance,
                        multi_port_sum: true,
                    },
                ),
            ],
            edges: vec![Edge {
                id: "e0".into(),
                source: "n0".into(),
                target: "n1".into(),
            }],
        };

        let mut compiler = Compiler::new(&graph, &store);
        compiler.instantiate_nodes().unwrap();
        compiler.resolve_connections().unwrap();
        compiler.synthesize_summations().unwrap();

        // sink.total has no units name, so the hub must not inherit ""
        let hub = compiler.model.component(SUMMATION_COMPONENT).unwrap();
        assert_eq!(hub.variables().len(), 2);
        assert!(hub.variables().iter().all(|v| v.units == "dimensionless"));
    }
}

