//! Connection resolution: edges to equivalences, aggregation bookkeeping.

use indexmap::IndexMap;

use crate::error::{CompileError, Result};
use crate::graph::PortLabel;
use crate::model::VariableRef;

use super::Compiler;

/// Identity of an aggregation point: the aggregating instance plus the port
/// label on it. Two edges into the same labelled port accumulate into one
/// sum; distinct ports on one instance stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SumKey {
    pub component: String,
    pub label: String,
}

/// One inflow into an aggregation point.
#[derive(Debug, Clone)]
pub(crate) struct Operand {
    /// Instance component name of the contributing side.
    pub component: String,
    /// The contributing port's variable options.
    pub options: Vec<String>,
}

/// Accumulated aggregation request, completed by the summation phase.
#[derive(Debug, Clone)]
pub(crate) struct SumRequest {
    /// Instance component name of the aggregating side.
    pub component: String,
    /// The aggregation port's variable options.
    pub options: Vec<String>,
    /// Inflows, in edge order.
    pub operands: Vec<Operand>,
}

/// Aggregation requests keyed by their port, in first-seen order.
pub(crate) type SumRegistry = IndexMap<SumKey, SumRequest>;

impl Compiler<'_> {
    /// Resolve every drawn edge into variable equivalences, or into entries
    /// of the aggregation registry when a port sums its inflows.
    ///
    /// Each label name present on both endpoint nodes resolves
    /// independently, so one edge can carry several port pairs. Pairs that
    /// cannot be resolved quietly (dangling node references, incompatible
    /// directions, missing variables) are skipped; only an
    /// aggregation-to-aggregation pair is an error.
    pub(crate) fn resolve_connections(&mut self) -> Result<()> {
        for edge in &self.graph.edges {
            let (Some(source), Some(target)) =
                (self.graph.node(&edge.source), self.graph.node(&edge.target))
            else {
                log::debug!("edge '{}' references a missing node, skipping", edge.id);
                continue;
            };
            let (Some(source_name), Some(target_name)) = (
                self.instances.get(&edge.source).cloned(),
                self.instances.get(&edge.target).cloned(),
            ) else {
                continue;
            };

            let mut matched = false;
            for source_port in &source.port_labels {
                let Some(target_port) = target.port_label(&source_port.label) else {
                    continue;
                };
                matched = true;
                if !source_port.kind.compatible_with(target_port.kind) {
                    log::debug!(
                        "edge '{}': port '{}' has incompatible directions on '{source_name}' and '{target_name}'",
                        edge.id, source_port.label
                    );
                    continue;
                }

                match (source_port.multi_port_sum, target_port.multi_port_sum) {
                    (true, true) => {
                        return Err(CompileError::unsupported(format!(
                            "cannot connect aggregation port '{}' of '{source_name}' to aggregation port '{}' of '{target_name}'",
                            source_port.label, target_port.label
                        )));
                    }
                    (true, false) => {
                        self.register_sum(&source_name, source_port, &target_name, target_port);
                    }
                    (false, true) => {
                        self.register_sum(&target_name, target_port, &source_name, source_port);
                    }
                    (false, false) => {
                        self.link_ports(&source_name, source_port, &target_name, target_port);
                    }
                }
            }
            if !matched {
                log::debug!(
                    "edge '{}' has no port label shared by '{source_name}' and '{target_name}'",
                    edge.id
                );
            }
        }
        Ok(())
    }

    /// Each contributing component sums in once per aggregation port, no
    /// matter how many edges it draws to it.
    fn register_sum(&mut self, sum_name: &str, sum_port: &PortLabel, op_name: &str, op_port: &PortLabel) {
        let key = SumKey {
            component: sum_name.to_string(),
            label: sum_port.label.clone(),
        };
        let request = self.sums.entry(key).or_insert_with(|| SumRequest {
            component: sum_name.to_string(),
            options: sum_port.option.clone(),
            operands: Vec::new(),
        });
        if request.operands.iter().any(|o| o.component == op_name) {
            log::debug!(
                "'{op_name}' already feeds aggregation port '{}' of '{sum_name}', skipping duplicate edge",
                sum_port.label
            );
            return;
        }
        request.operands.push(Operand {
            component: op_name.to_string(),
            options: op_port.option.clone(),
        });
    }

    /// Pairwise equivalences between two ordinary ports, position by
    /// position up to the shorter option list.
    fn link_ports(&mut self, source_name: &str, source_port: &PortLabel, target_name: &str, target_port: &PortLabel) {
        for (source_var, target_var) in source_port.option.iter().zip(&target_port.option) {
            let a = VariableRef::new(source_name, source_var);
            let b = VariableRef::new(target_name, target_var);
            if !self.has_variable(&a) || !self.has_variable(&b) {
                log::debug!("skipping port pair '{a}' and '{b}': variable not present");
                continue;
            }
            super::link(&mut self.model, a, b);
        }
    }

    pub(crate) fn has_variable(&self, at: &VariableRef) -> bool {
        self.model
            .component(&at.component)
            .is_some_and(|c| c.has_variable(&at.variable))
    }
}
