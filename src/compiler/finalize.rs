//! Model finalization: environment, pruning, validation, flattening, print.

use crate::error::{CompileError, Result};
use crate::model::{analysis, units, validate, Component, Variable, VariableRef};

use super::{Compiler, ENVIRONMENT_COMPONENT, GLOBAL_PARAMETERS, MODEL_PARAMETERS};

impl Compiler<'_> {
    /// Close the model and print it.
    ///
    /// Adds the environment component, prunes unused parameter holders,
    /// validates, flattens imports, runs the advisory analysis, and
    /// serializes with the environment component leading.
    pub(crate) fn finalize(&mut self) -> Result<String> {
        self.add_environment();
        self.prune_holders();

        let issues = validate::validate(&self.model);
        if !issues.is_empty() {
            return Err(CompileError::Validation { issues });
        }

        let mut flattened = self
            .importer
            .resolve_and_flatten(&self.model)
            .map_err(|issues| CompileError::ImportResolution { issues })?;

        let time = VariableRef::new(ENVIRONMENT_COMPONENT, "time");
        for issue in analysis::analyse(&flattened, Some(&time)) {
            log::warn!("analysis: {issue}");
            self.warnings.push(issue);
        }

        flattened.move_component_first(ENVIRONMENT_COMPONENT);
        flattened.to_xml()
    }

    /// Add the environment component carrying the shared time variable and
    /// connect it to every component's own time-like variable.
    ///
    /// A variable counts as time-like when it is named `t` or `time` and its
    /// units are dimensionally compatible with seconds. At most one variable
    /// per component is linked, `t` taking precedence over `time`.
    fn add_environment(&mut self) {
        let mut links: Vec<VariableRef> = Vec::new();
        for component in self.model.components() {
            let found = ["t", "time"].into_iter().find_map(|name| {
                component
                    .variable(name)
                    .filter(|v| units::compatible(&self.model, &v.units, "second"))
                    .map(|v| VariableRef::new(component.name(), &v.name))
            });
            if let Some(link) = found {
                links.push(link);
            }
        }

        let mut environment = Component::new(ENVIRONMENT_COMPONENT);
        environment.add_variable(Variable::public("time", "second"));
        self.model.add_component(environment);

        for link in links {
            super::link(
                &mut self.model,
                VariableRef::new(ENVIRONMENT_COMPONENT, "time"),
                link,
            );
        }
    }

    /// Drop parameter holders that ended up without any bound variable.
    fn prune_holders(&mut self) {
        for holder in [GLOBAL_PARAMETERS, MODEL_PARAMETERS] {
            if self
                .model
                .component(holder)
                .is_some_and(|c| c.variables().is_empty())
            {
                self.model.remove_component(holder);
            }
        }
    }
}
