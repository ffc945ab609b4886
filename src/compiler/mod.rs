//! The graph-to-model compiler.
//!
//! [`compile`] is the single entry point: it walks the visual graph in
//! phases (instantiate nodes, resolve connections, synthesize summations,
//! finalize) and either returns the printed model document or the issue
//! list explaining why there is none. Each call builds its own [`Compiler`]
//! context; nothing is shared between runs.

mod connect;
mod finalize;
mod instantiate;
mod modules;
mod params;
mod summation;
mod units;

use indexmap::IndexMap;

use crate::error::{Issue, IssueCategory};
use crate::graph::Graph;
use crate::model::{Component, Importer, Interface, Model, VariableRef};
use crate::store::ProjectStore;

use connect::SumRegistry;
use modules::ModuleCache;
use units::UnitsResolver;

/// Media type of a compiled model document.
pub const MODEL_CONTENT_TYPE: &str = "application/x.vnd.phlynx.model+xml";

/// Holder component for shared (project-wide) parameter values.
pub const GLOBAL_PARAMETERS: &str = "parameters_global";

/// Holder component for instance-local parameter values.
pub const MODEL_PARAMETERS: &str = "parameters";

/// Hub component receiving all synthesized summations.
pub const SUMMATION_COMPONENT: &str = "generated_summations";

/// Component carrying the shared time variable; serialized first.
pub const ENVIRONMENT_COMPONENT: &str = "environment";

/// Outcome of a compile run.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The printed model document, present only on success.
    pub document: Option<String>,
    /// Media type of `document`.
    pub content_type: &'static str,
    /// Warnings (always) and, on failure, the error findings.
    pub issues: Vec<Issue>,
    /// Category of the failure, absent on success.
    pub category: Option<IssueCategory>,
}

impl CompileOutput {
    /// Whether the run produced a document.
    pub fn succeeded(&self) -> bool {
        self.document.is_some()
    }
}

/// Compile a graph against a project store into a model document.
pub fn compile(graph: &Graph, store: &ProjectStore) -> CompileOutput {
    let mut compiler = Compiler::new(graph, store);
    let result = compiler.run();
    let mut issues = std::mem::take(&mut compiler.warnings);
    match result {
        Ok(document) => {
            log::info!(
                "compiled {} node(s) and {} edge(s) into model '{}'",
                graph.nodes.len(),
                graph.edges.len(),
                compiler.model.name()
            );
            CompileOutput {
                document: Some(document),
                content_type: MODEL_CONTENT_TYPE,
                issues,
                category: None,
            }
        }
        Err(err) => {
            log::error!("compile failed: {err}");
            let category = err.category();
            issues.extend(err.into_issues());
            CompileOutput {
                document: None,
                content_type: MODEL_CONTENT_TYPE,
                issues,
                category: Some(category),
            }
        }
    }
}

/// Per-run compile context.
struct Compiler<'a> {
    graph: &'a Graph,
    store: &'a ProjectStore,
    model: Model,
    importer: Importer,
    modules: ModuleCache,
    units: UnitsResolver,
    /// Node id to instance component name.
    instances: IndexMap<String, String>,
    sums: SumRegistry,
    warnings: Vec<Issue>,
}

impl<'a> Compiler<'a> {
    fn new(graph: &'a Graph, store: &'a ProjectStore) -> Self {
        let version = env!("CARGO_PKG_VERSION").replace('.', "_");
        let mut model = Model::new(format!("PhlynxGenerated_v{version}"));
        // parameter holders exist up front; finalization prunes unused ones
        model.add_component(Component::new(GLOBAL_PARAMETERS));
        model.add_component(Component::new(MODEL_PARAMETERS));
        Self {
            graph,
            store,
            model,
            importer: Importer::new(),
            modules: ModuleCache::new(),
            units: UnitsResolver::new(),
            instances: IndexMap::new(),
            sums: SumRegistry::new(),
            warnings: Vec::new(),
        }
    }

    fn run(&mut self) -> crate::error::Result<String> {
        self.instantiate_nodes()?;
        self.resolve_connections()?;
        self.synthesize_summations()?;
        self.finalize()
    }
}

/// Declare two variables equivalent, promoting both endpoints to public.
/// Repeated declarations of the same pair collapse to one.
pub(crate) fn link(model: &mut Model, a: VariableRef, b: VariableRef) {
    make_public(model, &a);
    make_public(model, &b);
    if !model.equivalences().iter().any(|eq| eq.connects(&a, &b)) {
        model.add_equivalence(a, b);
    }
}

fn make_public(model: &mut Model, at: &VariableRef) {
    if let Some(variable) = model
        .component_mut(&at.component)
        .and_then(|c| c.variable_mut(&at.variable))
    {
        variable.interface = Interface::Public;
    }
}
