//! # PhLynx Core
//!
//! A compiler turning visual graphs of biophysical module instances into
//! validated, flattened model documents.
//!
//! This library provides:
//! - Parsing of the editor's graph export (nodes, ports, edges, parameter
//!   configuration)
//! - A project store holding module files, a unit-library catalogue, and
//!   global parameter values
//! - A model engine: components, variables, units, equivalences, XML
//!   reading/printing, validation, import resolution, and analysis
//! - The compile pipeline assembling, validating, flattening, and printing
//!   the final model
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`graph`] - The visual-graph input types
//! - [`store`] - The read-only project catalogue
//! - [`model`] - The model algebra (components, units, XML, validation)
//! - [`compiler`] - The phase-ordered compile pipeline
//! - [`error`] - Error and issue types shared by all of the above
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! phlynx graph.json --modules modules/ --units units/ -o model.xml
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use phlynx_core::{compile, Graph, ProjectStore};
//!
//! let graph: Graph = serde_json::from_str("{\"nodes\": [], \"edges\": []}").unwrap();
//! let store = ProjectStore::new();
//! let output = compile(&graph, &store);
//! if let Some(document) = output.document {
//!     println!("{document}");
//! }
//! ```
//!
//! ## Compile Pipeline
//!
//! Each compile call runs the same phase order:
//!
//! 1. Instantiate every node: clone its component out of the module file,
//!    rename it to the instance name, import the units it needs, and bind
//!    configured parameters through the holder components
//! 2. Resolve every edge into variable equivalences, collecting aggregation
//!    ports into a summation registry
//! 3. Synthesize one summation per registered aggregation point on the
//!    shared hub component
//! 4. Finalize: add the environment component, prune empty holders,
//!    validate, flatten imports, analyse, and print

pub mod compiler;
pub mod error;
pub mod graph;
pub mod model;
pub mod store;

// Re-export main types for convenience
pub use compiler::{compile, CompileOutput, MODEL_CONTENT_TYPE};
pub use error::{CompileError, Issue, IssueCategory, Result};
pub use graph::Graph;
pub use store::ProjectStore;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmProject;
