//! PhLynx - Graph-to-Model Compiler
//!
//! Compiles a visual graph of biophysical module instances into a flattened
//! model document.
//!
//! # Usage
//!
//! ```bash
//! phlynx graph.json --modules modules/ --units units/ -o model.xml
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use phlynx_core::{
    compile,
    error::{CompileError, Result},
    store::GlobalParameter,
    Graph, ProjectStore,
};

/// Graph-to-model compiler for biophysical models
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the graph export (.json)
    #[arg(value_name = "GRAPH_FILE")]
    graph: PathBuf,

    /// Directory holding the module files
    #[arg(short, long, value_name = "DIR")]
    modules: PathBuf,

    /// Directory holding the unit-library files, scanned in filename order
    #[arg(short, long, value_name = "DIR")]
    units: Option<PathBuf>,

    /// JSON file mapping variable names to global parameter values
    #[arg(short, long, value_name = "FILE")]
    globals: Option<PathBuf>,

    /// Output path for the model document (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Populate the project store from disk
    let store = load_store(&args)?;

    // Parse the graph export
    let graph_text = read(&args.graph)?;
    let graph: Graph = serde_json::from_str(&graph_text)
        .map_err(|e| CompileError::parse(args.graph.display().to_string(), e.to_string()))?;

    // Compile
    let output = compile(&graph, &store);
    for issue in &output.issues {
        eprintln!("{issue}");
    }

    let Some(document) = output.document else {
        let category = output.category.map_or("unknown", |c| c.as_str());
        eprintln!("compilation failed ({category})");
        std::process::exit(1);
    };

    match &args.output {
        Some(path) => fs::write(path, document).map_err(|e| CompileError::Io {
            path: path.display().to_string(),
            source: e,
        })?,
        None => print!("{document}"),
    }
    Ok(())
}

fn load_store(args: &Args) -> Result<ProjectStore> {
    let mut store = ProjectStore::new();
    for path in sorted_files(&args.modules)? {
        store.add_module_file(file_name(&path), read(&path)?);
    }
    if let Some(units_dir) = &args.units {
        for path in sorted_files(units_dir)? {
            store.add_units_file(file_name(&path), read(&path)?);
        }
    }
    if let Some(globals_path) = &args.globals {
        let text = read(globals_path)?;
        let globals: BTreeMap<String, GlobalParameter> = serde_json::from_str(&text)
            .map_err(|e| CompileError::parse(globals_path.display().to_string(), e.to_string()))?;
        for (name, global) in globals {
            store.set_global_parameter(name, global.value, global.units);
        }
    }
    Ok(store)
}

/// Regular files of a directory, sorted by path for a stable catalogue order.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CompileError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CompileError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
