//! CLI logic for the modelgraph dependency tool.
//!
//! This module contains the core CLI logic: it loads JSON model files,
//! builds their dependency graph, and writes it as a flowchart.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use modelgraph::{DependencyAnalyzer, ModelGraphError, filter};

/// Run the modelgraph CLI application
///
/// Loads every input model file, builds the dependency graph, optionally
/// narrows it to the declarations connected to `--start`, and writes the
/// flowchart to the output file. With `--subset`, the connected part of the
/// model is also written as JSON.
///
/// # Errors
///
/// Returns `ModelGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Model loading errors
/// - Graph errors such as references to undeclared types
pub fn run(args: &Args) -> Result<(), ModelGraphError> {
    info!(
        inputs:? = args.inputs,
        output_path = args.output;
        "Analyzing model"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let sources = args
        .inputs
        .iter()
        .map(|path| fs::read_to_string(path).map(|text| (path.as_str(), text)))
        .collect::<Result<Vec<_>, _>>()?;

    let analyzer = DependencyAnalyzer::new(app_config);
    let manager = analyzer.load_model(
        sources
            .iter()
            .map(|(path, text)| (*path, text.as_str())),
    )?;

    let graph = match &args.start {
        Some(start) => analyzer.connected_graph(&manager, start)?,
        None => analyzer.build_graph(&manager)?,
    };
    analyzer.render_to_file(&graph, &args.output)?;
    info!(output_file = args.output; "Flowchart exported successfully");

    if let (Some(_), Some(subset_path)) = (&args.start, &args.subset) {
        let subset = filter::filter_model(&manager, |fqn| graph.has_vertex(fqn));
        fs::write(subset_path, analyzer.save_model(&subset)?)?;
        info!(subset_file = subset_path; "Model subset exported successfully");
    }

    Ok(())
}
