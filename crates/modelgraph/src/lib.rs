//! Modelgraph - dependency graphs for namespaced data-model schemas.
//!
//! Walks a loaded model (files of classes, enums, scalars and maps) with a
//! type-dispatching visitor, records every declaration-to-declaration
//! reference in a directed graph, and renders that graph as a flowchart.

pub mod config;
pub mod filter;
pub mod graph;
pub mod graph_visitor;
pub mod sink;
pub mod visitor;

mod error;

pub use modelgraph_core::{identifier, model};

pub use error::ModelGraphError;

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use graph::DirectedGraph;
use graph_visitor::{GraphParams, GraphVisitor};
use model::{ModelFile, ModelManager};
use visitor::Visitable;

/// Builder-style entry point for loading models and analyzing their
/// dependencies.
///
/// # Examples
///
/// ```rust
/// use modelgraph::{DependencyAnalyzer, config::AppConfig};
///
/// let base = r#"{"namespace": "org.a@1.0.0", "declarations": [
///     {"kind": "Class", "name": "Base"}
/// ]}"#;
/// let derived = r#"{"namespace": "org.b@1.0.0", "declarations": [
///     {"kind": "Class", "name": "Derived", "superType": "org.a@1.0.0.Base"}
/// ]}"#;
///
/// let analyzer = DependencyAnalyzer::new(AppConfig::default());
/// let manager = analyzer
///     .load_model([("base.json", base), ("derived.json", derived)])
///     .expect("Failed to load");
///
/// let graph = analyzer.build_graph(&manager).expect("Failed to build");
/// let flowchart = analyzer.render(&graph).expect("Failed to render");
/// assert!(flowchart.contains("`org.b@1.0.0.Derived` --> `org.a@1.0.0.Base`"));
/// ```
#[derive(Debug, Default)]
pub struct DependencyAnalyzer {
    config: AppConfig,
}

impl DependencyAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a model from JSON sources.
    ///
    /// Each source is a `(path, text)` pair. A source holding a top-level
    /// `files` array is read as a whole model; anything else is read as a
    /// single model file. The path is only used for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ModelGraphError::Load`] carrying the offending source text
    /// if any source is not a valid model.
    pub fn load_model<'a, I>(&self, sources: I) -> Result<ModelManager, ModelGraphError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut manager = ModelManager::new();

        for (path, text) in sources {
            debug!(path = path; "Loading model source");
            let to_load_error = |err| ModelGraphError::new_load_error(err, text, path);

            let value: serde_json::Value = serde_json::from_str(text).map_err(to_load_error)?;
            if value.get("files").is_some() {
                let loaded: ModelManager = serde_json::from_str(text).map_err(to_load_error)?;
                for file in loaded.files() {
                    manager.add_file(file.clone());
                }
            } else {
                let file: ModelFile = serde_json::from_str(text).map_err(to_load_error)?;
                manager.add_file(file);
            }
        }

        info!(files = manager.files().len(); "Model loaded");
        Ok(manager)
    }

    /// Serialize a model as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelGraphError::Serialize`] if serialization fails.
    pub fn save_model(&self, manager: &ModelManager) -> Result<String, ModelGraphError> {
        Ok(serde_json::to_string_pretty(manager)?)
    }

    /// Build the dependency graph of a whole model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelGraphError::Graph`] if a declaration references a
    /// non-primitive type that is not declared anywhere in the model.
    pub fn build_graph(&self, manager: &ModelManager) -> Result<DirectedGraph, ModelGraphError> {
        info!(files = manager.files().len(); "Building dependency graph");

        let visitor = GraphVisitor::new(self.config.graph().clone());
        let mut params = GraphParams::new();
        manager.accept(&visitor, &mut params)?;

        let graph = params.into_graph();
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count();
            "Dependency graph built"
        );
        trace!(graph:?; "Built graph");
        Ok(graph)
    }

    /// Build the graph and extract the component containing `start`.
    ///
    /// # Errors
    ///
    /// Fails like [`build_graph`](Self::build_graph), or with
    /// [`GraphError::UnknownVertex`](graph::GraphError::UnknownVertex) if
    /// `start` is not a declaration of the model.
    pub fn connected_graph(
        &self,
        manager: &ModelManager,
        start: &str,
    ) -> Result<DirectedGraph, ModelGraphError> {
        let graph = self.build_graph(manager)?;
        info!(start = start; "Extracting connected graph");
        Ok(graph.find_connected_graph(start)?)
    }

    /// Reduce the model to the declarations connected to `start`.
    ///
    /// # Errors
    ///
    /// Fails like [`connected_graph`](Self::connected_graph).
    pub fn subset(
        &self,
        manager: &ModelManager,
        start: &str,
    ) -> Result<ModelManager, ModelGraphError> {
        let component = self.connected_graph(manager, start)?;
        Ok(filter::filter_model(manager, |fqn| component.has_vertex(fqn)))
    }

    /// Render a graph as flowchart text.
    pub fn render(&self, graph: &DirectedGraph) -> Result<String, ModelGraphError> {
        let mut sink = sink::StringSink::new();
        graph.print(&mut sink, self.config.render().direction())?;
        Ok(sink.into_string())
    }

    /// Render a graph as flowchart text into the file at `path`.
    ///
    /// The file is created or truncated, and closed whether rendering
    /// succeeds or not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelGraphError::Io`] if the file cannot be written.
    pub fn render_to_file(
        &self,
        graph: &DirectedGraph,
        path: impl AsRef<Path>,
    ) -> Result<(), ModelGraphError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Writing flowchart");

        sink::with_file_sink(path, |sink| {
            graph
                .print(sink, self.config.render().direction())
                .map_err(ModelGraphError::from)
        })
    }
}
