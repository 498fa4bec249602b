//! Configuration types for dependency analysis.
//!
//! This module provides configuration structures that control how the
//! dependency graph is built and rendered. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining graph and render settings.
//! - [`GraphConfig`] - Controls which references become graph edges.
//! - [`RenderConfig`] - Controls the rendered flowchart.
//!
//! # Example
//!
//! ```
//! # use modelgraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.graph().include_primitives());
//! assert!(config.graph().include_decorators());
//! ```

use serde::Deserialize;

use crate::graph::FlowDirection;

/// Top-level configuration combining graph and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Graph building section.
    #[serde(default)]
    graph: GraphConfig,

    /// Rendering section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `graph` - Graph building options.
    /// * `render` - Rendering options.
    pub fn new(graph: GraphConfig, render: RenderConfig) -> Self {
        Self { graph, render }
    }

    /// Returns the graph configuration.
    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Controls which structural references become edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Model primitive types as vertices and add edges to them.
    include_primitives: bool,

    /// Add edges for type references in decorator arguments.
    include_decorators: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            include_primitives: false,
            include_decorators: true,
        }
    }
}

impl GraphConfig {
    /// Creates a new [`GraphConfig`].
    pub fn new(include_primitives: bool, include_decorators: bool) -> Self {
        Self {
            include_primitives,
            include_decorators,
        }
    }

    /// Returns `true` if primitive types are modelled as vertices.
    pub fn include_primitives(&self) -> bool {
        self.include_primitives
    }

    /// Returns `true` if decorator type references produce edges.
    pub fn include_decorators(&self) -> bool {
        self.include_decorators
    }
}

/// Rendering options for the flowchart output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Flowchart direction written in the header line.
    #[serde(default)]
    direction: FlowDirection,
}

impl RenderConfig {
    pub fn new(direction: FlowDirection) -> Self {
        Self { direction }
    }

    /// Returns the flowchart direction.
    pub fn direction(&self) -> FlowDirection {
        self.direction
    }
}
