//! Directed dependency graph over declaration identifiers.
//!
//! This module provides [`DirectedGraph`], a small insertion-ordered graph
//! keyed by identifier strings. It is populated once by the graph-building
//! visitor and then only queried: connected-subgraph extraction and rendering
//! never mutate it.
//!
//! # Storage
//!
//! - Vertices live in an [`IndexSet`]; a vertex's position is its index.
//! - Edges live in an [`IndexSet`] of `(from, to)` index pairs, which both
//!   de-duplicates them and preserves insertion order.
//! - Per-vertex outgoing and incoming edge lists allow traversal in both
//!   directions without scanning the edge set.
//!
//! Identifiers are only stored once; all traversal works on indices.

use std::{collections::VecDeque, fmt, io};

use indexmap::IndexSet;
use log::{debug, trace};
use serde::Deserialize;
use thiserror::Error;

use crate::sink::{OutputSink, StringSink};

/// Errors raised by graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An operation referenced a vertex that was never added.
    #[error("unknown vertex `{0}`")]
    UnknownVertex(String),

    /// A declaration was visited without an enclosing model file.
    #[error("declaration `{0}` visited outside of a model file")]
    DetachedDeclaration(String),

    /// A property was visited without an enclosing declaration.
    #[error("property `{0}` visited outside of a declaration")]
    DetachedProperty(String),
}

/// Layout direction written in the rendered flowchart header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum FlowDirection {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "TD")]
    TopDown,
    #[serde(rename = "BT")]
    BottomTop,
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            FlowDirection::LeftRight => "LR",
            FlowDirection::RightLeft => "RL",
            FlowDirection::TopBottom => "TB",
            FlowDirection::TopDown => "TD",
            FlowDirection::BottomTop => "BT",
        };
        f.write_str(code)
    }
}

/// Wraps an identifier so `.`, `@` and `-` survive the flowchart syntax.
fn escape(id: &str) -> String {
    format!("`{id}`")
}

/// Directed graph with idempotent vertex and edge insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    vertices: IndexSet<String>,
    edges: IndexSet<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl DirectedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex.
    ///
    /// Adding an identifier that is already present is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the vertex was newly inserted.
    pub fn add_vertex(&mut self, id: impl Into<String>) -> bool {
        let (_, inserted) = self.vertices.insert_full(id.into());
        if inserted {
            self.outgoing.push(Vec::new());
            self.incoming.push(Vec::new());
        }
        inserted
    }

    /// Adds a directed edge between two existing vertices.
    ///
    /// Adding an edge that is already present is a no-op. Edges never create
    /// vertices implicitly.
    ///
    /// # Returns
    ///
    /// `true` if the edge was newly inserted.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if either endpoint has not been
    /// added.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgraph::graph::{DirectedGraph, GraphError};
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.add_vertex("A");
    /// graph.add_vertex("B");
    ///
    /// assert_eq!(graph.add_edge("A", "B"), Ok(true));
    /// assert_eq!(graph.add_edge("A", "B"), Ok(false));
    /// assert_eq!(
    ///     graph.add_edge("A", "C"),
    ///     Err(GraphError::UnknownVertex("C".to_string()))
    /// );
    /// ```
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<bool, GraphError> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;

        let (edge_idx, inserted) = self.edges.insert_full((source, target));
        if inserted {
            trace!(from = from, to = to; "Adding edge");
            self.outgoing[source].push(edge_idx);
            self.incoming[target].push(edge_idx);
        }
        Ok(inserted)
    }

    /// Returns `true` if the vertex exists.
    pub fn has_vertex(&self, id: &str) -> bool {
        self.vertices.contains(id)
    }

    /// Returns `true` if the directed edge `from -> to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.vertices.get_index_of(from), self.vertices.get_index_of(to)) {
            (Some(source), Some(target)) => self.edges.contains(&(source, target)),
            _ => false,
        }
    }

    /// Returns the vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(String::as_str)
    }

    /// Returns the edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .map(|&(source, target)| (self.vertex_unchecked(source), self.vertex_unchecked(target)))
    }

    /// Returns the targets of `id`'s outgoing edges in edge insertion order.
    ///
    /// Returns an empty iterator if the vertex does not exist.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &str> {
        self.neighbours(id, &self.outgoing, |&(_, target)| target)
    }

    /// Returns the sources of `id`'s incoming edges in edge insertion order.
    ///
    /// Returns an empty iterator if the vertex does not exist.
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &str> {
        self.neighbours(id, &self.incoming, |&(source, _)| source)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Extracts the weakly connected component containing `start`.
    ///
    /// Membership is decided by reachability with every edge traversable in
    /// both directions. The returned graph holds exactly the component's
    /// vertices and exactly the original edges between them, with their
    /// original direction. Vertices and edges keep their relative insertion
    /// order from this graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `start` is not in the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgraph::graph::DirectedGraph;
    ///
    /// let mut graph = DirectedGraph::new();
    /// for id in ["A", "B", "C", "D"] {
    ///     graph.add_vertex(id);
    /// }
    /// graph.add_edge("A", "B").unwrap();
    /// graph.add_edge("C", "B").unwrap();
    ///
    /// let component = graph.find_connected_graph("A").unwrap();
    /// assert_eq!(component.vertices().collect::<Vec<_>>(), ["A", "B", "C"]);
    /// assert!(component.has_edge("C", "B"));
    /// assert!(!component.has_vertex("D"));
    /// ```
    pub fn find_connected_graph(&self, start: &str) -> Result<DirectedGraph, GraphError> {
        let start_idx = self.index_of(start)?;

        let mut visited = vec![false; self.vertices.len()];
        let mut queue = VecDeque::from([start_idx]);
        visited[start_idx] = true;

        while let Some(current) = queue.pop_front() {
            let outgoing = self.outgoing[current].iter().map(|&e| self.edges[e].1);
            let incoming = self.incoming[current].iter().map(|&e| self.edges[e].0);
            for neighbour in outgoing.chain(incoming) {
                if !visited[neighbour] {
                    visited[neighbour] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        let mut component = DirectedGraph::new();
        for (idx, id) in self.vertices.iter().enumerate() {
            if visited[idx] {
                component.add_vertex(id.as_str());
            }
        }
        for &(source, target) in &self.edges {
            if visited[source] && visited[target] {
                component.add_edge(self.vertex_unchecked(source), self.vertex_unchecked(target))?;
            }
        }

        debug!(
            start = start,
            vertices = component.vertex_count(),
            edges = component.edge_count();
            "Extracted connected graph"
        );
        Ok(component)
    }

    /// Renders the graph as a flowchart to `sink`.
    ///
    /// Writes a `flowchart <direction>` header, then for each vertex in
    /// insertion order one line declaring it, immediately followed by one
    /// `` `from` --> `to` `` line per outgoing edge in edge insertion order.
    ///
    /// # Errors
    ///
    /// Propagates any error from the sink.
    pub fn print<S>(&self, sink: &mut S, direction: FlowDirection) -> io::Result<()>
    where
        S: OutputSink + ?Sized,
    {
        sink.write_line(0, &format!("flowchart {direction}"))?;
        for (idx, id) in self.vertices.iter().enumerate() {
            let source = escape(id);
            sink.write_line(0, &source)?;
            for &edge_idx in &self.outgoing[idx] {
                let (_, target) = self.edges[edge_idx];
                let target = escape(self.vertex_unchecked(target));
                sink.write_line(0, &format!("{source} --> {target}"))?;
            }
        }
        Ok(())
    }

    /// Renders the graph into a string. See [`print`](Self::print).
    pub fn to_flowchart(&self, direction: FlowDirection) -> String {
        let mut sink = StringSink::new();
        self.print(&mut sink, direction)
            .expect("Writing to String buffer is infallible");
        sink.into_string()
    }

    fn index_of(&self, id: &str) -> Result<usize, GraphError> {
        self.vertices
            .get_index_of(id)
            .ok_or_else(|| GraphError::UnknownVertex(id.to_string()))
    }

    /// Returns the identifier at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of range; indices only come from this graph.
    fn vertex_unchecked(&self, idx: usize) -> &str {
        &self.vertices[idx]
    }

    fn neighbours<'g>(
        &'g self,
        id: &str,
        adjacency: &'g [Vec<usize>],
        endpoint: impl Fn(&(usize, usize)) -> usize + 'g,
    ) -> impl Iterator<Item = &'g str> + 'g {
        self.vertices
            .get_index_of(id)
            .map(|idx| adjacency[idx].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&edge_idx| self.vertex_unchecked(endpoint(&self.edges[edge_idx])))
    }
}
