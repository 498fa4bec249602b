//! Visitor that builds the model dependency graph.
//!
//! [`GraphVisitor`] walks the model containment tree once. It inserts one
//! vertex per declaration and one edge per structural reference: supertypes,
//! field and relationship types, map key and value types, scalar types and,
//! optionally, type references in decorator arguments.
//!
//! All declaration vertices are registered before any edge is added, so
//! references to declarations that appear later in the model (including in
//! other files) are safe.

use log::{debug, trace};

use modelgraph_core::{
    identifier::is_primitive_type,
    model::{
        ClassDeclaration, Decorator, EnumDeclaration, EnumValue, Field, MapDeclaration, ModelFile,
        ModelManager, ScalarDeclaration,
    },
};

use crate::{
    config::GraphConfig,
    error::ModelGraphError,
    graph::{DirectedGraph, GraphError},
    visitor::{Visitable, Visitor},
};

/// Parameter bag threaded through a [`GraphVisitor`] traversal.
#[derive(Debug, Default)]
pub struct GraphParams {
    graph: DirectedGraph,
    /// Namespace of the file currently being visited.
    namespace: Option<String>,
    /// Identifiers of the enclosing declarations, innermost last.
    stack: Vec<String>,
}

impl GraphParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing graph, e.g. to merge several traversals.
    pub fn with_graph(graph: DirectedGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &DirectedGraph {
        &self.graph
    }

    pub fn into_graph(self) -> DirectedGraph {
        self.graph
    }

    fn qualify(&self, name: &str) -> Result<String, GraphError> {
        self.namespace
            .as_ref()
            .map(|ns| format!("{ns}.{name}"))
            .ok_or_else(|| GraphError::DetachedDeclaration(name.to_string()))
    }

    fn owner(&self, property: &str) -> Result<String, GraphError> {
        self.stack
            .last()
            .cloned()
            .ok_or_else(|| GraphError::DetachedProperty(property.to_string()))
    }

    /// Runs `f` with `fqn` pushed as the enclosing declaration.
    fn within<T>(
        &mut self,
        fqn: String,
        f: impl FnOnce(&mut Self) -> Result<T, ModelGraphError>,
    ) -> Result<T, ModelGraphError> {
        self.stack.push(fqn);
        let result = f(self);
        self.stack.pop();
        result
    }
}

/// Builds a [`DirectedGraph`] of declaration dependencies.
///
/// # Examples
///
/// ```
/// use modelgraph::{
///     config::GraphConfig,
///     graph_visitor::{GraphParams, GraphVisitor},
///     visitor::Visitable,
/// };
/// use modelgraph_core::model::{ClassDeclaration, Field, ModelFile};
///
/// let file = ModelFile::new("org.acme@1.0.0")
///     .with_declaration(ClassDeclaration::new("Address"))
///     .with_declaration(
///         ClassDeclaration::new("Person")
///             .with_property(Field::new("home", "org.acme@1.0.0.Address")),
///     );
///
/// let mut params = GraphParams::new();
/// file.accept(&GraphVisitor::new(GraphConfig::default()), &mut params).unwrap();
///
/// let graph = params.into_graph();
/// assert!(graph.has_edge("org.acme@1.0.0.Person", "org.acme@1.0.0.Address"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphVisitor {
    config: GraphConfig,
}

impl GraphVisitor {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Registers a vertex for every declaration of `file`.
    fn register_declarations(file: &ModelFile, params: &mut GraphParams) {
        for decl in file.declarations() {
            params.graph.add_vertex(file.qualify(decl.name()));
        }
    }

    /// Adds an edge from `owner` to the referenced type.
    ///
    /// Primitive targets are skipped unless primitives are modelled, in which
    /// case a bare-name vertex is inserted for them.
    fn add_reference(
        &self,
        owner: &str,
        target: &str,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        if is_primitive_type(target) {
            if !self.config.include_primitives() {
                trace!(owner = owner, target = target; "Skipping primitive reference");
                return Ok(());
            }
            params.graph.add_vertex(target);
        }

        params.graph.add_edge(owner, target)?;
        Ok(())
    }

    fn add_decorator_references(
        &self,
        owner: &str,
        decorators: &[Decorator],
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        if !self.config.include_decorators() {
            return Ok(());
        }

        for target in decorators.iter().flat_map(Decorator::type_references) {
            self.add_reference(owner, target, params)?;
        }
        Ok(())
    }

    /// Registers a declaration vertex and its own decorator references.
    fn declare(
        &self,
        name: &str,
        decorators: &[Decorator],
        params: &mut GraphParams,
    ) -> Result<String, ModelGraphError> {
        let fqn = params.qualify(name)?;
        params.graph.add_vertex(fqn.as_str());
        self.add_decorator_references(&fqn, decorators, params)?;
        Ok(fqn)
    }
}

impl Visitor for GraphVisitor {
    type Params = GraphParams;
    type Output = ();
    type Error = ModelGraphError;

    fn visit_manager(
        &self,
        manager: &ModelManager,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        for file in manager.files() {
            Self::register_declarations(file, params);
        }
        debug!(vertices = params.graph.vertex_count(); "Registered declarations");

        manager
            .files()
            .iter()
            .try_for_each(|file| file.accept(self, params))
    }

    fn visit_file(
        &self,
        file: &ModelFile,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        debug!(namespace = file.namespace(); "Visiting model file");
        Self::register_declarations(file, params);

        let previous = params.namespace.replace(file.namespace().to_string());
        let result = file
            .declarations()
            .iter()
            .try_for_each(|decl| decl.accept(self, params));
        params.namespace = previous;
        result
    }

    fn visit_class(
        &self,
        class: &ClassDeclaration,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        let fqn = self.declare(class.name(), class.decorators(), params)?;
        if let Some(super_type) = class.super_type() {
            self.add_reference(&fqn, super_type, params)?;
        }

        params.within(fqn, |params| {
            class
                .properties()
                .iter()
                .try_for_each(|property| property.accept(self, params))
        })
    }

    fn visit_enum(
        &self,
        enumeration: &EnumDeclaration,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        let fqn = self.declare(enumeration.name(), enumeration.decorators(), params)?;

        params.within(fqn, |params| {
            enumeration
                .values()
                .iter()
                .try_for_each(|value| value.accept(self, params))
        })
    }

    fn visit_scalar(
        &self,
        scalar: &ScalarDeclaration,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        let fqn = self.declare(scalar.name(), scalar.decorators(), params)?;
        self.add_reference(&fqn, scalar.scalar_type(), params)
    }

    fn visit_map(
        &self,
        map: &MapDeclaration,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        let fqn = self.declare(map.name(), map.decorators(), params)?;

        for entry in [map.key(), map.value()] {
            self.add_reference(&fqn, entry.type_name(), params)?;
            self.add_decorator_references(&fqn, entry.decorators(), params)?;
        }
        Ok(())
    }

    fn visit_field(&self, field: &Field, params: &mut GraphParams) -> Result<(), ModelGraphError> {
        let owner = params.owner(field.name())?;
        self.add_reference(&owner, field.type_name(), params)?;
        self.add_decorator_references(&owner, field.decorators(), params)
    }

    fn visit_enum_value(
        &self,
        value: &EnumValue,
        params: &mut GraphParams,
    ) -> Result<(), ModelGraphError> {
        let owner = params.owner(value.name())?;
        self.add_decorator_references(&owner, value.decorators(), params)
    }
}
