//! Visitor dispatch over model nodes.
//!
//! This module routes any model node, together with a caller-owned parameter
//! bag, to exactly one handler of a [`Visitor`]. Nodes never know which visitor
//! is walking them; they only report their capabilities through [`Classify`]
//! and forward themselves through [`Visitable::accept`].
//!
//! # Capabilities and precedence
//!
//! Node capabilities overlap: a relationship is also a field. The overlap is
//! encoded as an explicit variant ([`Node::Relationship`]) plus a base kind
//! ([`NodeKind::base_kind`]), and [`NodeKind::PRECEDENCE`] lists every kind
//! before its base kind, so the most specific handler always wins.
//!
//! # Double dispatch
//!
//! Handlers recurse by asking children to accept the same visitor:
//!
//! ```
//! use modelgraph::visitor::{Visitable, Visitor, DispatchError};
//! use modelgraph_core::model::*;
//!
//! struct CountFields;
//!
//! impl Visitor for CountFields {
//!     type Params = usize;
//!     type Output = ();
//!     type Error = DispatchError;
//!
//!     fn visit_manager(&self, m: &ModelManager, n: &mut usize) -> Result<(), DispatchError> {
//!         m.files().iter().try_for_each(|f| f.accept(self, n))
//!     }
//!     fn visit_file(&self, f: &ModelFile, n: &mut usize) -> Result<(), DispatchError> {
//!         f.declarations().iter().try_for_each(|d| d.accept(self, n))
//!     }
//!     fn visit_class(&self, c: &ClassDeclaration, n: &mut usize) -> Result<(), DispatchError> {
//!         c.properties().iter().try_for_each(|p| p.accept(self, n))
//!     }
//!     fn visit_enum(&self, _: &EnumDeclaration, _: &mut usize) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//!     fn visit_scalar(&self, _: &ScalarDeclaration, _: &mut usize) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//!     fn visit_map(&self, _: &MapDeclaration, _: &mut usize) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//!     fn visit_field(&self, _: &Field, n: &mut usize) -> Result<(), DispatchError> {
//!         *n += 1;
//!         Ok(())
//!     }
//!     fn visit_enum_value(&self, _: &EnumValue, _: &mut usize) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//! }
//!
//! let file = ModelFile::new("org.acme@1.0.0").with_declaration(
//!     ClassDeclaration::new("Person")
//!         .with_property(Field::new("name", "String"))
//!         .with_property(Relationship::new("boss", "org.acme@1.0.0.Person")),
//! );
//!
//! let mut count = 0;
//! file.accept(&CountFields, &mut count).unwrap();
//! assert_eq!(count, 2);
//! ```

use std::fmt;

use log::trace;
use thiserror::Error;

use modelgraph_core::model::{
    ClassDeclaration, Declaration, EnumDeclaration, EnumValue, Field, MapDeclaration, ModelFile,
    ModelManager, Property, Relationship, ScalarDeclaration,
};

/// Errors raised by [`dispatch`] itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The input answered none of the capability predicates.
    #[error("unrecognized node kind `{type_name}`{}", describe_value(.value))]
    UnrecognizedNodeKind {
        type_name: String,
        value: Option<String>,
    },
}

fn describe_value(value: &Option<String>) -> String {
    value
        .as_ref()
        .map(|value| format!(" with value `{value}`"))
        .unwrap_or_default()
}

impl DispatchError {
    fn unrecognized<T: Classify + ?Sized>(input: &T) -> Self {
        Self::UnrecognizedNodeKind {
            type_name: input.type_name().to_string(),
            value: input.literal(),
        }
    }
}

/// The capability kinds a node can answer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Manager,
    File,
    Class,
    Enum,
    Scalar,
    Map,
    Relationship,
    EnumValue,
    Field,
}

impl NodeKind {
    /// Capability test order, most specific first.
    ///
    /// Every kind appears before its [`base_kind`](Self::base_kind).
    pub const PRECEDENCE: [NodeKind; 9] = [
        NodeKind::Manager,
        NodeKind::File,
        NodeKind::Class,
        NodeKind::Enum,
        NodeKind::Scalar,
        NodeKind::Map,
        NodeKind::Relationship,
        NodeKind::EnumValue,
        NodeKind::Field,
    ];

    /// Returns the more general kind this kind specialises, if any.
    pub fn base_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Relationship => Some(NodeKind::Field),
            _ => None,
        }
    }

    /// Returns a short lowercase name for the kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Manager => "manager",
            NodeKind::File => "file",
            NodeKind::Class => "class",
            NodeKind::Enum => "enum",
            NodeKind::Scalar => "scalar",
            NodeKind::Map => "map",
            NodeKind::Relationship => "relationship",
            NodeKind::EnumValue => "enum-value",
            NodeKind::Field => "field",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A borrowed view of one model node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'m> {
    Manager(&'m ModelManager),
    File(&'m ModelFile),
    Class(&'m ClassDeclaration),
    Enum(&'m EnumDeclaration),
    Scalar(&'m ScalarDeclaration),
    Map(&'m MapDeclaration),
    Field(&'m Field),
    EnumValue(&'m EnumValue),
    Relationship(&'m Relationship),
}

impl Node<'_> {
    pub fn is_manager(&self) -> bool {
        matches!(self, Node::Manager(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Node::Class(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Node::Enum(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    /// Returns `true` for fields and for relationships, which specialise fields.
    pub fn is_field(&self) -> bool {
        matches!(self, Node::Field(_) | Node::Relationship(_))
    }

    pub fn is_enum_value(&self) -> bool {
        matches!(self, Node::EnumValue(_))
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self, Node::Relationship(_))
    }

    /// Tests a single capability predicate.
    pub fn has_capability(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Manager => self.is_manager(),
            NodeKind::File => self.is_file(),
            NodeKind::Class => self.is_class(),
            NodeKind::Enum => self.is_enum(),
            NodeKind::Scalar => self.is_scalar(),
            NodeKind::Map => self.is_map(),
            NodeKind::Relationship => self.is_relationship(),
            NodeKind::EnumValue => self.is_enum_value(),
            NodeKind::Field => self.is_field(),
        }
    }

    /// Returns the most specific kind of this node.
    ///
    /// This is always the first entry of [`NodeKind::PRECEDENCE`] for which
    /// [`has_capability`](Self::has_capability) holds.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Manager(_) => NodeKind::Manager,
            Node::File(_) => NodeKind::File,
            Node::Class(_) => NodeKind::Class,
            Node::Enum(_) => NodeKind::Enum,
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Map(_) => NodeKind::Map,
            Node::Field(_) => NodeKind::Field,
            Node::EnumValue(_) => NodeKind::EnumValue,
            Node::Relationship(_) => NodeKind::Relationship,
        }
    }
}

/// Anything that can be handed to [`dispatch`].
///
/// Model nodes return `Some` from [`as_node`](Self::as_node). Other values
/// may be routed to the dispatcher deliberately; they return `None` and are
/// reported precisely through [`type_name`](Self::type_name) and
/// [`literal`](Self::literal).
pub trait Classify {
    /// Returns the node view of this input, or `None` if it is not a node.
    fn as_node(&self) -> Option<Node<'_>>;

    /// Returns the run-time type name of this input.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the literal value of a non-node input.
    fn literal(&self) -> Option<String> {
        None
    }
}

/// Handler set for every node kind.
///
/// A visitor is stateless with respect to a traversal: all traversal state
/// lives in the caller-owned [`Params`](Self::Params) bag that is threaded
/// through every call.
pub trait Visitor {
    /// Per-traversal context.
    type Params;
    /// Value returned by every handler.
    type Output;
    /// Handler error; must be able to carry dispatch failures.
    type Error: From<DispatchError>;

    fn visit_manager(
        &self,
        manager: &ModelManager,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_file(
        &self,
        file: &ModelFile,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_class(
        &self,
        class: &ClassDeclaration,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_enum(
        &self,
        enumeration: &EnumDeclaration,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_scalar(
        &self,
        scalar: &ScalarDeclaration,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_map(
        &self,
        map: &MapDeclaration,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_field(
        &self,
        field: &Field,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_enum_value(
        &self,
        value: &EnumValue,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error>;

    /// Handles a relationship.
    ///
    /// Defaults to [`visit_field`](Self::visit_field) on the base field.
    fn visit_relationship(
        &self,
        relationship: &Relationship,
        params: &mut Self::Params,
    ) -> Result<Self::Output, Self::Error> {
        self.visit_field(relationship.as_field(), params)
    }
}

/// Routes `input` to the handler of its most specific kind.
///
/// The handler result is returned unmodified.
///
/// # Errors
///
/// Returns [`DispatchError::UnrecognizedNodeKind`] (converted into the
/// visitor's error type) if `input` is not a model node, and otherwise
/// whatever the handler returns.
pub fn dispatch<V, T>(visitor: &V, input: &T, params: &mut V::Params) -> Result<V::Output, V::Error>
where
    V: Visitor + ?Sized,
    T: Classify + ?Sized,
{
    let Some(node) = input.as_node() else {
        return Err(DispatchError::unrecognized(input).into());
    };

    trace!(kind = node.kind().name(); "Dispatching node");

    match node {
        Node::Manager(manager) => visitor.visit_manager(manager, params),
        Node::File(file) => visitor.visit_file(file, params),
        Node::Class(class) => visitor.visit_class(class, params),
        Node::Enum(enumeration) => visitor.visit_enum(enumeration, params),
        Node::Scalar(scalar) => visitor.visit_scalar(scalar, params),
        Node::Map(map) => visitor.visit_map(map, params),
        Node::Relationship(relationship) => visitor.visit_relationship(relationship, params),
        Node::EnumValue(value) => visitor.visit_enum_value(value, params),
        Node::Field(field) => visitor.visit_field(field, params),
    }
}

/// Nodes that forward a visitor to [`dispatch`].
pub trait Visitable: Classify {
    /// Routes this node through `visitor`.
    ///
    /// # Errors
    ///
    /// Propagates dispatch and handler errors unchanged.
    fn accept<V>(&self, visitor: &V, params: &mut V::Params) -> Result<V::Output, V::Error>
    where
        V: Visitor + ?Sized,
    {
        dispatch(visitor, self, params)
    }
}

macro_rules! model_node {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Classify for $ty {
                fn as_node(&self) -> Option<Node<'_>> {
                    Some(Node::$variant(self))
                }
            }

            impl Visitable for $ty {}
        )*
    };
}

model_node! {
    ModelManager => Manager,
    ModelFile => File,
    ClassDeclaration => Class,
    EnumDeclaration => Enum,
    ScalarDeclaration => Scalar,
    MapDeclaration => Map,
    Field => Field,
    EnumValue => EnumValue,
    Relationship => Relationship,
}

impl Classify for Declaration {
    fn as_node(&self) -> Option<Node<'_>> {
        Some(match self {
            Declaration::Class(decl) => Node::Class(decl),
            Declaration::Enum(decl) => Node::Enum(decl),
            Declaration::Scalar(decl) => Node::Scalar(decl),
            Declaration::Map(decl) => Node::Map(decl),
        })
    }
}

impl Visitable for Declaration {}

impl Classify for Property {
    fn as_node(&self) -> Option<Node<'_>> {
        Some(match self {
            Property::Field(field) => Node::Field(field),
            Property::Relationship(relationship) => Node::Relationship(relationship),
        })
    }
}

impl Visitable for Property {}

impl Classify for Node<'_> {
    fn as_node(&self) -> Option<Node<'_>> {
        Some(*self)
    }
}

impl Visitable for Node<'_> {}

macro_rules! literal_input {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Classify for $ty {
                fn as_node(&self) -> Option<Node<'_>> {
                    None
                }

                fn literal(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

literal_input!(str, String, bool, i32, i64, u32, u64, usize, f64);

impl Classify for serde_json::Value {
    fn as_node(&self) -> Option<Node<'_>> {
        None
    }

    fn type_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    fn literal(&self) -> Option<String> {
        match self {
            serde_json::Value::String(value) => Some(value.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }
}
