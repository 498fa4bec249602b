//! Resolved model types.
//!
//! These types are the read-only query surface of a fully resolved model:
//! namespaces and imports have already been resolved, every type reference is
//! either a fully qualified declaration identifier or a bare primitive name,
//! and decorators are carried but never evaluated.
//!
//! # Containment
//!
//! ```text
//! ModelManager
//!     └── ModelFile (namespace, imports)
//!             └── Declaration (class | enum | scalar | map)
//!                     └── Property (field | relationship) / EnumValue / map key+value
//! ```
//!
//! All types implement [`serde::Serialize`] and [`serde::Deserialize`] so a
//! resolved model can be exchanged as JSON.

use serde::{Deserialize, Serialize};

use crate::identifier::{IdentifierError, Namespace};

/// Root of a resolved model: an ordered collection of model files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelManager {
    #[serde(default)]
    files: Vec<ModelFile>,
}

impl ModelManager {
    /// Creates an empty model manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model manager owning the given files, in order.
    pub fn from_files(files: Vec<ModelFile>) -> Self {
        Self { files }
    }

    /// Appends a model file.
    pub fn add_file(&mut self, file: ModelFile) {
        self.files.push(file);
    }

    /// Returns the model files in insertion order.
    pub fn files(&self) -> &[ModelFile] {
        &self.files
    }

    /// Returns every declaration together with the file that owns it.
    pub fn declarations(&self) -> impl Iterator<Item = (&ModelFile, &Declaration)> {
        self.files
            .iter()
            .flat_map(|file| file.declarations().iter().map(move |decl| (file, decl)))
    }

    /// Looks up a declaration by its fully qualified name.
    pub fn declaration(&self, fqn: &str) -> Option<(&ModelFile, &Declaration)> {
        self.declarations()
            .find(|(file, decl)| file.qualify(decl.name()) == fqn)
    }
}

/// A single model file: one namespace with its imports and declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFile {
    namespace: String,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    declarations: Vec<Declaration>,
}

impl ModelFile {
    /// Creates an empty model file for `namespace` (e.g. `org.acme@1.0.0`).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Adds a fully qualified import.
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Adds a declaration.
    pub fn with_declaration(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    /// Returns the namespace string, including the version if any.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the namespace version, if the namespace is versioned.
    pub fn version(&self) -> Option<&str> {
        self.namespace.split_once('@').map(|(_, version)| version)
    }

    /// Parses the namespace into its name and version parts.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if the namespace string is malformed.
    pub fn parsed_namespace(&self) -> Result<Namespace, IdentifierError> {
        Namespace::parse(&self.namespace)
    }

    /// Returns the fully qualified imports of this file.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Returns the declarations in source order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Builds the fully qualified identifier of a declaration in this file.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Returns a copy of this file keeping only the declarations and imports
    /// accepted by the predicates.
    pub fn retain(
        &self,
        keep_declaration: impl Fn(&Declaration) -> bool,
        keep_import: impl Fn(&str) -> bool,
    ) -> Self {
        Self {
            namespace: self.namespace.clone(),
            imports: self
                .imports
                .iter()
                .filter(|import| keep_import(import))
                .cloned()
                .collect(),
            declarations: self
                .declarations
                .iter()
                .filter(|decl| keep_declaration(decl))
                .cloned()
                .collect(),
        }
    }
}

/// A named schema type within a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Declaration {
    Class(ClassDeclaration),
    Enum(EnumDeclaration),
    Scalar(ScalarDeclaration),
    Map(MapDeclaration),
}

impl Declaration {
    /// Returns the short declaration name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(decl) => &decl.name,
            Declaration::Enum(decl) => &decl.name,
            Declaration::Scalar(decl) => &decl.name,
            Declaration::Map(decl) => &decl.name,
        }
    }

    /// Returns the decorators attached to the declaration itself.
    pub fn decorators(&self) -> &[Decorator] {
        match self {
            Declaration::Class(decl) => &decl.decorators,
            Declaration::Enum(decl) => &decl.decorators,
            Declaration::Scalar(decl) => &decl.decorators,
            Declaration::Map(decl) => &decl.decorators,
        }
    }
}

impl From<ClassDeclaration> for Declaration {
    fn from(decl: ClassDeclaration) -> Self {
        Declaration::Class(decl)
    }
}

impl From<EnumDeclaration> for Declaration {
    fn from(decl: EnumDeclaration) -> Self {
        Declaration::Enum(decl)
    }
}

impl From<ScalarDeclaration> for Declaration {
    fn from(decl: ScalarDeclaration) -> Self {
        Declaration::Scalar(decl)
    }
}

impl From<MapDeclaration> for Declaration {
    fn from(decl: MapDeclaration) -> Self {
        Declaration::Map(decl)
    }
}

/// The modelling role of a class declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    #[default]
    Concept,
    Asset,
    Participant,
    Transaction,
    Event,
}

/// A class-like declaration with properties and an optional supertype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    name: String,
    #[serde(default)]
    class_kind: ClassKind,
    #[serde(default)]
    is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    super_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identified_by: Option<String>,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl ClassDeclaration {
    /// Creates a concept declaration with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_kind: ClassKind::default(),
            is_abstract: false,
            super_type: None,
            identified_by: None,
            properties: Vec::new(),
            decorators: Vec::new(),
        }
    }

    pub fn with_kind(mut self, class_kind: ClassKind) -> Self {
        self.class_kind = class_kind;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Sets the fully qualified supertype.
    pub fn with_super_type(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    pub fn with_identified_by(mut self, field: impl Into<String>) -> Self {
        self.identified_by = Some(field.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<Property>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_kind(&self) -> ClassKind {
        self.class_kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Returns the fully qualified supertype name, if the class extends one.
    pub fn super_type(&self) -> Option<&str> {
        self.super_type.as_deref()
    }

    /// Returns the name of the identifying field, if any.
    pub fn identified_by(&self) -> Option<&str> {
        self.identified_by.as_deref()
    }

    /// Returns the properties declared directly on this class.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// An enumeration declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    name: String,
    #[serde(default)]
    values: Vec<EnumValue>,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl EnumDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            decorators: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// A named alias of a primitive type, e.g. `scalar Email extends String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarDeclaration {
    name: String,
    #[serde(rename = "type")]
    scalar_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<String>,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl ScalarDeclaration {
    pub fn new(name: impl Into<String>, scalar_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scalar_type: scalar_type.into(),
            default_value: None,
            decorators: Vec::new(),
        }
    }

    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the primitive type this scalar narrows.
    pub fn scalar_type(&self) -> &str {
        &self.scalar_type
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// A map declaration with a key type and a value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDeclaration {
    name: String,
    key: MapEntryType,
    value: MapEntryType,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl MapDeclaration {
    pub fn new(name: impl Into<String>, key: MapEntryType, value: MapEntryType) -> Self {
        Self {
            name: name.into(),
            key,
            value,
            decorators: Vec::new(),
        }
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &MapEntryType {
        &self.key
    }

    pub fn value(&self) -> &MapEntryType {
        &self.value
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// The key or value side of a [`MapDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntryType {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl MapEntryType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            decorators: Vec::new(),
        }
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Returns the fully qualified (or primitive) type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// A member of a class declaration.
///
/// A [`Relationship`] is a specialisation of a [`Field`]: it carries the same
/// data and can always be viewed as its base field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Property {
    Field(Field),
    Relationship(Relationship),
}

impl Property {
    /// Returns the field view of this property.
    pub fn as_field(&self) -> &Field {
        match self {
            Property::Field(field) => field,
            Property::Relationship(relationship) => relationship.as_field(),
        }
    }

    pub fn name(&self) -> &str {
        self.as_field().name()
    }

    pub fn type_name(&self) -> &str {
        self.as_field().type_name()
    }
}

impl From<Field> for Property {
    fn from(field: Field) -> Self {
        Property::Field(field)
    }
}

impl From<Relationship> for Property {
    fn from(relationship: Relationship) -> Self {
        Property::Relationship(relationship)
    }
}

/// A typed property of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    is_array: bool,
    #[serde(default)]
    is_optional: bool,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_array: false,
            is_optional: false,
            decorators: Vec::new(),
        }
    }

    pub fn with_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    pub fn with_optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fully qualified (or primitive) type of the field.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// A by-reference property pointing at an identified class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationship(Field);

impl Relationship {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self(Field::new(name, type_name))
    }

    /// Wraps an existing field as a relationship.
    pub fn from_field(field: Field) -> Self {
        Self(field)
    }

    /// Returns the base field view of this relationship.
    pub fn as_field(&self) -> &Field {
        &self.0
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }
}

/// One value of an [`EnumDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    name: String,
    #[serde(default)]
    decorators: Vec<Decorator>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decorators: Vec::new(),
        }
    }

    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// A decorator attached to a declaration or property, e.g. `@Term("Name")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    name: String,
    #[serde(default)]
    arguments: Vec<DecoratorArgument>,
}

impl Decorator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: DecoratorArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[DecoratorArgument] {
        &self.arguments
    }

    /// Returns the type names referenced by this decorator's arguments.
    pub fn type_references(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().filter_map(|arg| match arg {
            DecoratorArgument::TypeReference { type_name, .. } => Some(type_name.as_str()),
            _ => None,
        })
    }
}

/// A literal or type-reference argument of a [`Decorator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DecoratorArgument {
    String { value: String },
    Number { value: f64 },
    Boolean { value: bool },
    #[serde(rename_all = "camelCase")]
    TypeReference {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        is_array: bool,
    },
}
