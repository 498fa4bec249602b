//! Declaration identifiers and namespace handling.
//!
//! Every declaration in a model is identified by a fully qualified name of the
//! form `namespace@version.Name`, for example `org.acme.hr@1.0.0.Employee`.
//! Built-in (primitive) types are identified by their bare name, e.g. `String`.
//!
//! This module provides [`QualifiedName`] and [`Namespace`] for splitting and
//! building those identifiers, plus [`is_primitive_type`] for recognising the
//! built-in types.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Names of the built-in primitive types.
pub const PRIMITIVE_TYPES: [&str; 6] = [
    "Boolean", "String", "DateTime", "Double", "Integer", "Long",
];

/// Returns `true` if `type_name` is one of the built-in primitive types.
///
/// # Examples
///
/// ```
/// use modelgraph_core::identifier::is_primitive_type;
///
/// assert!(is_primitive_type("String"));
/// assert!(!is_primitive_type("org.acme@1.0.0.Person"));
/// ```
pub fn is_primitive_type(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

/// Errors raised while splitting an identifier into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier `{0}` has no declaration name")]
    MissingName(String),

    #[error("identifier `{0}` has an empty version")]
    EmptyVersion(String),
}

/// A namespace with an optional version, e.g. `org.acme@1.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    name: String,
    version: Option<String>,
}

impl Namespace {
    /// Creates a namespace from its dotted name and an optional version.
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parses a namespace string such as `org.acme@1.0.0` or `org.acme`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Empty`] for an empty string and
    /// [`IdentifierError::EmptyVersion`] when the `@` is not followed by a version.
    pub fn parse(namespace: &str) -> Result<Self, IdentifierError> {
        if namespace.is_empty() {
            return Err(IdentifierError::Empty);
        }

        match namespace.split_once('@') {
            Some((_, "")) => Err(IdentifierError::EmptyVersion(namespace.to_string())),
            Some((name, version)) => Ok(Self::new(name, Some(version.to_string()))),
            None => Ok(Self::new(namespace, None)),
        }
    }

    /// Returns the dotted namespace name without the version.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace version, if the namespace is versioned.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Builds the fully qualified identifier of a declaration in this namespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgraph_core::identifier::Namespace;
    ///
    /// let ns = Namespace::parse("org.acme@1.0.0").unwrap();
    /// assert_eq!(ns.qualify("Person"), "org.acme@1.0.0.Person");
    /// ```
    pub fn qualify(&self, name: &str) -> String {
        format!("{self}.{name}")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Namespace {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A fully qualified declaration name.
///
/// Bare names (no namespace) are used for built-in types and are represented
/// with `namespace == None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: Option<Namespace>,
    name: String,
}

impl QualifiedName {
    /// Parses an identifier such as `org.acme@1.0.0.Person`, `org.acme.Person`
    /// or the bare `String`.
    ///
    /// The version may itself contain dots, so for versioned identifiers the
    /// declaration name is whatever follows the last `.` after the `@`.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if the identifier is empty, has no name
    /// part, or has an empty version.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgraph_core::identifier::QualifiedName;
    ///
    /// let fqn = QualifiedName::parse("org.acme@1.0.0.Person").unwrap();
    /// assert_eq!(fqn.name(), "Person");
    /// assert_eq!(fqn.namespace().map(|ns| ns.name()), Some("org.acme"));
    /// assert_eq!(fqn.version(), Some("1.0.0"));
    /// ```
    pub fn parse(identifier: &str) -> Result<Self, IdentifierError> {
        if identifier.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if let Some((ns, rest)) = identifier.split_once('@') {
            let (version, name) = rest
                .rsplit_once('.')
                .ok_or_else(|| IdentifierError::MissingName(identifier.to_string()))?;
            if version.is_empty() {
                return Err(IdentifierError::EmptyVersion(identifier.to_string()));
            }
            if name.is_empty() {
                return Err(IdentifierError::MissingName(identifier.to_string()));
            }
            return Ok(Self {
                namespace: Some(Namespace::new(ns, Some(version.to_string()))),
                name: name.to_string(),
            });
        }

        match identifier.rsplit_once('.') {
            Some((_, "")) => Err(IdentifierError::MissingName(identifier.to_string())),
            Some((ns, name)) => Ok(Self {
                namespace: Some(Namespace::new(ns, None)),
                name: name.to_string(),
            }),
            None => Ok(Self {
                namespace: None,
                name: identifier.to_string(),
            }),
        }
    }

    /// Returns the short declaration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace, or `None` for bare names.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// Returns the namespace version, if any.
    pub fn version(&self) -> Option<&str> {
        self.namespace.as_ref().and_then(Namespace::version)
    }

    /// Returns `true` if this names a built-in primitive type.
    pub fn is_primitive(&self) -> bool {
        self.namespace.is_none() && is_primitive_type(&self.name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for QualifiedName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_versioned() {
        let fqn = QualifiedName::parse("org.acme.hr@1.2.3.Employee").unwrap();

        assert_eq!(fqn.name(), "Employee");
        assert_eq!(fqn.namespace().unwrap().name(), "org.acme.hr");
        assert_eq!(fqn.version(), Some("1.2.3"));
        assert!(!fqn.is_primitive());
    }

    #[test]
    fn test_parse_unversioned() {
        let fqn = QualifiedName::parse("org.acme.Person").unwrap();

        assert_eq!(fqn.name(), "Person");
        assert_eq!(fqn.namespace().unwrap().name(), "org.acme");
        assert_eq!(fqn.version(), None);
    }

    #[test]
    fn test_parse_bare_primitive() {
        let fqn = QualifiedName::parse("String").unwrap();

        assert!(fqn.namespace().is_none());
        assert!(fqn.is_primitive());
        assert_eq!(fqn.to_string(), "String");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(QualifiedName::parse(""), Err(IdentifierError::Empty));
        assert_eq!(
            QualifiedName::parse("org.acme@1"),
            Err(IdentifierError::MissingName("org.acme@1".to_string()))
        );
        assert_eq!(
            QualifiedName::parse("org.acme@.Person"),
            Err(IdentifierError::EmptyVersion("org.acme@.Person".to_string()))
        );
        assert_eq!(
            QualifiedName::parse("org.acme."),
            Err(IdentifierError::MissingName("org.acme.".to_string()))
        );
    }

    #[test]
    fn test_namespace_parse_and_qualify() {
        let ns: Namespace = "org.acme@1.0.0".parse().unwrap();
        assert_eq!(ns.name(), "org.acme");
        assert_eq!(ns.version(), Some("1.0.0"));
        assert_eq!(ns.qualify("Base"), "org.acme@1.0.0.Base");

        let unversioned = Namespace::parse("org.acme").unwrap();
        assert_eq!(unversioned.qualify("Base"), "org.acme.Base");

        assert!(matches!(
            Namespace::parse("org.acme@"),
            Err(IdentifierError::EmptyVersion(_))
        ));
    }

    #[test]
    fn test_primitive_types() {
        for name in PRIMITIVE_TYPES {
            assert!(is_primitive_type(name));
        }
        assert!(!is_primitive_type("string"));
        assert!(!is_primitive_type("Person"));
    }

    proptest! {
        #[test]
        fn prop_versioned_identifier_round_trips(
            ns in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
            version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
            name in "[A-Z][A-Za-z0-9]{0,10}",
        ) {
            let text = format!("{ns}@{version}.{name}");
            let fqn = QualifiedName::parse(&text).unwrap();
            prop_assert_eq!(fqn.name(), name.as_str());
            prop_assert_eq!(fqn.version(), Some(version.as_str()));
            prop_assert_eq!(fqn.to_string(), text);
        }
    }
}
