//! modelgraph Core Types
//!
//! This crate provides the read-only model surface consumed by the modelgraph
//! analysis tools. It includes:
//!
//! - **Identifiers**: fully qualified declaration names and namespaces ([`identifier`] module)
//! - **Model**: resolved model files, declarations and properties ([`model`] module)

pub mod identifier;
pub mod model;
