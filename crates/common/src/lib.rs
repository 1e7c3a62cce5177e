//! Common types and utilities for rpc-bones
//!
//! This crate contains the read-only descriptor model, the render options
//! and the error type shared by the parser, generator, and CLI components.

mod descriptor;
mod options;

pub use descriptor::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldLabel, MessageDescriptor, MethodDescriptor,
    ScalarKind, SchemaModel, ServiceDescriptor, TypeRef,
};
pub use options::{Lang, QuoteStyle, RenderOptions};

use thiserror::Error;

/// Errors that can occur during stub generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    /// A type reference does not resolve in the descriptor model
    #[error("Unresolved type reference: {type_name}")]
    UnresolvedType { type_name: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_type_message() {
        let err = GeneratorError::UnresolvedType {
            type_name: "pkg.Missing".to_string(),
        };
        assert_eq!(err.to_string(), "Unresolved type reference: pkg.Missing");
    }
}
