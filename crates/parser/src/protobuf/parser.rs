//! Protobuf FileDescriptorSet parser

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::FileDescriptorSet;
use rpc_bones_common::{GeneratorError, Result, SchemaModel};
use std::fs;
use std::path::Path;

/// Protobuf descriptor set parser
///
/// Decodes a FileDescriptorSet (compiled .proto files) and converts the
/// services, messages and enums it declares into a [`SchemaModel`].
pub struct ProtobufParser {
    /// Descriptor pool for reflection
    pool: DescriptorPool,
}

impl ProtobufParser {
    /// Load FileDescriptorSet from binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = ProtobufParser::from_file("service.pb")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.as_ref().display(), "read FileDescriptorSet");
        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse FileDescriptorSet from bytes
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let file_descriptor_set = FileDescriptorSet::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode FileDescriptorSet: {}", e))
        })?;

        let pool = DescriptorPool::from_file_descriptor_set(file_descriptor_set).map_err(|e| {
            GeneratorError::Parse(format!("Failed to create DescriptorPool: {}", e))
        })?;

        Ok(Self { pool })
    }

    /// Convert the descriptor pool into the descriptor model
    pub fn parse(&self) -> Result<SchemaModel> {
        super::converter::convert_pool_to_schema_model(&self.pool)
    }

    /// Get reference to the underlying descriptor pool
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}
