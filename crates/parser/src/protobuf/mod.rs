//! Protobuf descriptor set loader
//!
//! Reads a compiled Protocol Buffer FileDescriptorSet and flattens it into
//! the rpc-bones descriptor model.
//!
//! ## Sources
//! - **protoc output**: `protoc --include_imports -o service.pb service.proto`
//! - **buf output**: `buf build -o service.pb`
//!
//! The set must be self-contained: every imported file (including
//! `google/protobuf/*.proto` well-known types) has to be present.
//!
//! ## Example
//! ```rust,ignore
//! use rpc_bones_parser::ProtobufParser;
//!
//! let parser = ProtobufParser::from_file("service.pb")?;
//! let model = parser.parse()?;
//! ```

mod converter;
mod parser;

pub use parser::ProtobufParser;
