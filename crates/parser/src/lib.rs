//! Schema loading for rpc-bones
//!
//! This crate turns compiled protobuf schemas into the read-only
//! descriptor model (`SchemaModel`) that the generator consumes.
//!
//! ## Conversion rules
//! - Fields keep declaration order and their JSON names
//! - `repeated` fields become `FieldLabel::Repeated`
//! - `map<K, V>` fields become `FieldLabel::Map { key: K }` typed as `V`;
//!   the synthetic `*Entry` message is not exposed
//! - Members of real oneofs carry their group index; proto3 `optional`
//!   synthetic oneofs are dropped

mod protobuf;

pub use protobuf::ProtobufParser;

use rpc_bones_common::{Result, SchemaModel};
use std::path::Path;

/// Load a FileDescriptorSet file into a `SchemaModel`
pub fn load_protoset<P: AsRef<Path>>(path: P) -> Result<SchemaModel> {
    ProtobufParser::from_file(path)?.parse()
}
