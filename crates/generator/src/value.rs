//! Synthesized example value tree
//!
//! Values carry data only. Quoting, indentation and comments are decided
//! by the renderer.

use rpc_bones_common::{FieldDescriptor, FieldLabel, ScalarKind, TypeRef};
use serde::Serialize;
use std::fmt;

/// A JSON-mapped scalar literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Declared type of a message field, as shown in annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Single(TypeRef),
    Repeated(TypeRef),
    Map { key: ScalarKind, value: TypeRef },
}

impl FieldType {
    pub fn of(field: &FieldDescriptor) -> Self {
        match field.label {
            FieldLabel::Singular => FieldType::Single(field.kind.clone()),
            FieldLabel::Repeated => FieldType::Repeated(field.kind.clone()),
            FieldLabel::Map { key } => FieldType::Map {
                key,
                value: field.kind.clone(),
            },
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Single(ty) => write!(f, "{}", ty.display_name()),
            FieldType::Repeated(ty) => write!(f, "repeated {}", ty.display_name()),
            FieldType::Map { key, value } => write!(f, "map<{}, {}>", key, value.display_name()),
        }
    }
}

/// Field metadata kept alongside a message entry for annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAnnotation {
    pub field_type: FieldType,
    /// Oneof group the field belongs to
    pub oneof: Option<String>,
}

/// One key/value pair of a synthesized message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageEntry {
    /// JSON key
    pub key: String,
    /// Absent for hand-authored entries such as `Any`'s `@type`
    pub annotation: Option<FieldAnnotation>,
    pub value: SynthesizedValue,
}

impl MessageEntry {
    pub fn annotated(key: impl Into<String>, field_type: FieldType, value: SynthesizedValue) -> Self {
        Self {
            key: key.into(),
            annotation: Some(FieldAnnotation {
                field_type,
                oneof: None,
            }),
            value,
        }
    }

    pub fn plain(key: impl Into<String>, value: SynthesizedValue) -> Self {
        Self {
            key: key.into(),
            annotation: None,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SynthesizedValue {
    Scalar(Literal),
    /// Symbolic enum value name
    EnumLiteral(String),
    Message {
        type_name: String,
        entries: Vec<MessageEntry>,
    },
    /// Single representative element of a repeated field
    RepeatedOne(Box<SynthesizedValue>),
    /// Single representative entry of a map field
    MapOne {
        key: String,
        value: Box<SynthesizedValue>,
    },
    /// Abbreviated occurrence of a message expanded further up the path
    Reference { type_name: String },
}

impl SynthesizedValue {
    pub fn string(s: impl Into<String>) -> Self {
        SynthesizedValue::Scalar(Literal::String(s.into()))
    }

    pub fn message(type_name: impl Into<String>, entries: Vec<MessageEntry>) -> Self {
        SynthesizedValue::Message {
            type_name: type_name.into(),
            entries,
        }
    }

    pub fn repeated(element: SynthesizedValue) -> Self {
        SynthesizedValue::RepeatedOne(Box::new(element))
    }

    /// The referenced type when this value, or the element/value it wraps,
    /// is an abbreviated reference
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            SynthesizedValue::Reference { type_name } => Some(type_name),
            SynthesizedValue::RepeatedOne(inner) => inner.reference_target(),
            SynthesizedValue::MapOne { value, .. } => value.reference_target(),
            _ => None,
        }
    }

    /// Entry lookup by JSON key, for message values
    pub fn entry(&self, key: &str) -> Option<&SynthesizedValue> {
        match self {
            SynthesizedValue::Message { entries, .. } => {
                entries.iter().find(|e| e.key == key).map(|e| &e.value)
            }
            _ => None,
        }
    }

    /// JSON keys of a message value, in order
    pub fn keys(&self) -> Vec<&str> {
        match self {
            SynthesizedValue::Message { entries, .. } => {
                entries.iter().map(|e| e.key.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}
