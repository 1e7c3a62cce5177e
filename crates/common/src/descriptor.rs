//! Read-only descriptor model consumed by the synthesizer and renderer
//!
//! The model is a flattened, name-indexed view of a protobuf schema.
//! Cross references are plain fully-qualified names, so self-referential
//! and mutually recursive messages need no special representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar field kinds of the protobuf type system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    /// The kind name as written in `.proto` source
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    /// 64-bit integers are encoded as JSON strings by the protobuf JSON mapping
    pub fn is_64_bit_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int64
                | ScalarKind::Uint64
                | ScalarKind::Sint64
                | ScalarKind::Fixed64
                | ScalarKind::Sfixed64
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Int32
                | ScalarKind::Int64
                | ScalarKind::Uint32
                | ScalarKind::Uint64
                | ScalarKind::Sint32
                | ScalarKind::Sint64
                | ScalarKind::Fixed32
                | ScalarKind::Fixed64
                | ScalarKind::Sfixed32
                | ScalarKind::Sfixed64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a field (or a method input/output) refers to
///
/// Exactly one of scalar kind, message reference or enum reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "lowercase")]
pub enum TypeRef {
    Scalar(ScalarKind),
    Message(String),
    Enum(String),
}

impl TypeRef {
    pub fn message(full_name: impl Into<String>) -> Self {
        TypeRef::Message(full_name.into())
    }

    pub fn enumeration(full_name: impl Into<String>) -> Self {
        TypeRef::Enum(full_name.into())
    }

    /// Short name used in annotations: the scalar kind, or the last
    /// component of a message/enum name
    pub fn display_name(&self) -> &str {
        match self {
            TypeRef::Scalar(kind) => kind.as_str(),
            TypeRef::Message(name) | TypeRef::Enum(name) => short_name(name),
        }
    }
}

/// Field cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLabel {
    Singular,
    Repeated,
    /// Map field; the field's `kind` describes the map value
    Map { key: ScalarKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub json_name: String,
    pub number: u32,
    pub kind: TypeRef,
    pub label: FieldLabel,
    /// Index into the containing message's `oneofs`
    pub oneof_index: Option<usize>,
}

impl FieldDescriptor {
    /// Singular field with the default JSON name derived from `name`
    pub fn new(name: impl Into<String>, number: u32, kind: TypeRef) -> Self {
        let name = name.into();
        Self {
            json_name: to_json_name(&name),
            name,
            number,
            kind,
            label: FieldLabel::Singular,
            oneof_index: None,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.label = FieldLabel::Repeated;
        self
    }

    pub fn map_of(mut self, key: ScalarKind) -> Self {
        self.label = FieldLabel::Map { key };
        self
    }

    pub fn in_oneof(mut self, index: usize) -> Self {
        self.oneof_index = Some(index);
        self
    }

    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == FieldLabel::Repeated
    }

    pub fn is_map(&self) -> bool {
        matches!(self.label, FieldLabel::Map { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub full_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Oneof group names in declaration order
    pub oneofs: Vec<String>,
}

impl MessageDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(name.into());
        self
    }

    pub fn name(&self) -> &str {
        short_name(&self.full_name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn oneof_name(&self, index: usize) -> Option<&str> {
        self.oneofs.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub full_name: String,
    /// Values in declaration order; never empty in a valid schema
    pub values: Vec<EnumValue>,
}

impl EnumDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            number,
        });
        self
    }

    pub fn name(&self) -> &str {
        short_name(&self.full_name)
    }

    pub fn first_value(&self) -> Option<&EnumValue> {
        self.values.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// `pkg.Service.Method`
    pub full_name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl MethodDescriptor {
    pub fn new(
        service_full_name: &str,
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            full_name: format!("{}.{}", service_full_name, name),
            name,
            input_type: input_type.into(),
            output_type: output_type.into(),
            client_streaming: false,
            server_streaming: false,
        }
    }

    pub fn streaming(mut self, client: bool, server: bool) -> Self {
        self.client_streaming = client;
        self.server_streaming = server;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub full_name: String,
    /// Proto package, empty when the file declares none
    pub package: String,
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        let package = package.into();
        let name = name.into();
        let full_name = if package.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", package, name)
        };
        Self {
            name,
            full_name,
            package,
            methods: Vec::new(),
        }
    }

    /// Add a method whose full name is derived from this service
    pub fn with_method(
        mut self,
        name: &str,
        input_type: &str,
        output_type: &str,
        client_streaming: bool,
        server_streaming: bool,
    ) -> Self {
        let method = MethodDescriptor::new(&self.full_name, name, input_type, output_type)
            .streaming(client_streaming, server_streaming);
        self.methods.push(method);
        self
    }
}

/// Immutable index over all messages, enums and services of a schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModel {
    messages: BTreeMap<String, MessageDescriptor>,
    enums: BTreeMap<String, EnumDescriptor>,
    services: Vec<ServiceDescriptor>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_message(&mut self, message: MessageDescriptor) {
        self.messages.insert(message.full_name.clone(), message);
    }

    pub fn insert_enum(&mut self, enumeration: EnumDescriptor) {
        self.enums.insert(enumeration.full_name.clone(), enumeration);
    }

    pub fn push_service(&mut self, service: ServiceDescriptor) {
        self.services.push(service);
    }

    pub fn with_message(mut self, message: MessageDescriptor) -> Self {
        self.insert_message(message);
        self
    }

    pub fn with_enum(mut self, enumeration: EnumDescriptor) -> Self {
        self.insert_enum(enumeration);
        self
    }

    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.push_service(service);
        self
    }

    pub fn message(&self, full_name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(full_name)
    }

    pub fn enumeration(&self, full_name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(full_name)
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageDescriptor> {
        self.messages.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.values()
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Every method of every service, in schema order
    pub fn methods(&self) -> impl Iterator<Item = (&ServiceDescriptor, &MethodDescriptor)> {
        self.services
            .iter()
            .flat_map(|s| s.methods.iter().map(move |m| (s, m)))
    }
}

/// Last dotted component of a fully-qualified name
pub(crate) fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

/// Default protobuf JSON name: underscores dropped, following letter upper-cased
fn to_json_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;

    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(ch.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}
