//! Canonical examples for `google.protobuf` well-known types
//!
//! Each entry is a value whose JSON rendering parses back as the
//! protobuf JSON mapping of that type. Entries win over traversal of the
//! type's declared fields.
//!
//! https://protobuf.dev/reference/protobuf/google.protobuf/

use crate::value::{FieldType, Literal, MessageEntry, SynthesizedValue};
use once_cell::sync::Lazy;
use rpc_bones_common::{ScalarKind, TypeRef};
use std::collections::HashMap;

const VALUE_EXAMPLE: &str =
    "https://developers.google.com/protocol-buffers/docs/reference/google.protobuf#value";

static WELL_KNOWN: Lazy<HashMap<&'static str, SynthesizedValue>> = Lazy::new(build_table);

/// Look up the canonical example for a fully-qualified type name
pub fn lookup(full_name: &str) -> Option<SynthesizedValue> {
    WELL_KNOWN.get(full_name).cloned()
}

pub fn is_well_known(full_name: &str) -> bool {
    WELL_KNOWN.contains_key(full_name)
}

fn build_table() -> HashMap<&'static str, SynthesizedValue> {
    let mut table = HashMap::new();

    // Wrappers render as their bare scalar
    table.insert("google.protobuf.DoubleValue", scalar(ScalarKind::Double));
    table.insert("google.protobuf.FloatValue", scalar(ScalarKind::Float));
    table.insert("google.protobuf.Int64Value", scalar(ScalarKind::Int64));
    table.insert("google.protobuf.UInt64Value", scalar(ScalarKind::Uint64));
    table.insert("google.protobuf.Int32Value", scalar(ScalarKind::Int32));
    table.insert("google.protobuf.UInt32Value", scalar(ScalarKind::Uint32));
    table.insert("google.protobuf.BoolValue", scalar(ScalarKind::Bool));
    table.insert("google.protobuf.StringValue", scalar(ScalarKind::String));
    table.insert("google.protobuf.BytesValue", scalar(ScalarKind::Bytes));

    table.insert("google.protobuf.Duration", SynthesizedValue::string("0s"));
    table.insert(
        "google.protobuf.Timestamp",
        SynthesizedValue::string("2006-01-02T15:04:05.999999999Z"),
    );
    table.insert(
        "google.protobuf.Empty",
        SynthesizedValue::message("google.protobuf.Empty", vec![]),
    );
    table.insert(
        "google.protobuf.FieldMask",
        SynthesizedValue::string("field1.field2,field3"),
    );

    table.insert("google.protobuf.Value", value());
    table.insert(
        "google.protobuf.ListValue",
        SynthesizedValue::repeated(value()),
    );
    table.insert(
        "google.protobuf.Struct",
        SynthesizedValue::message(
            "google.protobuf.Struct",
            vec![MessageEntry::plain("structField", value())],
        ),
    );
    table.insert(
        "google.protobuf.NullValue",
        SynthesizedValue::Scalar(Literal::Null),
    );
    table.insert("google.protobuf.Any", any());

    table.insert("google.protobuf.Api", api());
    table.insert("google.protobuf.Method", method());
    table.insert("google.protobuf.Mixin", mixin());
    table.insert("google.protobuf.Type", type_());
    table.insert("google.protobuf.Field", field());
    table.insert("google.protobuf.Enum", enum_());
    table.insert("google.protobuf.EnumValue", enum_value());
    table.insert("google.protobuf.Option", option());
    table.insert("google.protobuf.SourceContext", source_context());

    table
}

/// Zero value of a scalar kind in its JSON mapping
pub(crate) fn scalar(kind: ScalarKind) -> SynthesizedValue {
    let literal = match kind {
        ScalarKind::Bool => Literal::Bool(false),
        ScalarKind::Double | ScalarKind::Float => Literal::Float(0.0),
        ScalarKind::String | ScalarKind::Bytes => Literal::String(String::new()),
        k if k.is_64_bit_integer() => Literal::String("0".to_string()),
        _ => Literal::Integer(0),
    };
    SynthesizedValue::Scalar(literal)
}

fn value() -> SynthesizedValue {
    SynthesizedValue::string(VALUE_EXAMPLE)
}

/// An `Any` wrapping a `Duration`, which can be read back without
/// registering extra types
fn any() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Any",
        vec![
            MessageEntry::plain(
                "@type",
                SynthesizedValue::string("type.googleapis.com/google.protobuf.Duration"),
            ),
            MessageEntry::plain("value", SynthesizedValue::string("0s")),
        ],
    )
}

fn string_entry(key: &str) -> MessageEntry {
    MessageEntry::annotated(
        key,
        FieldType::Single(TypeRef::Scalar(ScalarKind::String)),
        scalar(ScalarKind::String),
    )
}

fn scalar_entry(key: &str, kind: ScalarKind) -> MessageEntry {
    MessageEntry::annotated(key, FieldType::Single(TypeRef::Scalar(kind)), scalar(kind))
}

fn enum_entry(key: &str, enum_name: &str, value: &str) -> MessageEntry {
    MessageEntry::annotated(
        key,
        FieldType::Single(TypeRef::enumeration(enum_name)),
        SynthesizedValue::EnumLiteral(value.to_string()),
    )
}

fn message_entry(key: &str, type_name: &str, value: SynthesizedValue) -> MessageEntry {
    MessageEntry::annotated(key, FieldType::Single(TypeRef::message(type_name)), value)
}

fn repeated_entry(key: &str, type_name: &str, element: SynthesizedValue) -> MessageEntry {
    MessageEntry::annotated(
        key,
        FieldType::Repeated(TypeRef::message(type_name)),
        SynthesizedValue::repeated(element),
    )
}

fn syntax_entry() -> MessageEntry {
    enum_entry("syntax", "google.protobuf.Syntax", "SYNTAX_PROTO3")
}

fn options_entry() -> MessageEntry {
    repeated_entry("options", "google.protobuf.Option", option())
}

fn source_context_entry() -> MessageEntry {
    message_entry(
        "sourceContext",
        "google.protobuf.SourceContext",
        source_context(),
    )
}

fn source_context() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.SourceContext",
        vec![string_entry("fileName")],
    )
}

fn option() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Option",
        vec![
            string_entry("name"),
            message_entry("value", "google.protobuf.Any", any()),
        ],
    )
}

fn mixin() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Mixin",
        vec![string_entry("name"), string_entry("root")],
    )
}

fn method() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Method",
        vec![
            string_entry("name"),
            string_entry("requestTypeUrl"),
            scalar_entry("requestStreaming", ScalarKind::Bool),
            string_entry("responseTypeUrl"),
            scalar_entry("responseStreaming", ScalarKind::Bool),
            options_entry(),
            syntax_entry(),
        ],
    )
}

fn api() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Api",
        vec![
            string_entry("name"),
            repeated_entry("methods", "google.protobuf.Method", method()),
            options_entry(),
            string_entry("version"),
            source_context_entry(),
            repeated_entry("mixins", "google.protobuf.Mixin", mixin()),
            syntax_entry(),
        ],
    )
}

fn field() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Field",
        vec![
            enum_entry("kind", "google.protobuf.Field.Kind", "TYPE_DOUBLE"),
            enum_entry(
                "cardinality",
                "google.protobuf.Field.Cardinality",
                "CARDINALITY_OPTIONAL",
            ),
            scalar_entry("number", ScalarKind::Int32),
            string_entry("name"),
            string_entry("typeUrl"),
            scalar_entry("oneofIndex", ScalarKind::Int32),
            scalar_entry("packed", ScalarKind::Bool),
            options_entry(),
            string_entry("jsonName"),
            string_entry("defaultValue"),
        ],
    )
}

fn type_() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Type",
        vec![
            string_entry("name"),
            repeated_entry("fields", "google.protobuf.Field", field()),
            MessageEntry::annotated(
                "oneofs",
                FieldType::Repeated(TypeRef::Scalar(ScalarKind::String)),
                SynthesizedValue::repeated(scalar(ScalarKind::String)),
            ),
            options_entry(),
            source_context_entry(),
            syntax_entry(),
        ],
    )
}

fn enum_value() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.EnumValue",
        vec![
            string_entry("name"),
            scalar_entry("number", ScalarKind::Int32),
            options_entry(),
        ],
    )
}

fn enum_() -> SynthesizedValue {
    SynthesizedValue::message(
        "google.protobuf.Enum",
        vec![
            string_entry("name"),
            repeated_entry("enumvalue", "google.protobuf.EnumValue", enum_value()),
            options_entry(),
            source_context_entry(),
            syntax_entry(),
        ],
    )
}
