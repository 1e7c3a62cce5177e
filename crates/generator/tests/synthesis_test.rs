//! Integration tests for example value synthesis

use rpc_bones_common::{
    EnumDescriptor, FieldDescriptor, MessageDescriptor, RenderOptions, ScalarKind, SchemaModel,
    TypeRef,
};
use rpc_bones_generator::{ExpansionPath, Literal, SynthesizedValue, Synthesizer};

fn options(budget: u32) -> RenderOptions {
    RenderOptions {
        expansion_budget: budget,
        ..Default::default()
    }
}

fn string_field(name: &str, number: u32) -> FieldDescriptor {
    FieldDescriptor::new(name, number, TypeRef::Scalar(ScalarKind::String))
}

/// Deepest chain of nested message values
fn message_depth(value: &SynthesizedValue) -> usize {
    match value {
        SynthesizedValue::Message { entries, .. } => {
            1 + entries
                .iter()
                .map(|e| message_depth(&e.value))
                .max()
                .unwrap_or(0)
        }
        SynthesizedValue::RepeatedOne(inner) => message_depth(inner),
        SynthesizedValue::MapOne { value, .. } => message_depth(value),
        _ => 0,
    }
}

fn node_model() -> SchemaModel {
    SchemaModel::new()
        .with_message(
            MessageDescriptor::new("pkg.Node")
                .with_field(FieldDescriptor::new(
                    "id",
                    1,
                    TypeRef::Scalar(ScalarKind::Int32),
                ))
                .with_field(FieldDescriptor::new("next", 2, TypeRef::message("pkg.Node"))),
        )
        .with_message(
            MessageDescriptor::new("pkg.Tree")
                .with_field(FieldDescriptor::new("left", 1, TypeRef::message("pkg.Node")))
                .with_field(FieldDescriptor::new("right", 2, TypeRef::message("pkg.Node")))
                .with_field(
                    FieldDescriptor::new("forest", 3, TypeRef::message("pkg.Node")).repeated(),
                ),
        )
}

#[test]
fn test_self_reference_collapses_at_budget_one() {
    let model = node_model();
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let node = synth.synthesize_message("pkg.Node").unwrap();

    assert_eq!(
        node.entry("id"),
        Some(&SynthesizedValue::Scalar(Literal::Integer(0)))
    );
    assert_eq!(
        node.entry("next"),
        Some(&SynthesizedValue::Reference {
            type_name: "pkg.Node".to_string()
        })
    );
}

#[test]
fn test_budget_bounds_self_recursion_depth() {
    let model = node_model();
    for budget in 1..=5 {
        let synth = Synthesizer::new(&model, &options(budget)).unwrap();
        let node = synth.synthesize_message("pkg.Node").unwrap();
        assert_eq!(message_depth(&node), budget as usize, "budget {}", budget);
    }
}

#[test]
fn test_siblings_expand_independently() {
    let model = node_model();
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let tree = synth.synthesize_message("pkg.Tree").unwrap();

    for key in ["left", "right"] {
        let sibling = tree.entry(key).unwrap();
        assert!(
            matches!(sibling, SynthesizedValue::Message { .. }),
            "{} should be fully expanded",
            key
        );
        assert!(matches!(
            sibling.entry("next"),
            Some(SynthesizedValue::Reference { .. })
        ));
    }

    match tree.entry("forest") {
        Some(SynthesizedValue::RepeatedOne(element)) => {
            assert!(matches!(**element, SynthesizedValue::Message { .. }))
        }
        other => panic!("expected one repeated element, got {:?}", other),
    }
}

#[test]
fn test_mutual_recursion_terminates() {
    let model = SchemaModel::new()
        .with_message(
            MessageDescriptor::new("pkg.A")
                .with_field(FieldDescriptor::new("b", 1, TypeRef::message("pkg.B")))
                .with_field(FieldDescriptor::new("bs", 2, TypeRef::message("pkg.B")).repeated()),
        )
        .with_message(
            MessageDescriptor::new("pkg.B").with_field(
                FieldDescriptor::new("a", 1, TypeRef::message("pkg.A"))
                    .map_of(ScalarKind::String),
            ),
        );

    for budget in 1..=4 {
        let synth = Synthesizer::new(&model, &options(budget)).unwrap();
        let a = synth.synthesize_message("pkg.A").unwrap();
        assert_eq!(message_depth(&a), 2 * budget as usize, "budget {}", budget);
    }
}

#[test]
fn test_only_first_oneof_member_is_populated() {
    let model = SchemaModel::new().with_message(
        MessageDescriptor::new("pkg.Contact")
            .with_oneof("method")
            .with_field(string_field("email", 1).in_oneof(0))
            .with_field(string_field("phone", 2).in_oneof(0))
            .with_field(string_field("pager", 3).in_oneof(0))
            .with_field(string_field("display_name", 4)),
    );
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let contact = synth.synthesize_message("pkg.Contact").unwrap();

    assert_eq!(contact.keys(), vec!["email", "displayName"]);
}

#[test]
fn test_each_oneof_group_gets_its_first_member() {
    let model = SchemaModel::new().with_message(
        MessageDescriptor::new("pkg.Event")
            .with_oneof("source")
            .with_oneof("target")
            .with_field(string_field("target_user", 1).in_oneof(1))
            .with_field(string_field("source_user", 2).in_oneof(0))
            .with_field(string_field("target_group", 3).in_oneof(1))
            .with_field(string_field("source_group", 4).in_oneof(0)),
    );
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let event = synth.synthesize_message("pkg.Event").unwrap();

    assert_eq!(event.keys(), vec!["targetUser", "sourceUser"]);
}

#[test]
fn test_enum_first_declared_even_when_later_is_zero() {
    let model = SchemaModel::new()
        .with_enum(
            EnumDescriptor::new("pkg.Status")
                .with_value("STATUS_ACTIVE", 3)
                .with_value("STATUS_UNSPECIFIED", 0),
        )
        .with_message(
            MessageDescriptor::new("pkg.Account").with_field(FieldDescriptor::new(
                "status",
                1,
                TypeRef::enumeration("pkg.Status"),
            )),
        );
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let account = synth.synthesize_message("pkg.Account").unwrap();

    assert_eq!(
        account.entry("status"),
        Some(&SynthesizedValue::EnumLiteral("STATUS_ACTIVE".to_string()))
    );
}

#[test]
fn test_well_known_table_wins_over_declared_fields() {
    let model = SchemaModel::new()
        .with_message(
            MessageDescriptor::new("google.protobuf.Timestamp")
                .with_field(FieldDescriptor::new(
                    "seconds",
                    1,
                    TypeRef::Scalar(ScalarKind::Int64),
                ))
                .with_field(FieldDescriptor::new(
                    "nanos",
                    2,
                    TypeRef::Scalar(ScalarKind::Int32),
                )),
        )
        .with_message(
            MessageDescriptor::new("pkg.Event")
                .with_field(FieldDescriptor::new(
                    "at",
                    1,
                    TypeRef::message("google.protobuf.Timestamp"),
                ))
                .with_field(FieldDescriptor::new(
                    "null_value",
                    2,
                    TypeRef::enumeration("google.protobuf.NullValue"),
                )),
        );
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let event = synth.synthesize_message("pkg.Event").unwrap();

    assert_eq!(
        event.entry("at"),
        Some(&SynthesizedValue::string("2006-01-02T15:04:05.999999999Z"))
    );
    assert_eq!(
        event.entry("nullValue"),
        Some(&SynthesizedValue::Scalar(Literal::Null))
    );
}

#[test]
fn test_scalars_ignore_field_name_and_position() {
    let model = SchemaModel::new().with_message(
        MessageDescriptor::new("pkg.Numbers")
            .with_field(FieldDescriptor::new("b", 1, TypeRef::Scalar(ScalarKind::Int64)))
            .with_field(FieldDescriptor::new("a", 7, TypeRef::Scalar(ScalarKind::Int64))),
    );
    let synth = Synthesizer::new(&model, &options(1)).unwrap();
    let numbers = synth.synthesize_message("pkg.Numbers").unwrap();

    assert_eq!(numbers.entry("a"), numbers.entry("b"));
    assert_eq!(numbers.entry("a"), Some(&SynthesizedValue::string("0")));
}

#[test]
fn test_synthesis_starting_below_root() {
    let model = node_model();
    let synth = Synthesizer::new(&model, &options(2)).unwrap();
    let root = ExpansionPath::root();
    let outer = root.push("pkg.Node");

    let node = synth
        .synthesize(&TypeRef::message("pkg.Node"), &outer)
        .unwrap();
    assert_eq!(message_depth(&node), 1);
}
