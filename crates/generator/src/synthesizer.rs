//! Example value synthesis
//!
//! Walks the descriptor model depth-first and builds one deterministic
//! example value per type:
//! - scalars: the zero value of the kind's JSON mapping
//! - enums: the first declared value
//! - messages: every field in declaration order, only the first member of
//!   each oneof group
//! - repeated fields: exactly one element
//! - maps: exactly one key/value pair
//!
//! Well-known types come from the table in [`crate::well_known`].
//!
//! A message type is fully expanded at most `expansion_budget` times along
//! one descent path. Further occurrences on that path become
//! [`SynthesizedValue::Reference`], which bounds recursion on cyclic
//! schemas.

use crate::path::ExpansionPath;
use crate::value::{FieldAnnotation, FieldType, MessageEntry, SynthesizedValue};
use crate::well_known;
use rpc_bones_common::{
    FieldDescriptor, FieldLabel, GeneratorError, RenderOptions, Result, ScalarKind, SchemaModel,
    TypeRef,
};

/// Synthesize an example value for `type_ref` below `path`
pub fn synthesize(
    model: &SchemaModel,
    type_ref: &TypeRef,
    path: &ExpansionPath<'_>,
    options: &RenderOptions,
) -> Result<SynthesizedValue> {
    Synthesizer::new(model, options)?.synthesize(type_ref, path)
}

/// Example value synthesizer bound to one descriptor model
pub struct Synthesizer<'a> {
    model: &'a SchemaModel,
    expansion_budget: usize,
}

impl<'a> Synthesizer<'a> {
    pub fn new(model: &'a SchemaModel, options: &RenderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            model,
            expansion_budget: options.expansion_budget as usize,
        })
    }

    /// Synthesize a top-level message, e.g. a method's request or response
    pub fn synthesize_message(&self, full_name: &str) -> Result<SynthesizedValue> {
        self.message_value(full_name, &ExpansionPath::root())
    }

    pub fn synthesize(
        &self,
        type_ref: &TypeRef,
        path: &ExpansionPath<'_>,
    ) -> Result<SynthesizedValue> {
        match type_ref {
            TypeRef::Scalar(kind) => Ok(well_known::scalar(*kind)),
            TypeRef::Enum(name) => self.enum_value(name),
            TypeRef::Message(name) => self.message_value(name, path),
        }
    }

    fn enum_value(&self, full_name: &str) -> Result<SynthesizedValue> {
        if let Some(value) = well_known::lookup(full_name) {
            return Ok(value);
        }

        let enumeration = self
            .model
            .enumeration(full_name)
            .ok_or_else(|| unresolved(full_name))?;
        let first = enumeration.first_value().ok_or_else(|| {
            GeneratorError::Generation(format!("Enum {} declares no values", full_name))
        })?;

        Ok(SynthesizedValue::EnumLiteral(first.name.clone()))
    }

    fn message_value(&self, full_name: &str, path: &ExpansionPath<'_>) -> Result<SynthesizedValue> {
        if let Some(value) = well_known::lookup(full_name) {
            return Ok(value);
        }

        let message = self
            .model
            .message(full_name)
            .ok_or_else(|| unresolved(full_name))?;

        if path.occurrences(&message.full_name) >= self.expansion_budget {
            return Ok(SynthesizedValue::Reference {
                type_name: message.full_name.clone(),
            });
        }

        let path = path.push(&message.full_name);
        let mut claimed_oneofs = vec![false; message.oneofs.len()];
        let mut entries = Vec::with_capacity(message.fields.len());

        for field in &message.fields {
            if let Some(index) = field.oneof_index {
                match claimed_oneofs.get_mut(index) {
                    Some(claimed) if *claimed => continue,
                    Some(claimed) => *claimed = true,
                    None => {
                        return Err(GeneratorError::Generation(format!(
                            "Field {}.{} references undeclared oneof #{}",
                            message.full_name, field.name, index
                        )))
                    }
                }
            }

            entries.push(MessageEntry {
                key: field.json_name.clone(),
                annotation: Some(FieldAnnotation {
                    field_type: FieldType::of(field),
                    oneof: field
                        .oneof_index
                        .and_then(|i| message.oneof_name(i))
                        .map(str::to_string),
                }),
                value: self.field_value(field, &path)?,
            });
        }

        Ok(SynthesizedValue::Message {
            type_name: message.full_name.clone(),
            entries,
        })
    }

    fn field_value(
        &self,
        field: &FieldDescriptor,
        path: &ExpansionPath<'_>,
    ) -> Result<SynthesizedValue> {
        let value = self.synthesize(&field.kind, path)?;

        Ok(match field.label {
            FieldLabel::Singular => value,
            FieldLabel::Repeated => SynthesizedValue::RepeatedOne(Box::new(value)),
            FieldLabel::Map { key } => SynthesizedValue::MapOne {
                key: map_key(key)?.to_string(),
                value: Box::new(value),
            },
        })
    }
}

/// Representative map key; JSON object keys are always strings
fn map_key(kind: ScalarKind) -> Result<&'static str> {
    match kind {
        ScalarKind::Bool => Ok("false"),
        ScalarKind::String => Ok("key"),
        k if k.is_integer() => Ok("0"),
        k => Err(GeneratorError::Generation(format!(
            "Invalid map key kind {}",
            k
        ))),
    }
}

fn unresolved(full_name: &str) -> GeneratorError {
    GeneratorError::UnresolvedType {
        type_name: full_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Literal;
    use rpc_bones_common::{EnumDescriptor, MessageDescriptor};

    fn scalar_field(name: &str, number: u32, kind: ScalarKind) -> FieldDescriptor {
        FieldDescriptor::new(name, number, TypeRef::Scalar(kind))
    }

    #[test]
    fn test_scalar_zero_values() {
        let cases = [
            (ScalarKind::Bool, Literal::Bool(false)),
            (ScalarKind::Int32, Literal::Integer(0)),
            (ScalarKind::Sint32, Literal::Integer(0)),
            (ScalarKind::Uint32, Literal::Integer(0)),
            (ScalarKind::Fixed32, Literal::Integer(0)),
            (ScalarKind::Sfixed32, Literal::Integer(0)),
            (ScalarKind::Int64, Literal::String("0".to_string())),
            (ScalarKind::Uint64, Literal::String("0".to_string())),
            (ScalarKind::Sint64, Literal::String("0".to_string())),
            (ScalarKind::Fixed64, Literal::String("0".to_string())),
            (ScalarKind::Sfixed64, Literal::String("0".to_string())),
            (ScalarKind::Float, Literal::Float(0.0)),
            (ScalarKind::Double, Literal::Float(0.0)),
            (ScalarKind::String, Literal::String(String::new())),
            (ScalarKind::Bytes, Literal::String(String::new())),
        ];

        let model = SchemaModel::new();
        let synth = Synthesizer::new(&model, &RenderOptions::default()).unwrap();
        for (kind, expected) in cases {
            let value = synth
                .synthesize(&TypeRef::Scalar(kind), &ExpansionPath::root())
                .unwrap();
            assert_eq!(value, SynthesizedValue::Scalar(expected), "kind {}", kind);
        }
    }

    #[test]
    fn test_enum_uses_first_declared_value() {
        let model = SchemaModel::new().with_enum(
            EnumDescriptor::new("pkg.Level")
                .with_value("LEVEL_HIGH", 2)
                .with_value("LEVEL_UNSPECIFIED", 0),
        );

        let value = synthesize(
            &model,
            &TypeRef::enumeration("pkg.Level"),
            &ExpansionPath::root(),
            &RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(value, SynthesizedValue::EnumLiteral("LEVEL_HIGH".to_string()));
    }

    #[test]
    fn test_empty_enum_is_an_error() {
        let model = SchemaModel::new().with_enum(EnumDescriptor::new("pkg.Nothing"));
        let result = synthesize(
            &model,
            &TypeRef::enumeration("pkg.Nothing"),
            &ExpansionPath::root(),
            &RenderOptions::default(),
        );
        assert!(matches!(result, Err(GeneratorError::Generation(_))));
    }

    #[test]
    fn test_unresolved_message_is_fatal() {
        let model = SchemaModel::new().with_message(
            MessageDescriptor::new("pkg.Outer")
                .with_field(FieldDescriptor::new("inner", 1, TypeRef::message("pkg.Gone"))),
        );
        let synth = Synthesizer::new(&model, &RenderOptions::default()).unwrap();

        match synth.synthesize_message("pkg.Outer") {
            Err(GeneratorError::UnresolvedType { type_name }) => assert_eq!(type_name, "pkg.Gone"),
            other => panic!("expected unresolved type, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_budget_rejected_before_synthesis() {
        let model = SchemaModel::new();
        let options = RenderOptions {
            expansion_budget: 0,
            ..Default::default()
        };
        assert!(matches!(
            Synthesizer::new(&model, &options),
            Err(GeneratorError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_map_keys_by_kind() {
        assert_eq!(map_key(ScalarKind::Bool).unwrap(), "false");
        assert_eq!(map_key(ScalarKind::String).unwrap(), "key");
        assert_eq!(map_key(ScalarKind::Sfixed64).unwrap(), "0");
        assert!(map_key(ScalarKind::Double).is_err());
    }

    #[test]
    fn test_map_and_repeated_hold_one_element() {
        let model = SchemaModel::new().with_message(
            MessageDescriptor::new("pkg.Bag")
                .with_field(scalar_field("tags", 1, ScalarKind::String).repeated())
                .with_field(scalar_field("counts", 2, ScalarKind::Int32).map_of(ScalarKind::Int64)),
        );
        let synth = Synthesizer::new(&model, &RenderOptions::default()).unwrap();
        let bag = synth.synthesize_message("pkg.Bag").unwrap();

        assert_eq!(
            bag.entry("tags"),
            Some(&SynthesizedValue::repeated(SynthesizedValue::string("")))
        );
        assert_eq!(
            bag.entry("counts"),
            Some(&SynthesizedValue::MapOne {
                key: "0".to_string(),
                value: Box::new(SynthesizedValue::Scalar(Literal::Integer(0))),
            })
        );
    }
}
