//! Converts protobuf descriptors to the rpc-bones descriptor model

use prost_reflect::{
    DescriptorPool, EnumDescriptor as PoolEnum, FieldDescriptor as PoolField, Kind,
    MessageDescriptor as PoolMessage, ServiceDescriptor as PoolService,
};
use rpc_bones_common::{
    EnumDescriptor, FieldDescriptor, FieldLabel, GeneratorError, MessageDescriptor,
    MethodDescriptor, Result, ScalarKind, SchemaModel, ServiceDescriptor, TypeRef,
};

/// Convert a protobuf DescriptorPool to a SchemaModel
pub fn convert_pool_to_schema_model(pool: &DescriptorPool) -> Result<SchemaModel> {
    let mut model = SchemaModel::new();

    for message in pool.all_messages() {
        // Map entries are folded into the fields that use them
        if message.is_map_entry() {
            continue;
        }
        model.insert_message(convert_message(&message)?);
    }

    for enumeration in pool.all_enums() {
        model.insert_enum(convert_enum(&enumeration)?);
    }

    for service in pool.services() {
        model.push_service(convert_service(&service));
    }

    tracing::debug!(
        messages = model.messages().count(),
        enums = model.enums().count(),
        services = model.services().len(),
        "converted descriptor pool"
    );

    Ok(model)
}

/// Convert a message, keeping field declaration order
fn convert_message(message: &PoolMessage) -> Result<MessageDescriptor> {
    let oneofs: Vec<String> = message
        .oneofs()
        .filter(|o| !o.is_synthetic())
        .map(|o| o.name().to_string())
        .collect();

    let mut fields = Vec::new();
    for field in message.fields() {
        let mut converted = convert_field(&field)?;
        converted.oneof_index = field
            .containing_oneof()
            .filter(|o| !o.is_synthetic())
            .and_then(|o| oneofs.iter().position(|name| name == o.name()));
        fields.push(converted);
    }

    Ok(MessageDescriptor {
        full_name: message.full_name().to_string(),
        fields,
        oneofs,
    })
}

/// Convert a single field
///
/// Map fields take the kind of their entry's `value` field and remember
/// the key kind in the label.
fn convert_field(field: &PoolField) -> Result<FieldDescriptor> {
    let (kind, label) = if field.is_map() {
        let entry = match field.kind() {
            Kind::Message(entry) => entry,
            _ => {
                return Err(GeneratorError::Parse(format!(
                    "Map field {} has no entry message",
                    field.full_name()
                )))
            }
        };
        let key = match convert_kind(&entry.map_entry_key_field().kind()) {
            TypeRef::Scalar(kind) => kind,
            other => {
                return Err(GeneratorError::Parse(format!(
                    "Map field {} has non-scalar key {:?}",
                    field.full_name(),
                    other
                )))
            }
        };
        let value = convert_kind(&entry.map_entry_value_field().kind());
        (value, FieldLabel::Map { key })
    } else if field.is_list() {
        (convert_kind(&field.kind()), FieldLabel::Repeated)
    } else {
        (convert_kind(&field.kind()), FieldLabel::Singular)
    };

    Ok(FieldDescriptor {
        name: field.name().to_string(),
        json_name: field.json_name().to_string(),
        number: field.number(),
        kind,
        label,
        oneof_index: None,
    })
}

/// Convert a protobuf Kind to a TypeRef
fn convert_kind(kind: &Kind) -> TypeRef {
    match kind {
        Kind::Double => TypeRef::Scalar(ScalarKind::Double),
        Kind::Float => TypeRef::Scalar(ScalarKind::Float),
        Kind::Int32 => TypeRef::Scalar(ScalarKind::Int32),
        Kind::Int64 => TypeRef::Scalar(ScalarKind::Int64),
        Kind::Uint32 => TypeRef::Scalar(ScalarKind::Uint32),
        Kind::Uint64 => TypeRef::Scalar(ScalarKind::Uint64),
        Kind::Sint32 => TypeRef::Scalar(ScalarKind::Sint32),
        Kind::Sint64 => TypeRef::Scalar(ScalarKind::Sint64),
        Kind::Fixed32 => TypeRef::Scalar(ScalarKind::Fixed32),
        Kind::Fixed64 => TypeRef::Scalar(ScalarKind::Fixed64),
        Kind::Sfixed32 => TypeRef::Scalar(ScalarKind::Sfixed32),
        Kind::Sfixed64 => TypeRef::Scalar(ScalarKind::Sfixed64),
        Kind::Bool => TypeRef::Scalar(ScalarKind::Bool),
        Kind::String => TypeRef::Scalar(ScalarKind::String),
        Kind::Bytes => TypeRef::Scalar(ScalarKind::Bytes),
        Kind::Message(msg_desc) => TypeRef::message(msg_desc.full_name()),
        Kind::Enum(enum_desc) => TypeRef::enumeration(enum_desc.full_name()),
    }
}

fn convert_enum(enumeration: &PoolEnum) -> Result<EnumDescriptor> {
    let mut converted = EnumDescriptor::new(enumeration.full_name());
    for value in enumeration.values() {
        converted = converted.with_value(value.name(), value.number());
    }

    if converted.values.is_empty() {
        return Err(GeneratorError::Parse(format!(
            "Enum {} declares no values",
            enumeration.full_name()
        )));
    }

    Ok(converted)
}

fn convert_service(service: &PoolService) -> ServiceDescriptor {
    let package = service
        .full_name()
        .strip_suffix(service.name())
        .map(|p| p.trim_end_matches('.'))
        .unwrap_or_default();

    let mut converted = ServiceDescriptor::new(package, service.name());
    for method in service.methods() {
        converted.methods.push(MethodDescriptor {
            name: method.name().to_string(),
            full_name: method.full_name().to_string(),
            input_type: method.input().full_name().to_string(),
            output_type: method.output().full_name().to_string(),
            client_streaming: method.is_client_streaming(),
            server_streaming: method.is_server_streaming(),
        });
    }

    converted
}
