use serde_json::Value;

use crate::api::{
    descriptor::{Described, FieldKind, MessageDescriptor},
    error::ProtoPersonError,
    schema::{Deserialize, Schema, SchemaType, Serialize},
};

/// Permissive JSON: unknown fields are ignored, absent fields keep their defaults.
#[derive(Default)]
pub struct Json {}

/// JSON that rejects any object key the record's descriptor does not declare.
#[derive(Default)]
pub struct StrictJson {}

impl Schema for Json {
    fn schema_type() -> SchemaType {
        SchemaType::Text
    }
}

impl Schema for StrictJson {
    fn schema_type() -> SchemaType {
        SchemaType::Text
    }
}

impl<T> Serialize<Json> for T
where
    T: serde::Serialize,
{
    fn serialize(&self) -> Result<Vec<u8>, ProtoPersonError> {
        serde_json::to_vec(self).map_err(|err| ProtoPersonError::Encode(err.to_string()))
    }
}

impl<'de, T> Deserialize<'de, Json> for T
where
    T: serde::Deserialize<'de>,
{
    fn deserialize(buf: &'de [u8]) -> Result<Self, ProtoPersonError> {
        serde_json::from_slice(buf).map_err(|err| ProtoPersonError::Decode(err.to_string()))
    }
}

impl<'de, T> Deserialize<'de, StrictJson> for T
where
    T: serde::Deserialize<'de> + Described,
{
    fn deserialize(buf: &'de [u8]) -> Result<Self, ProtoPersonError> {
        let tree: Value =
            serde_json::from_slice(buf).map_err(|err| ProtoPersonError::Decode(err.to_string()))?;
        reject_unknown_fields(&tree, T::descriptor(), "")?;

        <T as Deserialize<Json>>::deserialize(buf)
    }
}

fn reject_unknown_fields(
    node: &Value,
    descriptor: &'static MessageDescriptor,
    prefix: &str,
) -> Result<(), ProtoPersonError> {
    // Type mismatches are left for serde to report.
    let Value::Object(fields) = node else {
        return Ok(());
    };

    for (key, value) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        let field = descriptor.field_by_name(key).ok_or_else(|| {
            ProtoPersonError::Decode(format!(
                "unknown field `{path}` in {}",
                descriptor.name
            ))
        })?;

        if let FieldKind::Message(nested) = field.kind {
            match value {
                Value::Array(items) if field.repeated => {
                    for (index, item) in items.iter().enumerate() {
                        reject_unknown_fields(item, nested, &format!("{path}[{index}]"))?;
                    }
                }
                other => reject_unknown_fields(other, nested, &path)?,
            }
        }
    }

    Ok(())
}
