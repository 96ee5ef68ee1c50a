use crate::api::error::ProtoPersonError;

#[cfg(feature = "json")]
pub mod json;
pub mod protobuf;

pub trait Schema {
    fn schema_type() -> SchemaType;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Text,
    Binary,
}

pub trait Deserialize<'de, S>
where
    S: Schema,
    Self: Sized,
{
    fn deserialize(buf: &'de [u8]) -> Result<Self, ProtoPersonError>;
}

pub trait Serialize<S>
where
    S: Schema,
{
    fn serialize(&self) -> Result<Vec<u8>, ProtoPersonError>;
}
