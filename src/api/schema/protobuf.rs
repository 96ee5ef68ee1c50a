use crate::api::{
    error::ProtoPersonError,
    schema::{Deserialize, Schema, SchemaType, Serialize},
};

#[derive(Default)]
pub struct Protobuf {}

impl Schema for Protobuf {
    fn schema_type() -> SchemaType {
        SchemaType::Binary
    }
}

impl<T> Serialize<Protobuf> for T
where
    T: prost::Message,
{
    fn serialize(&self) -> Result<Vec<u8>, ProtoPersonError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)
            .map_err(|err| ProtoPersonError::Encode(err.to_string()))?;
        Ok(buf)
    }
}

impl<'de, T> Deserialize<'de, Protobuf> for T
where
    T: prost::Message + Default,
{
    fn deserialize(buf: &'de [u8]) -> Result<Self, ProtoPersonError> {
        T::decode(buf).map_err(|err| ProtoPersonError::Decode(err.to_string()))
    }
}
