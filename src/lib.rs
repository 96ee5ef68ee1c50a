// This crate turns a Person record written as JSON into its protobuf wire encoding and persists the bytes.

// Pipeline

// Decode: the JSON document is decoded into a typed record through the text schema.

// Encode: the record is serialized through the binary schema. Same record, same bytes.

// Persist: the bytes go to a freshly created (or truncated) file in a single write. A short write is reported, never retried.

// Schemas

// Both ends of the pipeline are expressed as schema markers (`Json`, `StrictJson`, `Protobuf`) so a record type
// opts into a format by implementing the schema's `Serialize` / `Deserialize` traits.

// Inspection

// The binary output can be walked back field by field, with field numbers resolved against the Person descriptor.

pub mod api;
pub mod inspect;
pub mod persist;
#[cfg(feature = "json")]
pub mod pipeline;

pub use api::{
    error::ProtoPersonError,
    message::{Address, Gender, Person},
};
