use std::{borrow::Cow, path::PathBuf};

use crate::{
    api::{
        error::ProtoPersonError,
        message::Person,
        schema::{
            Deserialize, Serialize,
            json::{Json, StrictJson},
            protobuf::Protobuf,
        },
    },
    persist::{self, WriteOutcome},
};

pub const PERSON_JSON: &str = r#"{
		"name": "John Doe",
		"age": 30,
		"gender": 1,
		"addresses": [
			{
				"street": "123 Main St",
				"city": "Anytown",
				"state": "CA",
				"zip": "12345"
			},
			{
				"street": "456 Oak St",
				"city": "Othertown",
				"state": "NY",
				"zip": "67890"
			}
		]
	}"#;

pub const DEFAULT_DESTINATION: &str = "person.bin";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub input: Cow<'static, str>,
    pub destination: PathBuf,
    pub strictness: Strictness,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            input: Cow::Borrowed(PERSON_JSON),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            strictness: Strictness::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub destination: PathBuf,
    pub encoded_len: usize,
    pub outcome: WriteOutcome,
}

pub fn decode_text(text: &str, strictness: Strictness) -> Result<Person, ProtoPersonError> {
    let buf = text.as_bytes();
    match strictness {
        Strictness::Permissive => <Person as Deserialize<Json>>::deserialize(buf),
        Strictness::Strict => <Person as Deserialize<StrictJson>>::deserialize(buf),
    }
}

pub fn encode_binary(person: &Person) -> Result<Vec<u8>, ProtoPersonError> {
    <Person as Serialize<Protobuf>>::serialize(person)
}

pub fn decode_binary(bytes: &[u8]) -> Result<Person, ProtoPersonError> {
    <Person as Deserialize<Protobuf>>::deserialize(bytes)
}

/// Decode, encode, persist. Stops at the first failing stage.
pub fn run(settings: &PipelineSettings) -> Result<PipelineReport, ProtoPersonError> {
    let person = decode_text(&settings.input, settings.strictness)?;
    log::debug!(
        "Decoded record. Name: {}, Addresses: {}",
        person.name,
        person.addresses.len()
    );

    let bytes = encode_binary(&person)?;
    log::debug!("Encoded record. Bytes: {}", bytes.len());

    let outcome = persist::persist(&settings.destination, &bytes)?;
    log::info!(
        "Record written. Path: {}, Bytes: {}",
        settings.destination.display(),
        outcome.written()
    );

    Ok(PipelineReport {
        destination: settings.destination.clone(),
        encoded_len: bytes.len(),
        outcome,
    })
}
