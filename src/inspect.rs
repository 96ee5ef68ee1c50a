//! Field-by-field walk over protobuf wire bytes.
//!
//! Length-delimited payloads are speculatively decoded as nested messages.
//! Their blocks are kept only when the nested walk finds nothing suspicious,
//! so plain strings stay leaves.

use std::ops::Range;

use prost::{bytes::Buf, encoding::decode_varint};

use crate::api::error::ProtoPersonError;

pub mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            3 => Some(Self::StartGroup),
            4 => Some(Self::EndGroup),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Varint => "Varint",
            Self::Fixed64 => "Fixed64",
            Self::LengthDelimited => "LengthDelimited",
            Self::StartGroup => "StartGroup",
            Self::EndGroup => "EndGroup",
            Self::Fixed32 => "Fixed32",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Raw key varint.
    pub key: u64,
    pub field_number: u32,
    /// Field numbers from the outermost message down to this field.
    pub field_numbers: Vec<u32>,
    /// `None` for the reserved wire-type bits 6 and 7.
    pub wire_type: Option<WireType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValue {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Bytes(Vec<u8>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Absolute byte range of the value, key excluded.
    pub range: Range<usize>,
    pub tag: Tag,
    pub value: BlockValue,
    pub deprecated: bool,
    pub has_error: bool,
    pub indent: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    /// Fail with `MalformedWire` instead of recording an error block.
    pub break_on_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inspection {
    pub blocks: Vec<Block>,
    pub has_error: bool,
}

/// Deepest nested payload walked; matches prost's decode recursion limit.
pub const NESTING_LIMIT: usize = 100;

pub fn inspect(buf: &[u8], options: &InspectOptions) -> Result<Inspection, ProtoPersonError> {
    Walker { options: *options }.walk(buf, 0, 0, &[])
}

struct Walker {
    options: InspectOptions,
}

impl Walker {
    fn walk(
        &self,
        buf: &[u8],
        offset: usize,
        indent: usize,
        prefix: &[u32],
    ) -> Result<Inspection, ProtoPersonError> {
        let mut inspection = Inspection::default();
        if indent > NESTING_LIMIT {
            // Too deep to tell; the parent keeps the payload as a leaf.
            inspection.has_error = true;
            return Ok(inspection);
        }
        let mut cursor = buf;

        while cursor.has_remaining() {
            let key_at = offset + (buf.len() - cursor.len());
            let key = match decode_varint(&mut cursor) {
                Ok(key) => key,
                Err(err) => {
                    self.fail(key_at, indent, err.to_string())?;
                    inspection.has_error = true;
                    break;
                }
            };

            let wire_type = WireType::from_bits((key & 0x07) as u8);
            let field_number = match u32::try_from(key >> 3) {
                Ok(0) | Err(_) => {
                    self.fail(key_at, indent, format!("invalid field number in key {key}"))?;
                    inspection.has_error = true;
                    break;
                }
                Ok(number) => number,
            };

            let mut field_numbers = prefix.to_vec();
            field_numbers.push(field_number);
            let tag = Tag {
                key,
                field_number,
                field_numbers,
                wire_type,
            };

            let value_at = offset + (buf.len() - cursor.len());
            let mut block = Block {
                range: value_at..value_at,
                tag,
                value: BlockValue::Empty,
                deprecated: false,
                has_error: false,
                indent,
            };

            let Some(wire_type) = wire_type else {
                self.fail(value_at, indent, format!("unknown wire type {}", key & 0x07))?;
                block.has_error = true;
                inspection.blocks.push(block);
                inspection.has_error = true;
                break;
            };

            let truncated = match wire_type {
                WireType::Varint => match decode_varint(&mut cursor) {
                    Ok(value) => {
                        block.value = BlockValue::Varint(value);
                        false
                    }
                    Err(_) => true,
                },
                WireType::Fixed64 if cursor.remaining() >= 8 => {
                    block.value = BlockValue::Fixed64(cursor.get_u64_le());
                    false
                }
                WireType::Fixed32 if cursor.remaining() >= 4 => {
                    block.value = BlockValue::Fixed32(cursor.get_u32_le());
                    false
                }
                WireType::Fixed64 | WireType::Fixed32 => true,
                WireType::LengthDelimited => {
                    let len = decode_varint(&mut cursor)
                        .ok()
                        .and_then(|len| usize::try_from(len).ok());
                    match len {
                        Some(len) if len <= cursor.remaining() => {
                            let payload_at = offset + (buf.len() - cursor.len());
                            let (payload, rest) = cursor.split_at(len);
                            cursor = rest;

                            block.range = payload_at..payload_at + len;
                            block.value = BlockValue::Bytes(payload.to_vec());
                            let nested = self.nested(payload, payload_at, indent, &block.tag);
                            inspection.blocks.push(block);
                            inspection.blocks.extend(nested);
                            continue;
                        }
                        _ => true,
                    }
                }
                WireType::StartGroup | WireType::EndGroup => {
                    if indent == 0 {
                        log::warn!(
                            "Wire type {} is deprecated, skipping. Offset: {key_at}",
                            wire_type.label()
                        );
                    }
                    block.deprecated = true;
                    // Rarely a real group; mostly a sign this is not a message.
                    inspection.has_error = true;
                    false
                }
            };

            let value_end = offset + (buf.len() - cursor.len());
            if truncated {
                self.fail(
                    value_at,
                    indent,
                    format!("unexpected end of buffer reading {}", wire_type.label()),
                )?;
                block.range = value_at..offset + buf.len();
                block.has_error = true;
                inspection.blocks.push(block);
                inspection.has_error = true;
                break;
            }

            block.range = value_at..value_end;
            inspection.blocks.push(block);
        }

        Ok(inspection)
    }

    fn nested(&self, payload: &[u8], payload_at: usize, indent: usize, tag: &Tag) -> Vec<Block> {
        if payload.is_empty() {
            return vec![];
        }

        let speculative = Walker {
            options: InspectOptions {
                break_on_error: false,
            },
        };
        match speculative.walk(payload, payload_at, indent + 1, &tag.field_numbers) {
            Ok(nested) if !nested.has_error => nested.blocks,
            _ => vec![],
        }
    }

    fn fail(&self, offset: usize, indent: usize, reason: String) -> Result<(), ProtoPersonError> {
        if self.options.break_on_error {
            return Err(ProtoPersonError::MalformedWire { offset, reason });
        }
        if indent == 0 {
            log::error!("Malformed wire data. Offset: {offset}, Reason: {reason}");
        }
        Ok(())
    }
}
