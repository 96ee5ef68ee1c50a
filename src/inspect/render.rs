use std::fmt::{self, Display, Write};

use crate::{
    api::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor},
    inspect::{Block, BlockValue, Inspection, WireType},
};

/// Text table of an inspection, one row per block.
pub struct Table<'a> {
    inspection: &'a Inspection,
    schema: Option<&'static MessageDescriptor>,
}

impl<'a> Table<'a> {
    pub fn new(inspection: &'a Inspection) -> Self {
        Self {
            inspection,
            schema: None,
        }
    }

    /// Resolve field numbers (and enum codes) against `schema`.
    pub fn with_schema(mut self, schema: &'static MessageDescriptor) -> Self {
        self.schema = Some(schema);
        self
    }

    fn field(&self, block: &Block) -> Option<&'static FieldDescriptor> {
        self.schema?.resolve(&block.tag.field_numbers)
    }
}

impl Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<2}{:<8}{:<28}{:<22}{}",
            "", "Tag", "Field", "WireType", "Data"
        )?;

        for block in &self.inspection.blocks {
            let status = if block.has_error {
                "x"
            } else if block.deprecated {
                "!"
            } else {
                "+"
            };

            let field = self.field(block);
            let mut number = "  ".repeat(block.indent);
            write!(number, "{}", block.tag.field_number)?;
            if let Some(name) = self
                .schema
                .and_then(|schema| schema.qualified_name(&block.tag.field_numbers))
            {
                write!(number, "({name})")?;
            }

            writeln!(
                f,
                "{:<2}{:<8}{:<28}{:<22}{}",
                status,
                format!("0x{:02x}", block.tag.key),
                number,
                wire_type(block),
                data(block, field)
            )?;
        }

        Ok(())
    }
}

pub fn render(inspection: &Inspection, schema: Option<&'static MessageDescriptor>) -> String {
    match schema {
        Some(schema) => Table::new(inspection).with_schema(schema).to_string(),
        None => Table::new(inspection).to_string(),
    }
}

fn wire_type(block: &Block) -> String {
    match block.tag.wire_type {
        Some(WireType::LengthDelimited) => format!("LengthDelimited({})", block.range.len()),
        Some(wire_type) => wire_type.label().to_string(),
        None => "Unknown".to_string(),
    }
}

fn data(block: &Block, field: Option<&'static FieldDescriptor>) -> String {
    match (&block.value, block.tag.wire_type) {
        (BlockValue::Varint(value), _) => {
            let name = field.and_then(|field| match field.kind {
                FieldKind::Enum(values) => i32::try_from(*value)
                    .ok()
                    .and_then(|code| values.name_of(code)),
                _ => None,
            });
            match name {
                Some(name) => format!("{value} ({name})"),
                None => value.to_string(),
            }
        }
        (BlockValue::Fixed64(value), _) => value.to_string(),
        (BlockValue::Fixed32(value), _) => value.to_string(),
        (BlockValue::Bytes(bytes), _) => escape(bytes),
        (BlockValue::Empty, Some(wire_type @ (WireType::StartGroup | WireType::EndGroup))) => {
            wire_type.label().to_string()
        }
        (BlockValue::Empty, _) => "/".to_string(),
    }
}

/// Printable ASCII is kept as is, every other byte becomes `\0xNN`.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for byte in bytes {
        if (0x20..=0x7e).contains(byte) {
            out.push(char::from(*byte));
        } else {
            let _ = write!(out, "\\0x{byte:02x}");
        }
    }
    out
}
