//! Static description of the Person schema: field numbers, names and kinds.
//!
//! Shared by the strict JSON decoder (name lookups) and the wire inspector
//! (field-number lookups).

#[derive(Debug)]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

#[derive(Debug)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: &'static str,
    pub kind: FieldKind,
    pub repeated: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Int32,
    Enum(&'static EnumDescriptor),
    Message(&'static MessageDescriptor),
}

#[derive(Debug)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub values: &'static [(i32, &'static str)],
}

/// Implemented by records that have a static schema description.
pub trait Described {
    fn descriptor() -> &'static MessageDescriptor;
}

impl MessageDescriptor {
    pub fn field(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.number == number)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Follows a path of field numbers through nested messages.
    pub fn resolve(&'static self, path: &[u32]) -> Option<&'static FieldDescriptor> {
        let (last, parents) = path.split_last()?;
        let mut message = self;
        for number in parents {
            match message.field(*number)?.kind {
                FieldKind::Message(nested) => message = nested,
                _ => return None,
            }
        }
        message.field(*last)
    }

    /// Dotted field name for a path of field numbers, e.g. `[4, 2]` -> `addresses.city`.
    pub fn qualified_name(&'static self, path: &[u32]) -> Option<String> {
        let mut names = Vec::with_capacity(path.len());
        for depth in 1..=path.len() {
            names.push(self.resolve(&path[..depth])?.name);
        }
        Some(names.join("."))
    }
}

impl EnumDescriptor {
    pub fn name_of(&self, code: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find_map(|(value, name)| (*value == code).then_some(*name))
    }

    pub fn code_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find_map(|(value, candidate)| (*candidate == name).then_some(*value))
    }
}

pub static GENDER: EnumDescriptor = EnumDescriptor {
    name: "Gender",
    values: &[
        (0, "GENDER_UNSPECIFIED"),
        (1, "MALE"),
        (2, "FEMALE"),
        (3, "OTHER"),
    ],
};

pub static ADDRESS: MessageDescriptor = MessageDescriptor {
    name: "Address",
    fields: &[
        FieldDescriptor {
            number: 1,
            name: "street",
            kind: FieldKind::String,
            repeated: false,
        },
        FieldDescriptor {
            number: 2,
            name: "city",
            kind: FieldKind::String,
            repeated: false,
        },
        FieldDescriptor {
            number: 3,
            name: "state",
            kind: FieldKind::String,
            repeated: false,
        },
        FieldDescriptor {
            number: 4,
            name: "zip",
            kind: FieldKind::String,
            repeated: false,
        },
    ],
};

pub static PERSON: MessageDescriptor = MessageDescriptor {
    name: "Person",
    fields: &[
        FieldDescriptor {
            number: 1,
            name: "name",
            kind: FieldKind::String,
            repeated: false,
        },
        FieldDescriptor {
            number: 2,
            name: "age",
            kind: FieldKind::Int32,
            repeated: false,
        },
        FieldDescriptor {
            number: 3,
            name: "gender",
            kind: FieldKind::Enum(&GENDER),
            repeated: false,
        },
        FieldDescriptor {
            number: 4,
            name: "addresses",
            kind: FieldKind::Message(&ADDRESS),
            repeated: true,
        },
    ],
};
