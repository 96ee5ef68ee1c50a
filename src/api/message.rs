use crate::api::descriptor::{self, Described, MessageDescriptor};

#[derive(Clone, PartialEq, ::prost::Message)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct Person {
    #[prost(string, tag = "1")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub name: String,
    #[prost(int32, tag = "2")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub age: i32,
    #[prost(enumeration = "Gender", tag = "3")]
    #[cfg_attr(feature = "json", serde(with = "gender_code"))]
    pub gender: i32,
    #[prost(message, repeated, tag = "4")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub addresses: Vec<Address>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct Address {
    #[prost(string, tag = "1")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub street: String,
    #[prost(string, tag = "2")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub city: String,
    #[prost(string, tag = "3")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub state: String,
    #[prost(string, tag = "4")]
    #[cfg_attr(feature = "json", serde(deserialize_with = "null_as_default"))]
    pub zip: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Gender {
    Unspecified = 0,
    Male = 1,
    Female = 2,
    Other = 3,
}

impl Gender {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "GENDER_UNSPECIFIED",
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        descriptor::GENDER
            .code_of(value)
            .and_then(|code| Self::try_from(code).ok())
    }
}

impl Described for Person {
    fn descriptor() -> &'static MessageDescriptor {
        &descriptor::PERSON
    }
}

impl Described for Address {
    fn descriptor() -> &'static MessageDescriptor {
        &descriptor::ADDRESS
    }
}

// `null` leaves the field at its default, as if it were absent.
#[cfg(feature = "json")]
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de> + Default,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// Gender travels as its integer code; names are accepted on input.
#[cfg(feature = "json")]
mod gender_code {
    use std::fmt;

    use serde::{
        Deserializer, Serializer,
        de::{self, Unexpected, Visitor},
    };

    use super::Gender;

    pub fn serialize<S>(code: &i32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(*code)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(GenderVisitor)
    }

    struct GenderVisitor;

    impl GenderVisitor {
        fn known(code: i64) -> Option<i32> {
            i32::try_from(code)
                .ok()
                .filter(|code| Gender::try_from(*code).is_ok())
        }
    }

    impl<'de> Visitor<'de> for GenderVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a Gender code (0-3) or name")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Self::known(value).ok_or_else(|| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i64::try_from(value)
                .ok()
                .and_then(Self::known)
                .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Gender::default() as i32)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Gender::from_str_name(value)
                .map(|gender| gender as i32)
                .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_names_match_descriptor() {
        for (code, name) in descriptor::GENDER.values {
            let gender = Gender::try_from(*code).expect("descriptor code is a Gender");
            assert_eq!(gender.as_str_name(), *name);
            assert_eq!(Gender::from_str_name(name), Some(gender));
        }
        assert_eq!(Gender::from_str_name("male"), None);
    }

    #[test]
    fn unknown_gender_code_reads_as_default() {
        let person = Person {
            gender: 7,
            ..Default::default()
        };
        assert_eq!(person.gender(), Gender::Unspecified);
    }

    #[cfg(feature = "json")]
    #[test]
    fn gender_accepts_code_or_name() {
        let person: Person = serde_json::from_str(r#"{"gender": 2}"#).unwrap();
        assert_eq!(person.gender(), Gender::Female);

        let person: Person = serde_json::from_str(r#"{"gender": "OTHER"}"#).unwrap();
        assert_eq!(person.gender(), Gender::Other);
    }

    #[cfg(feature = "json")]
    #[test]
    fn gender_rejects_values_outside_the_enumeration() {
        for input in [
            r#"{"gender": 4}"#,
            r#"{"gender": -1}"#,
            r#"{"gender": 4294967297}"#,
            r#"{"gender": "ALIEN"}"#,
            r#"{"gender": 1.5}"#,
        ] {
            assert!(
                serde_json::from_str::<Person>(input).is_err(),
                "{input} should not decode"
            );
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn null_fields_keep_their_defaults() {
        let person: Person = serde_json::from_str(
            r#"{"name": null, "age": null, "gender": null, "addresses": [{"street": "1 Elm St", "zip": null}]}"#,
        )
        .unwrap();
        assert_eq!(person.name, "");
        assert_eq!(person.age, 0);
        assert_eq!(person.gender(), Gender::Unspecified);
        assert_eq!(person.addresses[0].street, "1 Elm St");
        assert_eq!(person.addresses[0].zip, "");

        let person: Person = serde_json::from_str(r#"{"addresses": null}"#).unwrap();
        assert!(person.addresses.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn gender_serializes_as_code() {
        let person = Person {
            gender: Gender::Male as i32,
            ..Default::default()
        };
        let json: serde_json::Value = serde_json::to_value(&person).unwrap();
        assert_eq!(json["gender"], 1);
    }
}
