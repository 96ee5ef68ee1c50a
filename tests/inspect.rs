use protoperson::{
    api::descriptor::PERSON,
    inspect::{BlockValue, InspectOptions, inspect, render::render},
    pipeline::{self, PERSON_JSON, Strictness},
};

fn demonstration_bytes() -> Vec<u8> {
    let person = pipeline::decode_text(PERSON_JSON, Strictness::Permissive).unwrap();
    pipeline::encode_binary(&person).unwrap()
}

#[test]
fn demonstration_record_walks_cleanly() {
    let bytes = demonstration_bytes();
    let inspection = inspect(&bytes, &InspectOptions { break_on_error: true }).unwrap();

    assert!(!inspection.has_error);
    // 3 scalars, then each address followed by its 4 fields
    assert_eq!(inspection.blocks.len(), 13);

    let names: Vec<_> = inspection
        .blocks
        .iter()
        .map(|block| PERSON.qualified_name(&block.tag.field_numbers).unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "name",
            "age",
            "gender",
            "addresses",
            "addresses.street",
            "addresses.city",
            "addresses.state",
            "addresses.zip",
            "addresses",
            "addresses.street",
            "addresses.city",
            "addresses.state",
            "addresses.zip",
        ]
    );

    assert_eq!(
        inspection.blocks[10].value,
        BlockValue::Bytes(b"Othertown".to_vec())
    );
    let last = inspection.blocks.last().unwrap();
    assert_eq!(last.range.end, bytes.len());
}

#[test]
fn rendered_table_resolves_person_fields() {
    let bytes = demonstration_bytes();
    let inspection = inspect(&bytes, &InspectOptions::default()).unwrap();
    let table = render(&inspection, Some(&PERSON));

    assert_eq!(table.lines().count(), 14);
    assert!(table.contains("1(name)"));
    assert!(table.contains("John Doe"));
    assert!(table.contains("30"));
    assert!(table.contains("1 (MALE)"));
    assert!(table.contains("  4(addresses.zip)"));
    assert!(table.contains("67890"));
}

#[test]
fn truncated_file_is_reported() {
    let bytes = demonstration_bytes();
    let truncated = &bytes[..bytes.len() - 3];

    let inspection = inspect(truncated, &InspectOptions::default()).unwrap();
    assert!(inspection.has_error);
    assert!(inspection.blocks.last().unwrap().has_error);

    assert!(inspect(truncated, &InspectOptions { break_on_error: true }).is_err());
}
