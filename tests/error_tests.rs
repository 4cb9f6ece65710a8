use serde::{Deserialize, Serialize};
use serde_marktable::{
    from_reader, from_str, from_str_many, to_string, to_string_many, to_writer, Error,
};
use std::collections::BTreeMap;
use std::io;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct House {
    street: String,
    number: u32,
}

#[test]
fn test_text_without_table() {
    let err = from_str::<House>("not markdown").unwrap_err();
    assert!(matches!(err, Error::UnexpectedSourceFormat(_)));
    assert_eq!(err.path(), None);

    let err = from_str::<House>("").unwrap_err();
    assert!(matches!(err, Error::UnexpectedSourceFormat(_)));
}

#[test]
fn test_header_without_separator() {
    // A bare header with no separator row is a paragraph, not a table.
    let err = from_str_many::<House>("|street|number|").unwrap_err();
    assert!(matches!(err, Error::UnexpectedSourceFormat(_)));
}

#[test]
fn test_unrelated_columns() {
    let err = from_str::<House>("| amount |\n|--------|\n|123     |").unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { .. }));
}

#[test]
fn test_missing_nested_field_names_full_path() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Third {
        name: String,
        id: u32,
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Second {
        third: Third,
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct First {
        second: Second,
    }

    let err = from_str::<First>("|second.third.id|\n|-|\n|4|").unwrap_err();
    assert_eq!(err, Error::key_not_found("second.third.name"));
}

#[test]
fn test_type_mismatch() {
    let err = from_str::<House>("|number|street|\n|-|-|\n|many|Elm|").unwrap_err();
    match err {
        Error::TypeMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, "number");
            assert_eq!(expected, "u32");
            assert_eq!(found, "many");
        }
        other => panic!("expected a type mismatch, got {:?}", other),
    }
}

#[test]
fn test_bool_cell_must_be_literal() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Flag {
        on: bool,
    }

    let err = from_str::<Flag>("|on|\n|-|\n|yes|").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { ref path, .. } if path == "on"));
}

#[test]
fn test_struct_inside_list() {
    #[derive(Serialize)]
    struct Room {
        name: String,
    }

    #[derive(Serialize)]
    struct Plan {
        rooms: Vec<Room>,
    }

    let plan = Plan {
        rooms: vec![Room {
            name: "hall".to_string(),
        }],
    };
    let err = to_string(&plan).unwrap_err();
    assert_eq!(err, Error::unsupported_nested_container("rooms"));
}

#[test]
fn test_list_inside_list() {
    let grid = BTreeMap::from([("grid", vec![vec![1, 2], vec![3]])]);
    let err = to_string(&grid).unwrap_err();
    assert_eq!(err, Error::unsupported_nested_container("grid"));
}

#[test]
fn test_data_variant_on_encode() {
    #[derive(Serialize)]
    enum Kind {
        Basic(String),
    }

    #[derive(Serialize)]
    struct Account {
        kind: Kind,
    }

    let err = to_string(&Account {
        kind: Kind::Basic("x".to_string()),
    })
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { ref path, .. } if path == "kind.Basic"));
    assert!(err.to_string().contains("Kind::Basic"));
}

#[test]
fn test_data_variant_on_decode() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    enum Kind {
        Basic(String),
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Account {
        kind: Kind,
    }

    let err = from_str::<Account>("|kind|\n|-|\n|Basic|").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref path, .. } if path == "kind"));
}

#[test]
fn test_unknown_variant() {
    #[derive(Deserialize, Debug)]
    enum Tier {
        Basic,
        Premium,
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Account {
        tier: Tier,
    }

    let err = from_str::<Account>("|tier|\n|-|\n|Gold|").unwrap_err();
    assert!(matches!(err, Error::DataCorrupted { ref path, .. } if path == "tier"));
    let _ = (Tier::Basic, Tier::Premium);
}

#[test]
fn test_short_tuple() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Segment {
        span: (i32, i32, i32),
    }

    let err = from_str::<Segment>("|span|\n|-|\n|1,2|").unwrap_err();
    assert!(matches!(err, Error::ValueNotFound { ref path, .. } if path == "span"));
}

#[test]
fn test_struct_requested_inside_list() {
    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Room {
        name: String,
    }

    #[derive(Deserialize, Debug)]
    #[allow(dead_code)]
    struct Plan {
        rooms: Vec<Room>,
    }

    let err = from_str::<Plan>("|rooms|\n|-|\n|hall|").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref path, .. } if path == "rooms"));
}

#[test]
fn test_line_break_rejected() {
    let note = BTreeMap::from([("note", "first\nsecond")]);
    let err = to_string(&note).unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { ref path, .. } if path == "note"));
}

#[test]
fn test_empty_batch_rejected() {
    let err = to_string_many(Vec::<House>::new()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { .. }));
}

#[test]
fn test_silent_struct_rejected() {
    #[derive(Serialize)]
    struct Nothing {}

    #[derive(Serialize)]
    struct Holder {
        id: u8,
        inner: Nothing,
    }

    let err = to_string(&Holder {
        id: 1,
        inner: Nothing {},
    })
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedValue { ref path, .. } if path == "inner"));
}

struct FailingIo;

impl io::Read for FailingIo {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk unplugged"))
    }
}

impl io::Write for FailingIo {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_io_failures() {
    let err = from_reader::<_, House>(FailingIo).unwrap_err();
    assert!(matches!(err, Error::Io(ref msg) if msg.contains("disk unplugged")));

    let house = House {
        street: "Elm".to_string(),
        number: 1,
    };
    let err = to_writer(FailingIo, &house).unwrap_err();
    assert!(matches!(err, Error::Io(ref msg) if msg.contains("disk full")));
}

#[test]
fn test_display_messages() {
    assert_eq!(
        Error::key_not_found("pig.name").to_string(),
        "No value associated with key 'pig.name'"
    );
    assert_eq!(
        Error::type_mismatch("id", "u32", "x").to_string(),
        "Type mismatch at 'id': expected u32, found 'x'"
    );
    assert!(Error::unsupported_nested_container("rooms")
        .to_string()
        .contains("cannot hold a nested table"));
}
