use super::*;

#[test]
fn display() {
    let codes = [
        TypeCode::integer(4),
        TypeCode::real(8),
        TypeCode::complex(4),
        TypeCode::character(1),
        TypeCode::logical(4),
        TypeCode::DERIVED,
        TypeCode::OTHER,
    ];
    let rendered: Vec<String> = codes.iter().map(ToString::to_string).collect();

    insta::assert_snapshot!(rendered.join("\n"), @r"
    INTEGER(4)
    REAL(8)
    COMPLEX(4)
    CHARACTER(1)
    LOGICAL(4)
    TYPE
    OTHER
    ");
}

#[test]
fn element_bytes() {
    assert_eq!(TypeCode::integer(8).element_bytes(), Some(8));
    assert_eq!(TypeCode::complex(8).element_bytes(), Some(16));
    assert_eq!(TypeCode::character(4).element_bytes(), Some(4));
    assert_eq!(TypeCode::DERIVED.element_bytes(), None);
    assert_eq!(TypeCode::OTHER.element_bytes(), None);
}

#[test]
fn alignment() {
    assert_eq!(TypeCode::real(8).alignment(), 8);
    assert_eq!(TypeCode::complex(4).alignment(), 4);
    assert_eq!(TypeCode::real(10).alignment(), 1);
    assert_eq!(TypeCode::character(4).alignment(), 1);
    assert_eq!(TypeCode::DERIVED.alignment(), 1);
}

#[test]
fn default_is_other() {
    assert_eq!(TypeCode::default(), TypeCode::OTHER);
    assert!(!TypeCode::default().is_derived());
}
