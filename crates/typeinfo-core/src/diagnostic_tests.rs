use crate::{Terminator, runtime_check, terminator};

#[test]
fn terminator_macro_captures_location() {
    let terminator = terminator!();
    assert!(terminator.source_file().ends_with("diagnostic_tests.rs"));
    assert!(terminator.source_line() > 0);
}

#[test]
fn passing_check_returns() {
    let terminator = Terminator::new("tables.rs", 7);
    let components = 3;
    runtime_check!(terminator, components > 0);
}

#[test]
#[should_panic(expected = "RUNTIME_CHECK(components > 3) failed at tables.rs(7)")]
fn failing_check_names_predicate_and_location() {
    let terminator = Terminator::new("tables.rs", 7);
    let components = 3;
    runtime_check!(terminator, components > 3);
}

#[test]
#[should_panic(expected = "fatal internal error: parent of 'child' is missing")]
fn crash_formats_message() {
    Terminator::new("lib.rs", 1).crash(format_args!("parent of '{}' is missing", "child"));
}
