//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use typeinfo_core::terminator;
use typeinfo_tables::{Component, DerivedType};

/// Type named by the parent field of an extended type.
///
/// Each missing link is a fatal table inconsistency.
pub(super) fn ensure_parent_type<'a>(ty: &DerivedType<'a>) -> &'a DerivedType<'a> {
    let terminator = terminator!();
    let Some(desc) = ty.components().first().and_then(Component::static_descriptor) else {
        terminator.crash(format_args!(
            "type '{}': parent component has no static descriptor",
            ty.name()
        ))
    };
    let Some(addendum) = desc.addendum() else {
        terminator.crash(format_args!(
            "type '{}': parent static descriptor has no addendum",
            ty.name()
        ))
    };
    let Some(parent) = addendum.derived_type else {
        terminator.crash(format_args!(
            "type '{}': parent addendum names no type",
            ty.name()
        ))
    };
    parent
}
