//! Shared vocabulary for the derived-type runtime.
//!
//! This crate contains:
//! - Intrinsic type codes carried by components and type parameters
//! - The fatal diagnostic used for internally inconsistent type tables
//! - ANSI colors for table dumps and execution traces

pub mod colors;
mod diagnostic;
mod type_code;

#[cfg(test)]
mod diagnostic_tests;
#[cfg(test)]
mod type_code_tests;

pub use colors::Colors;
pub use diagnostic::Terminator;
pub use type_code::{TypeCategory, TypeCode};

/// Value of a KIND or LEN type parameter.
pub type TypeParameterValue = i64;

/// Bound, extent, or stride of one array dimension.
pub type SubscriptValue = i64;
