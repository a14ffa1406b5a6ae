//! Static type-description tables for derived types.
//!
//! This crate contains:
//! - Table entries (TypeParameter, Component, TypeBoundProcedure, DerivedType)
//! - The descriptor layout that carries per-instance shape and LEN values
//! - One-time layout validation and human-readable dumps
//!
//! Tables are built by `const fn`s into `static` storage and never mutated.

pub mod table;

pub use table::{
    ALLOCATION_ALIGN, Attribute, Component, ComponentFlags, Descriptor, DescriptorAddendum,
    DescriptorFlags, DerivedType, Dimension, ExecutableCode, ExecutionContext, InstanceBuf,
    LayoutError, MAX_LEN_PARAMETERS, MAX_RANK, ProcEntry, ProcFlags, TypeBoundProcedure,
    TypeFlags, TypeParameter, dump,
};
pub use typeinfo_core::{
    Colors, SubscriptValue, Terminator, TypeCategory, TypeCode, TypeParameterValue,
};
