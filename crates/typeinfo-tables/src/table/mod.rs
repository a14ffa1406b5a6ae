//! Table entries and the descriptor layout.

mod binding;
mod component;
mod derived;
mod descriptor;
pub mod dump;
mod instance_buf;
mod layout;
mod param;

#[cfg(test)]
mod dump_tests;

pub use binding::{ExecutableCode, ExecutionContext, ProcEntry, ProcFlags, TypeBoundProcedure};
pub use component::{Component, ComponentFlags};
pub use derived::{DerivedType, TypeFlags};
pub use descriptor::{
    ALLOCATION_ALIGN, Attribute, Descriptor, DescriptorAddendum, DescriptorFlags, Dimension,
    MAX_LEN_PARAMETERS, MAX_RANK,
};
pub use instance_buf::InstanceBuf;
pub use layout::LayoutError;
pub use param::TypeParameter;
