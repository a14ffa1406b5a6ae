//! Initialization, finalization, and deallocation of derived-type instances.
//!
//! Every operation takes raw instance addresses and reads only the shared,
//! immutable type tables from `typeinfo-tables`. Independent instances may be
//! processed concurrently; one instance must not be.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod allocatable;
pub mod engine;
pub mod stat;

#[cfg(test)]
mod stat_tests;
#[cfg(test)]
mod test_utils;

pub use engine::{
    InitStep, InstanceOps, Lifecycle, LifecycleBuilder, NoopTracer, PrintTracer, Tracer,
};
pub use stat::{StatError, stat_and_errmsg};
