//! Lifecycle engine over raw instance memory.

mod descriptor_ops;
mod invariants;
mod lifecycle;
mod ops;
mod trace;

#[cfg(test)]
mod initialize_tests;

pub use lifecycle::{Lifecycle, LifecycleBuilder};
pub use ops::InstanceOps;
pub use trace::{InitStep, NoopTracer, PrintTracer, Tracer};
