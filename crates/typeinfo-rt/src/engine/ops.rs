use typeinfo_tables::DerivedType;

use super::lifecycle::Lifecycle;

/// Lifecycle operations called directly on a type table.
///
/// Runs in the host context without tracing. Use [`Lifecycle`] for anything
/// else.
pub trait InstanceOps {
    /// # Safety
    ///
    /// See [`Lifecycle::initialize`].
    unsafe fn initialize(&self, instance: *mut u8);

    /// # Safety
    ///
    /// See [`Lifecycle::destroy_non_parent_components`].
    unsafe fn destroy_non_parent_components(&self, instance: *mut u8, finalize: bool);

    /// # Safety
    ///
    /// See [`Lifecycle::destroy_scalar_instance`].
    unsafe fn destroy_scalar_instance(&self, instance: *mut u8, finalize: bool);
}

impl InstanceOps for DerivedType<'_> {
    unsafe fn initialize(&self, instance: *mut u8) {
        // SAFETY: forwarded contract.
        unsafe { Lifecycle::new().initialize(self, instance) }
    }

    unsafe fn destroy_non_parent_components(&self, instance: *mut u8, finalize: bool) {
        // SAFETY: forwarded contract.
        unsafe { Lifecycle::new().destroy_non_parent_components(self, instance, finalize) }
    }

    unsafe fn destroy_scalar_instance(&self, instance: *mut u8, finalize: bool) {
        // SAFETY: forwarded contract.
        unsafe { Lifecycle::new().destroy_scalar_instance(self, instance, finalize) }
    }
}
