//! Default initialization and scalar destruction.

use std::ptr;

use typeinfo_tables::{DerivedType, Descriptor, ExecutionContext};

use super::invariants;
use super::trace::{InitStep, NoopTracer, Tracer};

/// Runs initialization and destruction over raw instance memory.
///
/// Holds only per-caller settings; the type tables stay shared. Create one
/// per thread, or per operation.
#[derive(Debug, Default)]
pub struct Lifecycle<T: Tracer = NoopTracer> {
    pub(super) context: ExecutionContext,
    pub(super) tracer: T,
}

/// Builder for [`Lifecycle`].
#[derive(Debug, Default)]
pub struct LifecycleBuilder<T: Tracer = NoopTracer> {
    context: ExecutionContext,
    tracer: T,
}

impl LifecycleBuilder<NoopTracer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Tracer> LifecycleBuilder<T> {
    /// Which entry point of each procedure gets called.
    pub fn context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn tracer<U: Tracer>(self, tracer: U) -> LifecycleBuilder<U> {
        LifecycleBuilder {
            context: self.context,
            tracer,
        }
    }

    pub fn build(self) -> Lifecycle<T> {
        Lifecycle {
            context: self.context,
            tracer: self.tracer,
        }
    }
}

impl Lifecycle<NoopTracer> {
    /// Host context, no tracing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> LifecycleBuilder<NoopTracer> {
        LifecycleBuilder::new()
    }
}

impl<T: Tracer> Lifecycle<T> {
    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Write the default value of `ty` into `instance`.
    ///
    /// A flat default image wins, then the initializer procedure. Otherwise
    /// the instance is zero-filled and/or its component types are initialized
    /// in turn, as the type's flags require. Type parameter values are not
    /// touched; they live in descriptor addenda.
    ///
    /// # Safety
    ///
    /// `instance` must be valid for writes of `ty.size_in_bytes()` bytes,
    /// aligned for `ty`, and not accessed by anyone else during the call.
    pub unsafe fn initialize(&mut self, ty: &DerivedType<'_>, instance: *mut u8) {
        if let Some(image) = ty.initializer() {
            self.tracer.trace_initialize(ty, InitStep::Image);
            let bytes = image.len().min(ty.size_in_bytes());
            // SAFETY: `instance` is writable for the type's size.
            unsafe { ptr::copy_nonoverlapping(image.as_ptr(), instance, bytes) };
            return;
        }

        if let Some(tbp) = ty.initializer_procedure()
            && let Some(entry) = tbp.code.entry(self.context)
        {
            self.tracer.trace_initialize(ty, InitStep::Procedure);
            // SAFETY: generated initializers take the instance address.
            unsafe { entry(instance) };
            return;
        }

        if ty.is_init_zero() {
            self.tracer.trace_initialize(ty, InitStep::ZeroFill);
            // SAFETY: `instance` is writable for the type's size.
            unsafe { ptr::write_bytes(instance, 0, ty.size_in_bytes()) };
        }

        if ty.is_init_component() {
            self.tracer.trace_initialize(ty, InitStep::Components);
            for component in ty.components() {
                if component.is_descriptor() {
                    continue;
                }
                if let Some(desc) = component.static_descriptor() {
                    // SAFETY: component offsets lie inside the instance.
                    unsafe { self.initialize_elements(desc, component.locate(instance)) };
                }
            }
        }
    }

    /// Tear down every component except the parent field.
    ///
    /// Allocated allocatable components are finalized (when `finalize`) and
    /// freed. Derived-type components are destroyed through their static
    /// descriptors. Pointer components are not owned and stay as they are.
    ///
    /// # Safety
    ///
    /// `instance` must hold an initialized instance of `ty` with exclusive
    /// access. Allocated components must come from [`Lifecycle::allocate`].
    pub unsafe fn destroy_non_parent_components(
        &mut self,
        ty: &DerivedType<'_>,
        instance: *mut u8,
        finalize: bool,
    ) {
        self.tracer.trace_destroy_components(ty);
        for component in ty.components() {
            if component.is_parent() {
                continue;
            }
            if component.is_descriptor() {
                // SAFETY: descriptor components hold a `Descriptor`.
                let desc = unsafe { &mut *component.locate_as::<Descriptor<'_>>(instance) };
                if desc.is_allocatable() && desc.is_allocated() {
                    self.tracer.trace_release(ty, component);
                    // SAFETY: forwarded contract.
                    unsafe { self.free_allocated(desc, finalize) };
                }
            } else if let Some(desc) = component.static_descriptor() {
                // SAFETY: component offsets lie inside the instance.
                unsafe { self.destroy_elements(desc, component.locate(instance), finalize) };
            }
        }
    }

    /// Destroy one scalar instance, most-derived type first.
    ///
    /// Rank-0 elemental FINAL subroutines run first (when `finalize` and the
    /// type is finalizable), then the non-parent components, then the parent
    /// type recursively. Array-level FINAL subroutines are the caller's.
    ///
    /// Panics when an extended type's parent field does not name a type.
    ///
    /// # Safety
    ///
    /// As for [`destroy_non_parent_components`](Self::destroy_non_parent_components).
    pub unsafe fn destroy_scalar_instance(
        &mut self,
        ty: &DerivedType<'_>,
        instance: *mut u8,
        finalize: bool,
    ) {
        if finalize && ty.is_finalizable() {
            for tbp in ty.procedures() {
                if !tbp.is_elemental_scalar_final() {
                    continue;
                }
                if let Some(entry) = tbp.code.entry(self.context) {
                    self.tracer.trace_finalize(ty, tbp);
                    // SAFETY: elemental finalizers take one element's address.
                    unsafe { entry(instance) };
                }
            }
        }

        // SAFETY: forwarded contract.
        unsafe { self.destroy_non_parent_components(ty, instance, finalize) };

        if ty.is_extension() {
            let parent = invariants::ensure_parent_type(ty);
            self.tracer.trace_enter_parent(ty, parent);
            // SAFETY: the parent field is at offset 0 and spans the parent's layout.
            unsafe { self.destroy_scalar_instance(parent, instance, finalize) };
        }
    }
}
