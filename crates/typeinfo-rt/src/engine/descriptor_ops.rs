//! Operations over every element a descriptor describes.

use std::alloc::{self, Layout};
use std::ptr;

use typeinfo_core::SubscriptValue;
use typeinfo_tables::{ALLOCATION_ALIGN, DerivedType, Descriptor, TypeBoundProcedure};

use super::invariants;
use super::lifecycle::Lifecycle;
use super::trace::Tracer;
use crate::stat::StatError;

impl<T: Tracer> Lifecycle<T> {
    /// Initialize every element of derived-type storage starting at `data`.
    ///
    /// Does nothing unless the descriptor's addendum names an initializable
    /// type. Elements are contiguous, `elem_len` bytes apart.
    ///
    /// # Safety
    ///
    /// `data` must be valid for writes of every described element.
    pub unsafe fn initialize_elements(&mut self, desc: &Descriptor<'_>, data: *mut u8) {
        let Some(ty) = desc.derived_type() else {
            return;
        };
        if !ty.is_initializable() {
            return;
        }
        let stride = desc.element_bytes();
        for j in 0..desc.elements() {
            // SAFETY: element `j` lies inside the described storage.
            unsafe { self.initialize(ty, data.add(j * stride)) };
        }
    }

    /// Destroy every element of derived-type storage starting at `data`.
    ///
    /// With `finalize`, a FINAL subroutine for the descriptor's rank receives
    /// the descriptor; failing that, an elemental FINAL subroutine runs on each
    /// element. Components are destroyed next, then the parent type over the
    /// same elements. A descriptor marked do-not-finalize never finalizes.
    ///
    /// # Safety
    ///
    /// `data` must hold initialized elements of the described type, with
    /// exclusive access.
    pub unsafe fn destroy_elements(
        &mut self,
        desc: &Descriptor<'_>,
        data: *mut u8,
        finalize: bool,
    ) {
        if data.is_null() {
            return;
        }
        let Some(ty) = desc.derived_type() else {
            return;
        };
        let finalize = finalize && !desc.is_finalization_suppressed();
        // SAFETY: forwarded contract.
        unsafe { self.destroy_with_type(desc, ty, data, finalize) };
    }

    unsafe fn destroy_with_type(
        &mut self,
        desc: &Descriptor<'_>,
        ty: &DerivedType<'_>,
        data: *mut u8,
        finalize: bool,
    ) {
        let mut elemental: Option<&TypeBoundProcedure<'_>> = None;
        if finalize && ty.is_finalizable() {
            for tbp in ty.procedures() {
                if tbp.is_elemental_scalar_final() {
                    elemental = Some(tbp);
                    continue;
                }
                if tbp.is_final_for_rank(u32::from(desc.rank)) {
                    elemental = None;
                    if let Some(entry) = tbp.code.entry(self.context) {
                        self.tracer.trace_finalize(ty, tbp);
                        // Static descriptors carry no address; hand over one that does.
                        let mut view = desc.clone();
                        view.base_addr = data;
                        // SAFETY: rank finalizers take the descriptor's address.
                        unsafe { entry(ptr::from_mut(&mut view).cast::<u8>()) };
                    }
                    break;
                }
            }
        }

        let elemental_entry =
            elemental.and_then(|tbp| tbp.code.entry(self.context).map(|e| (tbp, e)));
        let stride = desc.element_bytes();
        for j in 0..desc.elements() {
            // SAFETY: element `j` lies inside the described storage.
            let element = unsafe { data.add(j * stride) };
            if let Some((tbp, entry)) = elemental_entry {
                self.tracer.trace_finalize(ty, tbp);
                // SAFETY: elemental finalizers take one element's address.
                unsafe { entry(element) };
            }
            // SAFETY: forwarded contract.
            unsafe { self.destroy_non_parent_components(ty, element, finalize) };
        }

        if ty.is_extension() {
            let parent = invariants::ensure_parent_type(ty);
            self.tracer.trace_enter_parent(ty, parent);
            // SAFETY: each element's parent field is at offset 0.
            unsafe { self.destroy_with_type(desc, parent, data, finalize) };
        }
    }

    /// Allocate storage for an allocatable descriptor and default-initialize it.
    ///
    /// `lower` and `upper` give the bounds of each dimension and must have
    /// `rank` entries. On error the descriptor is left unchanged.
    ///
    /// # Safety
    ///
    /// `desc` must be established; its type tables must match its `elem_len`.
    pub unsafe fn allocate(
        &mut self,
        desc: &mut Descriptor<'_>,
        lower: &[SubscriptValue],
        upper: &[SubscriptValue],
    ) -> Result<(), StatError> {
        if !desc.is_allocatable() {
            return Err(StatError::NotAllocatable);
        }
        if desc.is_allocated() {
            return Err(StatError::AlreadyAllocated);
        }
        if lower.len() != desc.rank() || upper.len() != desc.rank() {
            return Err(StatError::RankMismatch {
                rank: desc.rank(),
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        let bytes = desc
            .bounds_storage_bytes(lower, upper)
            .ok_or(StatError::OutOfMemory)?;
        let layout = Layout::from_size_align(bytes.max(1), ALLOCATION_ALIGN)
            .map_err(|_| StatError::OutOfMemory)?;
        desc.set_bounds(lower, upper);

        // SAFETY: the layout has a nonzero size.
        let base = unsafe { alloc::alloc_zeroed(layout) };
        if base.is_null() {
            return Err(StatError::OutOfMemory);
        }
        desc.base_addr = base;
        log::trace!(
            "allocated {} bytes for {} element(s) of {}",
            layout.size(),
            desc.elements(),
            desc.type_code
        );

        // SAFETY: freshly allocated storage of the described size.
        unsafe { self.initialize_elements(desc, base) };
        Ok(())
    }

    /// Destroy and free the storage of an allocatable descriptor.
    ///
    /// # Safety
    ///
    /// The storage must come from [`allocate`](Self::allocate) and be
    /// exclusively owned by `desc`.
    pub unsafe fn deallocate(
        &mut self,
        desc: &mut Descriptor<'_>,
        finalize: bool,
    ) -> Result<(), StatError> {
        if !desc.is_allocatable() {
            return Err(StatError::NotAllocatable);
        }
        if !desc.is_allocated() {
            return Err(StatError::NotAllocated);
        }
        // SAFETY: forwarded contract.
        unsafe { self.free_allocated(desc, finalize) };
        Ok(())
    }

    /// # Safety
    ///
    /// As for [`deallocate`](Self::deallocate); `desc` must be allocated.
    pub(super) unsafe fn free_allocated(&mut self, desc: &mut Descriptor<'_>, finalize: bool) {
        let data = desc.base_addr;
        // SAFETY: forwarded contract.
        unsafe { self.destroy_elements(desc, data, finalize) };
        match storage_layout(desc) {
            Some(layout) => {
                log::trace!("freeing {} bytes of {}", layout.size(), desc.type_code);
                // SAFETY: allocated by `allocate` with this same layout.
                unsafe { alloc::dealloc(data, layout) };
            }
            None => log::warn!("cannot free storage of {}: invalid layout", desc.type_code),
        }
        desc.base_addr = ptr::null_mut();
    }
}

/// Heap layout of the described storage; never zero-sized.
fn storage_layout(desc: &Descriptor<'_>) -> Option<Layout> {
    let bytes = desc.storage_bytes()?;
    Layout::from_size_align(bytes.max(1), ALLOCATION_ALIGN).ok()
}
