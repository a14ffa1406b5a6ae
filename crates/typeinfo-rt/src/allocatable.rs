//! Establishment and checks for allocatable variables.
//!
//! Each `init_*` leaves the descriptor established, unallocated, and with
//! empty bounds of the requested rank; [`Lifecycle::allocate`] sets the bounds.
//!
//! [`Lifecycle::allocate`]: crate::Lifecycle::allocate

use typeinfo_core::{TypeCategory, TypeCode, TypeParameterValue};
use typeinfo_tables::{Attribute, DerivedType, Descriptor};

use crate::stat::{StatError, code, stat_and_errmsg};

/// Establish an allocatable of intrinsic type.
pub fn init_intrinsic(desc: &mut Descriptor<'_>, category: TypeCategory, kind: u8, rank: usize) {
    let type_code = TypeCode::new(category, kind);
    let elem_len = type_code.element_bytes().unwrap_or(usize::from(kind));
    desc.establish_intrinsic(
        type_code,
        elem_len,
        std::ptr::null_mut(),
        &vec![0; rank],
        Attribute::Allocatable,
    );
}

/// Establish an allocatable CHARACTER with `length` characters of `kind` bytes.
pub fn init_character(desc: &mut Descriptor<'_>, length: usize, kind: u8, rank: usize) {
    desc.establish_intrinsic(
        TypeCode::character(kind),
        length * usize::from(kind),
        std::ptr::null_mut(),
        &vec![0; rank],
        Attribute::Allocatable,
    );
}

/// Establish an allocatable of derived type `ty`.
pub fn init_derived<'a>(desc: &mut Descriptor<'a>, ty: &'a DerivedType<'a>, rank: usize) {
    desc.establish_derived(ty, std::ptr::null_mut(), &vec![0; rank], Attribute::Allocatable);
}

/// STAT for an ALLOCATE of `desc`: nonzero when it is already allocated.
///
/// # Safety
///
/// As for [`stat_and_errmsg`].
pub unsafe fn check_allocated(desc: &Descriptor<'_>, errmsg: Option<&mut Descriptor<'_>>) -> i32 {
    if desc.is_allocated() {
        // SAFETY: forwarded contract.
        return unsafe { stat_and_errmsg(errmsg, &StatError::AlreadyAllocated) };
    }
    code::OK
}

/// Record explicit LEN type parameter values, in declaration order.
///
/// An unallocated descriptor takes the values. An allocated one must already
/// hold exactly these values.
pub fn apply_len_parameters(
    desc: &mut Descriptor<'_>,
    values: &[TypeParameterValue],
) -> Result<(), StatError> {
    let Some(ty) = desc.derived_type() else {
        return Err(StatError::Generic);
    };
    if values.len() != ty.len_parameter_count() {
        return Err(StatError::LengthTypeParameterMismatch);
    }
    let slots = (0..values.len()).filter_map(|n| ty.len_type_parameter(n)?.len_index());
    let allocated = desc.is_allocated();
    for (which, &value) in slots.zip(values) {
        if allocated {
            if desc.len_parameter_value(which) != value {
                return Err(StatError::LengthTypeParameterMismatch);
            }
        } else {
            desc.set_len_parameter_value(which, value);
        }
    }
    Ok(())
}
