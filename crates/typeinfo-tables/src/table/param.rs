//! KIND and LEN type parameters.

use typeinfo_core::{TypeCode, TypeParameterValue};

use super::descriptor::Descriptor;

/// One type parameter declaration.
///
/// `which` is negative for a KIND parameter, whose `value` is the same for
/// every instance. A LEN parameter keeps its addendum slot in `which` and its
/// default in `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct TypeParameter<'a> {
    pub name: &'a str,
    pub type_code: TypeCode,
    pub which: i32,
    pub value: TypeParameterValue,
}

impl<'a> TypeParameter<'a> {
    pub const fn kind(name: &'a str, type_code: TypeCode, value: TypeParameterValue) -> Self {
        Self {
            name,
            type_code,
            which: -1,
            value,
        }
    }

    pub const fn len(
        name: &'a str,
        type_code: TypeCode,
        default: TypeParameterValue,
        which: u16,
    ) -> Self {
        Self {
            name,
            type_code,
            which: which as i32,
            value: default,
        }
    }

    pub const fn is_kind(&self) -> bool {
        self.which < 0
    }

    pub const fn is_len(&self) -> bool {
        self.which >= 0
    }

    /// KIND value, or the default of a LEN parameter.
    pub const fn static_value(&self) -> TypeParameterValue {
        self.value
    }

    /// Addendum slot of a LEN parameter.
    pub const fn len_index(&self) -> Option<usize> {
        if self.which < 0 {
            None
        } else {
            Some(self.which as usize)
        }
    }

    /// Current value for the instance described by `descriptor`.
    ///
    /// KIND values never vary per instance, so the descriptor is not read.
    /// For a LEN parameter the descriptor's addendum must hold the slot.
    pub fn get_value(&self, descriptor: &Descriptor<'_>) -> TypeParameterValue {
        match self.len_index() {
            None => self.value,
            Some(which) => descriptor.len_parameter_value(which),
        }
    }
}
