//! Descriptor layout: per-instance shape, base address, and LEN values.
//!
//! An all-zero descriptor is valid: unestablished, unallocated, rank 0, with
//! no addendum. Descriptor-valued components rely on this for zero-fill
//! default initialization.

use std::fmt;

use bitflags::bitflags;
use typeinfo_core::{
    Colors, SubscriptValue, TypeCode, TypeParameterValue, runtime_check, terminator,
};

use super::derived::DerivedType;
use super::dump;

pub const MAX_RANK: usize = 15;
pub const MAX_LEN_PARAMETERS: usize = 8;

/// Alignment of storage obtained for allocatable descriptors.
pub const ALLOCATION_ALIGN: usize = 16;

/// Bounds and stride of one dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Dimension {
    pub lower_bound: SubscriptValue,
    pub extent: SubscriptValue,
    pub byte_stride: SubscriptValue,
}

impl Dimension {
    pub const EMPTY: Self = Self {
        lower_bound: 0,
        extent: 0,
        byte_stride: 0,
    };

    /// Extent of `lower..=upper`; zero when `upper < lower`, `None` on overflow.
    pub fn extent_between(lower: SubscriptValue, upper: SubscriptValue) -> Option<SubscriptValue> {
        if upper < lower {
            return Some(0);
        }
        upper.checked_sub(lower)?.checked_add(1)
    }

    pub fn upper_bound(&self) -> SubscriptValue {
        self.lower_bound
            .saturating_add(self.extent)
            .saturating_sub(1)
    }
}

/// What the descriptor's storage belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Attribute {
    #[default]
    Other = 0,
    Pointer = 1,
    Allocatable = 2,
}

impl Attribute {
    pub fn name(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Pointer => "pointer",
            Self::Allocatable => "allocatable",
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DescriptorFlags: u8 {
        /// The addendum is meaningful.
        const ADDENDUM = 1;
        /// Destroying the storage must not run FINAL subroutines.
        const DO_NOT_FINALIZE = 1 << 1;
    }
}

/// Type metadata and LEN values for derived-type data.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct DescriptorAddendum<'a> {
    pub derived_type: Option<&'a DerivedType<'a>>,
    pub len: [TypeParameterValue; MAX_LEN_PARAMETERS],
}

impl<'a> DescriptorAddendum<'a> {
    pub const fn new(derived_type: Option<&'a DerivedType<'a>>) -> Self {
        Self {
            derived_type,
            len: [0; MAX_LEN_PARAMETERS],
        }
    }
}

/// Shape, storage, and type of a value.
///
/// Static descriptors referenced from component tables have a null base
/// address; only their shape and type are meaningful.
#[derive(Clone)]
#[repr(C)]
pub struct Descriptor<'a> {
    pub base_addr: *mut u8,
    pub elem_len: usize,
    pub type_code: TypeCode,
    pub rank: u8,
    pub attribute: Attribute,
    pub flags: DescriptorFlags,
    pub dim: [Dimension; MAX_RANK],
    pub addendum: DescriptorAddendum<'a>,
}

// SAFETY: `base_addr` is only dereferenced by operations whose callers
// guarantee exclusive access to the storage. Static descriptors in shared
// tables have a null base address and are never written.
unsafe impl Send for Descriptor<'_> {}
unsafe impl Sync for Descriptor<'_> {}

impl Default for Descriptor<'_> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<'a> Descriptor<'a> {
    /// The all-zero descriptor.
    pub const fn zeroed() -> Self {
        Self {
            base_addr: std::ptr::null_mut(),
            elem_len: 0,
            type_code: TypeCode::OTHER,
            rank: 0,
            attribute: Attribute::Other,
            flags: DescriptorFlags::empty(),
            dim: [Dimension::EMPTY; MAX_RANK],
            addendum: DescriptorAddendum::new(None),
        }
    }

    /// Static descriptor of a scalar derived-type component.
    pub const fn static_derived(ty: &'a DerivedType<'a>) -> Self {
        Self::static_derived_array(ty, &[])
    }

    /// Static descriptor of a fixed-shape derived-type component.
    ///
    /// Lower bounds are 1 and strides are contiguous.
    pub const fn static_derived_array(ty: &'a DerivedType<'a>, extents: &[SubscriptValue]) -> Self {
        let mut desc = Self::zeroed();
        desc.elem_len = ty.size_in_bytes();
        desc.type_code = TypeCode::DERIVED;
        desc.flags = DescriptorFlags::ADDENDUM;
        desc.addendum = DescriptorAddendum::new(Some(ty));
        desc.rank = extents.len() as u8;
        let mut stride = ty.size_in_bytes() as SubscriptValue;
        let mut j = 0;
        while j < extents.len() {
            desc.dim[j] = Dimension {
                lower_bound: 1,
                extent: extents[j],
                byte_stride: stride,
            };
            stride = stride.saturating_mul(extents[j]);
            j += 1;
        }
        desc
    }

    /// Establish over derived-type data with an addendum naming `ty`.
    ///
    /// A null `base` describes unallocated storage.
    pub fn establish_derived(
        &mut self,
        ty: &'a DerivedType<'a>,
        base: *mut u8,
        extents: &[SubscriptValue],
        attribute: Attribute,
    ) {
        self.establish(TypeCode::DERIVED, ty.size_in_bytes(), base, extents, attribute);
        self.flags = DescriptorFlags::ADDENDUM;
        self.addendum = DescriptorAddendum::new(Some(ty));
    }

    /// Establish over intrinsic data, without an addendum.
    ///
    /// For character data `elem_len` is the byte length of one string.
    pub fn establish_intrinsic(
        &mut self,
        type_code: TypeCode,
        elem_len: usize,
        base: *mut u8,
        extents: &[SubscriptValue],
        attribute: Attribute,
    ) {
        self.establish(type_code, elem_len, base, extents, attribute);
        self.flags = DescriptorFlags::empty();
        self.addendum = DescriptorAddendum::new(None);
    }

    fn establish(
        &mut self,
        type_code: TypeCode,
        elem_len: usize,
        base: *mut u8,
        extents: &[SubscriptValue],
        attribute: Attribute,
    ) {
        let terminator = terminator!();
        runtime_check!(terminator, extents.len() <= MAX_RANK);
        self.base_addr = base;
        self.elem_len = elem_len;
        self.type_code = type_code;
        self.rank = extents.len() as u8;
        self.attribute = attribute;
        self.dim = [Dimension::EMPTY; MAX_RANK];
        let lower = [1; MAX_RANK];
        self.set_bounds(&lower[..extents.len()], extents);
    }

    /// Set bounds for every dimension with contiguous byte strides.
    ///
    /// Both slices must have `rank` entries. An upper bound below the lower
    /// bound gives an empty dimension. Extents that overflow saturate; check
    /// [`bounds_storage_bytes`](Self::bounds_storage_bytes) first when the
    /// bounds come from user data.
    pub fn set_bounds(&mut self, lower: &[SubscriptValue], upper: &[SubscriptValue]) {
        let mut stride = SubscriptValue::try_from(self.elem_len).unwrap_or(SubscriptValue::MAX);
        for (j, (&lb, &ub)) in lower.iter().zip(upper).enumerate().take(self.rank()) {
            let extent = Dimension::extent_between(lb, ub).unwrap_or(SubscriptValue::MAX);
            self.dim[j] = Dimension {
                lower_bound: lb,
                extent,
                byte_stride: stride,
            };
            stride = stride.saturating_mul(extent);
        }
    }

    pub fn rank(&self) -> usize {
        self.rank as usize
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dim[..self.rank().min(MAX_RANK)]
    }

    /// Number of elements; zero when any extent is empty.
    ///
    /// Saturates at `usize::MAX`; see [`checked_elements`](Self::checked_elements).
    pub fn elements(&self) -> usize {
        self.checked_elements().unwrap_or(usize::MAX)
    }

    /// Number of elements, or `None` when the count does not fit a `usize`.
    pub fn checked_elements(&self) -> Option<usize> {
        checked_product(self.dimensions().iter().map(|d| d.extent))
    }

    pub fn element_bytes(&self) -> usize {
        self.elem_len
    }

    /// Total bytes of the described storage, or `None` on overflow.
    pub fn storage_bytes(&self) -> Option<usize> {
        self.checked_elements()?.checked_mul(self.elem_len)
    }

    /// Bytes the storage would take with the given bounds, or `None` on
    /// overflow. Leaves the descriptor untouched.
    pub fn bounds_storage_bytes(
        &self,
        lower: &[SubscriptValue],
        upper: &[SubscriptValue],
    ) -> Option<usize> {
        let mut count = 1usize;
        for (&lb, &ub) in lower.iter().zip(upper) {
            let extent = Dimension::extent_between(lb, ub)?;
            count = count.checked_mul(usize::try_from(extent).ok()?)?;
        }
        count.checked_mul(self.elem_len)
    }

    pub fn is_allocated(&self) -> bool {
        !self.base_addr.is_null()
    }

    pub fn is_allocatable(&self) -> bool {
        self.attribute == Attribute::Allocatable
    }

    pub fn is_pointer(&self) -> bool {
        self.attribute == Attribute::Pointer
    }

    pub const fn addendum(&self) -> Option<&DescriptorAddendum<'a>> {
        if self.flags.contains(DescriptorFlags::ADDENDUM) {
            Some(&self.addendum)
        } else {
            None
        }
    }

    /// Derived type named by the addendum.
    pub const fn derived_type(&self) -> Option<&'a DerivedType<'a>> {
        match self.addendum() {
            Some(addendum) => addendum.derived_type,
            None => None,
        }
    }

    /// LEN value stored at slot `which` of the addendum.
    ///
    /// The caller supplies a descriptor whose addendum carries the value; the
    /// addendum flag is not consulted.
    pub fn len_parameter_value(&self, which: usize) -> TypeParameterValue {
        self.addendum.len[which]
    }

    pub fn set_len_parameter_value(&mut self, which: usize, value: TypeParameterValue) {
        self.addendum.len[which] = value;
    }

    pub fn set_do_not_finalize(&mut self, suppress: bool) {
        self.flags.set(DescriptorFlags::DO_NOT_FINALIZE, suppress);
    }

    pub fn is_finalization_suppressed(&self) -> bool {
        self.flags.contains(DescriptorFlags::DO_NOT_FINALIZE)
    }

    /// Human-readable layout with KIND and LEN values by name.
    pub fn dump(&self, colors: Colors) -> String {
        dump::dump_descriptor(self, colors)
    }
}

impl fmt::Debug for Descriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("base_addr", &self.base_addr)
            .field("elem_len", &self.elem_len)
            .field("type_code", &self.type_code)
            .field("rank", &self.rank)
            .field("attribute", &self.attribute)
            .field("flags", &self.flags)
            .field("dim", &self.dimensions())
            .field("derived_type", &self.derived_type().map(|t| t.name()))
            .finish()
    }
}

fn checked_product(extents: impl IntoIterator<Item = SubscriptValue>) -> Option<usize> {
    extents.into_iter().try_fold(1usize, |count, extent| {
        count.checked_mul(usize::try_from(extent.max(0)).ok()?)
    })
}
