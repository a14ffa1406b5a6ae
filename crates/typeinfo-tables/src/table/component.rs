//! Data components of a derived type.

use bitflags::bitflags;
use typeinfo_core::TypeCode;

use super::derived::DerivedType;
use super::descriptor::Descriptor;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ComponentFlags: u32 {
        /// Synthesized field holding the base type's data.
        const PARENT = 1;
        const PRIVATE = 1 << 1;
        /// The field is a descriptor (allocatable or pointer).
        const IS_DESCRIPTOR = 1 << 2;
    }
}

/// One field at a fixed byte offset inside an instance.
///
/// `static_descriptor` gives the shape and type of derived-type and
/// fixed-shape fields. Its base address is never used.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Component<'a> {
    pub name: &'a str,
    pub flags: ComponentFlags,
    pub type_code: TypeCode,
    pub static_descriptor: Option<&'a Descriptor<'a>>,
    pub offset: usize,
}

impl<'a> Component<'a> {
    /// Intrinsic scalar field.
    pub const fn new(name: &'a str, type_code: TypeCode, offset: usize) -> Self {
        Self {
            name,
            flags: ComponentFlags::empty(),
            type_code,
            static_descriptor: None,
            offset,
        }
    }

    /// Field of derived type (scalar or fixed shape) described by `desc`.
    pub const fn derived(name: &'a str, desc: &'a Descriptor<'a>, offset: usize) -> Self {
        Self {
            name,
            flags: ComponentFlags::empty(),
            type_code: TypeCode::DERIVED,
            static_descriptor: Some(desc),
            offset,
        }
    }

    /// Synthesized parent field of an extended type. Always at offset 0.
    pub const fn parent(name: &'a str, desc: &'a Descriptor<'a>) -> Self {
        let mut component = Self::derived(name, desc, 0);
        component.flags = ComponentFlags::PARENT;
        component
    }

    /// Allocatable or pointer field, stored as a descriptor.
    pub const fn descriptor(name: &'a str, type_code: TypeCode, offset: usize) -> Self {
        let mut component = Self::new(name, type_code, offset);
        component.flags = ComponentFlags::IS_DESCRIPTOR;
        component
    }

    pub const fn private(mut self) -> Self {
        self.flags = self.flags.union(ComponentFlags::PRIVATE);
        self
    }

    /// Fixed-shape intrinsic field.
    pub const fn with_static_descriptor(mut self, desc: &'a Descriptor<'a>) -> Self {
        self.static_descriptor = Some(desc);
        self
    }

    pub const fn is_parent(&self) -> bool {
        self.flags.contains(ComponentFlags::PARENT)
    }

    pub const fn is_private(&self) -> bool {
        self.flags.contains(ComponentFlags::PRIVATE)
    }

    pub const fn is_descriptor(&self) -> bool {
        self.flags.contains(ComponentFlags::IS_DESCRIPTOR)
    }

    pub const fn static_descriptor(&self) -> Option<&'a Descriptor<'a>> {
        self.static_descriptor
    }

    /// Derived type named by the static descriptor.
    pub const fn nested_type(&self) -> Option<&'a DerivedType<'a>> {
        match self.static_descriptor {
            Some(desc) => desc.derived_type(),
            None => None,
        }
    }

    /// Address of this field inside `instance`.
    ///
    /// # Safety
    ///
    /// `instance` must point to an instance of the type that owns this
    /// component, valid for its whole declared size.
    pub unsafe fn locate(&self, instance: *mut u8) -> *mut u8 {
        // SAFETY: the offset lies inside the instance per the caller's contract.
        unsafe { instance.add(self.offset) }
    }

    /// Address of this field reinterpreted as `T`.
    ///
    /// # Safety
    ///
    /// As for [`locate`](Self::locate); the field must also hold a `T`.
    pub unsafe fn locate_as<T>(&self, instance: *mut u8) -> *mut T {
        // SAFETY: forwarded contract.
        unsafe { self.locate(instance).cast::<T>() }
    }

    /// Bytes the field occupies, or `None` for an intrinsic code with no
    /// fixed element size.
    pub fn storage_bytes(&self) -> Option<usize> {
        if self.is_descriptor() {
            return Some(size_of::<Descriptor<'_>>());
        }
        match self.static_descriptor {
            Some(desc) => desc.storage_bytes(),
            None => self.type_code.element_bytes(),
        }
    }

    /// Required alignment of the field.
    pub fn storage_align(&self) -> usize {
        if self.is_descriptor() {
            return align_of::<Descriptor<'_>>();
        }
        match self.static_descriptor {
            Some(desc) => match desc.derived_type() {
                Some(ty) => ty.alignment(),
                None => desc.type_code.alignment(),
            },
            None => self.type_code.alignment(),
        }
    }
}
