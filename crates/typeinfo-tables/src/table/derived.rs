//! Derived-type metadata and the type-relation queries.

use std::fmt;
use std::iter;

use bitflags::bitflags;

use super::binding::TypeBoundProcedure;
use super::component::Component;
use super::param::TypeParameter;

bitflags! {
    /// Attributes of a derived type. The last three are computed once by
    /// [`DerivedType::new`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u64 {
        const SEQUENCE = 1;
        const BIND_C = 1 << 1;
        const FINALIZABLE = 1 << 2;
        /// Default initialization zero-fills the instance.
        const INIT_ZERO = 1 << 3;
        /// Default initialization recurses into component types.
        const INIT_COMPONENT = 1 << 4;
    }
}

/// Read-only description of one derived type.
///
/// Everything is borrowed from program-duration tables. `new` is a `const fn`
/// so a type can be described entirely by `static` items:
///
/// ```
/// use typeinfo_tables::{Component, DerivedType, TypeCode};
///
/// static POINT_COMPONENTS: [Component<'static>; 2] = [
///     Component::new("x", TypeCode::real(8), 0),
///     Component::new("y", TypeCode::real(8), 8),
/// ];
/// static POINT: DerivedType<'static> =
///     DerivedType::new("point", &[], &POINT_COMPONENTS, &[], None, 16);
///
/// assert!(!POINT.is_initializable());
/// assert_eq!(POINT.size_in_bytes(), 16);
/// ```
#[derive(Clone, Copy)]
#[repr(C)]
pub struct DerivedType<'a> {
    name: &'a str,
    parameters: &'a [TypeParameter<'a>],
    kind_parameters: usize,
    components: &'a [Component<'a>],
    procedures: &'a [TypeBoundProcedure<'a>],
    initializer: Option<&'a [u8]>,
    bytes: usize,
    init_procedure: Option<usize>,
    base: Option<&'a DerivedType<'a>>,
    flags: TypeFlags,
}

impl<'a> DerivedType<'a> {
    /// Describe a type and compute its initialization and finalization flags.
    ///
    /// `initializer` is a flat default image of the whole instance. Component
    /// types must already be constructed.
    pub const fn new(
        name: &'a str,
        parameters: &'a [TypeParameter<'a>],
        components: &'a [Component<'a>],
        procedures: &'a [TypeBoundProcedure<'a>],
        initializer: Option<&'a [u8]>,
        bytes: usize,
    ) -> Self {
        let mut kind_parameters = 0;
        while kind_parameters < parameters.len() && parameters[kind_parameters].is_kind() {
            kind_parameters += 1;
        }

        let mut flags = TypeFlags::empty();
        let mut init_procedure = None;
        let mut j = 0;
        while j < procedures.len() {
            let tbp = &procedures[j];
            if tbp.is_initializer() {
                init_procedure = Some(j);
            }
            if tbp.is_finalizer() {
                flags = flags.union(TypeFlags::FINALIZABLE);
            }
            j += 1;
        }

        if initializer.is_none() && init_procedure.is_none() {
            let mut j = 0;
            while j < components.len() {
                let component = &components[j];
                if component.is_descriptor() {
                    flags = flags.union(TypeFlags::INIT_ZERO);
                } else if let Some(nested) = component.nested_type() {
                    if nested.is_zero_only() {
                        flags = flags.union(TypeFlags::INIT_ZERO);
                    } else if nested.is_initializable() {
                        flags = flags.union(TypeFlags::INIT_COMPONENT);
                    }
                }
                j += 1;
            }
        }

        let base = match components.first() {
            Some(first) if first.is_parent() => first.nested_type(),
            _ => None,
        };

        Self {
            name,
            parameters,
            kind_parameters,
            components,
            procedures,
            initializer,
            bytes,
            init_procedure,
            base,
            flags,
        }
    }

    pub const fn set_sequence(mut self) -> Self {
        self.flags = self.flags.union(TypeFlags::SEQUENCE);
        self
    }

    pub const fn set_bind_c(mut self) -> Self {
        self.flags = self.flags.union(TypeFlags::BIND_C);
        self
    }

    pub const fn name(&self) -> &'a str {
        self.name
    }

    pub const fn size_in_bytes(&self) -> usize {
        self.bytes
    }

    pub const fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub const fn parameters(&self) -> &'a [TypeParameter<'a>] {
        self.parameters
    }

    pub const fn components(&self) -> &'a [Component<'a>] {
        self.components
    }

    pub const fn procedures(&self) -> &'a [TypeBoundProcedure<'a>] {
        self.procedures
    }

    /// Flat default image.
    pub const fn initializer(&self) -> Option<&'a [u8]> {
        self.initializer
    }

    pub const fn kind_parameter_count(&self) -> usize {
        self.kind_parameters
    }

    pub const fn len_parameter_count(&self) -> usize {
        self.parameters.len() - self.kind_parameters
    }

    pub fn kind_type_parameter(&self, n: usize) -> Option<&'a TypeParameter<'a>> {
        self.parameters[..self.kind_parameters].get(n)
    }

    pub fn len_type_parameter(&self, n: usize) -> Option<&'a TypeParameter<'a>> {
        self.parameters[self.kind_parameters..].get(n)
    }

    /// The procedure flagged as initializer.
    pub fn initializer_procedure(&self) -> Option<&'a TypeBoundProcedure<'a>> {
        self.init_procedure.and_then(|j| self.procedures.get(j))
    }

    pub const fn is_sequence(&self) -> bool {
        self.flags.contains(TypeFlags::SEQUENCE)
    }

    pub const fn is_bind_c(&self) -> bool {
        self.flags.contains(TypeFlags::BIND_C)
    }

    pub const fn is_finalizable(&self) -> bool {
        self.flags.contains(TypeFlags::FINALIZABLE)
    }

    pub const fn is_init_zero(&self) -> bool {
        self.flags.contains(TypeFlags::INIT_ZERO)
    }

    pub const fn is_init_component(&self) -> bool {
        self.flags.contains(TypeFlags::INIT_COMPONENT)
    }

    /// Default initialization changes at least one byte.
    pub const fn is_initializable(&self) -> bool {
        self.initializer.is_some()
            || self.init_procedure.is_some()
            || self
                .flags
                .intersects(TypeFlags::INIT_ZERO.union(TypeFlags::INIT_COMPONENT))
    }

    /// Default initialization is exactly a zero fill.
    pub const fn is_zero_only(&self) -> bool {
        self.is_init_zero() && !self.is_init_component()
    }

    /// Component 0 is the synthesized parent field.
    pub const fn is_extension(&self) -> bool {
        match self.components.first() {
            Some(first) => first.is_parent(),
            None => false,
        }
    }

    /// Type extended by this one.
    ///
    /// Present exactly when component 0 is a parent field whose static
    /// descriptor names a type.
    pub const fn base_type(&self) -> Option<&'a DerivedType<'a>> {
        self.base
    }

    /// Base types, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a DerivedType<'a>> + 'a {
        iter::successors(self.base, |ty| ty.base_type())
    }

    pub fn any_private(&self) -> bool {
        self.components.iter().any(Component::is_private)
    }

    /// Largest component alignment, at least 1.
    pub fn alignment(&self) -> usize {
        self.components
            .iter()
            .map(Component::storage_align)
            .max()
            .unwrap_or(1)
    }

    /// Same type, ignoring type parameter values.
    ///
    /// Instantiations of one parameterized type are separate tables; they
    /// share the name, the parameter names, and the component names.
    ///
    /// The comparison is structural, not an identity check: distinct types
    /// that agree on all of those names (say, declared in different scopes)
    /// compare equal here, and [`extends`](Self::extends) inherits that.
    pub fn same_type_as(&self, other: &DerivedType<'_>) -> bool {
        if std::ptr::addr_eq(self, other) {
            return true;
        }
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters)
                .all(|(a, b)| a.name == b.name)
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(other.components)
                .all(|(a, b)| a.name == b.name)
    }

    /// Same type with equal KIND parameter values.
    pub fn type_is(&self, other: &DerivedType<'_>) -> bool {
        self.same_type_as(other)
            && self.parameters[..self.kind_parameters]
                .iter()
                .zip(&other.parameters[..other.kind_parameters])
                .all(|(a, b)| a.value == b.value)
    }

    /// `ancestor` is this type or appears in its chain of base types.
    pub fn extends(&self, ancestor: &DerivedType<'_>) -> bool {
        iter::successors(Some(self), |ty| ty.base_type()).any(|ty| ty.same_type_as(ancestor))
    }
}

impl fmt::Debug for DerivedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedType")
            .field("name", &self.name)
            .field("bytes", &self.bytes)
            .field("flags", &self.flags)
            .field("parameters", &self.parameters.len())
            .field("components", &self.components.len())
            .field("procedures", &self.procedures.len())
            .field("base", &self.base.map(|b| b.name))
            .finish()
    }
}
