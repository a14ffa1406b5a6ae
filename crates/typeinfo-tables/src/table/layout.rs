//! One-time validation of a type table against its declared instance size.
//!
//! Offsets are trusted at every access; this is the place they are checked.

use super::binding::TypeBoundProcedure;
use super::component::Component;
use super::derived::DerivedType;
use super::descriptor::MAX_LEN_PARAMETERS;
use super::param::TypeParameter;

/// A table that disagrees with its own declared layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("type '{ty}': default image has {actual} bytes, instance has {expected}")]
    InitializerSize {
        ty: String,
        expected: usize,
        actual: usize,
    },
    #[error("type '{ty}': component '{component}' at {offset}+{size} exceeds {bytes} bytes")]
    ComponentOutOfBounds {
        ty: String,
        component: String,
        offset: usize,
        size: usize,
        bytes: usize,
    },
    #[error("type '{ty}': component '{component}' at {offset} is not {align}-byte aligned")]
    Misaligned {
        ty: String,
        component: String,
        offset: usize,
        align: usize,
    },
    #[error("type '{ty}': KIND parameter '{parameter}' follows a LEN parameter")]
    KindAfterLen { ty: String, parameter: String },
    #[error(
        "type '{ty}': LEN parameter '{parameter}' uses slot {which} (maximum {MAX_LEN_PARAMETERS})"
    )]
    LenIndexOutOfRange {
        ty: String,
        parameter: String,
        which: usize,
    },
    #[error("type '{ty}': {count} procedures are flagged initializer")]
    MultipleInitializers { ty: String, count: usize },
    #[error("type '{ty}': parent component '{component}' is not component 0")]
    ParentNotFirst { ty: String, component: String },
    #[error("type '{ty}': parent component '{component}' does not name a type")]
    UnresolvedParent { ty: String, component: String },
    #[error("type '{ty}': descriptor component '{component}' also has a static descriptor")]
    DescriptorWithStaticDescriptor { ty: String, component: String },
}

impl<'a> DerivedType<'a> {
    /// Construct and validate in one step.
    pub fn try_new(
        name: &'a str,
        parameters: &'a [TypeParameter<'a>],
        components: &'a [Component<'a>],
        procedures: &'a [TypeBoundProcedure<'a>],
        initializer: Option<&'a [u8]>,
        bytes: usize,
    ) -> Result<Self, LayoutError> {
        let ty = Self::new(name, parameters, components, procedures, initializer, bytes);
        ty.check_layout()?;
        Ok(ty)
    }

    /// Check the table against its instance size.
    ///
    /// Reports the first problem found.
    pub fn check_layout(&self) -> Result<(), LayoutError> {
        let result = self.check_layout_inner();
        if let Err(err) = &result {
            log::debug!("layout check failed: {err}");
        }
        result
    }

    fn check_layout_inner(&self) -> Result<(), LayoutError> {
        let ty = || self.name().to_owned();
        let bytes = self.size_in_bytes();

        if let Some(image) = self.initializer()
            && image.len() != bytes
        {
            return Err(LayoutError::InitializerSize {
                ty: ty(),
                expected: bytes,
                actual: image.len(),
            });
        }

        for param in &self.parameters()[self.kind_parameter_count()..] {
            if param.is_kind() {
                return Err(LayoutError::KindAfterLen {
                    ty: ty(),
                    parameter: param.name.to_owned(),
                });
            }
            if let Some(which) = param.len_index()
                && which >= MAX_LEN_PARAMETERS
            {
                return Err(LayoutError::LenIndexOutOfRange {
                    ty: ty(),
                    parameter: param.name.to_owned(),
                    which,
                });
            }
        }

        let count = self
            .procedures()
            .iter()
            .filter(|tbp| tbp.is_initializer())
            .count();
        if count > 1 {
            return Err(LayoutError::MultipleInitializers { ty: ty(), count });
        }

        for (j, component) in self.components().iter().enumerate() {
            let name = || component.name.to_owned();
            if component.is_parent() {
                if j != 0 {
                    return Err(LayoutError::ParentNotFirst {
                        ty: ty(),
                        component: name(),
                    });
                }
                if component.nested_type().is_none() {
                    return Err(LayoutError::UnresolvedParent {
                        ty: ty(),
                        component: name(),
                    });
                }
            }
            if component.is_descriptor() && component.static_descriptor().is_some() {
                return Err(LayoutError::DescriptorWithStaticDescriptor {
                    ty: ty(),
                    component: name(),
                });
            }

            let size = component.storage_bytes().unwrap_or(0);
            let end = component.offset.checked_add(size);
            if end.is_none_or(|end| end > bytes) {
                return Err(LayoutError::ComponentOutOfBounds {
                    ty: ty(),
                    component: name(),
                    offset: component.offset,
                    size,
                    bytes,
                });
            }
            let align = component.storage_align();
            if !component.offset.is_multiple_of(align) {
                return Err(LayoutError::Misaligned {
                    ty: ty(),
                    component: name(),
                    offset: component.offset,
                    align,
                });
            }
        }

        Ok(())
    }
}
