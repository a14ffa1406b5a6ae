//! Intrinsic type codes.
//!
//! A [`TypeCode`] identifies the category and kind of a component or type
//! parameter. Derived-type components carry [`TypeCategory::Derived`] and find
//! their actual type through a static descriptor instead.

use std::fmt;

/// Category of a type code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeCategory {
    #[default]
    Other = 0,
    Integer = 1,
    Real = 2,
    Complex = 3,
    Character = 4,
    Logical = 5,
    Derived = 6,
}

impl TypeCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Other => "OTHER",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Complex => "COMPLEX",
            Self::Character => "CHARACTER",
            Self::Logical => "LOGICAL",
            Self::Derived => "TYPE",
        }
    }

    pub fn is_intrinsic(self) -> bool {
        !matches!(self, Self::Other | Self::Derived)
    }
}

/// Category plus kind.
///
/// For character data the kind is the byte width of one character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct TypeCode {
    pub category: TypeCategory,
    pub kind: u8,
}

const _: () = assert!(std::mem::size_of::<TypeCode>() == 2);

impl TypeCode {
    pub const OTHER: Self = Self::new(TypeCategory::Other, 0);
    pub const DERIVED: Self = Self::new(TypeCategory::Derived, 0);

    pub const fn new(category: TypeCategory, kind: u8) -> Self {
        Self { category, kind }
    }

    pub const fn integer(kind: u8) -> Self {
        Self::new(TypeCategory::Integer, kind)
    }

    pub const fn real(kind: u8) -> Self {
        Self::new(TypeCategory::Real, kind)
    }

    pub const fn complex(kind: u8) -> Self {
        Self::new(TypeCategory::Complex, kind)
    }

    pub const fn character(kind: u8) -> Self {
        Self::new(TypeCategory::Character, kind)
    }

    pub const fn logical(kind: u8) -> Self {
        Self::new(TypeCategory::Logical, kind)
    }

    pub const fn is_derived(&self) -> bool {
        matches!(self.category, TypeCategory::Derived)
    }

    pub const fn is_character(&self) -> bool {
        matches!(self.category, TypeCategory::Character)
    }

    /// Bytes of one element, or `None` when the code alone does not know.
    ///
    /// Character elements report the width of a single character.
    pub const fn element_bytes(&self) -> Option<usize> {
        let kind = self.kind as usize;
        match self.category {
            TypeCategory::Integer
            | TypeCategory::Real
            | TypeCategory::Logical
            | TypeCategory::Character => Some(kind),
            TypeCategory::Complex => Some(2 * kind),
            TypeCategory::Other | TypeCategory::Derived => None,
        }
    }

    /// Required alignment of one element.
    pub const fn alignment(&self) -> usize {
        let kind = self.kind as usize;
        match self.category {
            TypeCategory::Character | TypeCategory::Other | TypeCategory::Derived => 1,
            _ if kind.is_power_of_two() => kind,
            _ => 1,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_intrinsic() {
            write!(f, "{}({})", self.category.name(), self.kind)
        } else {
            f.write_str(self.category.name())
        }
    }
}
