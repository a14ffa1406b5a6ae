//! STAT codes and ERRMSG reporting for allocation statements.

use typeinfo_tables::Descriptor;

/// Processor-dependent STAT codes, disjoint from the standard's own.
pub mod code {
    pub const OK: i32 = 0;
    pub const GENERIC_ERROR: i32 = 1;
    pub const ALLOCATABLE_ALREADY_ALLOCATED: i32 = 101;
    pub const LENGTH_TYPE_PARAMETER_MISMATCH: i32 = 102;
    pub const ALLOCATABLE_NOT_ALLOCATED: i32 = 103;
    pub const BOUNDS_MISMATCH: i32 = 104;
    pub const OUT_OF_MEMORY: i32 = 105;
    pub const NOT_ALLOCATABLE: i32 = 106;
}

/// A failed allocation statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("generic error")]
    Generic,
    #[error("Object in ALLOCATE statement is already allocated")]
    AlreadyAllocated,
    #[error("Explicit length type parameter value mismatch")]
    LengthTypeParameterMismatch,
    #[error("Object in DEALLOCATE statement is not allocated")]
    NotAllocated,
    #[error("Bounds do not match rank {rank} (lower {lower}, upper {upper})")]
    RankMismatch {
        rank: usize,
        lower: usize,
        upper: usize,
    },
    #[error("Memory allocation failed")]
    OutOfMemory,
    #[error("Object is not allocatable")]
    NotAllocatable,
}

impl StatError {
    pub fn code(&self) -> i32 {
        match self {
            Self::Generic => code::GENERIC_ERROR,
            Self::AlreadyAllocated => code::ALLOCATABLE_ALREADY_ALLOCATED,
            Self::LengthTypeParameterMismatch => code::LENGTH_TYPE_PARAMETER_MISMATCH,
            Self::NotAllocated => code::ALLOCATABLE_NOT_ALLOCATED,
            Self::RankMismatch { .. } => code::BOUNDS_MISMATCH,
            Self::OutOfMemory => code::OUT_OF_MEMORY,
            Self::NotAllocatable => code::NOT_ALLOCATABLE,
        }
    }
}

/// Report `error` through an optional ERRMSG variable and return its STAT code.
///
/// The message is truncated or blank-padded to the variable's length. An
/// ERRMSG that is absent, unallocated, or not default CHARACTER is left alone.
///
/// # Safety
///
/// When `errmsg` is allocated, its storage must be writable for `elem_len`
/// bytes.
pub unsafe fn stat_and_errmsg(errmsg: Option<&mut Descriptor<'_>>, error: &StatError) -> i32 {
    if let Some(desc) = errmsg
        && desc.is_allocated()
    {
        if !desc.type_code.is_character() || desc.type_code.kind != 1 {
            log::debug!("ERRMSG of type {} left unchanged", desc.type_code);
        } else {
            let message = error.to_string();
            // SAFETY: the caller guarantees `elem_len` writable bytes.
            let lhs = unsafe { std::slice::from_raw_parts_mut(desc.base_addr, desc.elem_len) };
            let copied = message.len().min(lhs.len());
            lhs[..copied].copy_from_slice(&message.as_bytes()[..copied]);
            lhs[copied..].fill(b' ');
        }
    }
    error.code()
}

/// STAT value of a possibly failed statement, reporting failures via ERRMSG.
///
/// # Safety
///
/// As for [`stat_and_errmsg`].
pub unsafe fn stat_of(result: Result<(), StatError>, errmsg: Option<&mut Descriptor<'_>>) -> i32 {
    match result {
        Ok(()) => code::OK,
        // SAFETY: forwarded contract.
        Err(error) => unsafe { stat_and_errmsg(errmsg, &error) },
    }
}
