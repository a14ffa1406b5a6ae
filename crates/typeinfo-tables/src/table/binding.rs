//! Type-bound procedures and their resolved entry points.

use std::fmt;

use bitflags::bitflags;

/// Uniform signature of every table entry point: instance (or descriptor)
/// address in, nothing out.
pub type ProcEntry = unsafe extern "C" fn(*mut u8);

/// Where a procedure is about to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionContext {
    #[default]
    Host,
    Device,
}

/// Entry points of one procedure, one per execution context.
#[derive(Clone, Copy, Default)]
#[repr(C)]
pub struct ExecutableCode {
    pub host: Option<ProcEntry>,
    pub device: Option<ProcEntry>,
}

impl ExecutableCode {
    /// No entry point in any context.
    pub const NONE: Self = Self {
        host: None,
        device: None,
    };

    pub const fn host(entry: ProcEntry) -> Self {
        Self {
            host: Some(entry),
            device: None,
        }
    }

    pub const fn with_device(mut self, entry: ProcEntry) -> Self {
        self.device = Some(entry);
        self
    }

    pub const fn entry(&self, context: ExecutionContext) -> Option<ProcEntry> {
        match context {
            ExecutionContext::Host => self.host,
            ExecutionContext::Device => self.device,
        }
    }
}

impl fmt::Debug for ExecutableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableCode")
            .field("host", &self.host.is_some())
            .field("device", &self.device.is_some())
            .finish()
    }
}

bitflags! {
    /// Dispatch role of a type-bound procedure.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ProcFlags: u32 {
        const INITIALIZER = 1;
        const ELEMENTAL = 1 << 1;
        const ASSIGNMENT = 1 << 2;
        const ASSUMED_RANK_FINAL = 1 << 3;
    }
}

/// One procedure bound to a derived type.
///
/// `final_rank` has bit `r` set when the procedure is a FINAL subroutine for
/// rank `r`. Elemental finalizers receive the address of one scalar element;
/// rank-specific finalizers receive the address of the whole descriptor.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct TypeBoundProcedure<'a> {
    pub name: &'a str,
    pub flags: ProcFlags,
    pub final_rank: u32,
    pub code: ExecutableCode,
}

impl<'a> TypeBoundProcedure<'a> {
    pub const fn new(
        name: &'a str,
        flags: ProcFlags,
        final_rank: u32,
        code: ExecutableCode,
    ) -> Self {
        Self {
            name,
            flags,
            final_rank,
            code,
        }
    }

    /// Default-initialization procedure.
    pub const fn initializer(name: &'a str, entry: ProcEntry) -> Self {
        Self::new(name, ProcFlags::INITIALIZER, 0, ExecutableCode::host(entry))
    }

    /// Elemental FINAL subroutine, called once per scalar element.
    pub const fn elemental_final(name: &'a str, entry: ProcEntry) -> Self {
        Self::new(name, ProcFlags::ELEMENTAL, 1, ExecutableCode::host(entry))
    }

    /// FINAL subroutine for the ranks set in `final_rank`.
    pub const fn final_for_ranks(name: &'a str, final_rank: u32, entry: ProcEntry) -> Self {
        Self::new(name, ProcFlags::empty(), final_rank, ExecutableCode::host(entry))
    }

    /// FINAL subroutine with an assumed-rank dummy argument.
    pub const fn assumed_rank_final(name: &'a str, entry: ProcEntry) -> Self {
        Self::new(
            name,
            ProcFlags::ASSUMED_RANK_FINAL,
            0,
            ExecutableCode::host(entry),
        )
    }

    /// Defined assignment.
    pub const fn assignment(name: &'a str, entry: ProcEntry) -> Self {
        Self::new(name, ProcFlags::ASSIGNMENT, 0, ExecutableCode::host(entry))
    }

    /// Plain binding with no runtime role.
    pub const fn binding(name: &'a str, code: ExecutableCode) -> Self {
        Self::new(name, ProcFlags::empty(), 0, code)
    }

    pub const fn is_initializer(&self) -> bool {
        self.flags.contains(ProcFlags::INITIALIZER)
    }

    pub const fn is_elemental(&self) -> bool {
        self.flags.contains(ProcFlags::ELEMENTAL)
    }

    pub const fn is_assignment(&self) -> bool {
        self.flags.contains(ProcFlags::ASSIGNMENT)
    }

    pub const fn is_assumed_rank_final(&self) -> bool {
        self.flags.contains(ProcFlags::ASSUMED_RANK_FINAL)
    }

    /// True when this procedure finalizes at least one rank.
    pub const fn is_finalizer(&self) -> bool {
        self.final_rank != 0 || self.is_assumed_rank_final()
    }

    /// Ranks of 32 and above only match an assumed-rank finalizer.
    pub const fn is_final_for_rank(&self, rank: u32) -> bool {
        if self.is_assumed_rank_final() {
            return true;
        }
        match self.final_rank.checked_shr(rank) {
            Some(bits) => bits & 1 != 0,
            None => false,
        }
    }

    /// Elemental with bit 0 of the rank mask set: runs on one scalar element.
    pub const fn is_elemental_scalar_final(&self) -> bool {
        self.is_elemental() && self.final_rank & 1 != 0
    }
}
