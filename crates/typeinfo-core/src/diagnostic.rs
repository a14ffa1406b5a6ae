//! Fatal diagnostics for internally inconsistent type tables.
//!
//! Tables are produced by a code generator and trusted at runtime. When one of
//! the few structural checks fails, continuing would mean reading unrelated
//! memory as type metadata, so the check reports and never returns.

use std::fmt;

/// Source location of a fatal check.
///
/// Build one with [`terminator!`](crate::terminator) at the check site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminator {
    source_file: &'static str,
    source_line: u32,
}

impl Terminator {
    pub const fn new(source_file: &'static str, source_line: u32) -> Self {
        Self {
            source_file,
            source_line,
        }
    }

    pub fn source_file(&self) -> &'static str {
        self.source_file
    }

    pub fn source_line(&self) -> u32 {
        self.source_line
    }

    /// Report a fatal internal error and stop.
    ///
    /// The message is logged at error level and then raised as a panic.
    /// Release builds of the workspace abort on panic.
    #[cold]
    pub fn crash(&self, message: fmt::Arguments<'_>) -> ! {
        let report = format!(
            "fatal internal error: {message} at {}({})",
            self.source_file, self.source_line
        );
        log::error!("{report}");
        panic!("{report}");
    }

    /// Report a failed `runtime_check!` predicate.
    #[cold]
    pub fn check_failed(&self, predicate: &str) -> ! {
        self.crash(format_args!("RUNTIME_CHECK({predicate}) failed"))
    }
}

/// Capture the current source location as a [`Terminator`].
#[macro_export]
macro_rules! terminator {
    () => {
        $crate::Terminator::new(file!(), line!())
    };
}

/// Crash through a [`Terminator`] unless the predicate holds.
///
/// The predicate text is part of the report.
#[macro_export]
macro_rules! runtime_check {
    ($terminator:expr, $predicate:expr $(,)?) => {
        if !$predicate {
            $terminator.check_failed(stringify!($predicate));
        }
    };
}
