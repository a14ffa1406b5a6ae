//! Tracing of lifecycle operations.
//!
//! The engine is generic over [`Tracer`]. With [`NoopTracer`] every hook is an
//! empty `#[inline(always)]` method and compiles away. [`PrintTracer`]
//! collects one line per event for tests and debugging.

use typeinfo_core::Colors;
use typeinfo_tables::{Component, DerivedType, TypeBoundProcedure};

/// Which rule produced an instance's default value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    /// Flat default image copied.
    Image,
    /// Initializer procedure called.
    Procedure,
    /// Instance zero-filled.
    ZeroFill,
    /// Component types initialized one by one.
    Components,
}

impl InitStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Procedure => "procedure",
            Self::ZeroFill => "zero-fill",
            Self::Components => "components",
        }
    }
}

/// Hooks called by [`Lifecycle`](super::Lifecycle) at each step.
///
/// - `trace_initialize` - for each initialization step taken
/// - `trace_finalize` - before calling a FINAL subroutine
/// - `trace_destroy_components` - before tearing down non-parent components
/// - `trace_release` - before deallocating a descriptor component
/// - `trace_enter_parent` - before continuing with the parent type
pub trait Tracer {
    fn trace_initialize(&mut self, ty: &DerivedType<'_>, step: InitStep);

    fn trace_finalize(&mut self, ty: &DerivedType<'_>, procedure: &TypeBoundProcedure<'_>);

    fn trace_destroy_components(&mut self, ty: &DerivedType<'_>);

    fn trace_release(&mut self, ty: &DerivedType<'_>, component: &Component<'_>);

    fn trace_enter_parent(&mut self, ty: &DerivedType<'_>, parent: &DerivedType<'_>);
}

/// Tracer that gets optimized away completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_initialize(&mut self, _ty: &DerivedType<'_>, _step: InitStep) {}

    #[inline(always)]
    fn trace_finalize(&mut self, _ty: &DerivedType<'_>, _procedure: &TypeBoundProcedure<'_>) {}

    #[inline(always)]
    fn trace_destroy_components(&mut self, _ty: &DerivedType<'_>) {}

    #[inline(always)]
    fn trace_release(&mut self, _ty: &DerivedType<'_>, _component: &Component<'_>) {}

    #[inline(always)]
    fn trace_enter_parent(&mut self, _ty: &DerivedType<'_>, _parent: &DerivedType<'_>) {}
}

/// Tracer that records one line per event.
#[derive(Debug, Default)]
pub struct PrintTracer {
    colors: Colors,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(colors: Colors) -> Self {
        Self {
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

impl Tracer for PrintTracer {
    fn trace_initialize(&mut self, ty: &DerivedType<'_>, step: InitStep) {
        let c = self.colors;
        self.push(format!("init {}: {}", c.name(ty.name()), step.label()));
    }

    fn trace_finalize(&mut self, ty: &DerivedType<'_>, procedure: &TypeBoundProcedure<'_>) {
        let c = self.colors;
        self.push(format!("final {}: {}", c.name(ty.name()), procedure.name));
    }

    fn trace_destroy_components(&mut self, ty: &DerivedType<'_>) {
        let c = self.colors;
        self.push(format!("destroy {}", c.name(ty.name())));
    }

    fn trace_release(&mut self, ty: &DerivedType<'_>, component: &Component<'_>) {
        let c = self.colors;
        self.push(format!("release {}%{}", c.name(ty.name()), component.name));
    }

    fn trace_enter_parent(&mut self, ty: &DerivedType<'_>, parent: &DerivedType<'_>) {
        let c = self.colors;
        self.push(format!(
            "parent {} -> {}",
            c.name(ty.name()),
            c.name(parent.name())
        ));
    }
}
