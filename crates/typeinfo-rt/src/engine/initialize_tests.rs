use typeinfo_core::{Colors, TypeCode};
use typeinfo_tables::{
    Component, Descriptor, DerivedType, ExecutableCode, ExecutionContext, InstanceBuf, ProcFlags,
    TypeBoundProcedure,
};

use super::lifecycle::Lifecycle;
use super::ops::InstanceOps;
use super::trace::PrintTracer;
use crate::test_utils::{record, take_call_names, take_calls};

const DESC: usize = size_of::<Descriptor<'static>>();
const FILL: u8 = 0xA5;

unsafe extern "C" fn init_counter(instance: *mut u8) {
    record("init_counter", instance);
    unsafe { instance.cast::<i64>().write(42) };
}

unsafe extern "C" fn init_counter_device(instance: *mut u8) {
    record("init_counter_device", instance);
    unsafe { instance.cast::<i64>().write(-1) };
}

static PLAIN_COMPONENTS: [Component<'static>; 2] = [
    Component::new("i", TypeCode::integer(4), 0),
    Component::new("x", TypeCode::real(4), 4),
];
static PLAIN: DerivedType<'static> =
    DerivedType::new("plain", &[], &PLAIN_COMPONENTS, &[], None, 8);
static PLAIN_DESC: Descriptor<'static> = Descriptor::static_derived(&PLAIN);

static IMAGE: [u8; 8 + DESC] = [7; 8 + DESC];
static IMAGED_COMPONENTS: [Component<'static>; 2] = [
    Component::new("n", TypeCode::integer(8), 0),
    Component::descriptor("a", TypeCode::real(8), 8),
];
static IMAGED: DerivedType<'static> =
    DerivedType::new("imaged", &[], &IMAGED_COMPONENTS, &[], Some(&IMAGE), 8 + DESC);

static COUNTER_PROCS: [TypeBoundProcedure<'static>; 1] = [TypeBoundProcedure::new(
    "init",
    ProcFlags::INITIALIZER,
    0,
    ExecutableCode::host(init_counter).with_device(init_counter_device),
)];
static COUNTER_COMPONENTS: [Component<'static>; 3] = [
    Component::new("count", TypeCode::integer(8), 0),
    Component::descriptor("history", TypeCode::integer(8), 8),
    Component::derived("p", &PLAIN_DESC, 8 + DESC),
];
static COUNTER: DerivedType<'static> =
    DerivedType::new("counter", &[], &COUNTER_COMPONENTS, &COUNTER_PROCS, None, 16 + DESC);
static COUNTER_DESC: Descriptor<'static> = Descriptor::static_derived(&COUNTER);
static COUNTER_PAIR_DESC: Descriptor<'static> =
    Descriptor::static_derived_array(&COUNTER, &[2]);

static HOLDER_COMPONENTS: [Component<'static>; 2] = [
    Component::new("id", TypeCode::integer(4), 0),
    Component::descriptor("data", TypeCode::real(8), 8),
];
static HOLDER: DerivedType<'static> =
    DerivedType::new("holder", &[], &HOLDER_COMPONENTS, &[], None, 8 + DESC);
static HOLDER_DESC: Descriptor<'static> = Descriptor::static_derived(&HOLDER);

// counter components need real work; plain stays untouched.
static OUTER_COMPONENTS: [Component<'static>; 3] = [
    Component::derived("c", &COUNTER_DESC, 0),
    Component::derived("pair", &COUNTER_PAIR_DESC, 16 + DESC),
    Component::derived("p", &PLAIN_DESC, 3 * (16 + DESC)),
];
static OUTER: DerivedType<'static> =
    DerivedType::new("outer", &[], &OUTER_COMPONENTS, &[], None, 3 * (16 + DESC) + 8);

// holder only needs zeroing, counter needs its procedure.
static WRAPPER_COMPONENTS: [Component<'static>; 2] = [
    Component::derived("h", &HOLDER_DESC, 0),
    Component::derived("c", &COUNTER_DESC, 8 + DESC),
];
static WRAPPER: DerivedType<'static> =
    DerivedType::new("wrapper", &[], &WRAPPER_COMPONENTS, &[], None, 24 + 2 * DESC);

#[test]
fn tables_are_consistent() {
    for ty in [&PLAIN, &IMAGED, &COUNTER, &HOLDER, &OUTER, &WRAPPER] {
        assert_eq!(ty.check_layout(), Ok(()), "{}", ty.name());
    }
    assert!(OUTER.is_init_component());
    assert!(!OUTER.is_init_zero());
}

#[test]
fn image_is_copied_verbatim() {
    let mut buf = InstanceBuf::filled(IMAGED.size_in_bytes(), FILL);
    unsafe { IMAGED.initialize(buf.as_mut_ptr()) };

    assert_eq!(buf.as_slice(), &IMAGE[..]);
}

#[test]
fn plain_type_leaves_buffer_unchanged() {
    let mut buf = InstanceBuf::filled(PLAIN.size_in_bytes(), FILL);
    let mut lifecycle = Lifecycle::builder()
        .tracer(PrintTracer::new(Colors::OFF))
        .build();
    unsafe { lifecycle.initialize(&PLAIN, buf.as_mut_ptr()) };

    assert!(buf.iter().all(|&b| b == FILL));
    assert!(lifecycle.tracer().lines().is_empty());
}

#[test]
fn descriptor_component_zero_fills() {
    let mut buf = InstanceBuf::filled(HOLDER.size_in_bytes(), FILL);
    unsafe { HOLDER.initialize(buf.as_mut_ptr()) };

    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn initializer_procedure_only() {
    let mut buf = InstanceBuf::filled(COUNTER.size_in_bytes(), FILL);
    let base = buf.as_mut_ptr() as usize;
    let mut lifecycle = Lifecycle::builder()
        .tracer(PrintTracer::new(Colors::OFF))
        .build();
    unsafe { lifecycle.initialize(&COUNTER, buf.as_mut_ptr()) };

    assert_eq!(take_calls(), [("init_counter", base)]);
    assert_eq!(buf.read::<i64>(0), 42);
    assert!(buf[8..].iter().all(|&b| b == FILL));
    assert_eq!(lifecycle.into_tracer().into_lines(), ["init counter: procedure"]);
}

#[test]
fn device_context_selects_device_entry() {
    let mut buf = InstanceBuf::zeroed(COUNTER.size_in_bytes());
    let mut lifecycle = Lifecycle::builder()
        .context(ExecutionContext::Device)
        .build();
    unsafe { lifecycle.initialize(&COUNTER, buf.as_mut_ptr()) };

    assert_eq!(take_call_names(), ["init_counter_device"]);
    assert_eq!(buf.read::<i64>(0), -1);
}

#[test]
fn missing_context_entry_falls_through() {
    static PROCS: [TypeBoundProcedure<'static>; 1] =
        [TypeBoundProcedure::initializer("init", init_counter)];
    static COMPONENTS: [Component<'static>; 1] = [Component::new("n", TypeCode::integer(8), 0)];
    static HOST_ONLY: DerivedType<'static> =
        DerivedType::new("host_only", &[], &COMPONENTS, &PROCS, None, 8);

    let mut buf = InstanceBuf::filled(8, FILL);
    let mut lifecycle = Lifecycle::builder()
        .context(ExecutionContext::Device)
        .build();
    unsafe { lifecycle.initialize(&HOST_ONLY, buf.as_mut_ptr()) };

    assert!(take_calls().is_empty());
    assert!(buf.iter().all(|&b| b == FILL));
}

#[test]
fn components_initialized_recursively() {
    let mut buf = InstanceBuf::filled(OUTER.size_in_bytes(), FILL);
    let base = buf.as_mut_ptr() as usize;
    let stride = COUNTER.size_in_bytes();
    let mut lifecycle = Lifecycle::builder()
        .tracer(PrintTracer::new(Colors::OFF))
        .build();
    unsafe { lifecycle.initialize(&OUTER, buf.as_mut_ptr()) };

    assert_eq!(
        take_calls(),
        [
            ("init_counter", base),
            ("init_counter", base + stride),
            ("init_counter", base + 2 * stride),
        ]
    );
    for j in 0..3 {
        assert_eq!(buf.read::<i64>(j * stride), 42);
    }

    let plain_at = 3 * stride;
    assert!(buf[plain_at..].iter().all(|&b| b == FILL));

    insta::assert_snapshot!(lifecycle.tracer().lines().join("\n"), @r"
    init outer: components
    init counter: procedure
    init counter: procedure
    init counter: procedure
    ");
}

#[test]
fn zero_fill_then_components() {
    let mut buf = InstanceBuf::filled(WRAPPER.size_in_bytes(), FILL);
    let counter_at = 8 + DESC;
    let mut lifecycle = Lifecycle::builder()
        .tracer(PrintTracer::new(Colors::OFF))
        .build();
    unsafe { lifecycle.initialize(&WRAPPER, buf.as_mut_ptr()) };

    assert!(WRAPPER.is_init_zero());
    assert!(WRAPPER.is_init_component());
    assert!(buf[..counter_at].iter().all(|&b| b == 0));
    assert_eq!(buf.read::<i64>(counter_at), 42);
    assert!(buf[counter_at + 8..].iter().all(|&b| b == 0));
    assert_eq!(take_call_names(), ["init_counter"]);

    insta::assert_snapshot!(lifecycle.tracer().lines().join("\n"), @r"
    init wrapper: zero-fill
    init wrapper: components
    init holder: zero-fill
    init counter: procedure
    ");
}
