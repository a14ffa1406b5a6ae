use typeinfo_core::{Colors, TypeCode};

use super::binding::{ExecutableCode, TypeBoundProcedure};
use super::component::Component;
use super::derived::DerivedType;
use super::descriptor::{Attribute, Descriptor};
use super::param::TypeParameter;

unsafe extern "C" fn nop(_: *mut u8) {}

static SHAPE_PARAMS: [TypeParameter<'static>; 2] = [
    TypeParameter::kind("k", TypeCode::integer(4), 8),
    TypeParameter::len("n", TypeCode::integer(8), 3, 0),
];
static SHAPE_COMPONENTS: [Component<'static>; 2] = [
    Component::new("id", TypeCode::integer(4), 0).private(),
    Component::descriptor("coords", TypeCode::real(8), 8),
];
static SHAPE_PROCS: [TypeBoundProcedure<'static>; 3] = [
    TypeBoundProcedure::assignment("assign", nop),
    TypeBoundProcedure::elemental_final("release", nop),
    TypeBoundProcedure::binding("area", ExecutableCode::NONE),
];
static SHAPE: DerivedType<'static> = DerivedType::new(
    "shape",
    &SHAPE_PARAMS,
    &SHAPE_COMPONENTS,
    &SHAPE_PROCS,
    None,
    512,
);
static SHAPE_DESC: Descriptor<'static> = Descriptor::static_derived(&SHAPE);

static POINT_COMPONENTS: [Component<'static>; 1] = [Component::new("x", TypeCode::real(4), 0)];
static POINT: DerivedType<'static> =
    DerivedType::new("point", &[], &POINT_COMPONENTS, &[], None, 4);
static POINT_ROW: Descriptor<'static> = Descriptor::static_derived_array(&POINT, &[2, 3]);

static POLYGON_COMPONENTS: [Component<'static>; 2] = [
    Component::parent("shape", &SHAPE_DESC),
    Component::derived("corners", &POINT_ROW, 512),
];
static POLYGON_PROCS: [TypeBoundProcedure<'static>; 2] = [
    TypeBoundProcedure::final_for_ranks("release_grid", 0b101, nop),
    TypeBoundProcedure::assumed_rank_final("release_any", nop),
];
static POLYGON: DerivedType<'static> = DerivedType::new(
    "polygon",
    &SHAPE_PARAMS,
    &POLYGON_COMPONENTS,
    &POLYGON_PROCS,
    None,
    544,
)
.set_sequence();

#[test]
fn dump_base_type() {
    insta::assert_snapshot!(SHAPE.dump(Colors::OFF), @r"
    type shape (512 bytes)
      flags finalizable, init-zero
      kind k = 8
      len n = 3 (slot 0)
      component id: INTEGER(4) @ 0 [private]
      component coords: REAL(8) @ 8 [descriptor]
      procedure assign: assignment
      procedure release: final(0), elemental
      procedure area: binding
    ");
}

#[test]
fn dump_extended_type() {
    let out = POLYGON.dump(Colors::OFF);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[1], "  extends shape");
    assert_eq!(lines[2], "  flags sequence, finalizable, init-zero");
    assert_eq!(lines[5], "  component shape: TYPE(shape) @ 0 [parent]");
    assert_eq!(lines[6], "  component corners: TYPE(point), dimension(2,3) @ 512");
    assert_eq!(lines[7], "  procedure release_grid: final(0,2)");
    assert_eq!(lines[8], "  procedure release_any: final(*)");
}

#[test]
fn dump_descriptor_with_len_values() {
    let mut desc = Descriptor::zeroed();
    desc.establish_derived(&POINT, std::ptr::null_mut(), &[5], Attribute::Allocatable);
    desc.addendum.derived_type = Some(&SHAPE);
    desc.set_len_parameter_value(0, 42);
    desc.set_do_not_finalize(true);

    insta::assert_snapshot!(desc.dump(Colors::OFF), @r"
    descriptor rank 1, elem_len 4, type TYPE, attribute allocatable
      base_addr null
      do not finalize
      dim[0] lower_bound 1, extent 5, byte_stride 4
      derived type shape
        kind k = 8
        len n = 42
    ");
}

#[test]
fn dump_intrinsic_descriptor() {
    let mut storage = [0u8; 8];
    let mut desc = Descriptor::zeroed();
    desc.establish_intrinsic(TypeCode::integer(2), 2, storage.as_mut_ptr(), &[], Attribute::Other);

    insta::assert_snapshot!(desc.dump(Colors::OFF), @r"
    descriptor rank 0, elem_len 2, type INTEGER(2), attribute other
      base_addr set
    ");
}

#[test]
fn colors_wrap_names_and_values() {
    let out = POINT.dump(Colors::ON);

    assert!(out.starts_with("type \x1b[34mpoint\x1b[0m (\x1b[32m4\x1b[0m bytes)"));
}
