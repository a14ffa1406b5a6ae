use typeinfo_core::TypeCode;
use typeinfo_tables::{Attribute, Descriptor};

use crate::stat::{StatError, code, stat_and_errmsg, stat_of};

fn errmsg(storage: &mut [u8]) -> Descriptor<'static> {
    let mut desc = Descriptor::zeroed();
    desc.establish_intrinsic(
        TypeCode::character(1),
        storage.len(),
        storage.as_mut_ptr(),
        &[],
        Attribute::Other,
    );
    desc
}

#[test]
fn codes() {
    let errors = [
        StatError::Generic,
        StatError::AlreadyAllocated,
        StatError::LengthTypeParameterMismatch,
        StatError::NotAllocated,
        StatError::RankMismatch {
            rank: 1,
            lower: 0,
            upper: 0,
        },
        StatError::OutOfMemory,
        StatError::NotAllocatable,
    ];
    let codes: Vec<i32> = errors.iter().map(StatError::code).collect();

    assert_eq!(codes, [1, 101, 102, 103, 104, 105, 106]);
}

#[test]
fn message_is_blank_padded() {
    let mut storage = [b'#'; 64];
    let mut desc = errmsg(&mut storage);
    let stat = unsafe { stat_and_errmsg(Some(&mut desc), &StatError::AlreadyAllocated) };

    assert_eq!(stat, code::ALLOCATABLE_ALREADY_ALLOCATED);
    insta::assert_snapshot!(
        String::from_utf8_lossy(&storage).trim_end(),
        @"Object in ALLOCATE statement is already allocated"
    );
    assert!(storage[49..].iter().all(|&b| b == b' '));
}

#[test]
fn message_is_truncated() {
    let mut storage = [0u8; 6];
    let mut desc = errmsg(&mut storage);
    unsafe { stat_and_errmsg(Some(&mut desc), &StatError::Generic) };

    assert_eq!(&storage, b"generi");
}

#[test]
fn absent_or_unallocated_errmsg() {
    assert_eq!(unsafe { stat_and_errmsg(None, &StatError::OutOfMemory) }, 105);

    let mut unallocated = Descriptor::zeroed();
    assert_eq!(
        unsafe { stat_and_errmsg(Some(&mut unallocated), &StatError::NotAllocated) },
        103
    );
}

#[test]
fn non_character_errmsg_untouched() {
    let mut storage = [0u8; 8];
    let mut desc = Descriptor::zeroed();
    desc.establish_intrinsic(TypeCode::integer(8), 8, storage.as_mut_ptr(), &[], Attribute::Other);
    unsafe { stat_and_errmsg(Some(&mut desc), &StatError::Generic) };

    assert_eq!(storage, [0; 8]);
}

#[test]
fn stat_of_result() {
    assert_eq!(unsafe { stat_of(Ok(()), None) }, 0);
    assert_eq!(unsafe { stat_of(Err(StatError::NotAllocatable), None) }, 106);
}

#[test]
fn rank_mismatch_message() {
    let err = StatError::RankMismatch {
        rank: 2,
        lower: 1,
        upper: 2,
    };
    insta::assert_snapshot!(err, @"Bounds do not match rank 2 (lower 1, upper 2)");
}
