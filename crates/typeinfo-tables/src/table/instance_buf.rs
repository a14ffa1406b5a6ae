//! Aligned storage for one or more instances of a derived type.
//!
//! Instances are addressed through raw byte offsets, and component offsets
//! assume the instance starts at an aligned address. `Vec<u8>` makes no
//! such promise.

use std::fmt;
use std::ops::{Deref, DerefMut};

use super::derived::DerivedType;
use super::descriptor::ALLOCATION_ALIGN;

#[repr(C, align(16))]
#[derive(Clone, Copy)]
struct Block([u8; ALLOCATION_ALIGN]);

const _: () = assert!(align_of::<Block>() == ALLOCATION_ALIGN);

/// Owned byte buffer starting at an [`ALLOCATION_ALIGN`] boundary.
#[derive(Clone)]
pub struct InstanceBuf {
    blocks: Vec<Block>,
    len: usize,
}

impl InstanceBuf {
    /// Buffer of `len` bytes all equal to `byte`.
    pub fn filled(len: usize, byte: u8) -> Self {
        let num_blocks = len.div_ceil(ALLOCATION_ALIGN);
        Self {
            blocks: vec![Block([byte; ALLOCATION_ALIGN]); num_blocks],
            len,
        }
    }

    pub fn zeroed(len: usize) -> Self {
        Self::filled(len, 0)
    }

    /// Zeroed storage for `count` contiguous instances of `ty`.
    pub fn for_type(ty: &DerivedType<'_>, count: usize) -> Self {
        Self::zeroed(ty.size_in_bytes() * count)
    }

    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::zeroed(bytes.len());
        buf.as_mut_slice().copy_from_slice(bytes);
        buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: Block is repr(C) over bytes; `len` never exceeds the
        // block capacity and every byte was written at construction.
        unsafe { std::slice::from_raw_parts(self.blocks.as_ptr().cast::<u8>(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_slice`, with unique access through `&mut self`.
        unsafe { std::slice::from_raw_parts_mut(self.blocks.as_mut_ptr().cast::<u8>(), self.len) }
    }

    /// Base address for the raw lifecycle operations.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.blocks.as_mut_ptr().cast::<u8>()
    }

    /// Read a `T` stored at `offset`.
    ///
    /// Panics when the value does not fit inside the buffer.
    pub fn read<T: Copy>(&self, offset: usize) -> T {
        let bytes = &self.as_slice()[offset..offset + size_of::<T>()];
        // SAFETY: the slice covers `size_of::<T>()` initialized bytes.
        unsafe { bytes.as_ptr().cast::<T>().read_unaligned() }
    }

    /// Write a `T` at `offset`.
    ///
    /// Panics when the value does not fit inside the buffer.
    pub fn write<T: Copy>(&mut self, offset: usize, value: T) {
        let bytes = &mut self.as_mut_slice()[offset..offset + size_of::<T>()];
        // SAFETY: the slice covers `size_of::<T>()` writable bytes.
        unsafe { bytes.as_mut_ptr().cast::<T>().write_unaligned(value) }
    }
}

impl Deref for InstanceBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl DerefMut for InstanceBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for InstanceBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceBuf")
            .field("len", &self.len)
            .field(
                "aligned",
                &(self.blocks.as_ptr() as usize).is_multiple_of(ALLOCATION_ALIGN),
            )
            .finish()
    }
}
