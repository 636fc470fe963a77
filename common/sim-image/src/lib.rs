// Licensed under the Apache-2.0 license
#![no_std]

//! Record layouts of the IAR Simple Code (`.sim`) container.
//!
//! A Simple Code file is a fixed header followed by records and a trailing
//! checksum:
//!
//! ```text
//! SimHeader | DataRecordHeader | payload | EndRecord | SimChecksum
//! ```
//!
//! All multi-byte fields are big-endian.

use core::mem::size_of;

use zerocopy::byteorder::{BigEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const SIM_MAGIC: [u8; 4] = [0x7f, b'I', b'A', b'R'];
pub const DATA_RECORD_TYPE: u8 = 0x01;
pub const DATA_RECORD_FLAGS: u8 = 0x01;
pub const END_RECORD_TYPE: u8 = 0x03;

pub const HEADER_SIZE: usize = size_of::<SimHeader>();
pub const DATA_RECORD_SIZE: usize = size_of::<DataRecordHeader>();
pub const END_RECORD_SIZE: usize = size_of::<EndRecord>();
pub const CHECKSUM_SIZE: usize = size_of::<SimChecksum>();

/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = HEADER_SIZE + DATA_RECORD_SIZE;

/// Bytes a file carries in addition to its payload.
pub const FRAMING_SIZE: usize = PAYLOAD_OFFSET + END_RECORD_SIZE + CHECKSUM_SIZE;

const _: () = assert!(HEADER_SIZE == 14);
const _: () = assert!(DATA_RECORD_SIZE == 12);
const _: () = assert!(END_RECORD_SIZE == 1);
const _: () = assert!(CHECKSUM_SIZE == 4);

/// Total length of a Simple Code file wrapping `payload_size` bytes.
pub const fn image_len(payload_size: u32) -> u64 {
    FRAMING_SIZE as u64 + payload_size as u64
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SimHeader {
    pub magic: [u8; 4],
    pub reserved: [u8; 4],
    pub payload_size: U32<BigEndian>,
    pub reserved_tail: [u8; 2],
}

impl SimHeader {
    pub fn new(payload_size: u32) -> Self {
        Self {
            magic: SIM_MAGIC,
            reserved: [0; 4],
            payload_size: payload_size.into(),
            reserved_tail: [0; 2],
        }
    }

    pub fn verify(&self) -> bool {
        self.magic == SIM_MAGIC && self.reserved == [0; 4] && self.reserved_tail == [0; 2]
    }
}

/// Descriptor that precedes the payload bytes of a data record.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct DataRecordHeader {
    pub record_type: u8,
    pub flags: u8,
    pub reserved: [u8; 2],
    pub load_address: U32<BigEndian>,
    pub size: U32<BigEndian>,
}

impl DataRecordHeader {
    pub fn new(load_address: u32, size: u32) -> Self {
        Self {
            record_type: DATA_RECORD_TYPE,
            flags: DATA_RECORD_FLAGS,
            reserved: [0; 2],
            load_address: load_address.into(),
            size: size.into(),
        }
    }

    pub fn verify(&self) -> bool {
        self.record_type == DATA_RECORD_TYPE
            && self.flags == DATA_RECORD_FLAGS
            && self.reserved == [0; 2]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct EndRecord {
    pub record_type: u8,
}

impl EndRecord {
    pub fn new() -> Self {
        Self {
            record_type: END_RECORD_TYPE,
        }
    }

    pub fn verify(&self) -> bool {
        self.record_type == END_RECORD_TYPE
    }
}

impl Default for EndRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SimChecksum {
    pub value: U32<BigEndian>,
}

impl SimChecksum {
    pub fn new(value: u32) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Running byte sum for data that arrives in pieces.
///
/// Each byte is zero-extended and added with 32-bit wraparound; the final
/// value is the two's-complement negation of that sum.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChecksumAccumulator {
    sum: u32,
}

impl ChecksumAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.sum = data
            .iter()
            .fold(self.sum, |acc, &byte| acc.wrapping_add(byte as u32));
    }

    pub fn sum(&self) -> u32 {
        self.sum
    }

    pub fn finalize(&self) -> u32 {
        0u32.wrapping_sub(self.sum)
    }
}

pub fn calculate_checksum(data: &[u8]) -> u32 {
    let mut acc = ChecksumAccumulator::new();
    acc.update(data);
    acc.finalize()
}
