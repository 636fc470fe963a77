// Licensed under the Apache-2.0 license

use std::path::Path;

use anyhow::Context;
use sim_image::{
    calculate_checksum, image_len, DataRecordHeader, EndRecord, SimChecksum, SimHeader,
    FRAMING_SIZE, HEADER_SIZE, PAYLOAD_OFFSET, SIM_MAGIC,
};
use zerocopy::FromBytes;

use crate::error::{Result, SimError};

/// Fields recovered from a valid single-record Simple Code image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimImageInfo {
    pub load_address: u32,
    pub payload_size: u32,
    pub checksum: u32,
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidImage(msg.into())
}

pub fn verify_sim_image(image: &[u8]) -> Result<SimImageInfo> {
    if image.len() < FRAMING_SIZE {
        return Err(invalid(format!(
            "{} bytes is too small to hold the header, records and checksum",
            image.len()
        )));
    }

    let (header, _) = SimHeader::read_from_prefix(image)
        .map_err(|_| invalid("failed to parse header"))?;
    if header.magic != SIM_MAGIC {
        return Err(invalid("incorrect magic number"));
    }
    if !header.verify() {
        return Err(invalid("reserved header bytes are not zero"));
    }

    let (record, _) = DataRecordHeader::read_from_prefix(&image[HEADER_SIZE..])
        .map_err(|_| invalid("failed to parse data record"))?;
    if !record.verify() {
        return Err(invalid(format!(
            "unsupported data record (type 0x{:02x}, flags 0x{:02x})",
            record.record_type, record.flags
        )));
    }

    let payload_size = header.payload_size.get();
    if record.size.get() != payload_size {
        return Err(invalid(format!(
            "header declares {} payload bytes but the data record declares {}",
            payload_size,
            record.size.get()
        )));
    }
    if image.len() as u64 != image_len(payload_size) {
        return Err(invalid(format!(
            "image is {} bytes, expected {} for a {} byte payload",
            image.len(),
            image_len(payload_size),
            payload_size
        )));
    }

    let end_offset = PAYLOAD_OFFSET + payload_size as usize;
    let (end_record, rest) = EndRecord::read_from_prefix(&image[end_offset..])
        .map_err(|_| invalid("failed to parse end record"))?;
    if !end_record.verify() {
        return Err(invalid(format!(
            "expected end record at offset {}, found type 0x{:02x}",
            end_offset, end_record.record_type
        )));
    }

    let stored = SimChecksum::read_from_bytes(rest)
        .map_err(|_| invalid("failed to parse checksum"))?
        .value
        .get();
    let calculated = calculate_checksum(&image[..=end_offset]);
    if stored != calculated {
        return Err(SimError::ChecksumMismatch { stored, calculated });
    }

    Ok(SimImageInfo {
        load_address: record.load_address.get(),
        payload_size,
        checksum: stored,
    })
}

pub fn verify_sim_file(path: &Path) -> anyhow::Result<SimImageInfo> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;
    verify_sim_image(&data).with_context(|| format!("'{}' failed verification", path.display()))
}
