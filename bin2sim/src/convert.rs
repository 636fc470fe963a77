// Licensed under the Apache-2.0 license

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use sim_image::image_len;

use crate::checksum::append_checksum;
use crate::encode::{write_data_record, write_end_record, write_header};
use crate::error::SimError;
use crate::probe::probe_size;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Address at which the loader places the payload.
    pub load_address: u32,
}

/// What a conversion wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub payload_size: u32,
    pub load_address: u32,
    pub checksum: u32,
    pub total_len: u64,
}

/// Wraps the whole of `source` into a Simple Code image written to `sink`.
///
/// Stops at the first failing stage; whatever was written to `sink` up to
/// that point is left in place.
pub fn convert<R, W>(
    source: &mut R,
    sink: &mut W,
    config: &ConvertConfig,
) -> crate::Result<ConversionSummary>
where
    R: Read + Seek,
    W: Read + Write + Seek,
{
    let payload_size = probe_size(source)?;
    write_header(sink, payload_size)?;
    write_data_record(source, sink, config.load_address, payload_size)?;
    let covered_len = write_end_record(sink)?;
    let checksum = append_checksum(sink, covered_len)?;
    sink.flush().map_err(SimError::Write)?;

    Ok(ConversionSummary {
        payload_size,
        load_address: config.load_address,
        checksum,
        total_len: image_len(payload_size),
    })
}

/// Converts the binary at `input_path` into a Simple Code file at
/// `output_path`, creating or truncating it.
pub fn convert_file(
    input_path: &Path,
    output_path: &Path,
    config: &ConvertConfig,
) -> Result<ConversionSummary> {
    let mut input = File::open(input_path)
        .with_context(|| format!("Could not open input file '{}'", input_path.display()))?;
    let mut output = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_path)
        .with_context(|| format!("Could not open output file '{}'", output_path.display()))?;

    let summary = convert(&mut input, &mut output, config).with_context(|| {
        format!(
            "Failed to convert '{}' into '{}'",
            input_path.display(),
            output_path.display()
        )
    })?;
    info!(
        "Wrote {} ({} bytes): {} payload bytes at 0x{:08x}, checksum 0x{:08x}",
        output_path.display(),
        summary.total_len,
        summary.payload_size,
        summary.load_address,
        summary.checksum
    );
    Ok(summary)
}
