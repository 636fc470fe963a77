// Licensed under the Apache-2.0 license

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use log::{debug, trace};
use sim_image::{DataRecordHeader, EndRecord, SimHeader, HEADER_SIZE};
use zerocopy::IntoBytes;

use crate::error::{Result, SimError};

const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Writes the file header at offset 0, replacing whatever was there.
pub fn write_header<W: Write + Seek>(sink: &mut W, payload_size: u32) -> Result<()> {
    sink.seek(SeekFrom::Start(0)).map_err(SimError::Seek)?;
    sink.write_all(SimHeader::new(payload_size).as_bytes())
        .map_err(SimError::Write)?;
    debug!("Wrote header: payload size {} bytes", payload_size);
    Ok(())
}

/// Writes the data record descriptor right after the header, followed by
/// `payload_size` bytes streamed from `source`.
///
/// `source` must be positioned at the first payload byte.
pub fn write_data_record<R, W>(
    source: &mut R,
    sink: &mut W,
    load_address: u32,
    payload_size: u32,
) -> Result<()>
where
    R: Read,
    W: Write + Seek,
{
    sink.seek(SeekFrom::Start(HEADER_SIZE as u64))
        .map_err(SimError::Seek)?;
    sink.write_all(DataRecordHeader::new(load_address, payload_size).as_bytes())
        .map_err(SimError::Write)?;
    debug!(
        "Wrote data record: load address 0x{:08x}, {} bytes",
        load_address, payload_size
    );
    copy_payload(source, sink, payload_size)
}

fn copy_payload<R, W>(source: &mut R, sink: &mut W, payload_size: u32) -> Result<()>
where
    R: Read,
    W: Write,
{
    let mut buffer = vec![0u8; COPY_CHUNK_SIZE.min(payload_size as usize)];
    let mut remaining = payload_size as u64;
    while remaining > 0 {
        let want = remaining.min(buffer.len() as u64) as usize;
        let count = match source.read(&mut buffer[..want]) {
            Ok(0) => {
                return Err(SimError::ShortPayload {
                    expected: payload_size,
                    copied: payload_size as u64 - remaining,
                })
            }
            Ok(count) => count,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SimError::Read(e)),
        };
        sink.write_all(&buffer[..count]).map_err(SimError::Write)?;
        remaining -= count as u64;
        trace!("Copied {} payload bytes, {} left", count, remaining);
    }
    Ok(())
}

/// Appends the end record at the current position of `sink` and returns the
/// offset just past it.
pub fn write_end_record<W: Write + Seek>(sink: &mut W) -> Result<u64> {
    sink.write_all(EndRecord::new().as_bytes())
        .map_err(SimError::Write)?;
    sink.stream_position().map_err(SimError::Seek)
}
