// Licensed under the Apache-2.0 license

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use log::{debug, info};
use sim_image::{ChecksumAccumulator, SimChecksum};
use zerocopy::IntoBytes;

use crate::error::{Result, SimError};

const SCAN_CHUNK_SIZE: usize = 64 * 1024;

/// Sums every byte `source` yields until it is exhausted. Returns the
/// accumulator and the number of bytes consumed. Read failures are
/// reported as `SimError::Rescan`; `source` is the output being checksummed.
pub fn scan_checksum<R: Read>(source: &mut R) -> Result<(ChecksumAccumulator, u64)> {
    let mut acc = ChecksumAccumulator::new();
    let mut buffer = vec![0u8; SCAN_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let count = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SimError::Rescan(e)),
        };
        acc.update(&buffer[..count]);
        total += count as u64;
    }
    Ok((acc, total))
}

/// Re-reads the first `covered_len` bytes of `sink`, then writes their
/// checksum right after them.
pub fn append_checksum<S>(sink: &mut S, covered_len: u64) -> Result<u32>
where
    S: Read + Write + Seek,
{
    sink.seek(SeekFrom::Start(0)).map_err(SimError::Seek)?;
    let (acc, scanned) = scan_checksum(&mut Read::take(&mut *sink, covered_len))?;
    if scanned != covered_len {
        return Err(SimError::Rescan(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("output holds {} of {} written bytes", scanned, covered_len),
        )));
    }
    debug!("Byte sum of {} written bytes = 0x{:08x}", scanned, acc.sum());
    let checksum = acc.finalize();
    info!("Calculated checksum = 0x{:08x}", checksum);

    sink.seek(SeekFrom::Start(covered_len))
        .map_err(SimError::Seek)?;
    sink.write_all(SimChecksum::new(checksum).as_bytes())
        .map_err(SimError::Write)?;
    Ok(checksum)
}
