// Licensed under the Apache-2.0 license

use std::io::{Seek, SeekFrom};

use crate::error::{Result, SimError};

/// Returns the length of `source` and rewinds it to the start.
pub fn probe_size<R: Seek>(source: &mut R) -> Result<u32> {
    let len = source.seek(SeekFrom::End(0)).map_err(SimError::Seek)?;
    source.seek(SeekFrom::Start(0)).map_err(SimError::Seek)?;
    u32::try_from(len).map_err(|_| SimError::PayloadTooLarge(len))
}
