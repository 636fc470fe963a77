// Licensed under the Apache-2.0 license

//! Conversion of raw firmware binaries into IAR Simple Code (`.sim`) files.
//!
//! The pipeline runs strictly in order: probe the payload size, write the
//! header, stream the data record, append the end record, then re-scan the
//! output and append its checksum.

mod checksum;
mod convert;
mod encode;
mod error;
mod probe;
mod verify;

pub use checksum::{append_checksum, scan_checksum};
pub use convert::{convert, convert_file, ConversionSummary, ConvertConfig};
pub use encode::{write_data_record, write_end_record, write_header};
pub use error::{Result, SimError};
pub use probe::probe_size;
pub use verify::{verify_sim_file, verify_sim_image, SimImageInfo};
