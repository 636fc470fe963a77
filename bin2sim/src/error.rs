// Licensed under the Apache-2.0 license

use std::io;

use thiserror::Error;

/// Errors raised while producing or checking a Simple Code image.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Could not read input file.")]
    Read(#[source] io::Error),
    #[error("Could not write to output file.")]
    Write(#[source] io::Error),
    #[error("Could not read back output file.")]
    Rescan(#[source] io::Error),
    #[error("Could not seek in file.")]
    Seek(#[source] io::Error),
    #[error("Input ended after {copied} of {expected} payload bytes.")]
    ShortPayload { expected: u32, copied: u64 },
    #[error("Input is {0} bytes long; a data record holds at most 4294967295 bytes.")]
    PayloadTooLarge(u64),
    #[error("Invalid Simple Code image: {0}")]
    InvalidImage(String),
    #[error("Checksum mismatch (stored 0x{stored:08x}, calculated 0x{calculated:08x}).")]
    ChecksumMismatch { stored: u32, calculated: u32 },
}

pub type Result<T> = core::result::Result<T, SimError>;
