// Licensed under the Apache-2.0 license

use bin2sim::{convert_file, verify_sim_file, ConvertConfig};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Helper function to create a temporary file with specific content
fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(content)
        .expect("Failed to write to temp file");
    temp_file
}

fn be32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn convert_to_bytes(payload: &[u8], load_address: u32) -> Vec<u8> {
    let input = create_temp_file(payload);
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("out.sim");
    convert_file(input.path(), &output, &ConvertConfig { load_address })
        .expect("Failed to convert");
    fs::read(&output).expect("Failed to read output")
}

fn assert_layout(out: &[u8], payload: &[u8], load_address: u32) {
    let size = payload.len();
    assert_eq!(out.len(), 14 + 12 + size + 1 + 4);
    assert_eq!(&out[0..4], &[0x7f, 0x49, 0x41, 0x52]);
    assert_eq!(&out[4..8], &[0, 0, 0, 0]);
    assert_eq!(be32(out, 8), size as u32);
    assert_eq!(&out[12..14], &[0, 0]);
    assert_eq!(&out[14..18], &[0x01, 0x01, 0, 0]);
    assert_eq!(be32(out, 18), load_address);
    assert_eq!(be32(out, 22), size as u32);
    assert_eq!(&out[26..26 + size], payload);
    assert_eq!(out[26 + size], 0x03);

    let sum = out[..=26 + size]
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(b as u32));
    assert_eq!(be32(out, 27 + size), 0xffff_ffffu32.wrapping_sub(sum).wrapping_add(1));
}

#[test]
fn test_convert_firmware_file() {
    let payload = b"Caliptra Firmware Data - ABCDEFGH";
    let out = convert_to_bytes(payload, 0x2000_0000);
    assert_layout(&out, payload, 0x2000_0000);
}

#[test]
fn test_convert_three_bytes() {
    let out = convert_to_bytes(&[0x10, 0x20, 0x30], 0);
    assert_eq!(&out[8..12], &[0, 0, 0, 3]);
    assert_eq!(
        &out[14..29],
        &[0x01, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 0x10, 0x20, 0x30]
    );
    assert_eq!(out[29], 0x03);
    assert_layout(&out, &[0x10, 0x20, 0x30], 0);
}

#[test]
fn test_convert_empty_input() {
    let out = convert_to_bytes(&[], 0);
    assert_eq!(out.len(), 31);
    assert_layout(&out, &[], 0);
}

#[test]
fn test_convert_max_load_address() {
    let out = convert_to_bytes(b"\xde\xad\xbe\xef", u32::MAX);
    assert_eq!(&out[18..22], &[0xff, 0xff, 0xff, 0xff]);
    assert_layout(&out, b"\xde\xad\xbe\xef", u32::MAX);
}

#[test]
fn test_convert_large_payload() {
    let payload: Vec<u8> = (0..300_000u32).map(|i| (i ^ (i >> 8)) as u8).collect();
    let out = convert_to_bytes(&payload, 0x1000);
    assert_layout(&out, &payload, 0x1000);
}

#[test]
fn test_convert_is_idempotent() {
    let payload = b"MCU Runtime Data - QWERTYUI";
    let input = create_temp_file(payload);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fw.sim");
    let config = ConvertConfig {
        load_address: 0x8000,
    };

    let first = convert_file(input.path(), &output, &config).unwrap();
    let first_bytes = fs::read(&output).unwrap();
    let second = convert_file(input.path(), &output, &config).unwrap();
    let second_bytes = fs::read(&output).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn test_convert_truncates_existing_output() {
    let input = create_temp_file(b"abc");
    let output = create_temp_file(&[0x55; 100]);
    convert_file(input.path(), output.path(), &ConvertConfig::default()).unwrap();
    let out = fs::read(output.path()).unwrap();
    assert_layout(&out, b"abc", 0);
}

#[test]
fn test_convert_then_verify() {
    let input = create_temp_file(b"Soc Image 1 Data - ZXCVBNMLKJ");
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("soc.sim");
    let summary = convert_file(
        input.path(),
        &output,
        &ConvertConfig {
            load_address: 0x8000_0000,
        },
    )
    .unwrap();

    let info = verify_sim_file(&output).unwrap();
    assert_eq!(info.load_address, 0x8000_0000);
    assert_eq!(info.payload_size, summary.payload_size);
    assert_eq!(info.checksum, summary.checksum);
    assert_eq!(summary.total_len, fs::metadata(&output).unwrap().len());
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.sim");
    let result = convert_file(
        &dir.path().join("does-not-exist.bin"),
        &output,
        &ConvertConfig::default(),
    );
    let err = result.expect_err("Expected conversion to fail");
    assert!(format!("{:#}", err).contains("Could not open input file"));
    assert!(!output.exists());
}

#[test]
fn test_unopenable_output_file() {
    let input = create_temp_file(b"abc");
    let dir = TempDir::new().unwrap();
    let result = convert_file(
        input.path(),
        &dir.path().join("missing-dir").join("out.sim"),
        &ConvertConfig::default(),
    );
    let err = result.expect_err("Expected conversion to fail");
    assert!(format!("{:#}", err).contains("Could not open output file"));
}

#[test]
fn test_verify_rejects_corrupted_file() {
    let input = create_temp_file(b"Valid Caliptra Firmware Data");
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("fw.sim");
    convert_file(input.path(), &output, &ConvertConfig::default()).unwrap();

    let mut data = fs::read(&output).unwrap();
    data[30] ^= 0x01;
    fs::write(&output, &data).unwrap();

    assert!(verify_sim_file(&output).is_err());
    assert!(verify_sim_file(Path::new("/nonexistent/fw.sim")).is_err());
}
