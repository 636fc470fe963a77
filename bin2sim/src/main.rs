// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bin2sim::{convert_file, verify_sim_file, ConvertConfig};
use clap::{ArgAction, Parser};
use clap_num::maybe_hex;
use log::LevelFilter;

/// Converts a firmware binary (.bin) file into an IAR Simple Code (.sim) file.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Firmware binary to wrap
    #[arg(value_name = "FILE_IN", required_unless_present = "check")]
    input: Option<PathBuf>,

    /// Simple Code file to create
    #[arg(value_name = "FILE_OUT", required_unless_present = "check")]
    output: Option<PathBuf>,

    /// Verify an existing Simple Code file instead of converting
    #[arg(long, value_name = "FILE", conflicts_with_all = ["input", "output", "verify", "start_address"])]
    check: Option<PathBuf>,

    /// Address where the binary data should be written (decimal, or hex with 0x)
    #[arg(short = 's', long, value_name = "START_ADDRESS", value_parser = maybe_hex::<u32>, default_value_t = 0)]
    start_address: u32,

    /// Check the produced file after writing it
    #[arg(long, default_value_t = false)]
    verify: bool,

    /// More output; repeat for trace-level detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, default_value_t = false, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(file) = &cli.check {
        let info = verify_sim_file(file)?;
        println!(
            "Image is valid: {} payload bytes at 0x{:08x}, checksum 0x{:08x}",
            info.payload_size, info.load_address, info.checksum
        );
        return Ok(());
    }

    let input = cli.input.as_ref().ok_or_else(|| anyhow!("Missing FILE_IN"))?;
    let output = cli
        .output
        .as_ref()
        .ok_or_else(|| anyhow!("Missing FILE_OUT"))?;
    let config = ConvertConfig {
        load_address: cli.start_address,
    };
    convert_file(input, output, &config)?;

    if cli.verify {
        verify_sim_file(output)?;
        println!("Image is valid!");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log_level(cli.verbose, cli.quiet))
        .without_timestamps()
        .init();

    run(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });
}
