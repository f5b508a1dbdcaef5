//! Payment Batch CLI
//!
//! Reads a header CSV and a details CSV, validates them as one batch of the
//! chosen family and writes the fixed-width file to stdout. A rejected batch
//! produces its violations as CSV on stderr and a non-zero exit code.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- aba header.csv details.csv > payroll.aba
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::warn;
use payment_batch::input::read_records;
use payment_batch::report::write_violations;
use payment_batch::{
    assemble, write, Aba, CodecError, Family, International, PaymentFormat, Result, TrailerFields,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        return Err(CodecError::MissingArgument);
    }

    match args[1].parse::<Family>()? {
        Family::Aba => run_batch::<Aba>(&args[2], &args[3]),
        Family::International => run_batch::<International>(&args[2], &args[3]),
    }
}

fn run_batch<F: PaymentFormat>(header_path: &str, details_path: &str) -> Result<()> {
    let mut headers = read_records(
        BufReader::new(File::open(header_path)?),
        F::header_definition(),
    )?;
    if headers.len() != 1 {
        return Err(CodecError::InvalidInput(format!(
            "{} must contain exactly one header row, found {}",
            header_path,
            headers.len()
        )));
    }
    let header = headers.remove(0);
    let details = read_records(
        BufReader::new(File::open(details_path)?),
        F::detail_definition(),
    )?;

    match assemble::<F>(header, details, TrailerFields::default()) {
        Ok(batch) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&write(&batch))?;
            handle.flush()?;
            Ok(())
        }
        Err(violations) => {
            warn!("{} batch rejected", F::NAME);
            write_violations(io::stderr().lock(), &violations)?;
            Err(CodecError::Rejected {
                count: violations.len(),
            })
        }
    }
}
