//! # Payment Batch
//!
//! Validates and encodes fixed-width bank batch payment files: the domestic
//! ABA direct-entry format and an international payments format.
//!
//! ## Design Principles
//!
//! - **Definitions are data**: each record type is a table of fields with
//!   column placement and constraints, interpreted by one validator
//! - **Collect, don't stop**: validation reports every violation in a batch
//! - **Encode only what passed**: an [`EncodableBatch`] can only come from
//!   [`assemble`], so encoding never fails
//! - **Deterministic output**: identical input yields identical bytes
//!
//! ## Example
//!
//! ```no_run
//! use payment_batch::formats::aba;
//! use payment_batch::{assemble, write, Aba, TrailerFields};
//!
//! let header = aba::header_record()
//!     .with("institution", "NAB")?
//!     .with("user_name", "ACME PTY LTD")?
//!     .with("user_id", "123456")?
//!     .with("description", "PAYROLL")?
//!     .with("processing_date", "2024-01-15")?
//!     .with("trace_bsb", "083-170")?
//!     .with("trace_account", "739827524")?;
//! let detail = aba::detail_record()
//!     .with("bsb", "062-000")?
//!     .with("account_number", "12345678")?
//!     .with("transaction_code", "53")?
//!     .with("amount", 150_000i64)?
//!     .with("account_name", "JOHN SMITH")?
//!     .with("reference", "PAY0001")?;
//!
//! match assemble::<Aba>(header, vec![detail], TrailerFields::default()) {
//!     Ok(batch) => std::io::Write::write_all(&mut std::io::stdout(), &write(&batch))?,
//!     Err(violations) => violations.iter().for_each(|v| eprintln!("{}", v)),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod constraint;
pub mod definition;
pub mod encoder;
pub mod error;
pub mod formats;
pub mod input;
pub mod money;
pub mod record;
pub mod report;
pub mod validator;
pub mod violation;
pub mod writer;

pub use assembler::{assemble, EncodableBatch, TrailerFields};
pub use encoder::encode;
pub use error::{CodecError, Result};
pub use formats::{Aba, Family, International, PaymentFormat};
pub use money::Money;
pub use record::{Record, ValidRecord, Value};
pub use validator::{accept, validate};
pub use violation::{Location, Violation, ViolationKind};
pub use writer::write;
