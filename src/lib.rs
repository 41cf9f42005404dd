//! **mfdread** - decoder for MIFARE Classic memory dumps.
//!
//! Turns a raw dump into a block-by-block report of key material, access
//! conditions and the permissions they grant. Read-only: nothing here
//! writes a dump or talks to a card.
//!
//! # Supported dumps
//! | Size  | Card              | Sectors |
//! |-------|-------------------|---------|
//! | 320   | MIFARE Mini       | 5       |
//! | 1024  | MIFARE Classic 1K | 16      |
//! | 2048  | MIFARE Classic 2K | 32      |
//! | 4096  | MIFARE Classic 4K | 40      |
//!
//! # Example
//! ```
//! use mfdread::report::{ReportOptions, build_report};
//!
//! let dump = vec![0u8; 1024];
//! let report = build_report(&dump, ReportOptions::default()).unwrap();
//! assert_eq!(report.sector_count, 16);
//! // All-zero access bits never pass the complement check.
//! assert!(report.blocks.iter().all(|b| b.has_error()));
//! ```

pub mod card;
pub mod error;
pub mod keys;
pub mod report;
pub mod utils;

pub use error::{Error, Result};
pub use report::{BlockRecord, Report, ReportOptions, build_report};
