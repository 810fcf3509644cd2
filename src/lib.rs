//! ELECTION RESULTS SCRAPER
//! Fetches one page of municipal election results from volby.cz
//! and writes the per-municipality vote counts to a CSV file.

mod error;
mod macros;
mod parse;
pub mod process;
mod request;
mod write;

pub use error::{Error, Result};

/// Relative page paths given on the command line are resolved against this address.
pub const BASE_URL: &str = "https://volby.cz/pls/ps2017nss/";
