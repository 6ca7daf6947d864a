//! Simulated scanner node.
//!
//! Stands in for the seat scanning hardware: a random walk over the number of
//! free seats, posted to the collector on an interval.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod error;
mod reporter;
mod scanner;

pub use error::{Error, Result};
pub use reporter::Reporter;
pub use scanner::SeatScanner;
