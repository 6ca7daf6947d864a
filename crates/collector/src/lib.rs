//! Collector service for the study space scanners.
//!
//! Scanner nodes post their readings to `/api/occupancy`; the latest reading
//! of every node is kept in memory and served on `/api/status`.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod error;
mod routes;
mod server;
mod store;

pub use error::{Error, Result};
pub use routes::{INVALID_JSON_MESSAGE, MISSING_SEATS_MESSAGE, RUNNING_MESSAGE, router};
pub use server::CollectorServer;
pub use store::ReadingStore;
