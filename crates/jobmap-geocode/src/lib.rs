//! Nominatim geocoding client for job locations.

pub(crate) mod client;
pub(crate) mod error;
pub(crate) mod retry;
pub(crate) mod types;

pub use client::{NominatimClient, NominatimConfig, DEFAULT_BASE_URL};
pub use error::GeocodeError;
