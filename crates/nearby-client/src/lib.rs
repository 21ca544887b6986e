//! HTTP clients for the remote business catalog and the reverse geocoder.

pub mod catalog;
pub mod error;
pub mod geocode;
mod rate_limit;

pub use catalog::CatalogClient;
pub use error::FetchError;
pub use geocode::ReverseGeocoder;
