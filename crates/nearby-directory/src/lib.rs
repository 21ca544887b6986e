//! Business discovery pipeline: location fix, catalog fetch, classification,
//! and distance ranking.
//!
//! Failures below [`RankedDirectory`] are absorbed into an empty result.
//! Location failures are the only ones surfaced to the caller, as distinct
//! [`LocationStatus`] values on each [`QueryOutcome`].

pub mod directory;
pub mod location;
pub mod session;
pub mod source;

#[cfg(test)]
mod test_support;

pub use directory::{rank, RankedDirectory};
pub use location::{
    FixedPlatform, LocationError, LocationPlatform, LocationProvider, PermissionStatus,
    PlatformPositionError, PositionOptions,
};
pub use session::{DirectorySession, LocationStatus, QueryOutcome, Selection};
pub use source::CatalogSource;
