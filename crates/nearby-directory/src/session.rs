//! Per-activation state for a directory screen.
//!
//! A session acquires the caller's location once, lets any number of
//! selections run against whatever location is known at the time, and drops
//! results from selections that have since been superseded.

use std::sync::atomic::{AtomicU64, Ordering};

use nearby_core::{Coordinates, RankedBusiness};
use tokio::sync::watch;

use crate::directory::RankedDirectory;
use crate::location::{LocationError, LocationPlatform, LocationProvider};
use crate::source::CatalogSource;

/// The `(category, subcategory)` pair a user picked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub category: String,
    pub subcategory: String,
}

impl Selection {
    #[must_use]
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.category, self.subcategory)
    }
}

/// What the session knows about the caller's location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    /// Acquisition has not finished (or not started).
    Pending,
    Available(Coordinates),
    PermissionDenied,
    PositionUnavailable,
}

impl LocationStatus {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Available(coords) => Some(*coords),
            _ => None,
        }
    }
}

impl From<Result<Coordinates, LocationError>> for LocationStatus {
    fn from(result: Result<Coordinates, LocationError>) -> Self {
        match result {
            Ok(coords) => Self::Available(coords),
            Err(LocationError::PermissionDenied) => Self::PermissionDenied,
            Err(LocationError::PositionUnavailable) => Self::PositionUnavailable,
        }
    }
}

/// Results of one selection, with the location state they were ranked under.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub selection: Selection,
    pub location: LocationStatus,
    pub businesses: Vec<RankedBusiness>,
}

pub struct DirectorySession<S, P> {
    directory: RankedDirectory<S>,
    locator: LocationProvider<P>,
    location: watch::Sender<LocationStatus>,
    latest_ticket: AtomicU64,
}

impl<S: CatalogSource, P: LocationPlatform> DirectorySession<S, P> {
    #[must_use]
    pub fn new(directory: RankedDirectory<S>, locator: LocationProvider<P>) -> Self {
        let (location, _) = watch::channel(LocationStatus::Pending);
        Self {
            directory,
            locator,
            location,
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Acquire the caller's location for this activation.
    ///
    /// Once a fix or a failure has been recorded, later calls return it
    /// without touching the platform; use [`Self::reacquire`] to try again.
    pub async fn activate(&self) -> LocationStatus {
        match self.location() {
            LocationStatus::Pending => self.reacquire().await,
            known => known,
        }
    }

    /// Run location acquisition again and record the new outcome.
    pub async fn reacquire(&self) -> LocationStatus {
        let status = LocationStatus::from(self.locator.acquire_location().await);
        self.location.send_replace(status);
        status
    }

    #[must_use]
    pub fn location(&self) -> LocationStatus {
        *self.location.borrow()
    }

    /// Observe location changes, e.g. to re-render a pending indicator.
    #[must_use]
    pub fn subscribe_location(&self) -> watch::Receiver<LocationStatus> {
        self.location.subscribe()
    }

    /// Query the bucket for `selection` using the location known right now.
    ///
    /// Returns `None` when another selection started while this one was in
    /// flight; the newer selection's results take precedence. A query that
    /// starts before location resolves is ranked without distances and is
    /// not re-run when the fix arrives.
    pub async fn select(&self, selection: Selection) -> Option<QueryOutcome> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let location = self.location();

        let businesses = self
            .directory
            .query(
                &selection.category,
                &selection.subcategory,
                location.coordinates(),
            )
            .await;

        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(
                %selection,
                ticket,
                "dropping results for superseded selection"
            );
            return None;
        }

        Some(QueryOutcome {
            selection,
            location,
            businesses,
        })
    }
}
