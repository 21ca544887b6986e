//! Fakes shared by the unit tests in this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nearby_client::FetchError;
use nearby_core::{BusinessId, BusinessRecord, ClassificationRule, Coordinates, RuleTable};
use tokio::sync::Notify;

use crate::location::{LocationPlatform, PermissionStatus, PlatformPositionError, PositionOptions};
use crate::source::CatalogSource;

pub(crate) fn business(id: &str, name: &str, latitude: f64, longitude: f64) -> BusinessRecord {
    BusinessRecord {
        id: BusinessId::from(id),
        name: name.to_string(),
        address: format!("{name} address"),
        latitude,
        longitude,
        opening_hour: 9,
        closing_hour: 18,
    }
}

pub(crate) fn rules() -> RuleTable {
    let rule = |category: &str, subcategory: &str, prefixes: &[&str]| ClassificationRule {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        prefixes: prefixes.iter().map(|p| (*p).to_string()).collect(),
    };
    RuleTable::new([
        rule("Health Services", "Doctor", &["Doctor -"]),
        rule("Health Services", "Dentist", &["Dentist -"]),
        rule("Pet Services", "Vet", &["Vet -", "Veterinary -"]),
        rule("Pet Services", "Pet Shop", &["Pet Shop -"]),
    ])
}

/// Catalog that always returns the same records and counts fetches.
#[derive(Debug, Default)]
pub(crate) struct StaticCatalog {
    records: Vec<BusinessRecord>,
    fetches: AtomicUsize,
}

impl StaticCatalog {
    pub(crate) fn new(records: Vec<BusinessRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

/// Catalog whose every fetch fails like an unreachable endpoint.
#[derive(Debug, Default)]
pub(crate) struct BrokenCatalog;

#[async_trait]
impl CatalogSource for BrokenCatalog {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        Err(FetchError::UnexpectedStatus {
            status: 502,
            url: "http://catalog.test/api/businesses".to_owned(),
        })
    }
}

/// Catalog whose first fetch parks until [`GatedCatalog::release`] is called.
#[derive(Debug, Default)]
pub(crate) struct GatedCatalog {
    records: Vec<BusinessRecord>,
    fetches: AtomicUsize,
    started: Notify,
    gate: Notify,
}

impl GatedCatalog {
    pub(crate) fn new(records: Vec<BusinessRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Resolves once the first (gated) fetch is in flight.
    pub(crate) async fn first_fetch_started(&self) {
        self.started.notified().await;
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CatalogSource for GatedCatalog {
    async fn fetch_all(&self) -> Result<Vec<BusinessRecord>, FetchError> {
        if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.notify_one();
            self.gate.notified().await;
        }
        Ok(self.records.clone())
    }
}

#[derive(Debug)]
struct RecordingState {
    permission: PermissionStatus,
    position: Result<Coordinates, PlatformPositionError>,
    delay: Duration,
    permission_requests: AtomicUsize,
    position_requests: AtomicUsize,
    last_options: Mutex<Option<PositionOptions>>,
}

/// Platform that records what it was asked for and can answer slowly.
#[derive(Debug, Clone)]
pub(crate) struct RecordingPlatform {
    state: Arc<RecordingState>,
}

impl RecordingPlatform {
    pub(crate) fn new(
        permission: PermissionStatus,
        position: Result<Coordinates, PlatformPositionError>,
    ) -> Self {
        Self {
            state: Arc::new(RecordingState {
                permission,
                position,
                delay: Duration::ZERO,
                permission_requests: AtomicUsize::new(0),
                position_requests: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        let state = &self.state;
        Self {
            state: Arc::new(RecordingState {
                permission: state.permission,
                position: state.position.clone(),
                delay,
                permission_requests: AtomicUsize::new(0),
                position_requests: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn permission_requests(&self) -> usize {
        self.state.permission_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn position_requests(&self) -> usize {
        self.state.position_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn last_options(&self) -> Option<PositionOptions> {
        *self.state.last_options.lock().expect("options lock poisoned")
    }
}

#[async_trait]
impl LocationPlatform for RecordingPlatform {
    async fn request_permission(&self) -> PermissionStatus {
        self.state.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.state.permission
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, PlatformPositionError> {
        self.state.position_requests.fetch_add(1, Ordering::SeqCst);
        *self.state.last_options.lock().expect("options lock poisoned") = Some(options);
        if !self.state.delay.is_zero() {
            tokio::time::sleep(self.state.delay).await;
        }
        self.state.position.clone()
    }
}
