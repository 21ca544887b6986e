//! One-shot location acquisition over a host platform's permission and
//! positioning APIs.

use std::time::Duration;

use async_trait::async_trait;
use nearby_core::Coordinates;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Options passed to [`LocationPlatform::current_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
    /// Oldest cached fix the platform may return instead of a fresh reading.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            high_accuracy: true,
            maximum_age: Duration::ZERO,
        }
    }
}

impl PositionOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error reported by the platform positioning API.
///
/// Codes follow the W3C geolocation convention: `1` permission denied,
/// `2` position unavailable, `3` timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("platform position error {code}: {message}")]
pub struct PlatformPositionError {
    pub code: u8,
    pub message: String,
}

impl PlatformPositionError {
    pub const PERMISSION_DENIED: u8 = 1;
    pub const POSITION_UNAVAILABLE: u8 = 2;
    pub const TIMEOUT: u8 = 3;

    #[must_use]
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("current position unavailable")]
    PositionUnavailable,
}

/// Host platform location services.
#[async_trait]
pub trait LocationPlatform: Send + Sync {
    /// Ask for foreground location permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// Take a single position reading.
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<Coordinates, PlatformPositionError>;
}

/// Acquires the caller's current coordinates through a [`LocationPlatform`].
#[derive(Debug, Clone)]
pub struct LocationProvider<P> {
    platform: P,
    options: PositionOptions,
}

impl<P: LocationPlatform> LocationProvider<P> {
    /// Provider with a 10-second timeout, high accuracy, and no cached fixes.
    #[must_use]
    pub fn new(platform: P) -> Self {
        Self::with_options(platform, PositionOptions::default())
    }

    #[must_use]
    pub fn with_options(platform: P, options: PositionOptions) -> Self {
        Self { platform, options }
    }

    #[must_use]
    pub fn options(&self) -> PositionOptions {
        self.options
    }

    /// Request permission, then take one fresh position reading.
    ///
    /// A denied permission fails immediately without prompting again. The
    /// reading is bounded by `options.timeout` even if the platform ignores it.
    ///
    /// # Errors
    ///
    /// - [`LocationError::PermissionDenied`] if permission is refused up front
    ///   or revoked before the reading (platform code 1).
    /// - [`LocationError::PositionUnavailable`] on platform codes 2 and 3, any
    ///   other platform failure, or when the timeout elapses.
    pub async fn acquire_location(&self) -> Result<Coordinates, LocationError> {
        if self.platform.request_permission().await == PermissionStatus::Denied {
            tracing::info!("location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let reading = tokio::time::timeout(
            self.options.timeout,
            self.platform.current_position(self.options),
        )
        .await;

        match reading {
            Ok(Ok(coords)) => {
                tracing::debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "acquired location fix"
                );
                Ok(coords)
            }
            Ok(Err(err)) if err.code == PlatformPositionError::PERMISSION_DENIED => {
                tracing::info!(error = %err, "location permission revoked before reading");
                Err(LocationError::PermissionDenied)
            }
            Ok(Err(err)) => {
                tracing::warn!(code = err.code, error = %err, "position reading failed");
                Err(LocationError::PositionUnavailable)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.options.timeout.as_millis()).unwrap_or(u64::MAX),
                    "position reading timed out"
                );
                Err(LocationError::PositionUnavailable)
            }
        }
    }
}

/// A platform with a preset permission answer and position reading.
///
/// Used by the CLI, where the "device" position comes from flags.
#[derive(Debug, Clone)]
pub struct FixedPlatform {
    permission: PermissionStatus,
    position: Result<Coordinates, PlatformPositionError>,
}

impl FixedPlatform {
    #[must_use]
    pub fn granted(coords: Coordinates) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Ok(coords),
        }
    }

    #[must_use]
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: Err(PlatformPositionError::new(
                PlatformPositionError::PERMISSION_DENIED,
                "permission denied",
            )),
        }
    }

    /// Permission granted but no fix can be produced.
    #[must_use]
    pub fn failing(error: PlatformPositionError) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Err(error),
        }
    }
}

#[async_trait]
impl LocationPlatform for FixedPlatform {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, PlatformPositionError> {
        self.position.clone()
    }
}
