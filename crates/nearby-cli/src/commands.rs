//! Command handlers. The CLI stands in for the directory screen: it
//! activates a session, makes one selection, and renders the outcome.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use nearby_client::{CatalogClient, ReverseGeocoder};
use nearby_core::{
    load_categories, AppConfig, CategoryStore, Coordinates, RankedBusiness, RuleTable,
};
use nearby_directory::{
    DirectorySession, FixedPlatform, LocationProvider, LocationStatus, PlatformPositionError,
    PositionOptions, QueryOutcome, RankedDirectory, Selection,
};

/// Where the "device" location comes from for a CLI run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DeviceLocation {
    Fix(Coordinates),
    Denied,
    /// Permission granted but no position supplied.
    Unavailable,
}

impl DeviceLocation {
    pub(crate) fn from_flags(
        lat: Option<f64>,
        lon: Option<f64>,
        deny_location: bool,
    ) -> anyhow::Result<Self> {
        if deny_location {
            return Ok(Self::Denied);
        }
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Self::Fix(Coordinates::try_new(lat, lon)?)),
            (None, None) => Ok(Self::Unavailable),
            _ => anyhow::bail!("--lat and --lon must be given together"),
        }
    }

    fn into_platform(self) -> FixedPlatform {
        match self {
            Self::Fix(coords) => FixedPlatform::granted(coords),
            Self::Denied => FixedPlatform::denied(),
            Self::Unavailable => FixedPlatform::failing(PlatformPositionError::new(
                PlatformPositionError::POSITION_UNAVAILABLE,
                "no device position supplied",
            )),
        }
    }
}

fn load_store(path: &Path) -> anyhow::Result<(CategoryStore, RuleTable)> {
    let file = load_categories(path)?;
    Ok(file.into_parts())
}

/// List categories from `categories_path`. Needs no catalog configuration.
pub(crate) fn run_categories(categories_path: &Path) -> anyhow::Result<()> {
    let (store, _) = load_store(categories_path)?;
    print!("{}", render_categories(&store));
    Ok(())
}

pub(crate) fn render_categories(store: &CategoryStore) -> String {
    let mut lines = Vec::new();
    for category in store.categories() {
        lines.push(format!(
            "{} [{}]",
            category.name,
            category.accent_colors.join(" -> ")
        ));
        for sub in &category.subcategories {
            lines.push(format!("  - {} ({})", sub.name, sub.icon));
        }
    }
    to_block(&lines)
}

/// Run one selection through a fresh session and print the outcome.
///
/// # Errors
///
/// Returns an error if the categories file or HTTP client cannot be set up.
/// Catalog fetch failures are not errors; they print as an empty list.
pub(crate) async fn run_query(
    config: &AppConfig,
    category: &str,
    subcategory: &str,
    device: DeviceLocation,
    json: bool,
) -> anyhow::Result<()> {
    let (store, rules) = load_store(&config.categories_path)?;
    if store
        .category(category)
        .and_then(|c| c.subcategory(subcategory))
        .is_none()
    {
        tracing::warn!(category, subcategory, "selection is not a configured subcategory");
    }

    let client = CatalogClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
    let options =
        PositionOptions::default().with_timeout(Duration::from_millis(config.location_timeout_ms));
    let session = DirectorySession::new(
        RankedDirectory::new(client, Arc::new(rules)),
        LocationProvider::with_options(device.into_platform(), options),
    );

    session.activate().await;
    let Some(outcome) = session.select(Selection::new(category, subcategory)).await else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.businesses)?);
    } else {
        let hour = u8::try_from(chrono::Local::now().hour()).unwrap_or(0);
        print!("{}", render_outcome(&outcome, hour));
    }
    Ok(())
}

pub(crate) fn render_outcome(outcome: &QueryOutcome, hour: u8) -> String {
    let mut lines = vec![
        outcome.selection.to_string(),
        describe_location(outcome.location),
    ];

    if outcome.businesses.is_empty() {
        lines.push("no businesses found".to_string());
    } else {
        lines.extend(
            outcome
                .businesses
                .iter()
                .enumerate()
                .map(|(i, ranked)| format!("{:>3}. {}", i + 1, render_business(ranked, hour))),
        );
    }
    to_block(&lines)
}

fn to_block(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn describe_location(status: LocationStatus) -> String {
    match status {
        LocationStatus::Available(c) => {
            format!("near {:.5}, {:.5}", c.latitude, c.longitude)
        }
        LocationStatus::PermissionDenied => {
            "location permission denied; showing catalog order".to_string()
        }
        LocationStatus::PositionUnavailable => {
            "location unavailable; showing catalog order".to_string()
        }
        LocationStatus::Pending => "location pending; showing catalog order".to_string(),
    }
}

fn render_business(ranked: &RankedBusiness, hour: u8) -> String {
    let b = &ranked.business;
    let mut parts = vec![b.name.clone()];
    if let Some(km) = ranked.distance_km {
        parts.push(format_distance(km));
    }
    let state = if b.is_open_at(hour) { "open" } else { "closed" };
    parts.push(format!(
        "{state} {:02}:00-{:02}:00",
        b.opening_hour, b.closing_hour
    ));
    if !b.address.is_empty() {
        parts.push(b.address.clone());
    }
    parts.join(" | ")
}

pub(crate) fn format_distance(km: f64) -> String {
    format!("{km:.1} km")
}

pub(crate) async fn run_address(config: &AppConfig, lat: f64, lon: f64) -> anyhow::Result<()> {
    let coords = Coordinates::try_new(lat, lon)?;
    let geocoder = ReverseGeocoder::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build reverse geocoder: {e}"))?;
    let address = geocoder.reverse(coords).await?;
    println!("{address}");
    Ok(())
}
