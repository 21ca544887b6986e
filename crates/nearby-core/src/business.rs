//! Business records as served by the remote catalog.
//!
//! ## Observed catalog shape
//!
//! The catalog endpoint returns a bare JSON array. The identifier is served
//! as `businessID` by the production API and as `id` by older fixtures, and
//! may be either a number or a string; both are accepted and normalised to a
//! string. Hours are whole hours in `0..=23` and are taken as-is.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coordinates;

/// Catalog-assigned business identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BusinessId(pub String);

impl std::fmt::Display for BusinessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BusinessId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<'de> Deserialize<'de> for BusinessId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// A single business from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    #[serde(alias = "businessID")]
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hour: u8,
    pub closing_hour: u8,
}

impl BusinessRecord {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Whether the business is open during `hour` (0–23, local time).
    ///
    /// `opening < closing` is a same-day window `[opening, closing)`,
    /// `opening > closing` wraps past midnight, and equal hours mean the
    /// business never closes.
    #[must_use]
    pub fn is_open_at(&self, hour: u8) -> bool {
        if hour > 23 {
            return false;
        }
        let (open, close) = (self.opening_hour, self.closing_hour);
        match open.cmp(&close) {
            std::cmp::Ordering::Less => open <= hour && hour < close,
            std::cmp::Ordering::Greater => hour >= open || hour < close,
            std::cmp::Ordering::Equal => true,
        }
    }
}

/// A classified business annotated with its distance from the caller.
///
/// `distance_km` is `None` for every element of a result when no location
/// was available, and `Some` (including `Some(0.0)`) for every element
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBusiness {
    #[serde(flatten)]
    pub business: BusinessRecord,
    pub distance_km: Option<f64>,
}

impl RankedBusiness {
    #[must_use]
    pub fn unranked(business: BusinessRecord) -> Self {
        Self {
            business,
            distance_km: None,
        }
    }
}
