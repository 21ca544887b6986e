//! Query orchestration: fetch, classify, annotate with distance, sort.

use std::cmp::Ordering;
use std::sync::Arc;

use nearby_core::{distance_km, BusinessRecord, Coordinates, RankedBusiness, RuleTable};

use crate::source::CatalogSource;

/// Businesses for a `(category, subcategory)` bucket, nearest first.
#[derive(Debug, Clone)]
pub struct RankedDirectory<S> {
    source: S,
    rules: Arc<RuleTable>,
}

impl<S: CatalogSource> RankedDirectory<S> {
    #[must_use]
    pub fn new(source: S, rules: Arc<RuleTable>) -> Self {
        Self { source, rules }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Run one query against a fresh catalog snapshot.
    ///
    /// 1. Fetch the full catalog.
    /// 2. Keep the records in the requested bucket, in catalog order.
    /// 3. With a `location`, annotate every record with its distance and sort
    ///    nearest first; without one, return the bucket as-is.
    ///
    /// Never fails: a fetch error is logged and yields an empty vector, the
    /// same shape as a bucket with no matches.
    pub async fn query(
        &self,
        category: &str,
        subcategory: &str,
        location: Option<Coordinates>,
    ) -> Vec<RankedBusiness> {
        let records = match self.source.fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    category,
                    subcategory,
                    error = %e,
                    "catalog fetch failed; returning no businesses"
                );
                return Vec::new();
            }
        };

        let bucket = self.rules.classify(&records, category, subcategory);
        if bucket.is_empty() {
            tracing::debug!(
                category,
                subcategory,
                catalog_size = records.len(),
                "no businesses matched"
            );
        }

        rank(bucket, location)
    }
}

/// Annotate `bucket` with distances from `location` and sort nearest first.
///
/// The sort is stable, so equal distances keep bucket order; NaN distances
/// go last. Without a location every element gets `distance_km: None` and
/// the order is untouched.
#[must_use]
pub fn rank(bucket: Vec<BusinessRecord>, location: Option<Coordinates>) -> Vec<RankedBusiness> {
    let Some(origin) = location else {
        return bucket.into_iter().map(RankedBusiness::unranked).collect();
    };

    let mut ranked: Vec<RankedBusiness> = bucket
        .into_iter()
        .map(|business| {
            let distance = distance_km(origin, business.coordinates());
            RankedBusiness {
                business,
                distance_km: Some(distance),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        by_distance(
            a.distance_km.unwrap_or(f64::NAN),
            b.distance_km.unwrap_or(f64::NAN),
        )
    });
    ranked
}

fn by_distance(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
