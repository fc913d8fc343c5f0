//! Working set of points of interest for the operating region.
//!
//! The catalog is read-mostly: ingestion swaps the whole backing list
//! atomically behind an `Arc`, so concurrent readers always observe either
//! the previous complete set or the new one, never a partially written one.

pub mod fallback;
pub mod source;
pub mod types;

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::geo::{self, BoundingBox};

pub use source::{AttractionQuery, AttractionSource, StbClient};
pub use types::{Attraction, Category, NearbyAttraction, RawAttraction};

/// Catalog and data-source errors.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("coordinates ({latitude}, {longitude}) are outside the operating region")]
    OutOfBounds { latitude: f64, longitude: f64 },

    #[error("attraction source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("invalid source response: {0}")]
    InvalidResponse(String),
}

/// Outcome of an ingestion pass, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Records accepted into the catalog.
    pub accepted: usize,
    /// Records dropped for coordinates outside the operating region.
    pub rejected_out_of_bounds: usize,
    /// Records dropped as duplicates of an earlier record.
    pub rejected_duplicate: usize,
    /// Whether this ingestion used the built-in fallback dataset.
    pub degraded: bool,
}

/// The current working set of attractions.
pub struct AttractionCatalog {
    attractions: RwLock<Arc<Vec<Attraction>>>,
    bounds: BoundingBox,
}

impl Default for AttractionCatalog {
    fn default() -> Self {
        Self::new(BoundingBox::SINGAPORE)
    }
}

impl AttractionCatalog {
    /// Create an empty catalog for the given operating region.
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            attractions: RwLock::new(Arc::new(Vec::new())),
            bounds,
        }
    }

    /// Validate, deduplicate, and install a new working set, replacing the
    /// previous one.
    ///
    /// Records with coordinates outside the operating region are dropped and
    /// counted, not raised; duplicates (same derived identity) keep the first
    /// occurrence. Ingestion order is preserved and defines each
    /// attraction's ordinal for downstream tie-breaking.
    pub fn ingest(&self, records: Vec<RawAttraction>) -> IngestReport {
        let mut report = IngestReport::default();
        let mut accepted: Vec<Attraction> = Vec::with_capacity(records.len());

        for raw in records {
            if !self.bounds.contains(raw.latitude, raw.longitude) {
                tracing::warn!(
                    "Dropping '{}': coordinates ({}, {}) outside operating region",
                    raw.name,
                    raw.latitude,
                    raw.longitude
                );
                report.rejected_out_of_bounds += 1;
                continue;
            }

            let attraction = Attraction::from_raw(raw);
            if accepted.iter().any(|a| a.id == attraction.id) {
                report.rejected_duplicate += 1;
                continue;
            }
            accepted.push(attraction);
        }

        report.accepted = accepted.len();
        *self.attractions.write().unwrap() = Arc::new(accepted);
        report
    }

    /// Refresh the working set from a live source, falling back to the
    /// built-in dataset when the source fails.
    ///
    /// The fallback path is degraded mode, not an error: consumers always
    /// get a populated catalog.
    pub async fn refresh_from(
        &self,
        source: &impl AttractionSource,
        query: &AttractionQuery,
    ) -> IngestReport {
        match source.search(query).await {
            Ok(records) => self.ingest(records),
            Err(e) => {
                tracing::warn!("Attraction source unavailable, using fallback data: {}", e);
                let mut report = self.ingest(fallback::builtin_attractions());
                report.degraded = true;
                report
            }
        }
    }

    /// Snapshot of the current working set, in ingestion order.
    pub fn snapshot(&self) -> Arc<Vec<Attraction>> {
        self.attractions.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.attractions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attractions whose category label matches exactly, case-insensitively.
    pub fn by_category(&self, label: &str) -> Vec<Attraction> {
        self.snapshot()
            .iter()
            .filter(|a| a.category.label().eq_ignore_ascii_case(label.trim()))
            .cloned()
            .collect()
    }

    /// Attractions within `radius_meters` of the given coordinate, decorated
    /// with their distance and sorted nearest-first. Equal distances keep
    /// ingestion order.
    pub fn within_radius(&self, latitude: f64, longitude: f64, radius_meters: f64) -> Vec<NearbyAttraction> {
        let mut nearby: Vec<NearbyAttraction> = self
            .snapshot()
            .iter()
            .enumerate()
            .filter_map(|(ordinal, a)| {
                let distance = geo::distance_meters(latitude, longitude, a.latitude, a.longitude);
                (distance <= radius_meters).then(|| NearbyAttraction {
                    attraction: a.clone(),
                    distance: Some(distance),
                    ordinal,
                })
            })
            .collect();

        // sort_by is stable, so ties fall back to ingestion order.
        nearby.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        nearby
    }

    /// Decorate every cataloged attraction with its distance from a point,
    /// without a radius cut. Used when a consumer wants the full set ranked.
    pub fn all_with_distance(&self, latitude: f64, longitude: f64) -> Vec<NearbyAttraction> {
        self.snapshot()
            .iter()
            .enumerate()
            .map(|(ordinal, a)| NearbyAttraction {
                attraction: a.clone(),
                distance: Some(geo::distance_meters(latitude, longitude, a.latitude, a.longitude)),
                ordinal,
            })
            .collect()
    }
}
