//! Integration tests for catalog ingestion and queries.

use wayfarer::catalog::{
    AttractionCatalog, AttractionQuery, AttractionSource, CatalogError, Category, RawAttraction,
};
use wayfarer::geo::BoundingBox;

fn raw(name: &str, category: &str, lat: f64, lng: f64) -> RawAttraction {
    RawAttraction {
        name: name.to_string(),
        description: format!("{} description", name),
        category: category.to_string(),
        address: "Singapore".to_string(),
        latitude: lat,
        longitude: lng,
        image_url: None,
        rating: None,
        opening_hours: None,
        website: None,
        contact_info: None,
    }
}

#[test]
fn test_out_of_bounds_record_dropped() {
    let catalog = AttractionCatalog::new(BoundingBox::SINGAPORE);
    let report = catalog.ingest(vec![
        raw("Valid", "Cultural", 1.3000, 103.8000),
        raw("Too Far North", "Cultural", 10.0, 103.8000),
    ]);

    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected_out_of_bounds, 1);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.snapshot()[0].name, "Valid");
}

#[test]
fn test_duplicate_listings_collapse() {
    let catalog = AttractionCatalog::default();
    let report = catalog.ingest(vec![
        raw("Merlion Park", "Cultural", 1.28680, 103.85420),
        // Same site, coordinates differing below the rounding threshold.
        raw("Merlion Park", "Cultural", 1.2868049, 103.8541951),
        raw("Another Place", "Beach", 1.2500, 103.8300),
    ]);

    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected_duplicate, 1);
}

#[test]
fn test_category_and_radius_queries() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(wayfarer::catalog::fallback::builtin_attractions());

    let nature = catalog.by_category("nature & wildlife");
    assert_eq!(nature.len(), 2);
    assert!(nature.iter().all(|a| a.category == Category::NatureWildlife));

    // Marina Bay: the bayfront cluster sits within 1km, the zoo does not.
    let nearby = catalog.within_radius(1.2834, 103.8607, 1000.0);
    assert!(nearby.iter().any(|n| n.attraction.name == "Gardens by the Bay"));
    assert!(nearby.iter().all(|n| n.attraction.name != "Singapore Zoo"));
    assert!(nearby
        .windows(2)
        .all(|w| w[0].distance.unwrap() <= w[1].distance.unwrap()));
}

struct UnreachableSource;

impl AttractionSource for UnreachableSource {
    async fn search(&self, _query: &AttractionQuery) -> Result<Vec<RawAttraction>, CatalogError> {
        Err(CatalogError::SourceUnavailable("dns failure".to_string()))
    }
}

struct LiveSource(Vec<RawAttraction>);

impl AttractionSource for LiveSource {
    async fn search(&self, _query: &AttractionQuery) -> Result<Vec<RawAttraction>, CatalogError> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn test_source_failure_falls_back_to_builtin_dataset() {
    let catalog = AttractionCatalog::default();
    let query = AttractionQuery::near(1.3521, 103.8198).with_radius(2000.0);

    let report = catalog.refresh_from(&UnreachableSource, &query).await;

    assert!(report.degraded);
    assert_eq!(report.accepted, 10);
    assert!(!catalog.is_empty());
}

#[tokio::test]
async fn test_live_source_used_when_available() {
    let catalog = AttractionCatalog::default();
    let source = LiveSource(vec![raw("Fresh POI", "Cultural", 1.3000, 103.8000)]);
    let query = AttractionQuery::near(1.3521, 103.8198);

    let report = catalog.refresh_from(&source, &query).await;

    assert!(!report.degraded);
    assert_eq!(report.accepted, 1);
    assert_eq!(catalog.snapshot()[0].name, "Fresh POI");
}

#[tokio::test]
async fn test_refresh_replaces_snapshot_atomically() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(vec![raw("Old POI", "Cultural", 1.3000, 103.8000)]);
    let before = catalog.snapshot();

    let source = LiveSource(vec![raw("New POI", "Beach", 1.2500, 103.8300)]);
    catalog
        .refresh_from(&source, &AttractionQuery::near(1.3521, 103.8198))
        .await;

    // The old snapshot handle still reads the complete previous set.
    assert_eq!(before[0].name, "Old POI");
    assert_eq!(catalog.snapshot()[0].name, "New POI");
}
