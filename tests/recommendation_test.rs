//! Integration tests for recommendation ranking.

use wayfarer::catalog::{AttractionCatalog, Category, NearbyAttraction, RawAttraction};
use wayfarer::recommend::{Budget, Recommender, TourismContext, TravelStyle, TripDuration};

fn raw(name: &str, category: &str, rating: Option<f32>, lat: f64, lng: f64) -> RawAttraction {
    RawAttraction {
        name: name.to_string(),
        description: format!("{} description", name),
        category: category.to_string(),
        address: "Singapore".to_string(),
        latitude: lat,
        longitude: lng,
        image_url: None,
        rating,
        opening_hours: None,
        website: None,
        contact_info: None,
    }
}

fn candidates_from(catalog: &AttractionCatalog, lat: f64, lng: f64) -> Vec<NearbyAttraction> {
    catalog.all_with_distance(lat, lng)
}

#[test]
fn test_ranking_is_deterministic() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(vec![
        raw("Museum", "Art & Museums", Some(4.2), 1.2966, 103.8520),
        raw("Temple", "Religious", Some(4.3), 1.2807, 103.8454),
        raw("Quay", "Nightlife", Some(4.0), 1.2884, 103.8465),
    ]);
    let candidates = candidates_from(&catalog, 1.2900, 103.8500);

    let context = TourismContext {
        interests: vec![Category::ArtMuseums],
        budget: Some(Budget::Medium),
        travel_style: Some(TravelStyle::Solo),
        duration: Some(TripDuration::HalfDay),
        ..Default::default()
    };
    let ranker = Recommender::default();

    let first = ranker.rank(&context, &candidates);
    let second = ranker.rank(&context, &candidates);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.attraction.id, b.attraction.id);
        assert_eq!(a.relevance_score, b.relevance_score);
        assert_eq!(a.reason, b.reason);
        assert_eq!(a.tips, b.tips);
    }
}

#[test]
fn test_identical_scores_keep_catalog_order() {
    let catalog = AttractionCatalog::default();
    // Same category, same rating, both beyond every distance tier: the
    // scores come out identical.
    catalog.ingest(vec![
        raw("First In", "Cultural", Some(4.0), 1.4400, 103.7800),
        raw("Second In", "Cultural", Some(4.0), 1.4400, 103.8600),
    ]);
    let candidates = candidates_from(&catalog, 1.2500, 103.8200);
    let ranker = Recommender::default();

    let recs = ranker.rank(&TourismContext::default(), &candidates);

    assert_eq!(recs[0].relevance_score, recs[1].relevance_score);
    assert_eq!(recs[0].attraction.name, "First In");
    assert_eq!(recs[1].attraction.name, "Second In");
}

#[test]
fn test_interest_and_distance_outrank_rating() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(vec![
        // Highly rated but far and off-interest.
        raw("Famous Far", "Shopping", Some(5.0), 1.4043, 103.7930),
        // Modest rating, nearby, matches the declared interest.
        raw("Close Match", "Cultural", Some(3.5), 1.2831, 103.8448),
    ]);
    let candidates = candidates_from(&catalog, 1.2834, 103.8450);

    let context = TourismContext {
        interests: vec![Category::Cultural],
        ..Default::default()
    };
    let recs = Recommender::default().rank(&context, &candidates);

    // 3.5*10 + 20 (very close) + 25 (interest) = 80 vs 5.0*10 = 50.
    assert_eq!(recs[0].attraction.name, "Close Match");
    assert_eq!(recs[0].relevance_score, 80.0);
    assert_eq!(recs[1].relevance_score, 50.0);
}

#[test]
fn test_reasons_and_tips_reflect_fired_terms() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(vec![raw("Beach Spot", "Beach", None, 1.2494, 103.8303)]);
    let candidates = candidates_from(&catalog, 1.2500, 103.8300);

    let context = TourismContext {
        interests: vec![Category::Beach],
        budget: Some(Budget::Low),
        travel_style: Some(TravelStyle::Family),
        duration: Some(TripDuration::FullDay),
        ..Default::default()
    };
    let recs = Recommender::default().rank(&context, &candidates);
    let rec = &recs[0];

    assert!(rec.reason.starts_with("Recommended because it "));
    assert!(rec.reason.contains("very close to your location"));
    assert!(rec.reason.contains("matches your interest in beach"));
    assert!(rec.reason.contains("fits your budget with free or low-cost entry"));
    assert!(rec.reason.contains("perfect for family visits"));

    let tips = rec.tips.as_ref().unwrap();
    assert!(tips.iter().any(|t| t.contains("family packages")));
    assert!(tips.iter().any(|t| t.contains("Can be combined with nearby attractions")));
}

#[test]
fn test_personalized_pulls_from_catalog() {
    let catalog = AttractionCatalog::default();
    catalog.ingest(wayfarer::catalog::fallback::builtin_attractions());

    let context = TourismContext {
        interests: vec![Category::NatureWildlife],
        budget: Some(Budget::Medium),
        ..Default::default()
    };
    let recs = Recommender::default().personalized(&catalog, &context, 5);

    assert!(!recs.is_empty());
    assert!(recs.len() <= 5);
    assert!(recs
        .iter()
        .all(|r| r.attraction.category == Category::NatureWildlife));
    // Descending scores throughout.
    assert!(recs
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));
}
