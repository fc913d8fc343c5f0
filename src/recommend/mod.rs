//! Context-aware attraction ranking.
//!
//! Scoring is additive and fully documented term by term so a fixed input
//! always reproduces the same ordering: rating base, exclusive distance
//! tier, interest match, budget affinity, travel-style affinity. Trip
//! duration never moves the score; it only contributes planning tips. The
//! weights are product-tuning values kept in [`ScoringWeights`] rather than
//! scattered literals.

use serde::{Deserialize, Serialize};

use crate::catalog::{Attraction, AttractionCatalog, Category, NearbyAttraction};
use crate::geo;
use crate::location::Position;

/// Search center used when no user location is known (city center).
const DEFAULT_SEARCH_CENTER: (f64, f64) = (1.3521, 103.8198);

/// Spending preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Low,
    Medium,
    High,
}

/// Party composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Solo,
    Couple,
    Family,
    Group,
}

/// Trip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripDuration {
    HalfDay,
    FullDay,
    MultiDay,
}

/// The user's declared preferences, read-only input to ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourismContext {
    pub user_location: Option<Position>,
    pub interests: Vec<Category>,
    pub budget: Option<Budget>,
    pub travel_style: Option<TravelStyle>,
    pub duration: Option<TripDuration>,
}

/// A ranked attraction with its human-readable justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub attraction: Attraction,
    pub relevance_score: f32,
    pub reason: String,
    pub tips: Option<Vec<String>>,
}

/// Scoring weights. Defaults are the tuned product constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Multiplier applied to a 0-5 rating for the base score.
    pub rating_multiplier: f32,
    /// Flat base for attractions without a rating.
    pub unrated_base: f32,
    /// Bonus inside 500m.
    pub very_close_bonus: f32,
    /// Bonus inside 1000m.
    pub walking_bonus: f32,
    /// Bonus inside 2000m.
    pub accessible_bonus: f32,
    /// Bonus when the category matches a declared interest.
    pub interest_bonus: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating_multiplier: 10.0,
            unrated_base: 35.0,
            very_close_bonus: 20.0,
            walking_bonus: 15.0,
            accessible_bonus: 10.0,
            interest_bonus: 25.0,
        }
    }
}

/// Pure, deterministic attraction ranker.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    weights: ScoringWeights,
}

impl Recommender {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Rank candidates for the given context, highest score first. Equal
    /// scores keep catalog ingestion order.
    pub fn rank(
        &self,
        context: &TourismContext,
        candidates: &[NearbyAttraction],
    ) -> Vec<Recommendation> {
        let mut scored: Vec<(Recommendation, usize)> = candidates
            .iter()
            .map(|candidate| (self.score(context, candidate), candidate.ordinal))
            .collect();

        scored.sort_by(|(a, a_ord), (b, b_ord)| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a_ord.cmp(b_ord))
        });

        scored.into_iter().map(|(rec, _)| rec).collect()
    }

    /// Assemble recommendations straight from the catalog: candidates are
    /// gathered per declared interest (or a general nearby sweep when no
    /// interests are set), deduplicated by name, ranked, and truncated.
    pub fn personalized(
        &self,
        catalog: &AttractionCatalog,
        context: &TourismContext,
        limit: usize,
    ) -> Vec<Recommendation> {
        let (lat, lng) = context
            .user_location
            .as_ref()
            .map(|p| (p.latitude, p.longitude))
            .unwrap_or(DEFAULT_SEARCH_CENTER);

        let candidates: Vec<NearbyAttraction> = if context.interests.is_empty() {
            catalog.within_radius(lat, lng, 2000.0)
        } else {
            catalog
                .snapshot()
                .iter()
                .enumerate()
                .filter(|(_, a)| context.interests.contains(&a.category))
                .map(|(ordinal, a)| NearbyAttraction {
                    distance: Some(geo::distance_meters(lat, lng, a.latitude, a.longitude)),
                    attraction: a.clone(),
                    ordinal,
                })
                .collect()
        };

        let mut seen_names: Vec<String> = Vec::new();
        let unique: Vec<NearbyAttraction> = candidates
            .into_iter()
            .filter(|c| {
                if seen_names.contains(&c.attraction.name) {
                    false
                } else {
                    seen_names.push(c.attraction.name.clone());
                    true
                }
            })
            .collect();

        let mut recommendations = self.rank(context, &unique);
        recommendations.truncate(limit);
        recommendations
    }

    fn score(&self, context: &TourismContext, candidate: &NearbyAttraction) -> Recommendation {
        let attraction = &candidate.attraction;
        let w = &self.weights;
        let mut score = match attraction.rating {
            Some(rating) => rating * w.rating_multiplier,
            None => w.unrated_base,
        };
        let mut reasons: Vec<String> = Vec::new();
        let mut tips: Vec<String> = Vec::new();

        // Distance tiers are mutually exclusive; only the closest one fires.
        if let Some(distance) = candidate.distance {
            if distance <= 500.0 {
                score += w.very_close_bonus;
                reasons.push("very close to your location".to_string());
            } else if distance <= 1000.0 {
                score += w.walking_bonus;
                reasons.push("within walking distance".to_string());
            } else if distance <= 2000.0 {
                score += w.accessible_bonus;
                reasons.push("easily accessible".to_string());
            }
        }

        if context.interests.contains(&attraction.category) {
            score += w.interest_bonus;
            reasons.push(format!(
                "matches your interest in {}",
                attraction.category.label().to_lowercase()
            ));
        }

        if let Some(budget) = context.budget {
            let (bonus, reason, tip) = budget_term(attraction.category, budget);
            score += bonus;
            if let Some(reason) = reason {
                reasons.push(reason.to_string());
            }
            if let Some(tip) = tip {
                tips.push(tip.to_string());
            }
        }

        if let Some(style) = context.travel_style {
            let (bonus, reason, tip) = style_term(attraction.category, style);
            score += bonus;
            if let Some(reason) = reason {
                reasons.push(reason.to_string());
            }
            if let Some(tip) = tip {
                tips.push(tip.to_string());
            }
        }

        if let Some(duration) = context.duration {
            tips.push(duration_tip(attraction.category, duration).to_string());
        }

        let reason = if reasons.is_empty() {
            "A popular attraction in Singapore.".to_string()
        } else {
            format!("Recommended because it {}.", reasons.join(", "))
        };

        Recommendation {
            attraction: attraction.clone(),
            relevance_score: score,
            reason,
            tips: (!tips.is_empty()).then_some(tips),
        }
    }
}

/// Budget affinity: free or low-cost categories score under a low budget,
/// premium categories under a high one. Contributes 0-15.
fn budget_term(
    category: Category,
    budget: Budget,
) -> (f32, Option<&'static str>, Option<&'static str>) {
    match budget {
        Budget::Low => match category {
            Category::Beach | Category::Cultural | Category::Historical | Category::Religious => {
                (15.0, Some("fits your budget with free or low-cost entry"), None)
            }
            _ => (0.0, None, Some("Check for free entry times or student discounts")),
        },
        Budget::Medium => match category {
            Category::ArtMuseums | Category::NatureWildlife | Category::Architecture => {
                (10.0, Some("offers good value for money"), None)
            }
            _ => (5.0, None, None),
        },
        Budget::High => match category {
            Category::Family | Category::Nightlife | Category::Shopping | Category::Adventure => {
                (10.0, Some("provides premium experiences"), None)
            }
            _ => (5.0, None, None),
        },
    }
}

/// Travel-style affinity. Contributes 0-15.
fn style_term(
    category: Category,
    style: TravelStyle,
) -> (f32, Option<&'static str>, Option<&'static str>) {
    match style {
        TravelStyle::Family => match category {
            Category::Family | Category::NatureWildlife | Category::Beach => (
                15.0,
                Some("perfect for family visits"),
                Some("Check for family packages and child-friendly facilities"),
            ),
            _ => (0.0, None, None),
        },
        TravelStyle::Solo => match category {
            Category::ArtMuseums | Category::Cultural | Category::Historical => {
                (12.0, Some("ideal for solo exploration and learning"), None)
            }
            _ => (0.0, None, None),
        },
        TravelStyle::Couple => match category {
            Category::Beach | Category::Nightlife | Category::Architecture => (
                12.0,
                Some("romantic and perfect for couples"),
                Some("Consider visiting during sunset for better ambiance"),
            ),
            _ => (0.0, None, None),
        },
        TravelStyle::Group => match category {
            Category::Adventure | Category::Nightlife | Category::Family => (
                12.0,
                Some("great for group activities"),
                Some("Look for group discounts and book in advance"),
            ),
            _ => (0.0, None, None),
        },
    }
}

/// Duration only shapes expectations, never the score.
fn duration_tip(category: Category, duration: TripDuration) -> &'static str {
    match duration {
        TripDuration::HalfDay => match category {
            Category::ArtMuseums | Category::Cultural => "Allow 2-3 hours for a thorough visit",
            _ => "Perfect for a quick 1-2 hour visit",
        },
        TripDuration::FullDay => match category {
            Category::Family | Category::Adventure | Category::NatureWildlife => {
                "Plan to spend the whole day here with breaks for meals"
            }
            _ => "Can be combined with nearby attractions for a full day itinerary",
        },
        TripDuration::MultiDay => "Consider this as part of a multi-day Singapore exploration",
    }
}

/// Plain-text brief of attractions near a point, for prompt injection.
pub fn nearby_context(
    catalog: &AttractionCatalog,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
) -> String {
    let nearby = catalog.within_radius(latitude, longitude, radius_meters);
    if nearby.is_empty() {
        return format!(
            "No major tourist attractions found within {} of the specified location.",
            geo::format_distance(radius_meters)
        );
    }

    let listing: Vec<String> = nearby
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, n)| {
            format!(
                "{}. {} ({}) - {} away",
                i + 1,
                n.attraction.name,
                n.attraction.category,
                geo::format_distance(n.distance.unwrap_or(0.0))
            )
        })
        .collect();

    format!(
        "Nearby attractions within {}:\n{}",
        geo::format_distance(radius_meters),
        listing.join("\n")
    )
}

/// Plain-text brief of a single attraction, for spoken replies.
pub fn format_attraction(nearby: &NearbyAttraction) -> String {
    let attraction = &nearby.attraction;
    let mut formatted = format!(
        "{} is a {} attraction in Singapore. {}",
        attraction.name,
        attraction.category.label().to_lowercase(),
        attraction.description
    );

    if let Some(distance) = nearby.distance {
        formatted.push_str(&format!(
            " It's {} from your current location.",
            geo::format_distance(distance)
        ));
    }
    if let Some(rating) = attraction.rating {
        formatted.push_str(&format!(" Visitors rate it {} out of 5 stars.", rating));
    }
    if let Some(hours) = &attraction.opening_hours {
        formatted.push_str(&format!(" Opening hours: {}.", hours));
    }

    formatted
}
