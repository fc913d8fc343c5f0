//! Attraction data model.

use serde::{Deserialize, Serialize};

/// Fixed Singapore tourism category set.
///
/// `General` is the catch-all the data source maps unknown or missing
/// categories onto; every other variant matches an upstream category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ArtMuseums,
    NatureWildlife,
    Architecture,
    Cultural,
    Family,
    Beach,
    Nightlife,
    FoodCulinary,
    Shopping,
    Historical,
    Religious,
    Adventure,
    Wellness,
    FestivalEvents,
    General,
}

impl Category {
    /// All selectable categories, in the order the preference flow lists them.
    pub const ALL: [Category; 14] = [
        Category::ArtMuseums,
        Category::NatureWildlife,
        Category::Architecture,
        Category::Cultural,
        Category::Family,
        Category::Beach,
        Category::Nightlife,
        Category::FoodCulinary,
        Category::Shopping,
        Category::Historical,
        Category::Religious,
        Category::Adventure,
        Category::Wellness,
        Category::FestivalEvents,
    ];

    /// Human-readable label, matching the upstream data source.
    pub fn label(&self) -> &'static str {
        match self {
            Category::ArtMuseums => "Art & Museums",
            Category::NatureWildlife => "Nature & Wildlife",
            Category::Architecture => "Architecture",
            Category::Cultural => "Cultural",
            Category::Family => "Family",
            Category::Beach => "Beach",
            Category::Nightlife => "Nightlife",
            Category::FoodCulinary => "Food & Culinary",
            Category::Shopping => "Shopping",
            Category::Historical => "Historical",
            Category::Religious => "Religious",
            Category::Adventure => "Adventure",
            Category::Wellness => "Wellness",
            Category::FestivalEvents => "Festival & Events",
            Category::General => "General",
        }
    }

    /// Parse a category from its label, case-insensitively. Unknown labels
    /// map to `General` rather than failing, mirroring the data source.
    pub fn parse(label: &str) -> Category {
        let trimmed = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Category::General)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A point of interest as the data source hands it over, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAttraction {
    pub name: String,
    pub description: String,
    pub category: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub rating: Option<f32>,
    pub opening_hours: Option<String>,
    pub website: Option<String>,
    pub contact_info: Option<String>,
}

/// A validated point of interest in the working catalog.
///
/// Canonical records are never mutated in place; anything derived (distance
/// from the user, ranking scores) is attached to copies downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    /// Stable identity derived from name and rounded coordinates.
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    /// Visitor rating on a 0-5 scale, when the source provides one.
    pub rating: Option<f32>,
    pub opening_hours: Option<String>,
    pub website: Option<String>,
    pub contact_info: Option<String>,
}

impl Attraction {
    /// Derive the stable identity for a record: name plus coordinates
    /// rounded to four decimal places (~11m), enough to collapse duplicate
    /// listings of the same site across source pages.
    pub fn derive_id(name: &str, latitude: f64, longitude: f64) -> String {
        format!("{}_{:.4}_{:.4}", name.trim(), latitude, longitude)
    }

    pub(crate) fn from_raw(raw: RawAttraction) -> Attraction {
        let id = Attraction::derive_id(&raw.name, raw.latitude, raw.longitude);
        Attraction {
            id,
            name: raw.name,
            description: raw.description,
            category: Category::parse(&raw.category),
            address: raw.address,
            latitude: raw.latitude,
            longitude: raw.longitude,
            image_url: raw.image_url,
            rating: raw.rating,
            opening_hours: raw.opening_hours,
            website: raw.website,
            contact_info: raw.contact_info,
        }
    }
}

/// An attraction decorated with its distance from a reference point.
///
/// `ordinal` is the attraction's ingestion index in the catalog, carried so
/// downstream ranking can tie-break deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAttraction {
    pub attraction: Attraction,
    /// Meters from the reference point; `None` when no reference location
    /// was available (category-only queries).
    pub distance: Option<f64>,
    pub ordinal: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(Category::parse("cultural"), Category::Cultural);
        assert_eq!(Category::parse("ART & MUSEUMS"), Category::ArtMuseums);
        assert_eq!(Category::parse(" Nature & Wildlife "), Category::NatureWildlife);
    }

    #[test]
    fn test_category_parse_unknown_is_general() {
        assert_eq!(Category::parse("Spelunking"), Category::General);
        assert_eq!(Category::parse(""), Category::General);
    }

    #[test]
    fn test_derive_id_rounds_coordinates() {
        let a = Attraction::derive_id("Merlion Park", 1.28680, 103.85420);
        let b = Attraction::derive_id("Merlion Park", 1.2868049, 103.8541951);
        assert_eq!(a, b);
        assert_eq!(a, "Merlion Park_1.2868_103.8542");
    }
}
