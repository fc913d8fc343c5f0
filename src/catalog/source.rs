//! Attraction data source client.
//!
//! Fetches points of interest from the Singapore Tourism Board search API
//! and normalizes the upstream GeoJSON-feature schema into [`RawAttraction`]
//! records. The catalog treats any failure here as a signal to fall back to
//! the built-in dataset; see [`super::AttractionCatalog::refresh_from`].

use std::time::Duration;

use serde::Deserialize;

use super::types::RawAttraction;
use super::CatalogError;
use crate::geo::BoundingBox;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.stb.gov.sg";

/// Parameters for an attraction search.
#[derive(Debug, Clone)]
pub struct AttractionQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Optional category label filter.
    pub category: Option<String>,
    /// Search radius in meters.
    pub radius_meters: f64,
    /// Maximum number of records to request.
    pub limit: usize,
}

impl AttractionQuery {
    /// A search centered on a coordinate with the default radius and limit.
    pub fn near(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            category: None,
            radius_meters: 1000.0,
            limit: 20,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Trait for attraction data sources.
pub trait AttractionSource: Send + Sync {
    /// Search for attractions near a coordinate.
    fn search(
        &self,
        query: &AttractionQuery,
    ) -> impl std::future::Future<Output = Result<Vec<RawAttraction>, CatalogError>> + Send;
}

/// Search API response (simplified).
#[derive(Debug, Deserialize)]
struct StbResponse {
    #[allow(dead_code)]
    total: Option<u32>,
    features: Vec<StbFeature>,
}

#[derive(Debug, Deserialize)]
struct StbFeature {
    properties: StbProperties,
    geometry: StbGeometry,
}

#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
struct StbProperties {
    NAME: String,
    DESCRIPTION: Option<String>,
    PHOTOURL: Option<String>,
    ADDRESSBLOCKHOUSENUMBER: Option<String>,
    ADDRESSBUILDINGNAME: Option<String>,
    ADDRESSSTREETNAME: Option<String>,
    ADDRESSPOSTALCODE: Option<String>,
    OFFICIALWEBSITE: Option<String>,
    OPENINGHOURS: Option<String>,
    CONTACT: Option<String>,
    RATING: Option<f32>,
    CATEGORY: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StbGeometry {
    /// [longitude, latitude]
    coordinates: [f64; 2],
}

/// HTTP client for the tourism board search API.
pub struct StbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    bounds: BoundingBox,
}

impl StbClient {
    /// Create a client for the default endpoint and operating region.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL (tests, staging).
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url,
            api_key,
            bounds: BoundingBox::SINGAPORE,
        }
    }

    fn build_url(&self, query: &AttractionQuery) -> String {
        let mut url = format!(
            "{}/attractions/search?lat={}&lng={}&radius={}&limit={}",
            self.base_url,
            query.latitude,
            query.longitude,
            query.radius_meters.round() as i64,
            query.limit
        );
        if let Some(category) = &query.category {
            url.push_str("&category=");
            // The category labels only contain spaces and ampersands beyond
            // alphanumerics; encode just those.
            url.push_str(&category.replace('&', "%26").replace(' ', "%20"));
        }
        url
    }

    fn transform(&self, response: StbResponse) -> Vec<RawAttraction> {
        response
            .features
            .into_iter()
            .map(|feature| {
                let props = feature.properties;
                let [longitude, latitude] = feature.geometry.coordinates;

                let address_parts: Vec<String> = [
                    props.ADDRESSBLOCKHOUSENUMBER,
                    props.ADDRESSBUILDINGNAME,
                    props.ADDRESSSTREETNAME,
                    props.ADDRESSPOSTALCODE,
                ]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect();

                RawAttraction {
                    name: props.NAME,
                    description: props
                        .DESCRIPTION
                        .unwrap_or_else(|| "A popular attraction in Singapore".to_string()),
                    category: props.CATEGORY.unwrap_or_else(|| "General".to_string()),
                    address: if address_parts.is_empty() {
                        "Singapore".to_string()
                    } else {
                        address_parts.join(", ")
                    },
                    latitude,
                    longitude,
                    image_url: props.PHOTOURL,
                    rating: props.RATING,
                    opening_hours: props.OPENINGHOURS,
                    website: props.OFFICIALWEBSITE,
                    contact_info: props.CONTACT,
                }
            })
            .collect()
    }
}

impl AttractionSource for StbClient {
    async fn search(&self, query: &AttractionQuery) -> Result<Vec<RawAttraction>, CatalogError> {
        if !self.bounds.contains(query.latitude, query.longitude) {
            return Err(CatalogError::OutOfBounds {
                latitude: query.latitude,
                longitude: query.longitude,
            });
        }

        let url = self.build_url(query);
        tracing::debug!("Fetching attractions from {}", url);

        let mut request = self.http.get(&url).header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::SourceUnavailable(format!(
                "API returned status {}",
                status
            )));
        }

        let parsed: StbResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(self.transform(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = AttractionQuery::near(1.3521, 103.8198)
            .with_category("Cultural")
            .with_radius(3000.0)
            .with_limit(50);
        assert_eq!(query.category.as_deref(), Some("Cultural"));
        assert_eq!(query.radius_meters, 3000.0);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_build_url_encodes_category() {
        let client = StbClient::with_base_url(None, "https://example.test".to_string());
        let query = AttractionQuery::near(1.3521, 103.8198).with_category("Art & Museums");
        let url = client.build_url(&query);
        assert!(url.starts_with("https://example.test/attractions/search?lat=1.3521"));
        assert!(url.contains("category=Art%20%26%20Museums"));
    }

    #[tokio::test]
    async fn test_out_of_bounds_query_rejected() {
        let client = StbClient::with_base_url(None, "https://example.test".to_string());
        let query = AttractionQuery::near(10.0, 103.8);
        let err = client.search(&query).await.unwrap_err();
        assert!(matches!(err, CatalogError::OutOfBounds { .. }));
    }

    #[test]
    fn test_transform_fills_defaults() {
        let client = StbClient::with_base_url(None, "https://example.test".to_string());
        let response = StbResponse {
            total: Some(1),
            features: vec![StbFeature {
                properties: StbProperties {
                    NAME: "Merlion Park".to_string(),
                    DESCRIPTION: None,
                    PHOTOURL: None,
                    ADDRESSBLOCKHOUSENUMBER: None,
                    ADDRESSBUILDINGNAME: None,
                    ADDRESSSTREETNAME: None,
                    ADDRESSPOSTALCODE: None,
                    OFFICIALWEBSITE: None,
                    OPENINGHOURS: None,
                    CONTACT: None,
                    RATING: None,
                    CATEGORY: None,
                },
                geometry: StbGeometry {
                    coordinates: [103.8542, 1.2868],
                },
            }],
        };

        let records = client.transform(response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Merlion Park");
        assert_eq!(records[0].latitude, 1.2868);
        assert_eq!(records[0].longitude, 103.8542);
        assert_eq!(records[0].description, "A popular attraction in Singapore");
        assert_eq!(records[0].category, "General");
        assert_eq!(records[0].address, "Singapore");
    }
}
