//! The closed tool set offered to the language model.
//!
//! Tool replies come back from the model as a name plus free-form JSON
//! input; they are parsed into [`ToolInvocation`] variants and matched
//! exhaustively. Unknown names parse to `None` and the caller falls back to
//! text handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{json, Value};

use super::model::ToolSpec;

/// Views the UI layer can be asked to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Interactive map with the current attraction set.
    Map,
    /// Swipe-style destination browser.
    Explore,
    /// Conversation view.
    Chat,
}

impl NavigationTarget {
    pub fn parse(view: &str) -> Option<Self> {
        match view.trim().to_ascii_lowercase().as_str() {
            "map" => Some(NavigationTarget::Map),
            "explore" | "swipe" => Some(NavigationTarget::Explore),
            "chat" | "guide" => Some(NavigationTarget::Chat),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavigationTarget::Map => "map",
            NavigationTarget::Explore => "explore",
            NavigationTarget::Chat => "chat",
        }
    }
}

/// A parsed tool request from the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    /// Synthesized weather lookup for a city.
    Weather { city: String, country: Option<String> },
    /// Catalog search by category label.
    SearchCatalog { category: String },
    /// Switch the UI to another view.
    Navigate { view: NavigationTarget },
}

impl ToolInvocation {
    /// Parse a model tool call. Returns `None` for unknown tool names or
    /// inputs missing their required fields.
    pub fn parse(name: &str, input: &Value) -> Option<ToolInvocation> {
        match name {
            "getWeather" => {
                let city = input.get("city")?.as_str()?.to_string();
                let country = input
                    .get("country")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(ToolInvocation::Weather { city, country })
            }
            "searchCatalog" => {
                let category = input.get("category")?.as_str()?.to_string();
                Some(ToolInvocation::SearchCatalog { category })
            }
            "navigateToView" => {
                let view = NavigationTarget::parse(input.get("view")?.as_str()?)?;
                Some(ToolInvocation::Navigate { view })
            }
            _ => None,
        }
    }
}

/// The tool catalog handed to the model on every inference.
pub fn tool_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "getWeather".to_string(),
            description: "Get current weather information for a city or location".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name to get weather for"
                    },
                    "country": {
                        "type": "string",
                        "description": "The country name (optional)"
                    }
                },
                "required": ["city"]
            }),
        },
        ToolSpec {
            name: "searchCatalog".to_string(),
            description: "Search the attraction catalog for a tourism category and show the results on the map"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Attraction category label, e.g. Cultural or Nature & Wildlife"
                    }
                },
                "required": ["category"]
            }),
        },
        ToolSpec {
            name: "navigateToView".to_string(),
            description: "Switch the app to another view".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "view": {
                        "type": "string",
                        "description": "Target view: map, explore, or chat"
                    }
                },
                "required": ["view"]
            }),
        },
    ]
}

/// Synthesize a weather report for a city.
///
/// Non-authoritative by design (no external call in this core). The pick is
/// keyed on the location name so repeated questions get a stable answer.
pub fn synthesize_weather(city: &str, country: Option<&str>) -> String {
    const TEMPERATURES: [i32; 10] = [18, 22, 25, 28, 32, 15, 20, 24, 27, 30];
    const CONDITIONS: [&str; 6] = [
        "Sunny",
        "Partly Cloudy",
        "Cloudy",
        "Rainy",
        "Thunderstorms",
        "Clear",
    ];
    const HUMIDITY: [i32; 7] = [45, 55, 65, 70, 80, 50, 60];
    const WIND_SPEED: [i32; 7] = [5, 8, 12, 15, 18, 10, 14];

    let location = match country {
        Some(country) => format!("{}, {}", city, country),
        None => city.to_string(),
    };

    let mut hasher = DefaultHasher::new();
    location.to_lowercase().hash(&mut hasher);
    let seed = hasher.finish() as usize;

    let temp = TEMPERATURES[seed % TEMPERATURES.len()];
    let condition = CONDITIONS[(seed / 7) % CONDITIONS.len()];
    let humidity = HUMIDITY[(seed / 11) % HUMIDITY.len()];
    let wind = WIND_SPEED[(seed / 13) % WIND_SPEED.len()];

    format!(
        "Current weather in {}: {}°C, {}. Humidity: {}%, Wind: {} km/h. Perfect for exploring the city!",
        location, temp, condition, humidity, wind
    )
}
