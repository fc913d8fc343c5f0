//! Built-in attraction dataset for the operating region.
//!
//! Used whenever the live data source is unreachable so that ranking and
//! proximity alerting keep working offline. Ten well-known Singapore
//! landmarks spanning the category set.

use super::types::RawAttraction;

fn record(
    name: &str,
    description: &str,
    category: &str,
    address: &str,
    latitude: f64,
    longitude: f64,
    rating: f32,
    opening_hours: &str,
    website: Option<&str>,
    contact_info: &str,
) -> RawAttraction {
    RawAttraction {
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        address: address.to_string(),
        latitude,
        longitude,
        image_url: None,
        rating: Some(rating),
        opening_hours: Some(opening_hours.to_string()),
        website: website.map(str::to_string),
        contact_info: Some(contact_info.to_string()),
    }
}

/// The fallback dataset, in a fixed order so ingestion ordinals are stable.
pub fn builtin_attractions() -> Vec<RawAttraction> {
    vec![
        record(
            "Marina Bay Sands",
            "Iconic integrated resort with infinity pool, casino, shopping mall, and observation deck offering panoramic city views",
            "Architecture",
            "10 Bayfront Ave, Singapore 018956",
            1.2834,
            103.8607,
            4.5,
            "24 hours",
            Some("https://www.marinabaysands.com"),
            "+65 6688 8888",
        ),
        record(
            "Gardens by the Bay",
            "Futuristic botanical gardens featuring the iconic Supertree Grove and climate-controlled conservatories",
            "Nature & Wildlife",
            "18 Marina Gardens Dr, Singapore 018953",
            1.2816,
            103.8636,
            4.6,
            "5:00 AM - 2:00 AM daily",
            Some("https://www.gardensbythebay.com.sg"),
            "+65 6420 6848",
        ),
        record(
            "Singapore Zoo",
            "World-renowned open-concept zoo home to over 2,800 animals from around the world",
            "Nature & Wildlife",
            "80 Mandai Lake Rd, Singapore 729826",
            1.4043,
            103.7930,
            4.4,
            "8:30 AM - 6:00 PM daily",
            Some("https://www.wrs.com.sg/singapore-zoo"),
            "+65 6269 3411",
        ),
        record(
            "Universal Studios Singapore",
            "Southeast Asia's first and only Universal Studios theme park with thrilling rides and movie-themed attractions",
            "Family",
            "8 Sentosa Gateway, Singapore 098269",
            1.2540,
            103.8239,
            4.3,
            "10:00 AM - 7:00 PM (varies by season)",
            Some("https://www.rwsentosa.com/en/attractions/universal-studios-singapore"),
            "+65 6577 8899",
        ),
        record(
            "Singapore Art Museum",
            "Premier contemporary art museum showcasing Southeast Asian and international contemporary art",
            "Art & Museums",
            "71 Bras Basah Rd, Singapore 189555",
            1.2966,
            103.8520,
            4.2,
            "10:00 AM - 7:00 PM (Closed Mondays)",
            Some("https://www.singaporeartmuseum.sg"),
            "+65 6332 3222",
        ),
        record(
            "Chinatown Heritage Centre",
            "Historic ethnic quarter featuring traditional shophouses, temples, and authentic Chinese cultural experiences",
            "Cultural",
            "48 Pagoda St, Singapore 059207",
            1.2831,
            103.8448,
            4.1,
            "9:00 AM - 8:00 PM daily",
            Some("https://www.chinatownheritagecentre.com.sg"),
            "+65 6325 2878",
        ),
        record(
            "Clarke Quay",
            "Vibrant riverside entertainment district with restaurants, bars, and exciting nightlife along the Singapore River",
            "Nightlife",
            "3 River Valley Rd, Singapore 179024",
            1.2884,
            103.8465,
            4.0,
            "6:00 PM - 2:00 AM (varies by establishment)",
            None,
            "+65 6337 3292",
        ),
        record(
            "Sentosa Beach",
            "Popular beach resort island with sandy beaches, water sports, and recreational activities",
            "Beach",
            "Sentosa Island, Singapore",
            1.2494,
            103.8303,
            4.2,
            "24 hours (beach access)",
            Some("https://www.sentosa.com.sg"),
            "+65 1800 736 8672",
        ),
        record(
            "Buddha Tooth Relic Temple",
            "Magnificent Buddhist temple housing sacred relics and showcasing Buddhist art and culture",
            "Religious",
            "288 South Bridge Rd, Singapore 058840",
            1.2807,
            103.8454,
            4.3,
            "7:00 AM - 7:00 PM daily",
            Some("https://www.btrts.org.sg"),
            "+65 6220 0220",
        ),
        record(
            "National Museum of Singapore",
            "Singapore's oldest museum featuring the country's history, culture, and heritage",
            "Historical",
            "93 Stamford Rd, Singapore 178897",
            1.2966,
            103.8484,
            4.1,
            "10:00 AM - 7:00 PM daily",
            Some("https://www.nationalmuseum.sg"),
            "+65 6332 3659",
        ),
    ]
}
