//! Google Maps static image URLs for the time/location card.

use reqwest::Url;

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

lazy_static::lazy_static! {
    static ref AT_COORDINATES: regex::Regex =
        regex::Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").unwrap();
    static ref QUERY_COORDINATES: regex::Regex =
        regex::Regex::new(r"(-?\d+\.\d+),\s*(-?\d+\.\d+)").unwrap();
}

/// Latitude/longitude pair kept as the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatLng {
    pub lat: String,
    pub lng: String,
}

impl LatLng {
    fn joined(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Finds coordinates in a maps link, from `@lat,lng` or a `q`/`query`
/// parameter.
pub fn extract_lat_lng(map_url: &str) -> Option<LatLng> {
    if let Some(caps) = AT_COORDINATES.captures(map_url) {
        return Some(LatLng {
            lat: caps[1].to_string(),
            lng: caps[2].to_string(),
        });
    }

    let url = Url::parse(map_url).ok()?;
    let query = url
        .query_pairs()
        .find(|(name, _)| name == "q")
        .or_else(|| url.query_pairs().find(|(name, _)| name == "query"))
        .map(|(_, value)| value.into_owned())?;
    let caps = QUERY_COORDINATES.captures(&query)?;
    Some(LatLng {
        lat: caps[1].to_string(),
        lng: caps[2].to_string(),
    })
}

/// Static map image for a location. `None` without an API key.
pub fn static_map_url(api_key: Option<&str>, location: &str, map_url: &str) -> Option<String> {
    let key = api_key.filter(|key| !key.is_empty())?;

    let coordinates = extract_lat_lng(map_url);
    let target = coordinates
        .as_ref()
        .map(LatLng::joined)
        .unwrap_or_else(|| location.to_string());
    let zoom = if coordinates.is_some() { "16" } else { "15" };

    let mut url = Url::parse(STATIC_MAP_ENDPOINT).ok()?;
    url.query_pairs_mut()
        .append_pair("size", "640x360")
        .append_pair("scale", "2")
        .append_pair("maptype", "roadmap")
        .append_pair("zoom", zoom)
        .append_pair("center", &target)
        .append_pair("markers", &format!("color:0xFBBF24|{}", target))
        .append_pair("key", key);
    Some(url.to_string())
}
