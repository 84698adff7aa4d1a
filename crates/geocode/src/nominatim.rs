//! Nominatim (OpenStreetMap) HTTP client.
//!
//! Forward: `GET {base}/search?format=json&q=<query>`, a JSON array of hits
//! carrying decimal-string `lat`/`lon` and a `display_name`; the first hit is
//! used. Reverse: `GET {base}/reverse?format=json&lat=..&lon=..&zoom=..`, a
//! single object whose `display_name` is absent (or replaced by an `error`
//! field) over unnamed areas.

use std::time::Duration;

use foundation::math::GeoPoint;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{BoxFuture, GeocodeError, Geocoder, PlaceResult};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_FALLBACK_LABEL: &str = "unresolved area";

#[derive(Debug, Clone, PartialEq)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Sent with every request; the public service rejects anonymous clients.
    pub user_agent: String,
    /// Reverse lookup precision. 10 names cities and large regions.
    pub reverse_zoom: u8,
    pub fallback_label: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("antipode/", env!("CARGO_PKG_VERSION")).to_string(),
            reverse_zoom: 10,
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
}

/// Decodes a `/search` response into its first match.
pub fn parse_search_response(query: &str, body: &[u8]) -> Result<PlaceResult, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_slice(body).map_err(|e| GeocodeError::network("invalid search response", e))?;
    let Some(first) = hits.into_iter().next() else {
        return Err(GeocodeError::NotFound {
            query: query.to_string(),
        });
    };

    let lat: f64 = first
        .lat
        .trim()
        .parse()
        .map_err(|e| GeocodeError::network("invalid latitude", e))?;
    let lon: f64 = first
        .lon
        .trim()
        .parse()
        .map_err(|e| GeocodeError::network("invalid longitude", e))?;
    let point =
        GeoPoint::try_new(lat, lon).map_err(|e| GeocodeError::network("invalid coordinate", e))?;

    Ok(PlaceResult::new(point, first.display_name))
}

/// Decodes a `/reverse` response, substituting `fallback` for unnamed areas.
pub fn parse_reverse_response(body: &[u8], fallback: &str) -> Result<String, GeocodeError> {
    let hit: ReverseHit = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::network("invalid reverse response", e))?;
    Ok(hit
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string()))
}

pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GeocodeError::network("failed to build HTTP client", e))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_body(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<u8>, GeocodeError> {
        let url = self.endpoint(path);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| GeocodeError::network("HTTP request failed", e))?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Network(format!("HTTP error: {}", resp.status())));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GeocodeError::network("failed to read response", e))?;
        Ok(bytes.to_vec())
    }
}

impl Geocoder for NominatimClient {
    fn forward<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PlaceResult, GeocodeError>> {
        Box::pin(async move {
            debug!(query, "forward geocode");
            let params = [("format", "json".to_string()), ("q", query.to_string())];
            let body = self.get_body("search", &params).await.inspect_err(|e| {
                warn!(query, error = %e, "forward geocode failed");
            })?;
            parse_search_response(query, &body)
        })
    }

    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, GeocodeError>> {
        Box::pin(async move {
            debug!(lat = point.latitude, lon = point.longitude, "reverse geocode");
            let params = [
                ("format", "json".to_string()),
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("zoom", self.config.reverse_zoom.to_string()),
            ];
            let body = self.get_body("reverse", &params).await.inspect_err(|e| {
                warn!(lat = point.latitude, lon = point.longitude, error = %e, "reverse geocode failed");
            })?;
            parse_reverse_response(&body, &self.config.fallback_label)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, response::IntoResponse};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{NominatimClient, NominatimConfig, parse_reverse_response, parse_search_response};
    use crate::{GeocodeError, Geocoder, PlaceResult};

    const PARIS: &str = r#"[
        {"place_id": 1, "lat": "48.8588897", "lon": "2.3200410",
         "display_name": "Paris, Île-de-France, France métropolitaine, France"},
        {"place_id": 2, "lat": "33.6617962", "lon": "-95.5555130",
         "display_name": "Paris, Lamar County, Texas, United States"}
    ]"#;

    #[test]
    fn takes_first_search_hit() {
        let place = parse_search_response("Paris", PARIS.as_bytes()).unwrap();
        assert_eq!(
            place,
            PlaceResult::new(
                GeoPoint::new(48.8588897, 2.3200410),
                "Paris, Île-de-France, France métropolitaine, France"
            )
        );
    }

    #[test]
    fn empty_search_is_not_found() {
        let err = parse_search_response("Atlantis", b"[]").unwrap_err();
        assert_eq!(
            err,
            GeocodeError::NotFound {
                query: "Atlantis".to_string()
            }
        );
    }

    #[test]
    fn malformed_search_is_network_error() {
        assert!(matches!(
            parse_search_response("x", b"{not json"),
            Err(GeocodeError::Network(_))
        ));
        let bad_lat = br#"[{"lat": "north", "lon": "2.0", "display_name": "x"}]"#;
        assert!(matches!(
            parse_search_response("x", bad_lat),
            Err(GeocodeError::Network(_))
        ));
        let out_of_range = br#"[{"lat": "95.0", "lon": "2.0", "display_name": "x"}]"#;
        assert!(matches!(
            parse_search_response("x", out_of_range),
            Err(GeocodeError::Network(_))
        ));
    }

    #[test]
    fn reverse_without_name_falls_back() {
        let ocean = br#"{"error": "Unable to geocode"}"#;
        assert_eq!(parse_reverse_response(ocean, "unresolved area").unwrap(), "unresolved area");
        let blank = br#"{"display_name": "  "}"#;
        assert_eq!(parse_reverse_response(blank, "unresolved area").unwrap(), "unresolved area");
        let named = br#"{"display_name": "Chatham Islands, New Zealand"}"#;
        assert_eq!(
            parse_reverse_response(named, "unresolved area").unwrap(),
            "Chatham Islands, New Zealand"
        );
        assert!(parse_reverse_response(b"<html>", "x").is_err());
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: String) -> NominatimClient {
        NominatimClient::new(NominatimConfig {
            base_url,
            ..NominatimConfig::default()
        })
        .unwrap()
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let body: serde_json::Value = match (params.get("format"), params.get("q")) {
            (Some(f), Some(q)) if f == "json" && q == "São Paulo" => json!([
                {"lat": "-23.5506507", "lon": "-46.6333824", "display_name": "São Paulo, Brasil"}
            ]),
            _ => json!([]),
        };
        Json(body)
    }

    async fn reverse(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let zoom_ok = params.get("zoom").map(String::as_str) == Some("10");
        let lat: f64 = params.get("lat").and_then(|v| v.parse().ok()).unwrap_or(0.0);
        if zoom_ok && lat > 20.0 {
            Json(json!({"display_name": "Shizuoka Prefecture, Japan"}))
        } else {
            Json(json!({"error": "Unable to geocode"}))
        }
    }

    #[tokio::test]
    async fn forward_over_http_encodes_query() {
        let app = Router::new().route("/search", get(search));
        let geocoder = client(serve(app).await);

        let place = geocoder.forward("São Paulo").await.unwrap();
        assert_eq!(place.point, GeoPoint::new(-23.5506507, -46.6333824));
        assert_eq!(place.short_name(), "São Paulo");

        let err = geocoder.forward("Atlantis").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn reverse_over_http_uses_fallback() {
        let app = Router::new().route("/reverse", get(reverse));
        let geocoder = client(serve(app).await);

        let named = geocoder.reverse(GeoPoint::new(23.55, 133.37)).await.unwrap();
        assert_eq!(named, "Shizuoka Prefecture, Japan");
        let ocean = geocoder.reverse(GeoPoint::new(-48.85, -177.65)).await.unwrap();
        assert_eq!(ocean, "unresolved area");
    }

    #[tokio::test]
    async fn server_error_is_network_error() {
        let app = Router::new().route(
            "/search",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        );
        let geocoder = client(serve(app).await);
        let err = geocoder.forward("Paris").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Network(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let geocoder = client("http://127.0.0.1:1".to_string());
        let err = geocoder.reverse(GeoPoint::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Network(_)));
    }
}
