use std::collections::HashMap;

use foundation::math::GeoPoint;

use crate::{BoxFuture, GeocodeError, Geocoder, PlaceResult};

/// Reverse lookups match a region when both coordinates are within this many degrees.
pub const DEFAULT_REGION_TOLERANCE_DEG: f64 = 0.5;

/// In-process geocoder answering from fixed tables.
///
/// Forward queries match place names case-insensitively after trimming.
/// Reverse queries return the nearest registered region inside the tolerance
/// and the fallback label otherwise.
#[derive(Debug, Clone)]
pub struct MemoryGeocoder {
    places: HashMap<String, PlaceResult>,
    regions: Vec<(GeoPoint, String)>,
    tolerance_deg: f64,
    fallback: String,
    forward_failure: Option<String>,
    reverse_failure: Option<String>,
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

impl MemoryGeocoder {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            places: HashMap::new(),
            regions: Vec::new(),
            tolerance_deg: DEFAULT_REGION_TOLERANCE_DEG,
            fallback: fallback.into(),
            forward_failure: None,
            reverse_failure: None,
        }
    }

    pub fn with_place(mut self, query: &str, point: GeoPoint, display_name: &str) -> Self {
        self.places
            .insert(normalize(query), PlaceResult::new(point, display_name));
        self
    }

    pub fn with_region(mut self, point: GeoPoint, name: &str) -> Self {
        self.regions.push((point, name.to_string()));
        self
    }

    pub fn with_tolerance(mut self, degrees: f64) -> Self {
        self.tolerance_deg = degrees;
        self
    }

    /// Every forward lookup fails with a network error carrying `message`.
    pub fn failing_forward(mut self, message: &str) -> Self {
        self.forward_failure = Some(message.to_string());
        self
    }

    /// Every reverse lookup fails with a network error carrying `message`.
    pub fn failing_reverse(mut self, message: &str) -> Self {
        self.reverse_failure = Some(message.to_string());
        self
    }

    pub fn lookup(&self, query: &str) -> Result<PlaceResult, GeocodeError> {
        if let Some(msg) = &self.forward_failure {
            return Err(GeocodeError::Network(msg.clone()));
        }
        self.places
            .get(&normalize(query))
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound {
                query: query.to_string(),
            })
    }

    pub fn name_region(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        if let Some(msg) = &self.reverse_failure {
            return Err(GeocodeError::Network(msg.clone()));
        }
        let nearest = self
            .regions
            .iter()
            .map(|(p, name)| {
                let dlat = (p.latitude - point.latitude).abs();
                let dlon = (p.longitude - point.longitude).abs();
                (dlat.max(dlon), name)
            })
            .filter(|(d, _)| *d <= self.tolerance_deg)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        Ok(nearest
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

impl Geocoder for MemoryGeocoder {
    fn forward<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PlaceResult, GeocodeError>> {
        Box::pin(async move { self.lookup(query) })
    }

    fn reverse(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, GeocodeError>> {
        Box::pin(async move { self.name_region(point) })
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryGeocoder;
    use crate::{GeocodeError, Geocoder};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    fn sample() -> MemoryGeocoder {
        MemoryGeocoder::new("unresolved area")
            .with_place("Paris", GeoPoint::new(48.85, 2.35), "Paris, France")
            .with_region(GeoPoint::new(-48.85, -177.65), "Chatham Islands, New Zealand")
            .with_region(GeoPoint::new(-48.0, -177.0), "Somewhere Else")
    }

    #[tokio::test]
    async fn forward_is_case_insensitive() {
        let geo = sample();
        let place = geo.forward("  pARIS ").await.unwrap();
        assert_eq!(place.display_name, "Paris, France");
        assert!(geo.forward("Atlantis").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn reverse_picks_nearest_region_within_tolerance() {
        let geo = sample();
        assert_eq!(
            geo.reverse(GeoPoint::new(-48.8, -177.6)).await.unwrap(),
            "Chatham Islands, New Zealand"
        );
        assert_eq!(
            geo.reverse(GeoPoint::new(0.0, 0.0)).await.unwrap(),
            "unresolved area"
        );
    }

    #[tokio::test]
    async fn configured_failures() {
        let geo = sample().failing_forward("offline");
        assert_eq!(
            geo.forward("Paris").await.unwrap_err(),
            GeocodeError::Network("offline".to_string())
        );

        let geo = sample().failing_reverse("offline");
        assert!(geo.forward("Paris").await.is_ok());
        assert!(geo.reverse(GeoPoint::new(1.0, 1.0)).await.is_err());
    }
}
