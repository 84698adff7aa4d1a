use geocode::PlaceResult;
use layers::{BeamSpec, Marker, MarkerPairStyle, marker_pair};

/// The searched place and the place at its antipode.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePair {
    pub origin: PlaceResult,
    pub antipode: PlaceResult,
}

/// Everything the scene shows for the last published search.
///
/// Always replaced as a whole: markers, beam and info describe the same
/// search or are all empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub markers: Vec<Marker>,
    /// Zero or one element.
    pub beam: Vec<BeamSpec>,
    pub info: Option<PlacePair>,
}

impl SearchState {
    pub fn completed(query: &str, places: PlacePair, style: &MarkerPairStyle) -> Self {
        let (start, end) = (places.origin.point, places.antipode.point);
        Self {
            query: query.to_string(),
            markers: marker_pair(start, end, style),
            beam: vec![BeamSpec::new(start, end)],
            info: Some(places),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_none()
    }
}
