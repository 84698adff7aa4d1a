use foundation::math::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub point: GeoPoint,
    pub display_name: String,
}

impl PlaceResult {
    pub fn new(point: GeoPoint, display_name: impl Into<String>) -> Self {
        Self {
            point,
            display_name: display_name.into(),
        }
    }

    /// Leading component of the display name (`"Paris, Île-de-France, …"` → `"Paris"`).
    pub fn short_name(&self) -> &str {
        short_name(&self.display_name)
    }
}

pub fn short_name(display_name: &str) -> &str {
    display_name.split(',').next().unwrap_or(display_name).trim()
}
