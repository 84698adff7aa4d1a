/// Geographic coordinate in degrees.
///
/// Latitude lies in `[-90, 90]`, longitude in `[-180, 180]`. Values built with
/// [`GeoPoint::try_new`] are checked; [`GeoPoint::new`] trusts the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GeoPointError {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl std::fmt::Display for GeoPointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoPointError::NonFinite => write!(f, "coordinate is not a finite number"),
            GeoPointError::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} outside [-90, 90]")
            }
            GeoPointError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for GeoPointError {}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoPointError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::LongitudeOutOfRange(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    pub fn antipode(self) -> Self {
        compute_antipode(self)
    }
}

/// Brings `longitude + 180` style sums back into `(-180, 180]`.
///
/// Only a single wrap is applied: inputs are expected in `[-180, 540]`.
pub fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Folds any finite longitude into `(-180, 180]`.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > -180.0 && longitude <= 180.0 {
        return longitude;
    }
    let folded = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if folded == -180.0 { 180.0 } else { folded }
}

/// The point diametrically opposite `p` on the sphere.
///
/// Latitude is negated and longitude rotated half a turn. `lon = 0` maps to
/// `180` and `lon = 180` maps back to `0`.
pub fn compute_antipode(p: GeoPoint) -> GeoPoint {
    GeoPoint::new(-p.latitude, wrap_longitude(p.longitude + 180.0))
}
