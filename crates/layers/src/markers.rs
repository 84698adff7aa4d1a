use foundation::math::GeoPoint;
use scene::PointDatum;
use scene::components::Color;

use crate::symbology::{MarkerPairStyle, MarkerStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub point: GeoPoint,
    pub size: f64,
    pub color: Color,
    pub label: String,
}

impl Marker {
    pub fn styled(point: GeoPoint, style: &MarkerStyle) -> Self {
        Self {
            point,
            size: style.size,
            color: style.color,
            label: style.label.clone(),
        }
    }

    pub fn to_point_datum(&self, altitude: f64) -> PointDatum {
        PointDatum {
            point: self.point,
            radius_deg: self.size,
            altitude,
            color: self.color,
            label: self.label.clone(),
        }
    }
}

/// The origin and antipode markers of one search, origin first.
pub fn marker_pair(origin: GeoPoint, antipode: GeoPoint, style: &MarkerPairStyle) -> Vec<Marker> {
    vec![
        Marker::styled(origin, &style.origin),
        Marker::styled(antipode, &style.antipode),
    ]
}

/// Point-layer data for a marker set.
pub fn points_from_markers(markers: &[Marker], altitude: f64) -> Vec<PointDatum> {
    markers.iter().map(|m| m.to_point_datum(altitude)).collect()
}

#[cfg(test)]
mod tests {
    use super::{Marker, marker_pair, points_from_markers};
    use crate::symbology::MarkerPairStyle;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use scene::components::Color;

    #[test]
    fn pair_is_origin_then_antipode() {
        let origin = GeoPoint::new(40.0, -74.0);
        let markers = marker_pair(origin, origin.antipode(), &MarkerPairStyle::default());
        assert_eq!(
            markers,
            vec![
                Marker {
                    point: GeoPoint::new(40.0, -74.0),
                    size: 0.5,
                    color: Color::from_u32(0xff0055),
                    label: "Start".to_string(),
                },
                Marker {
                    point: GeoPoint::new(-40.0, 106.0),
                    size: 0.5,
                    color: Color::from_u32(0x00ffff),
                    label: "Antipode".to_string(),
                },
            ]
        );
    }

    #[test]
    fn converts_to_point_data() {
        let markers = marker_pair(
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(-1.0, -178.0),
            &MarkerPairStyle::default(),
        );
        let points = points_from_markers(&markers, 0.02);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].color, Color::from_u32(0xff0055));
        assert_eq!(points[1].altitude, 0.02);
        assert_eq!(points[1].radius_deg, 0.5);
    }
}
