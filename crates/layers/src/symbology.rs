use scene::components::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    /// Angular radius in degrees.
    pub size: f64,
    pub color: Color,
    pub label: String,
}

impl MarkerStyle {
    pub fn new(size: f64, color: Color, label: impl Into<String>) -> Self {
        Self {
            size,
            color,
            label: label.into(),
        }
    }
}

/// Styles for the two markers of a search: the searched place and its antipode.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPairStyle {
    pub origin: MarkerStyle,
    pub antipode: MarkerStyle,
    /// Point height as a fraction of the globe radius.
    pub altitude: f64,
}

impl Default for MarkerPairStyle {
    fn default() -> Self {
        Self {
            origin: MarkerStyle::new(0.5, Color::from_u32(0xff0055), "Start"),
            antipode: MarkerStyle::new(0.5, Color::from_u32(0x00ffff), "Antipode"),
            altitude: 0.02,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BeamStyle {
    pub radius: f64,
    pub radial_segments: u32,
    pub color: Color,
    pub opacity: f32,
    /// Endpoint height as a fraction of the globe radius.
    pub altitude: f64,
}

impl Default for BeamStyle {
    fn default() -> Self {
        Self {
            radius: 0.3,
            radial_segments: 8,
            color: Color::from_u32(0x00ffff),
            opacity: 0.9,
            altitude: 0.0,
        }
    }
}
