#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hex colour: {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u32(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorParseError(s.to_string())),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Self::from_u32)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shading {
    /// Flat colour, unaffected by scene lights.
    Unlit,
    Lit,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub shading: Shading,
}

impl Material {
    pub fn lit(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            shading: Shading::Lit,
        }
    }

    pub fn unlit(color: Color) -> Self {
        Self {
            shading: Shading::Unlit,
            ..Self::lit(color)
        }
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.set_translucent(opacity);
        self
    }

    /// Enables blending and sets opacity. Applying the same value twice is a no-op.
    pub fn set_translucent(&mut self, opacity: f32) {
        self.transparent = true;
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}
