use std::env;
use std::str::FromStr;
use std::time::Duration;

use foundation::math::{GeoPoint, normalize_longitude};
use geocode::NominatimConfig;
use layers::{BeamStyle, MarkerPairStyle};
use runtime::Trigger;
use scene::GlobeConfig;
use scene::camera::PointOfView;
use scene::components::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid value {value:?} for {key}: expected {expected}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which search result may update the scene when lookups overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StaleResponsePolicy {
    /// Only the most recently issued search may publish; older responses are dropped.
    #[default]
    LatestIssued,
    /// Whichever search finishes last publishes, even if it was issued first.
    LatestCompleted,
}

impl FromStr for StaleResponsePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest-issued" | "issued" => Ok(Self::LatestIssued),
            "latest-completed" | "completed" => Ok(Self::LatestCompleted),
            _ => Err(ConfigError::InvalidValue {
                key: "stale policy".to_string(),
                value: s.to_string(),
                expected: "latest-issued or latest-completed",
            }),
        }
    }
}

/// Camera move issued after a completed search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFraming {
    pub latitude: f64,
    pub altitude: f64,
    pub duration_ms: u64,
    /// Added to the searched longitude before centring.
    pub longitude_offset_deg: f64,
}

impl Default for CameraFraming {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            altitude: 2.5,
            duration_ms: 2000,
            longitude_offset_deg: 0.0,
        }
    }
}

impl CameraFraming {
    pub fn point_of_view(&self, origin: GeoPoint) -> PointOfView {
        PointOfView::new(
            self.latitude,
            normalize_longitude(origin.longitude + self.longitude_offset_deg),
            self.altitude,
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PostProcessConfig {
    pub trigger: Trigger,
    pub opacity: f32,
}

impl PostProcessConfig {
    pub const DEFAULT_DELAY_S: f64 = 1.0;

    /// Readiness-poll trigger with the same one second floor as the fixed delay.
    pub fn when_stable() -> Trigger {
        Trigger::WhenStable {
            min_delay_s: Self::DEFAULT_DELAY_S,
            stable_frames: 10,
            max_wait_s: 10.0,
        }
    }
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            trigger: Trigger::After {
                delay_s: Self::DEFAULT_DELAY_S,
            },
            opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub geocoder: NominatimConfig,
    pub camera: CameraFraming,
    pub post_process: PostProcessConfig,
    pub markers: MarkerPairStyle,
    pub beam: BeamStyle,
    pub stale_policy: StaleResponsePolicy,
    pub globe: GlobeConfig,
    /// Render-loop rate of the shell.
    pub frame_hz: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoder: NominatimConfig::default(),
            camera: CameraFraming::default(),
            post_process: PostProcessConfig::default(),
            markers: MarkerPairStyle::default(),
            beam: BeamStyle::default(),
            stale_policy: StaleResponsePolicy::default(),
            globe: GlobeConfig::default(),
            frame_hz: 60.0,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `ANTIPODE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Defaults overlaid with variables resolved through `vars`.
    ///
    /// Unparsable numbers keep their default; unknown policy names and
    /// colours are errors.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(url) = vars("ANTIPODE_GEOCODER_URL") {
            cfg.geocoder.base_url = url;
        }
        if let Some(agent) = vars("ANTIPODE_USER_AGENT") {
            cfg.geocoder.user_agent = agent;
        }
        if let Some(label) = vars("ANTIPODE_FALLBACK_LABEL") {
            cfg.geocoder.fallback_label = label;
        }
        cfg.geocoder.reverse_zoom =
            env_var_u8(&vars, "ANTIPODE_REVERSE_ZOOM", cfg.geocoder.reverse_zoom);
        let timeout_ms = env_var_u64(&vars, "ANTIPODE_TIMEOUT_MS", 0);
        if timeout_ms > 0 {
            cfg.geocoder.timeout = Some(Duration::from_millis(timeout_ms));
        }

        cfg.camera.altitude = env_var_f64(&vars, "ANTIPODE_CAMERA_ALTITUDE", cfg.camera.altitude);
        cfg.camera.duration_ms =
            env_var_u64(&vars, "ANTIPODE_CAMERA_DURATION_MS", cfg.camera.duration_ms);
        cfg.camera.longitude_offset_deg = env_var_f64(
            &vars,
            "ANTIPODE_CAMERA_LON_OFFSET",
            cfg.camera.longitude_offset_deg,
        );

        if let Some(color) = env_var_color(&vars, "ANTIPODE_ORIGIN_COLOR")? {
            cfg.markers.origin.color = color;
        }
        if let Some(color) = env_var_color(&vars, "ANTIPODE_ANTIPODE_COLOR")? {
            cfg.markers.antipode.color = color;
        }

        cfg.post_process.opacity =
            env_var_f64(&vars, "ANTIPODE_OPACITY", f64::from(cfg.post_process.opacity)) as f32;
        if let Some(value) = vars("ANTIPODE_POST_PROCESS") {
            cfg.post_process.trigger = parse_trigger("ANTIPODE_POST_PROCESS", &value)?;
        }

        if let Some(value) = vars("ANTIPODE_STALE_POLICY") {
            cfg.stale_policy = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ANTIPODE_STALE_POLICY".to_string(),
                value,
                expected: "latest-issued or latest-completed",
            })?;
        }

        cfg.frame_hz = env_var_f64(&vars, "ANTIPODE_FRAME_HZ", cfg.frame_hz);
        Ok(cfg)
    }
}

/// `fixed` for the one second delay, `fixed:<seconds>`, or `stable`.
pub fn parse_trigger(key: &str, value: &str) -> Result<Trigger, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "fixed, fixed:<seconds> or stable",
    };
    let value = value.trim();
    match value.split_once(':') {
        None if value.eq_ignore_ascii_case("fixed") => Ok(Trigger::After {
            delay_s: PostProcessConfig::DEFAULT_DELAY_S,
        }),
        None if value.eq_ignore_ascii_case("stable") => Ok(PostProcessConfig::when_stable()),
        Some((kind, secs)) if kind.eq_ignore_ascii_case("fixed") => {
            let delay_s: f64 = secs.trim().parse().map_err(|_| invalid())?;
            if !delay_s.is_finite() || delay_s < 0.0 {
                return Err(invalid());
            }
            Ok(Trigger::After { delay_s })
        }
        _ => Err(invalid()),
    }
}

fn env_var_color(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Color>, ConfigError> {
    let Some(value) = vars(key) else {
        return Ok(None);
    };
    Color::from_hex(&value)
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
            expected: "#rrggbb or #rgb",
        })
}

fn env_var_u8(vars: &impl Fn(&str) -> Option<String>, key: &str, default: u8) -> u8 {
    vars(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_var_u64(vars: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    vars(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_var_f64(vars: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    vars(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{AppConfig, CameraFraming, ConfigError, StaleResponsePolicy, parse_trigger};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;
    use runtime::Trigger;
    use scene::camera::PointOfView;
    use scene::components::Color;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_frame_the_result() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.camera.latitude, 0.0);
        assert_eq!(cfg.camera.altitude, 2.5);
        assert_eq!(cfg.camera.duration_ms, 2000);
        assert_eq!(cfg.post_process.opacity, 0.5);
        assert_eq!(cfg.post_process.trigger, Trigger::After { delay_s: 1.0 });
        assert_eq!(cfg.stale_policy, StaleResponsePolicy::LatestIssued);
        assert_eq!(cfg.geocoder.timeout, None);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = AppConfig::from_vars(vars(&[
            ("ANTIPODE_GEOCODER_URL", "http://localhost:8080"),
            ("ANTIPODE_TIMEOUT_MS", "2500"),
            ("ANTIPODE_CAMERA_LON_OFFSET", "-90"),
            ("ANTIPODE_POST_PROCESS", "stable"),
            ("ANTIPODE_STALE_POLICY", "latest-completed"),
            ("ANTIPODE_CAMERA_ALTITUDE", "not a number"),
        ]))
        .unwrap();
        assert_eq!(cfg.geocoder.base_url, "http://localhost:8080");
        assert_eq!(cfg.geocoder.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(cfg.camera.longitude_offset_deg, -90.0);
        assert!(matches!(cfg.post_process.trigger, Trigger::WhenStable { .. }));
        assert_eq!(cfg.stale_policy, StaleResponsePolicy::LatestCompleted);
        assert_eq!(cfg.camera.altitude, 2.5);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let err = AppConfig::from_vars(vars(&[("ANTIPODE_STALE_POLICY", "newest")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "ANTIPODE_STALE_POLICY"));
    }

    #[test]
    fn marker_colours_are_checked_up_front() {
        let cfg = AppConfig::from_vars(vars(&[("ANTIPODE_ORIGIN_COLOR", "#f80")])).unwrap();
        assert_eq!(cfg.markers.origin.color, Color::from_u32(0xff8800));
        assert_eq!(cfg.markers.antipode.color, Color::from_u32(0x00ffff));

        let err = AppConfig::from_vars(vars(&[("ANTIPODE_ANTIPODE_COLOR", "cyan")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "ANTIPODE_ANTIPODE_COLOR".to_string(),
                value: "cyan".to_string(),
                expected: "#rrggbb or #rgb",
            }
        );
    }

    #[test]
    fn trigger_strings() {
        assert_eq!(parse_trigger("k", "fixed").unwrap(), Trigger::After { delay_s: 1.0 });
        assert_eq!(parse_trigger("k", "fixed:2.5").unwrap(), Trigger::After { delay_s: 2.5 });
        assert!(parse_trigger("k", "fixed:-1").is_err());
        assert!(parse_trigger("k", "soon").is_err());
    }

    #[test]
    fn camera_centres_searched_longitude() {
        let place = GeoPoint::new(48.75, 2.25);
        assert_eq!(
            CameraFraming::default().point_of_view(place),
            PointOfView::new(0.0, 2.25, 2.5)
        );

        let offset = CameraFraming {
            longitude_offset_deg: -90.0,
            ..CameraFraming::default()
        };
        let pov = offset.point_of_view(GeoPoint::new(-33.9, -151.0));
        assert_eq!(pov.lon, 119.0);
    }
}
