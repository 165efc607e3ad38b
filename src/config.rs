use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{OrbitConfig, Projection};
use crate::core::controller::PointerButton;

pub const AVATAR_SPIN_PER_TICK: f32 = 0.005;
pub const CLEAR_COLOR: u32 = 0xf0f0f0;
/// Max pointer travel in pixels for a press/release to count as a click
pub const CLICK_SLOP: f32 = 4.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Tunables for one viewport. Every field has a default, so a partial JSON
/// object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub orbit: OrbitConfig,
    pub projection: Projection,
    /// Radians added to every avatar's yaw per tick
    pub avatar_spin: f32,
    /// 0xRRGGBB
    pub clear_color: u32,
    pub show_hud: bool,
    pub click_slop: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            orbit: OrbitConfig::default(),
            projection: Projection::default(),
            avatar_spin: AVATAR_SPIN_PER_TICK,
            clear_color: CLEAR_COLOR,
            show_hud: true,
            click_slop: CLICK_SLOP,
        }
    }
}

impl ViewportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let orbit = &self.orbit;
        let finite = [
            ("orbit.distance", orbit.distance),
            ("orbit.azimuth", orbit.azimuth),
            ("orbit.polar", orbit.polar),
            ("orbit.dragSpeed", orbit.drag_speed),
            ("orbit.tiltSpeed", orbit.tilt_speed),
            ("orbit.zoomSpeed", orbit.zoom_speed),
            ("avatarSpin", self.avatar_spin),
            ("clickSlop", self.click_slop),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not finite")));
            }
        }

        if !(orbit.min_distance > 0.0 && orbit.min_distance <= orbit.max_distance && orbit.max_distance.is_finite()) {
            return Err(invalid(
                "orbit.minDistance",
                format!("need 0 < min <= max, got [{}, {}]", orbit.min_distance, orbit.max_distance),
            ));
        }
        if !(orbit.polar_epsilon > 0.0 && orbit.polar_epsilon < std::f32::consts::FRAC_PI_4) {
            return Err(invalid("orbit.polarEpsilon", format!("{} outside (0, π/4)", orbit.polar_epsilon)));
        }
        if orbit.drag_speed < 0.0 || orbit.tilt_speed < 0.0 || orbit.zoom_speed < 0.0 {
            return Err(invalid("orbit", "speeds must not be negative"));
        }
        if orbit.pan_buttons.contains(&PointerButton::Primary) {
            return Err(invalid("orbit.panButtons", "the primary button is reserved for picking"));
        }

        let projection = &self.projection;
        if !(projection.fov_degrees > 0.0 && projection.fov_degrees < 180.0) {
            return Err(invalid("projection.fovDegrees", format!("{} outside (0, 180)", projection.fov_degrees)));
        }
        if !(projection.near > 0.0 && projection.near < projection.far && projection.far.is_finite()) {
            return Err(invalid(
                "projection.near",
                format!("need 0 < near < far, got {} / {}", projection.near, projection.far),
            ));
        }
        if self.clear_color > 0xff_ffff {
            return Err(invalid("clearColor", format!("{:#x} is not 0xRRGGBB", self.clear_color)));
        }
        if self.click_slop < 0.0 {
            return Err(invalid("clickSlop", "must not be negative"));
        }
        Ok(())
    }
}
