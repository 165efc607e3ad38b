use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::controller::PointerButton;
use crate::core::display_context::ViewportSize;
use crate::math::Ray;

pub const DEFAULT_DISTANCE: f32 = 25.0;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 50.0;
pub const DEFAULT_AZIMUTH: f32 = FRAC_PI_4;
pub const DEFAULT_POLAR: f32 = FRAC_PI_4;
/// Keeps the camera off the floor and off the pole
pub const POLAR_EPSILON: f32 = 0.1;

pub const DRAG_SPEED: f32 = 0.01;
pub const TILT_SPEED: f32 = 0.001;
pub const ZOOM_SPEED: f32 = 0.05;

pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Orbit limits, starting pose and input gains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrbitConfig {
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub polar_epsilon: f32,
    pub drag_speed: f32,
    pub tilt_speed: f32,
    pub zoom_speed: f32,
    pub pan_buttons: Vec<PointerButton>,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            azimuth: DEFAULT_AZIMUTH,
            polar: DEFAULT_POLAR,
            polar_epsilon: POLAR_EPSILON,
            drag_speed: DRAG_SPEED,
            tilt_speed: TILT_SPEED,
            zoom_speed: ZOOM_SPEED,
            pan_buttons: vec![PointerButton::Secondary, PointerButton::Middle],
        }
    }
}

impl OrbitConfig {
    pub fn polar_min(&self) -> f32 {
        self.polar_epsilon
    }

    pub fn polar_max(&self) -> f32 {
        FRAC_PI_2 - self.polar_epsilon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Projection {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: FOV_DEGREES,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }
}

impl Projection {
    pub fn fov_y(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y(), aspect, self.near, self.far)
    }
}

/// Spherical coordinates around the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraState {
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Orbit camera driven by pan drags and the wheel. The primary button is
/// never a pan button; it is left to picking.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: OrbitConfig,
    projection: Projection,
    state: CameraState,
    active_pan: Option<PointerButton>,
    last_pointer: Option<Vec2>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitConfig::default(), Projection::default())
    }
}

impl OrbitCamera {
    pub fn new(config: OrbitConfig, projection: Projection) -> Self {
        let state = CameraState {
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            azimuth: wrap_angle(config.azimuth),
            polar: config.polar.clamp(config.polar_min(), config.polar_max()),
        };
        Self {
            config,
            projection,
            state,
            active_pan: None,
            last_pointer: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Back to the configured starting pose; ends any pan
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone(), self.projection);
    }

    pub fn is_pan_button(&self, button: PointerButton) -> bool {
        button != PointerButton::Primary && self.config.pan_buttons.contains(&button)
    }

    pub fn is_panning(&self) -> bool {
        self.active_pan.is_some()
    }

    /// Starts a pan if `button` is a pan button. Returns whether a pan began.
    pub fn begin_pan(&mut self, button: PointerButton, pos: Vec2) -> bool {
        if !self.is_pan_button(button) || self.active_pan.is_some() {
            return false;
        }
        self.active_pan = Some(button);
        self.last_pointer = pos.is_finite().then_some(pos);
        true
    }

    /// Feeds an absolute pointer position into an active pan
    pub fn drag_to(&mut self, pos: Vec2) {
        if self.active_pan.is_none() || !pos.is_finite() {
            return;
        }
        if let Some(last) = self.last_pointer {
            let delta = pos - last;
            self.on_drag_delta(delta.x, delta.y);
        }
        self.last_pointer = Some(pos);
    }

    /// Ends the pan held by `button`. Returns whether a pan ended.
    pub fn end_pan(&mut self, button: PointerButton) -> bool {
        if self.active_pan != Some(button) {
            return false;
        }
        self.cancel_pan();
        true
    }

    pub fn cancel_pan(&mut self) {
        self.active_pan = None;
        self.last_pointer = None;
    }

    /// Rotates the orbit by a pointer delta in pixels. Ignored unless a pan
    /// button is held.
    pub fn on_drag_delta(&mut self, dx: f32, dy: f32) {
        if self.active_pan.is_none() || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let k = self.config.drag_speed;
        self.state.azimuth = wrap_angle(self.state.azimuth - dx * k);
        self.state.polar = (self.state.polar - dy * k).clamp(self.config.polar_min(), self.config.polar_max());
    }

    /// Shift + wheel tilts, plain wheel zooms
    pub fn on_wheel(&mut self, delta_y: f32, shift_held: bool) {
        if !delta_y.is_finite() {
            return;
        }
        if shift_held {
            self.state.polar = (self.state.polar - delta_y * self.config.tilt_speed)
                .clamp(self.config.polar_min(), self.config.polar_max());
        } else {
            self.state.distance = (self.state.distance + delta_y * self.config.zoom_speed)
                .clamp(self.config.min_distance, self.config.max_distance);
        }
    }

    pub fn pose(&self) -> CameraPose {
        let CameraState {
            distance: d,
            azimuth: az,
            polar: pol,
        } = self.state;
        CameraPose {
            eye: Vec3::new(d * az.sin() * pol.cos(), d * pol.sin(), d * az.cos() * pol.cos()),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let pose = self.pose();
        Mat4::look_at_rh(pose.eye, pose.target, pose.up)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection.matrix(aspect) * self.view_matrix()
    }

    /// World-space ray from the eye through a normalized device coordinate
    pub fn ray_through(&self, ndc: Vec2, aspect: f32) -> Ray {
        let pose = self.pose();
        let forward = pose.forward();
        let right = pose.right();
        let up = right.cross(forward);
        let half_height = (self.projection.fov_y() / 2.0).tan();
        let direction = forward + right * (ndc.x * half_height * aspect) + up * (ndc.y * half_height);
        Ray::new(pose.eye, direction.normalize())
    }

    /// Projects a world point into viewport pixels. `None` when the point is
    /// behind the camera or the viewport has no area.
    pub fn world_to_screen(&self, point: Vec3, viewport: ViewportSize) -> Option<Vec2> {
        if viewport.is_empty() {
            return None;
        }
        let clip = self.view_projection(viewport.aspect()) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) / 2.0 * viewport.width as f32,
            (1.0 - ndc.y) / 2.0 * viewport.height as f32,
        ))
    }
}
