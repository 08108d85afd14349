// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cameras, damped orbit controls, framing and preset views
//!
//! World space is Y-up with the plan on the XZ plane. The perspective camera
//! serves 3D mode and the orthographic camera the top-down 2D mode. Both are
//! driven by one [`OrbitControls`], which accumulates input as pending
//! motion and applies a damped fraction of it per frame.

use std::f64::consts::PI;
use std::str::FromStr;

use nalgebra::{Matrix4, Point3, Vector3};
use structview_geometry::Aabb;

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::picking::Ray;

/// Keeps the polar angle off the poles so `look_at` stays defined
const POLAR_EPSILON: f64 = 1e-6;

/// Screen-up direction of the top-down plan view
const PLAN_UP: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fov_degrees: f64,
    },
    Orthographic {
        /// Half of the visible height at zoom 1
        half_height: f64,
        zoom: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub projection: Projection,
    /// Width over height
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn perspective(config: &ViewerConfig) -> Self {
        Self {
            position: Point3::new(1000.0, 1000.0, 1000.0),
            target: Point3::origin(),
            up: Vector3::y(),
            projection: Projection::Perspective {
                fov_degrees: config.fov_degrees,
            },
            aspect: 1.0,
            near: config.near,
            far: config.far,
        }
    }

    pub fn orthographic(config: &ViewerConfig) -> Self {
        Self {
            position: Point3::new(0.0, 1000.0, 0.0),
            target: Point3::origin(),
            up: PLAN_UP,
            projection: Projection::Orthographic {
                half_height: 500.0,
                zoom: 1.0,
            },
            aspect: 1.0,
            near: config.near,
            far: config.far,
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.projection {
            Projection::Perspective { fov_degrees } => {
                Matrix4::new_perspective(self.aspect, fov_degrees.to_radians(), self.near, self.far)
            }
            Projection::Orthographic { half_height, zoom } => {
                let hh = half_height / zoom;
                let hw = hh * self.aspect;
                Matrix4::new_orthographic(-hw, hw, -hh, hh, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the camera toward its target
    pub fn direction(&self) -> Vector3<f64> {
        (self.target - self.position)
            .try_normalize(1e-12)
            .unwrap_or_else(|| -Vector3::y())
    }

    /// World ray through a point in normalized device coordinates
    pub fn ray(&self, ndc_x: f64, ndc_y: f64) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = (far - near).try_normalize(1e-12)?;
        Some(Ray::new(near, direction))
    }

    /// World units covered by one pixel at the target distance
    fn world_per_pixel(&self, viewport_height: f64) -> f64 {
        let height = viewport_height.max(1.0);
        match self.projection {
            Projection::Perspective { fov_degrees } => {
                let distance = (self.position - self.target).norm();
                2.0 * distance * (fov_degrees.to_radians() / 2.0).tan() / height
            }
            Projection::Orthographic { half_height, zoom } => 2.0 * half_height / zoom / height,
        }
    }
}

/// Named camera angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    /// Right side
    Side,
    Iso,
}

impl ViewPreset {
    /// Direction from the model center toward the camera
    pub fn direction(&self) -> Vector3<f64> {
        match self {
            // Nudged off the pole so the Y-up view stays defined
            ViewPreset::Top => Vector3::new(0.0, 1.0, 1e-3),
            ViewPreset::Bottom => Vector3::new(0.0, -1.0, 1e-3),
            ViewPreset::Front => Vector3::z(),
            ViewPreset::Back => -Vector3::z(),
            ViewPreset::Left => -Vector3::x(),
            ViewPreset::Side => Vector3::x(),
            ViewPreset::Iso => Vector3::new(1.0, 1.0, 1.0),
        }
        .normalize()
    }
}

impl FromStr for ViewPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(ViewPreset::Top),
            "bottom" => Ok(ViewPreset::Bottom),
            "front" => Ok(ViewPreset::Front),
            "back" => Ok(ViewPreset::Back),
            "left" => Ok(ViewPreset::Left),
            "side" | "right" => Ok(ViewPreset::Side),
            "iso" | "isometric" => Ok(ViewPreset::Iso),
            _ => Err(Error::UnknownPreset(s.to_string())),
        }
    }
}

/// Orbit, pan and zoom with inertial damping
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    damping_factor: f64,
    rotate_speed: f64,
    pan_speed: f64,
    zoom_speed: f64,
    theta_delta: f64,
    phi_delta: f64,
    pan_offset: Vector3<f64>,
    scale: f64,
}

impl OrbitControls {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            enable_rotate: true,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            pan_speed: config.pan_speed,
            zoom_speed: config.zoom_speed,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vector3::zeros(),
            scale: 1.0,
        }
    }

    /// Queue an orbit by a pointer drag in pixels
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        if !self.enable_rotate {
            return;
        }
        self.theta_delta -= dx * self.rotate_speed;
        self.phi_delta -= dy * self.rotate_speed;
    }

    /// Queue a pan by a pointer drag in pixels
    pub fn pan(&mut self, camera: &Camera, dx: f64, dy: f64, viewport_height: f64) {
        let direction = camera.direction();
        let Some(right) = direction.cross(&camera.up).try_normalize(1e-12) else {
            return;
        };
        let screen_up = right.cross(&direction);
        let step = camera.world_per_pixel(viewport_height) * self.pan_speed;
        self.pan_offset += (-dx * right + dy * screen_up) * step;
    }

    /// Queue a zoom by a wheel delta; positive zooms out
    pub fn zoom(&mut self, delta: f64) {
        self.scale *= (delta * self.zoom_speed).exp();
    }

    /// Drop pending motion
    pub fn stop(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_offset = Vector3::zeros();
        self.scale = 1.0;
    }

    pub fn is_settled(&self) -> bool {
        self.theta_delta.abs() < 1e-9
            && self.phi_delta.abs() < 1e-9
            && self.pan_offset.norm() < 1e-9
            && (self.scale - 1.0).abs() < 1e-12
    }

    /// Apply one frame of pending motion to `camera`. Returns whether the
    /// camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if self.is_settled() {
            self.stop();
            return false;
        }
        let factor = if self.damping_factor > 0.0 {
            self.damping_factor
        } else {
            1.0
        };

        let pan = self.pan_offset * factor;
        camera.target += pan;
        camera.position += pan;

        let rotating = self.theta_delta != 0.0 || self.phi_delta != 0.0;
        let dolly = match &mut camera.projection {
            Projection::Orthographic { zoom, .. } => {
                *zoom = (*zoom / self.scale).clamp(1e-3, 1e3);
                1.0
            }
            Projection::Perspective { .. } => self.scale,
        };

        if rotating || dolly != 1.0 {
            let offset = camera.position - camera.target;
            let radius = offset.norm() * dolly;
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / offset.norm().max(1e-12)).clamp(-1.0, 1.0).acos();
            if self.enable_rotate {
                theta += self.theta_delta * factor;
                phi += self.phi_delta * factor;
            }
            phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

            let radius = radius.max(1e-3);
            camera.position = camera.target
                + Vector3::new(
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.cos(),
                );
        }

        // Zoom is applied at once; rotation and pan decay
        self.scale = 1.0;
        if self.damping_factor > 0.0 {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::zeros();
        }
        true
    }
}

/// Which camera draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveCamera {
    Perspective,
    Orthographic,
}

/// Both cameras, their controls and the viewport
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub perspective: Camera,
    pub orthographic: Camera,
    pub active: ActiveCamera,
    pub controls: OrbitControls,
    viewport: (u32, u32),
    /// Last footprint the orthographic frustum was fitted to
    footprint: Option<Aabb>,
}

impl CameraRig {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            perspective: Camera::perspective(config),
            orthographic: Camera::orthographic(config),
            active: ActiveCamera::Perspective,
            controls: OrbitControls::new(config),
            viewport: (1, 1),
            footprint: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        match self.active {
            ActiveCamera::Perspective => &self.perspective,
            ActiveCamera::Orthographic => &self.orthographic,
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Update aspect ratios and refit the plan frustum to the new shape
    pub fn set_viewport(&mut self, width: u32, height: u32, config: &ViewerConfig) {
        self.viewport = (width.max(1), height.max(1));
        let aspect = self.viewport.0 as f64 / self.viewport.1 as f64;
        self.perspective.aspect = aspect;
        self.orthographic.aspect = aspect;
        if let Some(footprint) = self.footprint {
            self.fit_orthographic(&footprint, config);
        }
    }

    pub fn use_perspective(&mut self) {
        self.active = ActiveCamera::Perspective;
        self.controls.enable_rotate = true;
        self.controls.stop();
    }

    pub fn use_orthographic(&mut self) {
        self.active = ActiveCamera::Orthographic;
        self.controls.enable_rotate = false;
        self.controls.stop();
    }

    /// Frame `bounds` with the active camera
    pub fn fit(&mut self, bounds: &Aabb, config: &ViewerConfig) {
        if !bounds.is_valid() {
            return;
        }
        match self.active {
            ActiveCamera::Perspective => self.fit_perspective(bounds, config),
            ActiveCamera::Orthographic => self.fit_orthographic(bounds, config),
        }
    }

    /// Camera distance that frames `bounds` in the perspective camera
    pub fn fit_distance(bounds: &Aabb, config: &ViewerConfig) -> f64 {
        let half_fov = (config.fov_degrees.to_radians() / 2.0).sin().max(1e-6);
        (bounds.max_dimension() / half_fov * config.fit_margin).max(config.min_fit_distance)
    }

    fn fit_perspective(&mut self, bounds: &Aabb, config: &ViewerConfig) {
        let center = bounds.center();
        let distance = Self::fit_distance(bounds, config);
        let camera = &mut self.perspective;
        let back = -camera.direction();
        camera.target = center;
        camera.position = center + back * distance;
        camera.far = config.far.max(distance * 10.0);
        self.controls.stop();
    }

    fn fit_orthographic(&mut self, bounds: &Aabb, config: &ViewerConfig) {
        let center = bounds.center();
        let size = bounds.size();
        let padding = 1.0 + config.ortho_padding;
        let (half_x, half_z) = (size.x * padding / 2.0, size.z * padding / 2.0);

        let camera = &mut self.orthographic;
        let aspect = camera.aspect.max(1e-6);
        let half_height = half_z.max(half_x / aspect).max(1.0);
        let lift = size.y + config.min_fit_distance;

        camera.target = Point3::new(center.x, bounds.min.y, center.z);
        camera.position = Point3::new(center.x, bounds.max.y + lift, center.z);
        camera.up = PLAN_UP;
        camera.projection = Projection::Orthographic {
            half_height,
            zoom: 1.0,
        };
        camera.far = config.far.max((lift + size.y) * 2.0);
        self.footprint = Some(*bounds);
        self.controls.stop();
    }

    /// Look at the center of `bounds` from a preset angle
    pub fn apply_preset(&mut self, preset: ViewPreset, bounds: &Aabb, config: &ViewerConfig) {
        if !bounds.is_valid() {
            return;
        }
        let center = bounds.center();
        let distance = (bounds.max_dimension() * config.preset_distance_factor)
            .max(config.min_fit_distance);
        let camera = &mut self.perspective;
        camera.target = center;
        camera.position = center + preset.direction() * distance;
        camera.up = Vector3::y();
        camera.far = config.far.max(distance * 10.0);
        self.controls.stop();
    }

    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.controls.rotate(dx, dy);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        let height = self.viewport.1 as f64;
        let camera = match self.active {
            ActiveCamera::Perspective => &self.perspective,
            ActiveCamera::Orthographic => &self.orthographic,
        };
        self.controls.pan(camera, dx, dy, height);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.controls.zoom(delta);
    }

    /// Advance the controls by one frame
    pub fn update(&mut self) -> bool {
        let camera = match self.active {
            ActiveCamera::Perspective => &mut self.perspective,
            ActiveCamera::Orthographic => &mut self.orthographic,
        };
        self.controls.update(camera)
    }

    /// World ray through a viewport pixel
    pub fn ray_at(&self, x: f64, y: f64) -> Option<Ray> {
        let (width, height) = (self.viewport.0 as f64, self.viewport.1 as f64);
        let ndc_x = x / width * 2.0 - 1.0;
        let ndc_y = 1.0 - y / height * 2.0;
        self.camera().ray(ndc_x, ndc_y)
    }
}
