//! Trackball-style camera controls
//!
//! Input events only accumulate pending motion; [`TrackballControls::update`]
//! applies it to the camera once per frame. With `static_moving` the pending
//! motion is consumed in one frame. Otherwise it decays by
//! `dynamic_damping_factor` per 60 Hz frame, which gives the camera inertia.

use std::time::Duration;

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::Key,
};

use crate::config::ControlsConfig;

use super::orbit_camera::OrbitCamera;

/// Radians of orbit per pixel of pointer travel at `rotate_speed = 1`
const ROTATE_PER_PIXEL: f32 = 0.005;
/// Distance fraction per wheel line at `zoom_speed = 1`
const ZOOM_PER_LINE: f32 = 0.05;
/// Distance fraction per pixel of vertical zoom drag at `zoom_speed = 1`
const ZOOM_PER_PIXEL: f32 = 0.005;
/// Pan fraction per pixel at `pan_speed = 1`
const PAN_PER_PIXEL: f32 = 0.01;
/// Pending motion below this is treated as settled
const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Rotate,
    Zoom,
    Pan,
}

pub struct TrackballControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub no_zoom: bool,
    pub no_pan: bool,
    pub static_moving: bool,
    pub dynamic_damping_factor: f32,
    /// Keys forcing rotate, zoom and pan while held
    pub keys: [String; 3],
    pub enabled: bool,

    held_key: Option<ControlMode>,
    buttons: [bool; 3],
    pending_rotate: (f32, f32),
    pending_zoom: f32,
    pending_pan: (f32, f32),
}

impl TrackballControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            no_zoom: config.no_zoom,
            no_pan: config.no_pan,
            static_moving: config.static_moving,
            dynamic_damping_factor: config.dynamic_damping_factor,
            keys: config.keys.clone(),
            enabled: true,
            held_key: None,
            buttons: [false; 3],
            pending_rotate: (0.0, 0.0),
            pending_zoom: 0.0,
            pending_pan: (0.0, 0.0),
        }
    }

    /// Mode a pointer drag currently performs, if any
    pub fn mode(&self) -> Option<ControlMode> {
        if !self.buttons.iter().any(|pressed| *pressed) {
            return None;
        }
        if let Some(mode) = self.held_key {
            return Some(mode);
        }
        match self.buttons {
            [true, _, _] => Some(ControlMode::Rotate),
            [_, true, _] => Some(ControlMode::Zoom),
            [_, _, true] => Some(ControlMode::Pan),
            _ => None,
        }
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        let index = match button {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            _ => return,
        };
        self.buttons[index] = pressed;
    }

    /// Tracks the modifier keys; `key` is the logical character
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        let mode = [ControlMode::Rotate, ControlMode::Zoom, ControlMode::Pan]
            .into_iter()
            .zip(self.keys.iter())
            .find(|(_, bound)| bound.eq_ignore_ascii_case(key))
            .map(|(mode, _)| mode);

        match (mode, pressed) {
            (Some(mode), true) => self.held_key = Some(mode),
            (Some(mode), false) if self.held_key == Some(mode) => self.held_key = None,
            _ => {}
        }
    }

    /// Accumulates pointer travel in pixels according to the current mode
    pub fn on_pointer_motion(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        match self.mode() {
            Some(ControlMode::Rotate) => {
                self.pending_rotate.0 += dx;
                self.pending_rotate.1 += dy;
            }
            Some(ControlMode::Zoom) if !self.no_zoom => {
                self.pending_zoom += dy * ZOOM_PER_PIXEL;
            }
            Some(ControlMode::Pan) if !self.no_pan => {
                self.pending_pan.0 += dx;
                self.pending_pan.1 += dy;
            }
            _ => {}
        }
    }

    /// Accumulates wheel motion in lines; positive scrolls toward the target
    pub fn on_scroll(&mut self, lines: f32) {
        if self.enabled && !self.no_zoom {
            self.pending_zoom -= lines * ZOOM_PER_LINE;
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
                };
                self.on_scroll(lines);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Key::Character(text) = &event.logical_key {
                    self.set_key(text.as_str(), event.state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(false) => {
                self.buttons = [false; 3];
                self.held_key = None;
            }
            _ => {}
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.on_pointer_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    /// Whether any motion is still pending
    pub fn is_moving(&self) -> bool {
        self.pending_rotate.0.abs() > EPSILON
            || self.pending_rotate.1.abs() > EPSILON
            || self.pending_zoom.abs() > EPSILON
            || self.pending_pan.0.abs() > EPSILON
            || self.pending_pan.1.abs() > EPSILON
    }

    /// Applies pending motion to `camera` for a frame that took `dt`
    pub fn update(&mut self, dt: Duration, camera: &mut OrbitCamera) {
        if !self.enabled {
            return;
        }

        let (rx, ry) = self.pending_rotate;
        if rx != 0.0 || ry != 0.0 {
            camera.add_yaw(-rx * ROTATE_PER_PIXEL * self.rotate_speed);
            camera.add_pitch(ry * ROTATE_PER_PIXEL * self.rotate_speed);
        }

        if !self.no_zoom && self.pending_zoom != 0.0 {
            let factor = (1.0 + self.pending_zoom * self.zoom_speed).max(0.1);
            camera.set_distance(camera.distance * factor);
        }

        let (px, py) = self.pending_pan;
        if !self.no_pan && (px != 0.0 || py != 0.0) {
            camera.pan((
                -px * PAN_PER_PIXEL * self.pan_speed,
                py * PAN_PER_PIXEL * self.pan_speed,
            ));
        }

        if self.static_moving {
            self.pending_rotate = (0.0, 0.0);
            self.pending_zoom = 0.0;
            self.pending_pan = (0.0, 0.0);
        } else {
            let keep = (1.0 - self.dynamic_damping_factor)
                .clamp(0.0, 1.0)
                .powf(dt.as_secs_f32() * 60.0);
            self.pending_rotate = settle((rx * keep, ry * keep));
            self.pending_zoom = settle((self.pending_zoom * keep, 0.0)).0;
            self.pending_pan = settle((px * keep, py * keep));
        }
    }
}

fn settle((x, y): (f32, f32)) -> (f32, f32) {
    let snap = |v: f32| if v.abs() < EPSILON { 0.0 } else { v };
    (snap(x), snap(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Vector3, Zero};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vector3::new(0.0, 20.0, 40.0), Vector3::zero(), 1.5)
    }

    #[test]
    fn test_left_drag_rotates_once_when_static() {
        let mut controls = TrackballControls::new(&ControlsConfig::default());
        let mut camera = camera();
        let yaw = camera.yaw;

        controls.set_button(MouseButton::Left, true);
        controls.on_pointer_motion(100.0, 0.0);
        controls.update(FRAME, &mut camera);
        assert_relative_eq!(camera.yaw, yaw - 0.5, epsilon = 1e-5);
        assert!(!controls.is_moving());

        controls.update(FRAME, &mut camera);
        assert_relative_eq!(camera.yaw, yaw - 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_dynamic_damping_decays_motion() {
        let config = ControlsConfig {
            static_moving: false,
            ..ControlsConfig::default()
        };
        let mut controls = TrackballControls::new(&config);
        let mut camera = camera();

        controls.set_button(MouseButton::Left, true);
        controls.on_pointer_motion(100.0, 0.0);
        controls.update(FRAME, &mut camera);
        assert!(controls.is_moving());
        let first = controls.pending_rotate.0;
        assert_relative_eq!(first, 70.0, epsilon = 0.1);

        for _ in 0..200 {
            controls.update(FRAME, &mut camera);
        }
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_wheel_zoom_and_no_zoom() {
        let mut controls = TrackballControls::new(&ControlsConfig::default());
        let mut camera = camera();
        let distance = camera.distance;

        controls.on_scroll(1.0);
        controls.update(FRAME, &mut camera);
        assert!(camera.distance < distance);

        controls.no_zoom = true;
        let distance = camera.distance;
        controls.on_scroll(1.0);
        controls.update(FRAME, &mut camera);
        assert_relative_eq!(camera.distance, distance);
    }

    #[test]
    fn test_held_key_overrides_button_mode() {
        let mut controls = TrackballControls::new(&ControlsConfig::default());
        controls.set_button(MouseButton::Left, true);
        assert_eq!(controls.mode(), Some(ControlMode::Rotate));

        controls.set_key("d", true);
        assert_eq!(controls.mode(), Some(ControlMode::Pan));
        controls.set_key("S", true);
        assert_eq!(controls.mode(), Some(ControlMode::Zoom));
        controls.set_key("S", false);
        assert_eq!(controls.mode(), Some(ControlMode::Rotate));

        controls.set_button(MouseButton::Left, false);
        assert_eq!(controls.mode(), None);
    }

    #[test]
    fn test_right_drag_pans_unless_disabled() {
        let mut controls = TrackballControls::new(&ControlsConfig::default());
        let mut camera = camera();
        controls.set_button(MouseButton::Right, true);
        controls.on_pointer_motion(10.0, 5.0);
        controls.update(FRAME, &mut camera);
        assert!(camera.target.x.abs() > 0.0);

        let mut controls = TrackballControls::new(&ControlsConfig {
            no_pan: true,
            ..ControlsConfig::default()
        });
        let mut camera = self::camera();
        controls.set_button(MouseButton::Right, true);
        controls.on_pointer_motion(10.0, 5.0);
        controls.update(FRAME, &mut camera);
        assert_eq!(camera.target, Vector3::zero());
    }
}
