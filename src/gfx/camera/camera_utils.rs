use std::time::Duration;

use cgmath::{Matrix4, SquareMatrix};

use super::{orbit_camera::OrbitCamera, trackball_controls::TrackballControls};

/// Camera paired with the controls that steer it
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controls: TrackballControls,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controls: TrackballControls) -> Self {
        Self { camera, controls }
    }

    /// Applies pending control input for a frame that took `dt`
    pub fn update(&mut self, dt: Duration) {
        self.controls.update(dt, &mut self.camera);
        self.camera.update_view_proj();
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
