//! Screen-space camera for a fixed logical viewport.
//!
//! The simulation works in logical pixels with the origin at the top-left
//! corner and y growing downward. The projection maps that space directly
//! to clip space, so quads can be emitted in the same coordinates the
//! physics uses.

use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct ScreenCamera {
    pub logical: (u32, u32),
}

impl ScreenCamera {
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            logical: (logical_width, logical_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let w = self.logical.0 as f32;
        let h = self.logical.1 as f32;

        // bottom = h, top = 0 flips the y axis so screen space is y-down.
        let proj = Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0);

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
