//! Render backend seam
//!
//! The controller only decides what overlay geometry to draw and how. Shader
//! compilation and GPU resource binding belong to the backend.

use glam::{Mat4, Vec3};

use crate::highlight::HighlightGeometry;

pub type Color = [f32; 4];

pub const ELEMENT_COLOR: Color = [1.0, 0.5, 0.0, 1.0];
pub const HALFEDGE_COLOR: Color = [1.0, 0.7, 0.2, 1.0];
pub const LIGHT_COLOR: Color = [1.0, 1.0, 0.4, 1.0];
pub const PICKING_RAY_COLOR: Color = [0.2, 1.0, 0.2, 1.0];
pub const BVH_COLOR: Color = [0.3, 0.6, 1.0, 1.0];

/// Uniform values understood by the overlay shaders
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Bool(bool),
    Vec3(Vec3),
    Mat4(Mat4),
    Color(Color),
}

/// How a buffer's connectivity is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    Polygons,
}

pub trait RenderBackend {
    fn set_uniform(&mut self, name: &str, value: Uniform);

    /// Copy a buffer's vertex and index data to the GPU
    fn upload(&mut self, geometry: &HighlightGeometry);

    fn set_depth_test(&mut self, enabled: bool);

    fn draw(&mut self, geometry: &HighlightGeometry, primitive: Primitive, color: Color);
}

/// Backend that records every call, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<RenderCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetUniform(String, Uniform),
    Upload(String),
    DepthTest(bool),
    Draw {
        geometry: String,
        primitive: Primitive,
        color: Color,
    },
}

impl RecordingBackend {
    /// Names of drawn buffers, in order
    pub fn drawn(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Draw { geometry, .. } => Some(geometry.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn uploaded(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Upload(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Last value set for a uniform
    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::SetUniform(n, value) if n == name => Some(*value),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn set_uniform(&mut self, name: &str, value: Uniform) {
        self.calls.push(RenderCall::SetUniform(name.to_string(), value));
    }

    fn upload(&mut self, geometry: &HighlightGeometry) {
        self.calls.push(RenderCall::Upload(geometry.name.clone()));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(RenderCall::DepthTest(enabled));
    }

    fn draw(&mut self, geometry: &HighlightGeometry, primitive: Primitive, color: Color) {
        self.calls.push(RenderCall::Draw {
            geometry: geometry.name.clone(),
            primitive,
            color,
        });
    }
}
