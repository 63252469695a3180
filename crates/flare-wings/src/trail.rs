//! Wing trail: a fixed-length ring of points that trails behind the player

use flare_core::{Color, Vec3};

pub const TRAIL_POINT_SIZE: f32 = 0.1;
pub const TRAIL_OPACITY: f32 = 0.6;
/// Per-frame multiplier applied to the green and blue channels
pub const TRAIL_FADE: f32 = 0.95;

fn trail_color() -> Color {
    Color::new(0.0, 0.7, 1.0)
}

/// Point buffer drawn additively as sprites
#[derive(Debug, Clone, PartialEq)]
pub struct WingTrail {
    positions: Vec<Vec3>,
    colors: Vec<Color>,
    pub visible: bool,
    pub point_size: f32,
    pub opacity: f32,
}

impl WingTrail {
    pub fn new(length: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; length],
            colors: vec![trail_color(); length],
            visible: false,
            point_size: TRAIL_POINT_SIZE,
            opacity: TRAIL_OPACITY,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Shift every point back one slot, put `head` in front and fade the colours
    pub fn advance(&mut self, head: Vec3) {
        if self.positions.is_empty() {
            return;
        }
        self.positions.rotate_right(1);
        self.positions[0] = head;

        for color in &mut self.colors {
            color.g *= TRAIL_FADE;
            color.b *= TRAIL_FADE;
        }
    }

    /// Interleaved `xyz` floats for a vertex buffer
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Interleaved `rgb` floats for a vertex buffer
    pub fn color_buffer(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }
}
