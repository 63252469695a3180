//! Wing meshes and their animated pose

use flare_core::{Color, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

pub const WING_COLOR: u32 = 0x00aaff;
pub const REST_EMISSIVE: u32 = 0x002244;
pub const DASH_EMISSIVE: u32 = 0x0066ff;
const WING_OPACITY: f32 = 0.7;
const WING_SHININESS: f32 = 100.0;
const WING_OFFSET: f32 = 0.5;
/// Largest flap swing either side of rest, radians
pub const FLAP_AMPLITUDE: f32 = 0.3;

/// Cone geometry of a wing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeShape {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
}

impl ConeShape {
    pub const WING: ConeShape = ConeShape {
        radius: 0.3,
        height: 0.8,
        segments: 8,
    };
}

/// Phong-style material of a wing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WingMaterial {
    pub color: Color,
    pub opacity: f32,
    pub emissive: Color,
    pub shininess: f32,
}

impl Default for WingMaterial {
    fn default() -> Self {
        Self {
            color: Color::from_hex(WING_COLOR),
            opacity: WING_OPACITY,
            emissive: Color::from_hex(REST_EMISSIVE),
            shininess: WING_SHININESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for the left wing, +1 for the right
    fn sign(&self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One wing, positioned relative to the player
#[derive(Debug, Clone, PartialEq)]
pub struct Wing {
    pub side: Side,
    pub shape: ConeShape,
    pub material: WingMaterial,
    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub visible: bool,
}

impl Wing {
    pub fn new(side: Side) -> Self {
        let sign = side.sign();
        Self {
            side,
            shape: ConeShape::WING,
            material: WingMaterial::default(),
            position: Vec3::new(sign * WING_OFFSET, 0.0, 0.0),
            rotation: Vec3::new(FRAC_PI_4, 0.0, -sign * FRAC_PI_2),
            visible: false,
        }
    }
}

/// The left/right wing pair
#[derive(Debug, Clone, PartialEq)]
pub struct WingPair {
    pub left: Wing,
    pub right: Wing,
}

impl Default for WingPair {
    fn default() -> Self {
        Self::new()
    }
}

impl WingPair {
    pub fn new() -> Self {
        Self {
            left: Wing::new(Side::Left),
            right: Wing::new(Side::Right),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.left.visible || self.right.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.left.visible = visible;
        self.right.visible = visible;
    }

    /// Yaw both wings outward by `spread` radians
    pub fn spread(&mut self, spread: f32) {
        self.left.rotation.y = -spread;
        self.right.rotation.y = spread;
    }

    pub fn set_emissive(&mut self, emissive: Color) {
        self.left.material.emissive = emissive;
        self.right.material.emissive = emissive;
    }

    /// Roll the wings symmetrically by `angle` radians away from rest
    pub fn flap(&mut self, angle: f32) {
        self.left.rotation.z = FRAC_PI_2 + angle;
        self.right.rotation.z = -FRAC_PI_2 - angle;
    }
}
