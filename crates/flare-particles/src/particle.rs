//! Particle types: pooled simulation state and GPU instance data

use crate::effects::EffectKind;
use bytemuck::{Pod, Zeroable};
use flare_core::{Color, Vec3};

/// Radius of the unit particle sphere; `scale` multiplies it
pub const PARTICLE_RADIUS: f32 = 0.02;

/// One pre-allocated particle slot
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Displacement per frame
    pub velocity: Vec3,
    pub scale: f32,
    pub color: Color,
    pub opacity: f32,
    pub visible: bool,
    /// Behavior tag; `None` until an effect claims the slot
    pub kind: Option<EffectKind>,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Slot state while parked in the free-list
    pub fn parked() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            scale: 1.0,
            color: Color::WHITE,
            opacity: 1.0,
            visible: false,
            kind: None,
            life: 0.0,
            max_life: 0.0,
        }
    }

    fn reset(&mut self) {
        *self = Self::parked();
    }
}

/// GPU instance data, 32 bytes (2 rows of vec4)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position + radius packed into vec4
    pub pos_size: [f32; 4],
    /// Colour with opacity as alpha
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            pos_size: [
                p.position.x,
                p.position.y,
                p.position.z,
                PARTICLE_RADIUS * p.scale,
            ],
            color: p.color.with_alpha(p.opacity),
        }
    }
}

/// Index of a slot in the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleHandle(usize);

impl ParticleHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Fixed-capacity particle pool.
///
/// Every slot is either on the free-list or in the active list, never both.
/// Acquire and release are O(1): the free-list is a stack and the active
/// list is kept dense with swap-remove plus a slot -> position index.
pub struct ParticlePool {
    particles: Vec<Particle>,
    free: Vec<usize>,
    active: Vec<usize>,
    /// Position of each slot inside `active`, if it is active
    active_pos: Vec<Option<usize>>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::parked(); capacity],
            // Reversed so the first acquire hands out slot 0
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
            active_pos: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Take a slot off the free-list, make it visible at full opacity.
    /// Returns None when the pool is exhausted.
    pub fn acquire(&mut self) -> Option<ParticleHandle> {
        let index = self.free.pop()?;
        let particle = &mut self.particles[index];
        particle.visible = true;
        particle.opacity = 1.0;

        self.active_pos[index] = Some(self.active.len());
        self.active.push(index);
        Some(ParticleHandle(index))
    }

    /// Return a slot to the free-list, resetting its visual state.
    /// Releasing a slot that is not active does nothing and returns false.
    pub fn release(&mut self, handle: ParticleHandle) -> bool {
        let Some(pos) = self.active_pos.get(handle.0).copied().flatten() else {
            return false;
        };

        self.active.swap_remove(pos);
        if let Some(&moved) = self.active.get(pos) {
            self.active_pos[moved] = Some(pos);
        }
        self.active_pos[handle.0] = None;

        self.particles[handle.0].reset();
        self.free.push(handle.0);
        true
    }

    /// Release every active slot
    pub fn release_all(&mut self) {
        while let Some(&index) = self.active.last() {
            self.release(ParticleHandle(index));
        }
    }

    pub fn is_active(&self, handle: ParticleHandle) -> bool {
        matches!(self.active_pos.get(handle.0), Some(Some(_)))
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.particles.get_mut(handle.0)
    }

    /// Handle of the `i`-th active particle
    pub fn active_handle(&self, i: usize) -> Option<ParticleHandle> {
        self.active.get(i).map(|&index| ParticleHandle(index))
    }

    /// Iterate active particles
    pub fn active(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> {
        self.active
            .iter()
            .map(move |&index| (ParticleHandle(index), &self.particles[index]))
    }

    /// Check that free-list and active list partition the slots
    pub fn is_consistent(&self) -> bool {
        if self.free.len() + self.active.len() != self.particles.len() {
            return false;
        }
        let mut seen = vec![false; self.particles.len()];
        for &index in self.free.iter().chain(self.active.iter()) {
            if index >= seen.len() || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        self.active
            .iter()
            .enumerate()
            .all(|(pos, &index)| self.active_pos[index] == Some(pos))
    }
}
