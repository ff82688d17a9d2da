// SPDX-License-Identifier: GPL-3.0-only

//! Decorative backdrop: drifting particles and glowing orbs
//!
//! Layouts come from a seeded [`StdRng`], so a seed always produces the
//! same backdrop while tests only need to check counts and ranges.

use crate::constants::backdrop::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A small dot floating up the screen
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position, percent of width
    pub x: f32,
    /// Starting vertical position, percent of height
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
    /// Seconds for one trip up the screen
    pub period: f32,
    /// Seconds before the particle starts moving
    pub delay: f32,
    /// Index into [`PALETTE`]
    pub palette_index: usize,
}

impl Particle {
    pub fn color(&self) -> (u8, u8, u8) {
        PALETTE[self.palette_index % PALETTE.len()]
    }

    /// Position in percent after `elapsed` seconds. Particles rise and wrap
    /// from the top edge back to the bottom.
    pub fn position_at(&self, elapsed: f32) -> (f32, f32) {
        let moving = (elapsed - self.delay).max(0.0);
        let travelled = moving / self.period * 100.0;
        let y = (self.y - travelled).rem_euclid(100.0);
        // rem_euclid can round up to the modulus itself
        (self.x, if y >= 100.0 { 0.0 } else { y })
    }
}

/// A large blurred light
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Degrees on the color wheel
    pub hue: f32,
    pub glow: f32,
}

impl Orb {
    /// Fully saturated RGB for the orb's hue
    pub fn color(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub seed: u64,
    pub particles: Vec<Particle>,
    pub orbs: Vec<Orb>,
}

impl Backdrop {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let particles = (0..PARTICLE_COUNT)
            .map(|i| Particle {
                x: rng.gen_range(0.0..100.0),
                y: rng.gen_range(0.0..100.0),
                size: rng.gen_range(PARTICLE_SIZE.0..PARTICLE_SIZE.1),
                opacity: rng.gen_range(PARTICLE_OPACITY.0..PARTICLE_OPACITY.1),
                period: rng.gen_range(PARTICLE_PERIOD_SECS.0..PARTICLE_PERIOD_SECS.1),
                delay: rng.gen_range(PARTICLE_DELAY_SECS.0..PARTICLE_DELAY_SECS.1),
                palette_index: i % PALETTE.len(),
            })
            .collect();

        let orbs = (0..ORB_COUNT)
            .map(|_| Orb {
                x: rng.gen_range(0.0..100.0),
                y: rng.gen_range(0.0..100.0),
                size: rng.gen_range(ORB_SIZE.0..ORB_SIZE.1),
                hue: rng.gen_range(ORB_HUE.0..ORB_HUE.1),
                glow: rng.gen_range(ORB_GLOW.0..ORB_GLOW.1),
            })
            .collect();

        Self {
            seed,
            particles,
            orbs,
        }
    }

    /// Fresh layout from OS entropy
    pub fn random() -> Self {
        Self::generate(rand::random())
    }
}
