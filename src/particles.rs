//! Particle field simulation. Rendering lives in the browser shell; this
//! only moves points around and works out which pairs are linked.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{ParticleParams, PARTICLE_COLORS};

/// Radius around the pointer inside which particles are pushed away.
pub const REPULSE_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub alpha: f64,
    pub color: &'static str,
}

pub struct ParticleField {
    pub params: ParticleParams,
    pub width: f64,
    pub height: f64,
    particles: Vec<Particle>,
    pointer: Option<(f64, f64)>,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new(params: ParticleParams, width: f64, height: f64, seed: u64) -> Self {
        let mut field = Self {
            params,
            width: width.max(1.0),
            height: height.max(1.0),
            particles: Vec::with_capacity(params.count),
            pointer: None,
            rng: SmallRng::seed_from_u64(seed),
        };
        for _ in 0..params.count {
            let p = field.spawn();
            field.particles.push(p);
        }
        field
    }

    fn spawn(&mut self) -> Particle {
        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let speed = self.params.speed * self.rng.gen_range(0.2..1.0);
        Particle {
            x: self.rng.gen_range(0.0..self.width),
            y: self.rng.gen_range(0.0..self.height),
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            radius: self.rng.gen_range(0.5..=self.params.max_radius),
            alpha: self.rng.gen_range(0.1..=self.params.opacity.max(0.1)),
            color: PARTICLE_COLORS[self.rng.gen_range(0..PARTICLE_COLORS.len())],
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Canvas was resized. Particles outside the new bounds wrap on the next
    /// step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Pointer position in canvas pixels, `None` when it left the canvas.
    /// Ignored by non-interactive fields.
    pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
        self.pointer = pointer.filter(|_| self.params.interactive);
    }

    /// Advance one frame. Particles leaving an edge re-enter on the other.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        let pointer = self.pointer;
        for p in &mut self.particles {
            let (mut dx, mut dy) = (p.vx, p.vy);
            if let Some((px, py)) = pointer {
                let (ox, oy) = (p.x - px, p.y - py);
                let dist = (ox * ox + oy * oy).sqrt();
                if dist > 0.0 && dist < REPULSE_DISTANCE {
                    let push = (REPULSE_DISTANCE - dist) / REPULSE_DISTANCE * 4.0;
                    dx += ox / dist * push;
                    dy += oy / dist * push;
                }
            }
            p.x = wrap(p.x + dx, w);
            p.y = wrap(p.y + dy, h);
        }
    }

    /// Pairs closer than the link distance, with the line opacity to draw
    /// them at (fading out towards the limit).
    pub fn links(&self) -> Vec<(usize, usize, f64)> {
        let max = self.params.link_distance;
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < max {
                    links.push((i, j, self.params.link_opacity * (1.0 - dist / max)));
                }
            }
        }
        links
    }
}

fn wrap(v: f64, limit: f64) -> f64 {
    let v = v.rem_euclid(limit);
    // rem_euclid of a tiny negative value rounds up to `limit`
    if v >= limit { 0.0 } else { v }
}
