//! Particle systems
//!
//! Emitters of short-lived points (sparks, smoke, coloured powder). They
//! carry no logical state beyond visuals: a system that fails to emit is
//! indistinguishable from one that succeeds as far as scene logic goes.

use crate::foundation::math::{Color, Lerp, Vec3};
use rand::Rng;

/// A single live particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Seconds since spawn
    pub age: f32,
    /// Seconds until despawn
    pub lifetime: f32,
    /// Colour picked at spawn
    pub color: Color,
}

/// Particle emitter resource data
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    /// Spawn position
    pub emitter: Vec3,
    /// Maximum live particles
    pub capacity: usize,
    /// Particles spawned per second while emitting continuously
    pub emit_rate: f32,
    /// Minimum particle lifetime in seconds
    pub min_lifetime: f32,
    /// Maximum particle lifetime in seconds
    pub max_lifetime: f32,
    /// One corner of the initial velocity box
    pub direction_min: Vec3,
    /// Other corner of the initial velocity box
    pub direction_max: Vec3,
    /// Constant acceleration
    pub gravity: Vec3,
    /// First colour of the spawn colour range
    pub color_start: Color,
    /// Second colour of the spawn colour range
    pub color_end: Color,
    particles: Vec<Particle>,
    emitting: bool,
    burst_remaining: Option<usize>,
    accumulator: f32,
}

impl ParticleSystem {
    /// Create a stopped emitter with sensible defaults
    pub fn new(emitter: Vec3, capacity: usize) -> Self {
        Self {
            emitter,
            capacity,
            emit_rate: 50.0,
            min_lifetime: 0.5,
            max_lifetime: 1.5,
            direction_min: Vec3::new(-0.5, 1.0, -0.5),
            direction_max: Vec3::new(0.5, 2.0, 0.5),
            gravity: Vec3::zeros(),
            color_start: Color::new(1.0, 1.0, 1.0),
            color_end: Color::new(1.0, 1.0, 1.0),
            particles: Vec::with_capacity(capacity),
            emitting: false,
            burst_remaining: None,
            accumulator: 0.0,
        }
    }

    /// Set continuous emit rate
    pub fn with_emit_rate(mut self, rate: f32) -> Self {
        self.emit_rate = rate;
        self
    }

    /// Set the particle lifetime range
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.min_lifetime = min;
        self.max_lifetime = max;
        self
    }

    /// Set the initial velocity range
    pub fn with_directions(mut self, min: Vec3, max: Vec3) -> Self {
        self.direction_min = min;
        self.direction_max = max;
        self
    }

    /// Set constant acceleration
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the spawn colour range
    pub fn with_colors(mut self, start: Color, end: Color) -> Self {
        self.color_start = start;
        self.color_end = end;
        self
    }

    /// Whether parameters can drive a simulation
    pub fn is_valid(&self) -> bool {
        self.capacity > 0
            && self.emit_rate.is_finite()
            && self.emit_rate >= 0.0
            && self.min_lifetime > 0.0
            && self.min_lifetime <= self.max_lifetime
    }

    /// Start continuous emission
    pub fn start(&mut self) {
        self.emitting = true;
        self.burst_remaining = None;
    }

    /// Emit `count` particles on the next advance, then stop
    pub fn burst(&mut self, count: usize) {
        self.emitting = true;
        self.burst_remaining = Some(count);
    }

    /// Stop emitting; live particles finish their lifetime
    pub fn stop(&mut self) {
        self.emitting = false;
        self.burst_remaining = None;
        self.accumulator = 0.0;
    }

    /// Whether the emitter is spawning particles
    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Number of live particles
    pub fn active_count(&self) -> usize {
        self.particles.len()
    }

    /// Live particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether the emitter is stopped and every particle has expired
    pub fn is_finished(&self) -> bool {
        !self.emitting && self.particles.is_empty()
    }

    /// Age, move, expire, and spawn particles
    pub fn advance<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) {
        let dt = delta_time.max(0.0);
        let gravity = self.gravity;
        for particle in &mut self.particles {
            particle.velocity += gravity * dt;
            particle.position += particle.velocity * dt;
            particle.age += dt;
        }
        self.particles.retain(|p| p.age < p.lifetime);

        if !self.emitting {
            return;
        }

        let free = self.capacity.saturating_sub(self.particles.len());
        let spawn = match self.burst_remaining {
            Some(remaining) => {
                let spawn = remaining.min(free);
                let left = remaining - spawn;
                if left == 0 {
                    self.emitting = false;
                    self.burst_remaining = None;
                } else {
                    self.burst_remaining = Some(left);
                }
                spawn
            }
            None => {
                self.accumulator += self.emit_rate * dt;
                let whole = self.accumulator.floor();
                self.accumulator -= whole;
                (whole as usize).min(free)
            }
        };

        for _ in 0..spawn {
            let particle = self.spawn_particle(rng);
            self.particles.push(particle);
        }
    }

    fn spawn_particle<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let velocity = Vec3::new(
            self.direction_min.x.lerp_to(&self.direction_max.x, rng.gen::<f32>()),
            self.direction_min.y.lerp_to(&self.direction_max.y, rng.gen::<f32>()),
            self.direction_min.z.lerp_to(&self.direction_max.z, rng.gen::<f32>()),
        );
        Particle {
            position: self.emitter,
            velocity,
            age: 0.0,
            lifetime: self.min_lifetime.lerp_to(&self.max_lifetime, rng.gen::<f32>()),
            color: self.color_start.lerp_to(&self.color_end, rng.gen::<f32>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_stopped_system_emits_nothing() {
        let mut system = ParticleSystem::new(Vec3::zeros(), 10);
        system.advance(1.0, &mut rng());
        assert_eq!(system.active_count(), 0);
        assert!(system.is_finished());
    }

    #[test]
    fn test_continuous_emission_respects_capacity() {
        let mut system = ParticleSystem::new(Vec3::zeros(), 20)
            .with_emit_rate(100.0)
            .with_lifetime(10.0, 10.0);
        system.start();
        let mut rng = rng();
        system.advance(1.0, &mut rng);
        assert_eq!(system.active_count(), 20);
    }

    #[test]
    fn test_burst_then_expire() {
        let mut system = ParticleSystem::new(Vec3::zeros(), 50).with_lifetime(0.5, 1.0);
        system.burst(30);
        let mut rng = rng();
        system.advance(0.016, &mut rng);
        assert_eq!(system.active_count(), 30);
        assert!(!system.is_emitting());

        system.advance(1.1, &mut rng);
        assert_eq!(system.active_count(), 0);
        assert!(system.is_finished());
    }

    #[test]
    fn test_burst_larger_than_capacity_spreads_over_frames() {
        let mut system = ParticleSystem::new(Vec3::zeros(), 10).with_lifetime(0.1, 0.1);
        system.burst(15);
        let mut rng = rng();
        system.advance(0.0, &mut rng);
        assert_eq!(system.active_count(), 10);
        assert!(system.is_emitting());
        system.advance(0.2, &mut rng);
        assert_eq!(system.active_count(), 5);
        assert!(!system.is_emitting());
    }

    #[test]
    fn test_validation() {
        assert!(ParticleSystem::new(Vec3::zeros(), 1).is_valid());
        assert!(!ParticleSystem::new(Vec3::zeros(), 0).is_valid());
        assert!(!ParticleSystem::new(Vec3::zeros(), 5).with_lifetime(2.0, 1.0).is_valid());
    }
}
