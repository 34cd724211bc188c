//! Procedural generation of asteroids, particle bursts and the star field.
//!
//! Every function draws from the caller's generator so a seeded world replays
//! identically; nothing here keeps its own random state.

use core::f32::consts::TAU;

use rand::Rng;

use crate::constants::{
    ASTEROID_JAG_MIN, ASTEROID_SPEED_MAX, ASTEROID_SPEED_MIN, ASTEROID_SPIN_MAX,
    ASTEROID_VERTS_MAX, ASTEROID_VERTS_MIN, MAX_SPAWN_ATTEMPTS, PARTICLE_SIZE_MAX,
    PARTICLE_SIZE_MIN, SAFE_SPAWN_RADIUS, SHIP_SIZE, THRUST_PARTICLE_LIFE,
    THRUST_PARTICLE_SIZE, THRUST_PARTICLE_SPEED_MAX, THRUST_PARTICLE_SPEED_MIN,
    THRUST_PARTICLE_SPREAD,
};
use crate::entities::{Asteroid, AsteroidSize, Bounds, Particle, Ship, Star};
use crate::math::{velocity, wrapped_distance};

/// Jagged outline: 8..=12 vertices evenly spaced in angle, each at a random
/// 70-100% of `radius`.
pub fn generate_asteroid_shape<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec<[f32; 2]> {
    let count = rng.gen_range(ASTEROID_VERTS_MIN..=ASTEROID_VERTS_MAX);
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = step * i as f32;
            let r = radius * rng.gen_range(ASTEROID_JAG_MIN..1.0);
            [angle.cos() * r, angle.sin() * r]
        })
        .collect()
}

pub fn create_asteroid<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    size: AsteroidSize,
    rng: &mut R,
) -> Asteroid {
    let speed = rng.gen_range(ASTEROID_SPEED_MIN..=ASTEROID_SPEED_MAX);
    let heading = rng.gen_range(0.0..TAU);
    let (vx, vy) = velocity(heading, speed);
    let shape = generate_asteroid_shape(size.radius(), rng);
    let rotation = rng.gen_range(0.0..TAU);
    let rotation_speed = rng.gen_range(-ASTEROID_SPIN_MAX..=ASTEROID_SPIN_MAX);

    Asteroid {
        x,
        y,
        vx,
        vy,
        size,
        shape,
        rotation,
        rotation_speed,
    }
}

/// Places `count` large asteroids away from the playfield center, where the
/// ship spawns.
pub fn spawn_asteroids<R: Rng + ?Sized>(
    count: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Asteroid> {
    let (cx, cy) = bounds.center();
    let mut asteroids = Vec::with_capacity(count);

    for _ in 0..count {
        let (mut best_x, mut best_y, mut best_dist) = (0.0, 0.0, f32::MIN);
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let x = rng.gen_range(0.0..bounds.width);
            let y = rng.gen_range(0.0..bounds.height);
            let dist = wrapped_distance(x, y, cx, cy, bounds.width, bounds.height);
            if dist > best_dist {
                (best_x, best_y, best_dist) = (x, y, dist);
            }
            if dist >= SAFE_SPAWN_RADIUS {
                break;
            }
        }
        asteroids.push(create_asteroid(best_x, best_y, AsteroidSize::Large, rng));
    }

    asteroids
}

pub fn create_explosion<R: Rng + ?Sized>(
    x: f32,
    y: f32,
    count: usize,
    speed_scale: f32,
    lifetime_base: f32,
    rng: &mut R,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let heading = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(0.0..=speed_scale.max(0.0));
            let (vx, vy) = velocity(heading, speed);
            let life = lifetime_base * rng.gen_range(0.5..=1.0);
            Particle {
                x,
                y,
                vx,
                vy,
                life,
                max_life: life,
                size: rng.gen_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX),
            }
        })
        .collect()
}

/// Exhaust particle leaving the tail of `ship`, inheriting its velocity.
pub fn create_thrust_particle<R: Rng + ?Sized>(ship: &Ship, rng: &mut R) -> Particle {
    let exhaust = ship.angle + core::f32::consts::PI;
    let (tail_x, tail_y) = velocity(exhaust, SHIP_SIZE * 0.5);
    let heading = exhaust + rng.gen_range(-THRUST_PARTICLE_SPREAD..=THRUST_PARTICLE_SPREAD);
    let speed = rng.gen_range(THRUST_PARTICLE_SPEED_MIN..=THRUST_PARTICLE_SPEED_MAX);
    let (vx, vy) = velocity(heading, speed);
    let life = THRUST_PARTICLE_LIFE * rng.gen_range(0.5..=1.0);

    Particle {
        x: ship.x + tail_x,
        y: ship.y + tail_y,
        vx: ship.vx + vx,
        vy: ship.vy + vy,
        life,
        max_life: life,
        size: THRUST_PARTICLE_SIZE,
    }
}

pub fn generate_stars<R: Rng + ?Sized>(count: usize, bounds: Bounds, rng: &mut R) -> Vec<Star> {
    (0..count)
        .map(|_| Star {
            x: rng.gen_range(0.0..bounds.width),
            y: rng.gen_range(0.0..bounds.height),
            size: rng.gen_range(0.5..=2.0),
            brightness: rng.gen_range(0.3..=1.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shape_has_expected_vertex_count_and_radii() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let shape = generate_asteroid_shape(40.0, &mut rng);
            assert!((8..=12).contains(&shape.len()));
            for [x, y] in &shape {
                let r = (x * x + y * y).sqrt();
                assert!(r >= 40.0 * 0.7 - 1e-3 && r <= 40.0 + 1e-3, "radius {r}");
            }
        }
    }

    #[test]
    fn shape_vertices_are_sorted_by_angle() {
        let mut rng = SeededRng::new(3);
        let shape = generate_asteroid_shape(20.0, &mut rng);
        let angles: Vec<f32> = shape
            .iter()
            .map(|[x, y]| y.atan2(*x).rem_euclid(TAU))
            .collect();
        // First vertex sits on angle 0; the rest increase monotonically.
        for pair in angles[1..].windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn created_asteroid_respects_speed_and_spin_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in [AsteroidSize::Large, AsteroidSize::Medium, AsteroidSize::Small] {
            for _ in 0..100 {
                let asteroid = create_asteroid(10.0, 20.0, size, &mut rng);
                let speed = (asteroid.vx.powi(2) + asteroid.vy.powi(2)).sqrt();
                assert!((30.0 - 1e-3..=80.0 + 1e-3).contains(&speed));
                assert!((-1.0..=1.0).contains(&asteroid.rotation_speed));
                assert_eq!(asteroid.size, size);
                assert_eq!((asteroid.x, asteroid.y), (10.0, 20.0));
            }
        }
    }

    #[test]
    fn spawned_asteroids_avoid_center() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut rng = SeededRng::new(0xABCD);
        for _ in 0..20 {
            let asteroids = spawn_asteroids(6, bounds, &mut rng);
            assert_eq!(asteroids.len(), 6);
            for asteroid in asteroids {
                assert_eq!(asteroid.size, AsteroidSize::Large);
                let d = wrapped_distance(asteroid.x, asteroid.y, 400.0, 300.0, 800.0, 600.0);
                assert!(d >= SAFE_SPAWN_RADIUS, "asteroid at distance {d}");
            }
        }
    }

    #[test]
    fn spawn_gives_up_on_tiny_playfield() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut rng = SeededRng::new(5);
        let asteroids = spawn_asteroids(3, bounds, &mut rng);
        assert_eq!(asteroids.len(), 3);
    }

    #[test]
    fn explosion_particles_follow_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let particles = create_explosion(5.0, 6.0, 15, 120.0, 1.0, &mut rng);
        assert_eq!(particles.len(), 15);
        for p in particles {
            let speed = (p.vx.powi(2) + p.vy.powi(2)).sqrt();
            assert!(speed <= 120.0 + 1e-3);
            assert!((0.5..=1.0).contains(&p.life));
            assert_eq!(p.life, p.max_life);
            assert_eq!((p.x, p.y), (5.0, 6.0));
        }
    }

    #[test]
    fn stars_cover_the_playfield() {
        let bounds = Bounds::new(320.0, 200.0);
        let mut rng = SeededRng::new(11);
        let stars = generate_stars(50, bounds, &mut rng);
        assert_eq!(stars.len(), 50);
        assert!(stars
            .iter()
            .all(|s| (0.0..320.0).contains(&s.x) && (0.0..200.0).contains(&s.y)));
    }
}
