use core::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_EXPLOSION_LIFE, ASTEROID_EXPLOSION_SPEED, ASTEROID_VERTS_MIN, BULLET_LIFETIME,
    BULLET_SPEED, DEFAULT_HEIGHT, DEFAULT_WIDTH, EXTRA_LIFE_SCORE_STEP, FIRE_RATE,
    HYPERSPACE_BURST_LIFE, HYPERSPACE_BURST_PARTICLES, HYPERSPACE_BURST_SPEED,
    HYPERSPACE_COOLDOWN, INITIAL_ASTEROIDS, INVULN_TIME, LEVEL_CLEAR_DELAY, MAX_BULLETS,
    MENU_OPTIONS, PAUSE_OPTIONS, RESPAWN_DELAY, SHIP_EXPLOSION_LIFE, SHIP_EXPLOSION_PARTICLES,
    SHIP_EXPLOSION_SPEED, SHIP_FRICTION, SHIP_MAX_SPEED, SHIP_RADIUS, SHIP_ROTATION_SPEED,
    SHIP_SIZE, SHIP_THRUST, STARTING_LIVES, STAR_COUNT, THRUST_PARTICLES_PER_FRAME,
};
use crate::entities::{Asteroid, Bounds, Bullet, Particle, ScreenMode, Ship, Star};
use crate::error::{RuleCode, SnapshotError};
use crate::factory::{
    create_asteroid, create_explosion, create_thrust_particle, generate_stars, spawn_asteroids,
};
use crate::input::{Buttons, FrameInput};
use crate::math::{circles_overlap, clamp_speed, velocity, wrap};
use crate::rng::SeededRng;

mod game;

use game::Game;

/// Events produced by a single [`Session::step`]. Callers use these to decide
/// when to persist the high score or shut down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub high_score_raised: bool,
    pub quit_requested: bool,
    pub mode_changed: bool,
    pub level_advanced: bool,
    pub ship_destroyed: bool,
    pub asteroids_destroyed: u32,
}

/// A running game: world state, screen mode and the seeded generator that
/// drives every random decision. Stepping the same session with the same
/// inputs and `dt` sequence is fully deterministic.
#[derive(Clone, Debug)]
pub struct Session {
    game: Game,
}

impl Session {
    /// Builds a session in the main menu. Non-positive or non-finite
    /// dimensions fall back to the default playfield.
    pub fn new(width: f32, height: f32, seed: u32) -> Self {
        let mut bounds = Bounds::new(width, height);
        if !bounds.is_valid() {
            tracing::warn!(width, height, "invalid playfield bounds, using defaults");
            bounds = Bounds::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        }

        Self {
            game: Game::new(bounds, seed, 0),
        }
    }

    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.game.set_high_score(high_score);
        self
    }

    /// Skips the menu and begins play immediately.
    pub fn start_game(&mut self) {
        self.game.start_new_game();
    }

    pub fn step(&mut self, input: &FrameInput, dt: f32) -> StepOutcome {
        self.game.step(input, dt)
    }

    /// Adopts new playfield dimensions. Invalid dimensions are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        if !bounds.is_valid() {
            tracing::warn!(width, height, "ignoring invalid resize");
            return;
        }
        self.game.resize(bounds);
    }

    pub fn mode(&self) -> ScreenMode {
        self.game.mode()
    }

    pub fn bounds(&self) -> Bounds {
        self.game.bounds()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn high_score(&self) -> u32 {
        self.game.high_score()
    }

    pub fn lives(&self) -> u32 {
        self.game.lives()
    }

    pub fn level(&self) -> u32 {
        self.game.level()
    }

    pub fn ship(&self) -> &Ship {
        self.game.ship()
    }

    pub fn bullets(&self) -> &[Bullet] {
        self.game.bullets()
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        self.game.asteroids()
    }

    /// Explosion and hyperspace debris.
    pub fn particles(&self) -> &[Particle] {
        self.game.particles()
    }

    pub fn thrust_particles(&self) -> &[Particle] {
        self.game.thrust_particles()
    }

    pub fn stars(&self) -> &[Star] {
        self.game.stars()
    }

    pub fn menu_cursor(&self) -> usize {
        self.game.menu_cursor()
    }

    pub fn pause_cursor(&self) -> usize {
        self.game.pause_cursor()
    }

    pub fn frame_count(&self) -> u32 {
        self.game.frame_count()
    }

    pub fn rng_state(&self) -> u32 {
        self.game.rng_state()
    }

    pub fn fire_cooldown(&self) -> f32 {
        self.game.fire_cooldown()
    }

    pub fn hyperspace_cooldown(&self) -> f32 {
        self.game.hyperspace_cooldown()
    }

    pub fn level_clear_timer(&self) -> f32 {
        self.game.level_clear_timer()
    }

    /// Checks the world-state invariants, reporting the first broken rule.
    pub fn validate(&self) -> Result<(), RuleCode> {
        self.game.validate_invariants()
    }

    pub fn save_state(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(&self.game).map_err(|err| SnapshotError::Encode(err.to_string()))
    }

    /// Decodes a snapshot, rejecting worlds with invalid bounds or broken
    /// invariants.
    pub fn restore_state(json: &str) -> Result<Self, SnapshotError> {
        let game: Game =
            serde_json::from_str(json).map_err(|err| SnapshotError::Decode(err.to_string()))?;
        let bounds = game.bounds();
        if !bounds.is_valid() {
            return Err(SnapshotError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        game.validate_invariants().map_err(SnapshotError::Invariant)?;
        Ok(Self { game })
    }
}

