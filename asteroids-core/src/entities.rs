use serde::{Deserialize, Serialize};

use crate::constants::{
    ASTEROID_RADIUS_LARGE, ASTEROID_RADIUS_MEDIUM, ASTEROID_RADIUS_SMALL,
    EXPLOSION_PARTICLES_LARGE, EXPLOSION_PARTICLES_MEDIUM, EXPLOSION_PARTICLES_SMALL,
    INVULN_BLINK_HZ, SCORE_LARGE_ASTEROID, SCORE_MEDIUM_ASTEROID, SCORE_SMALL_ASTEROID,
    SHIP_START_ANGLE,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenMode {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(self) -> f32 {
        match self {
            Self::Large => ASTEROID_RADIUS_LARGE,
            Self::Medium => ASTEROID_RADIUS_MEDIUM,
            Self::Small => ASTEROID_RADIUS_SMALL,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            Self::Large => SCORE_LARGE_ASTEROID,
            Self::Medium => SCORE_MEDIUM_ASTEROID,
            Self::Small => SCORE_SMALL_ASTEROID,
        }
    }

    /// The class produced when this asteroid is destroyed, if any.
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }

    pub fn explosion_particles(self) -> usize {
        match self {
            Self::Large => EXPLOSION_PARTICLES_LARGE,
            Self::Medium => EXPLOSION_PARTICLES_MEDIUM,
            Self::Small => EXPLOSION_PARTICLES_SMALL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
    pub alive: bool,
    pub invulnerable: bool,
    pub invulnerable_timer: f32,
    pub respawn_timer: f32,
    pub thrusting: bool,
}

impl Ship {
    pub fn spawn(x: f32, y: f32, invulnerable_for: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            angle: SHIP_START_ANGLE,
            alive: true,
            invulnerable: invulnerable_for > 0.0,
            invulnerable_timer: invulnerable_for.max(0.0),
            respawn_timer: 0.0,
            thrusting: false,
        }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Blink phase for renderers: an invulnerable ship is drawn on alternating
    /// `1 / INVULN_BLINK_HZ` slices of its remaining window.
    pub fn visible(&self) -> bool {
        if !self.alive {
            return false;
        }
        if !self.invulnerable {
            return true;
        }
        let phase = (self.invulnerable_timer * INVULN_BLINK_HZ) as u32;
        phase % 2 == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: AsteroidSize,
    /// Outline vertices relative to the asteroid center, sorted by angle.
    pub shape: Vec<[f32; 2]>,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Asteroid {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size.radius()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Fade factor in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_table_matches_scoring_and_splits() {
        assert_eq!(AsteroidSize::Large.radius(), 40.0);
        assert_eq!(AsteroidSize::Medium.radius(), 20.0);
        assert_eq!(AsteroidSize::Small.radius(), 10.0);
        assert_eq!(AsteroidSize::Large.score(), 20);
        assert_eq!(AsteroidSize::Medium.score(), 50);
        assert_eq!(AsteroidSize::Small.score(), 100);
        assert_eq!(AsteroidSize::Large.child(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.child(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.child(), None);
    }

    #[test]
    fn ship_blinks_only_while_invulnerable() {
        let mut ship = Ship::spawn(0.0, 0.0, 3.0);
        let mut seen_hidden = false;
        let mut seen_visible = false;
        for step in 0..30 {
            ship.invulnerable_timer = 3.0 - step as f32 * 0.05;
            if ship.visible() {
                seen_visible = true;
            } else {
                seen_hidden = true;
            }
        }
        assert!(seen_hidden && seen_visible);

        ship.invulnerable = false;
        ship.invulnerable_timer = 0.0;
        assert!(ship.visible());
        ship.alive = false;
        assert!(!ship.visible());
    }

    #[test]
    fn particle_alpha_is_clamped() {
        let mut particle = Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            life: 0.5,
            max_life: 1.0,
            size: 1.0,
        };
        assert_eq!(particle.alpha(), 0.5);
        particle.life = -1.0;
        assert_eq!(particle.alpha(), 0.0);
        particle.max_life = 0.0;
        assert_eq!(particle.alpha(), 0.0);
    }
}
