use asteroids_core::math::{shortest_delta, wrapped_distance};
use asteroids_core::{Asteroid, Buttons, ScreenMode, Session};
use serde::Serialize;
use std::f32::consts::{PI, TAU};

mod roster;

pub use roster::{bot_fingerprint, bot_ids, bot_manifest_entries, create_bot, describe_bots};

pub trait AutopilotBot {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    /// Buttons to hold while the session is in play.
    fn next_input(&mut self, session: &Session) -> Buttons;
}

#[derive(Clone, Debug, Serialize)]
pub struct BotManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

/// Navigates the menus so every bot only has to fly the ship. Returns `None`
/// while the session is playing.
pub fn menu_input(session: &Session, frame: u32) -> Option<Buttons> {
    match session.mode() {
        ScreenMode::Playing => None,
        // Alternate press and release so the latch sees a fresh edge.
        ScreenMode::Menu if session.menu_cursor() == 0 => Some(Buttons {
            confirm: frame % 2 == 0,
            ..Buttons::NONE
        }),
        ScreenMode::Menu => Some(Buttons {
            menu_up: frame % 2 == 0,
            ..Buttons::NONE
        }),
        ScreenMode::Paused => Some(Buttons {
            pause: frame % 2 == 0,
            ..Buttons::NONE
        }),
        ScreenMode::GameOver => Some(Buttons::NONE),
    }
}

/// Signed angle in `[-PI, PI)` to rotate from `from` to face `to`.
pub fn angle_diff(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct HunterConfig {
    pub(crate) id: &'static str,
    pub(crate) description: &'static str,
    /// Fire when the aim error is below this many radians.
    pub(crate) fire_tolerance: f32,
    pub(crate) fire_distance: f32,
    /// Close the gap with thrust beyond this range.
    pub(crate) approach_distance: f32,
    pub(crate) speed_soft_cap: f32,
    /// Hyperspace away when a rock gets this close to the hull.
    pub(crate) panic_distance: f32,
}

pub(crate) struct HunterBot {
    cfg: HunterConfig,
    frame: u32,
    hyperspace_held: bool,
}

impl HunterBot {
    pub(crate) fn new(cfg: HunterConfig) -> Self {
        Self {
            cfg,
            frame: 0,
            hyperspace_held: false,
        }
    }

    fn nearest<'a>(session: &'a Session) -> Option<(&'a Asteroid, f32)> {
        let ship = session.ship();
        let bounds = session.bounds();
        session
            .asteroids()
            .iter()
            .map(|asteroid| {
                let gap = wrapped_distance(
                    ship.x,
                    ship.y,
                    asteroid.x,
                    asteroid.y,
                    bounds.width,
                    bounds.height,
                ) - asteroid.radius();
                (asteroid, gap)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl AutopilotBot for HunterBot {
    fn id(&self) -> &'static str {
        self.cfg.id
    }

    fn description(&self) -> &'static str {
        self.cfg.description
    }

    fn reset(&mut self, _seed: u32) {
        self.frame = 0;
        self.hyperspace_held = false;
    }

    fn next_input(&mut self, session: &Session) -> Buttons {
        self.frame = self.frame.wrapping_add(1);
        if let Some(buttons) = menu_input(session, self.frame) {
            return buttons;
        }

        let ship = *session.ship();
        if !ship.alive {
            return Buttons::NONE;
        }
        let Some((target, gap)) = Self::nearest(session) else {
            return Buttons::NONE;
        };

        let mut buttons = Buttons::NONE;

        let in_danger = !ship.invulnerable && gap < self.cfg.panic_distance;
        if in_danger && session.hyperspace_cooldown() <= 0.0 && !self.hyperspace_held {
            buttons.hyperspace = true;
            self.hyperspace_held = true;
            return buttons;
        }
        self.hyperspace_held = false;

        let bounds = session.bounds();
        let dx = shortest_delta(ship.x, target.x, bounds.width);
        let dy = shortest_delta(ship.y, target.y, bounds.height);
        let error = angle_diff(ship.angle, dy.atan2(dx));

        if error > self.cfg.fire_tolerance * 0.5 {
            buttons.right = true;
        } else if error < -self.cfg.fire_tolerance * 0.5 {
            buttons.left = true;
        }

        let aimed = error.abs() < self.cfg.fire_tolerance;
        buttons.fire = aimed && gap < self.cfg.fire_distance;
        buttons.thrust = aimed
            && gap > self.cfg.approach_distance
            && ship.speed() < self.cfg.speed_soft_cap;

        buttons
    }
}

/// Spins in place and fires continuously.
pub(crate) struct SpinnerBot {
    frame: u32,
}

impl SpinnerBot {
    pub(crate) const ID: &'static str = "spinner";
    pub(crate) const DESCRIPTION: &'static str = "Turret that rotates clockwise with the trigger held.";

    pub(crate) fn new() -> Self {
        Self { frame: 0 }
    }
}

impl AutopilotBot for SpinnerBot {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn reset(&mut self, _seed: u32) {
        self.frame = 0;
    }

    fn next_input(&mut self, session: &Session) -> Buttons {
        self.frame = self.frame.wrapping_add(1);
        menu_input(session, self.frame).unwrap_or(Buttons {
            right: true,
            fire: true,
            ..Buttons::NONE
        })
    }
}

/// Starts a game and never touches the controls again.
pub(crate) struct IdleBot {
    frame: u32,
}

impl IdleBot {
    pub(crate) const ID: &'static str = "idle";
    pub(crate) const DESCRIPTION: &'static str = "Baseline that starts a game and drifts.";

    pub(crate) fn new() -> Self {
        Self { frame: 0 }
    }
}

impl AutopilotBot for IdleBot {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn reset(&mut self, _seed: u32) {
        self.frame = 0;
    }

    fn next_input(&mut self, session: &Session) -> Buttons {
        self.frame = self.frame.wrapping_add(1);
        menu_input(session, self.frame).unwrap_or(Buttons::NONE)
    }
}
