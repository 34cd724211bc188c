// Gameplay tuning. Distances are playfield units, times are seconds.

// Playfield defaults (the environment may supply other dimensions)
pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;

// Ship
pub const SHIP_SIZE: f32 = 20.0;
pub const SHIP_RADIUS: f32 = SHIP_SIZE * 0.7;
pub const SHIP_THRUST: f32 = 300.0; // units/s^2
pub const SHIP_ROTATION_SPEED: f32 = 5.0; // rad/s
pub const SHIP_FRICTION: f32 = 0.98; // per simulated frame
pub const SHIP_MAX_SPEED: f32 = 400.0;
pub const SHIP_START_ANGLE: f32 = -core::f32::consts::FRAC_PI_2; // facing up
pub const RESPAWN_DELAY: f32 = 1.5;
pub const INVULN_TIME: f32 = 3.0;
pub const INVULN_BLINK_HZ: f32 = 10.0;

// Bullets
pub const MAX_BULLETS: usize = 20;
pub const FIRE_RATE: f32 = 0.15;
pub const BULLET_SPEED: f32 = 500.0;
pub const BULLET_LIFETIME: f32 = 1.2;

// Hyperspace
pub const HYPERSPACE_COOLDOWN: f32 = 3.0;
pub const HYPERSPACE_BURST_PARTICLES: usize = 20;
pub const HYPERSPACE_BURST_SPEED: f32 = 150.0;
pub const HYPERSPACE_BURST_LIFE: f32 = 0.6;

// Asteroids
pub const INITIAL_ASTEROIDS: usize = 4;
pub const ASTEROID_RADIUS_LARGE: f32 = 40.0;
pub const ASTEROID_RADIUS_MEDIUM: f32 = 20.0;
pub const ASTEROID_RADIUS_SMALL: f32 = 10.0;
pub const ASTEROID_SPEED_MIN: f32 = 30.0;
pub const ASTEROID_SPEED_MAX: f32 = 80.0;
pub const ASTEROID_SPIN_MAX: f32 = 1.0; // rad/s, both directions
pub const ASTEROID_VERTS_MIN: usize = 8;
pub const ASTEROID_VERTS_MAX: usize = 12;
pub const ASTEROID_JAG_MIN: f32 = 0.7;
pub const SAFE_SPAWN_RADIUS: f32 = 150.0;
pub const MAX_SPAWN_ATTEMPTS: usize = 256;

// Scoring
pub const SCORE_LARGE_ASTEROID: u32 = 20;
pub const SCORE_MEDIUM_ASTEROID: u32 = 50;
pub const SCORE_SMALL_ASTEROID: u32 = 100;
pub const STARTING_LIVES: u32 = 3;
pub const EXTRA_LIFE_SCORE_STEP: u32 = 10_000;

// Progression
pub const LEVEL_CLEAR_DELAY: f32 = 2.0;

// Particles
pub const EXPLOSION_PARTICLES_LARGE: usize = 15;
pub const EXPLOSION_PARTICLES_MEDIUM: usize = 10;
pub const EXPLOSION_PARTICLES_SMALL: usize = 6;
pub const ASTEROID_EXPLOSION_SPEED: f32 = 120.0;
pub const ASTEROID_EXPLOSION_LIFE: f32 = 1.0;
pub const SHIP_EXPLOSION_PARTICLES: usize = 30;
pub const SHIP_EXPLOSION_SPEED: f32 = 200.0;
pub const SHIP_EXPLOSION_LIFE: f32 = 1.5;
pub const PARTICLE_SIZE_MIN: f32 = 1.0;
pub const PARTICLE_SIZE_MAX: f32 = 3.0;
pub const THRUST_PARTICLES_PER_FRAME: usize = 2;
pub const THRUST_PARTICLE_SPEED_MIN: f32 = 50.0;
pub const THRUST_PARTICLE_SPEED_MAX: f32 = 150.0;
pub const THRUST_PARTICLE_SPREAD: f32 = 0.3; // rad either side of the exhaust axis
pub const THRUST_PARTICLE_LIFE: f32 = 0.3;
pub const THRUST_PARTICLE_SIZE: f32 = 2.0;

// Background
pub const STAR_COUNT: usize = 100;

// Menus
pub const MENU_OPTIONS: usize = 2; // Start, Quit
pub const PAUSE_OPTIONS: usize = 3; // Resume, Restart, Main Menu
