use super::*;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(super) struct Game {
    mode: ScreenMode,
    bounds: Bounds,
    score: u32,
    high_score: u32,
    lives: u32,
    level: u32,
    next_extra_life_score: u32,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    particles: Vec<Particle>,
    thrust_particles: Vec<Particle>,
    stars: Vec<Star>,
    fire_cooldown: f32,
    hyperspace_cooldown: f32,
    level_clear_timer: f32,
    menu_cursor: usize,
    pause_cursor: usize,
    frame_count: u32,
    rng: SeededRng,
    #[serde(skip)]
    outcome: StepOutcome,
}

impl Game {
    pub(super) fn new(bounds: Bounds, seed: u32, high_score: u32) -> Self {
        let mut rng = SeededRng::new(seed);
        let stars = generate_stars(STAR_COUNT, bounds, &mut rng);
        let (cx, cy) = bounds.center();

        let mut game = Self {
            mode: ScreenMode::Menu,
            bounds,
            score: 0,
            high_score,
            lives: STARTING_LIVES,
            level: 1,
            next_extra_life_score: EXTRA_LIFE_SCORE_STEP,
            ship: Ship::spawn(cx, cy, INVULN_TIME),
            bullets: Vec::with_capacity(MAX_BULLETS),
            asteroids: Vec::new(),
            particles: Vec::new(),
            thrust_particles: Vec::new(),
            stars,
            fire_cooldown: 0.0,
            hyperspace_cooldown: 0.0,
            level_clear_timer: 0.0,
            menu_cursor: 0,
            pause_cursor: 0,
            frame_count: 0,
            rng,
            outcome: StepOutcome::default(),
        };

        game.reset_world();
        game
    }

    #[inline]
    pub(super) fn mode(&self) -> ScreenMode {
        self.mode
    }

    #[inline]
    pub(super) fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub(super) fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub(super) fn high_score(&self) -> u32 {
        self.high_score
    }

    #[inline]
    pub(super) fn lives(&self) -> u32 {
        self.lives
    }

    #[inline]
    pub(super) fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub(super) fn ship(&self) -> &Ship {
        &self.ship
    }

    #[inline]
    pub(super) fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    #[inline]
    pub(super) fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[inline]
    pub(super) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub(super) fn thrust_particles(&self) -> &[Particle] {
        &self.thrust_particles
    }

    #[inline]
    pub(super) fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[inline]
    pub(super) fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    #[inline]
    pub(super) fn pause_cursor(&self) -> usize {
        self.pause_cursor
    }

    #[inline]
    pub(super) fn frame_count(&self) -> u32 {
        self.frame_count
    }

    #[inline]
    pub(super) fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    #[inline]
    pub(super) fn fire_cooldown(&self) -> f32 {
        self.fire_cooldown
    }

    #[inline]
    pub(super) fn hyperspace_cooldown(&self) -> f32 {
        self.hyperspace_cooldown
    }

    #[inline]
    pub(super) fn level_clear_timer(&self) -> f32 {
        self.level_clear_timer
    }

    pub(super) fn set_high_score(&mut self, high_score: u32) {
        self.high_score = self.high_score.max(high_score).max(self.score);
    }

    /// Adopts new playfield dimensions. Entities are folded back into the new
    /// bounds and the star field is regenerated for them.
    pub(super) fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.stars = generate_stars(STAR_COUNT, bounds, &mut self.rng);

        self.ship.x = wrap(self.ship.x, bounds.width);
        self.ship.y = wrap(self.ship.y, bounds.height);
        for bullet in &mut self.bullets {
            bullet.x = wrap(bullet.x, bounds.width);
            bullet.y = wrap(bullet.y, bounds.height);
        }
        for asteroid in &mut self.asteroids {
            asteroid.x = wrap(asteroid.x, bounds.width);
            asteroid.y = wrap(asteroid.y, bounds.height);
        }
    }

    /// Enters `Playing` with a fresh world, keeping the high score and stars.
    pub(super) fn start_new_game(&mut self) {
        self.reset_world();
        self.mode = ScreenMode::Playing;
        tracing::info!(high_score = self.high_score, "new game started");
    }

    pub(super) fn step(&mut self, input: &FrameInput, dt: f32) -> StepOutcome {
        self.outcome = StepOutcome::default();
        let mode_before = self.mode;
        self.frame_count = self.frame_count.wrapping_add(1);

        match self.mode {
            ScreenMode::Menu => self.step_menu(input),
            ScreenMode::Playing => self.step_playing(input, dt),
            ScreenMode::Paused => self.step_paused(input),
            ScreenMode::GameOver => self.step_game_over(input),
        }

        if self.mode != mode_before {
            self.outcome.mode_changed = true;
            tracing::debug!(from = ?mode_before, to = ?self.mode, "screen mode changed");
        }

        self.outcome
    }

    fn reset_world(&mut self) {
        let (cx, cy) = self.bounds.center();

        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.next_extra_life_score = EXTRA_LIFE_SCORE_STEP;
        self.ship = Ship::spawn(cx, cy, INVULN_TIME);
        self.bullets.clear();
        self.particles.clear();
        self.thrust_particles.clear();
        self.asteroids = spawn_asteroids(INITIAL_ASTEROIDS, self.bounds, &mut self.rng);
        self.fire_cooldown = 0.0;
        self.hyperspace_cooldown = 0.0;
        self.level_clear_timer = 0.0;
        self.pause_cursor = 0;
    }

    fn step_menu(&mut self, input: &FrameInput) {
        self.menu_cursor = move_cursor(self.menu_cursor, MENU_OPTIONS, &input.pressed);

        if input.pressed.confirm {
            match self.menu_cursor {
                0 => self.start_new_game(),
                _ => {
                    self.outcome.quit_requested = true;
                    tracing::info!("quit requested from menu");
                }
            }
        }
    }

    fn step_paused(&mut self, input: &FrameInput) {
        if input.pressed.pause {
            self.mode = ScreenMode::Playing;
            return;
        }

        self.pause_cursor = move_cursor(self.pause_cursor, PAUSE_OPTIONS, &input.pressed);

        if input.pressed.confirm {
            match self.pause_cursor {
                0 => self.mode = ScreenMode::Playing,
                1 => self.start_new_game(),
                _ => self.return_to_menu(),
            }
        }
    }

    fn step_game_over(&mut self, input: &FrameInput) {
        if input.pressed.confirm {
            self.start_new_game();
        } else if input.pressed.cancel {
            self.return_to_menu();
        }
    }

    fn return_to_menu(&mut self) {
        self.reset_world();
        self.menu_cursor = 0;
        self.mode = ScreenMode::Menu;
    }

    fn step_playing(&mut self, input: &FrameInput, dt: f32) {
        if input.pressed.pause {
            self.mode = ScreenMode::Paused;
            self.pause_cursor = 0;
            return;
        }

        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.hyperspace_cooldown = (self.hyperspace_cooldown - dt).max(0.0);

        self.update_ship(&input.held, dt);
        if input.pressed.hyperspace {
            self.try_hyperspace();
        }
        if input.held.fire {
            self.try_fire();
        }

        self.update_asteroids(dt);
        self.update_bullets(dt);
        self.update_particles(dt);

        self.handle_collisions();
        self.update_progression(dt);
    }

    fn update_ship(&mut self, held: &Buttons, dt: f32) {
        let bounds = self.bounds;
        self.ship.thrusting = false;

        if !self.ship.alive {
            if self.lives > 0 {
                self.ship.respawn_timer -= dt;
                if self.ship.respawn_timer <= 0.0 {
                    self.respawn_ship();
                }
            }
            return;
        }

        let ship = &mut self.ship;
        if ship.invulnerable {
            ship.invulnerable_timer -= dt;
            if ship.invulnerable_timer <= 0.0 {
                ship.invulnerable_timer = 0.0;
                ship.invulnerable = false;
            }
        }

        if held.left {
            ship.angle -= SHIP_ROTATION_SPEED * dt;
        }
        if held.right {
            ship.angle += SHIP_ROTATION_SPEED * dt;
        }
        ship.angle = ship.angle.rem_euclid(TAU);

        if held.thrust {
            ship.vx += ship.angle.cos() * SHIP_THRUST * dt;
            ship.vy += ship.angle.sin() * SHIP_THRUST * dt;
            ship.thrusting = true;
        }

        ship.vx *= SHIP_FRICTION;
        ship.vy *= SHIP_FRICTION;
        (ship.vx, ship.vy) = clamp_speed(ship.vx, ship.vy, SHIP_MAX_SPEED);

        ship.x = wrap(ship.x + ship.vx * dt, bounds.width);
        ship.y = wrap(ship.y + ship.vy * dt, bounds.height);

        if self.ship.thrusting {
            for _ in 0..THRUST_PARTICLES_PER_FRAME {
                let particle = create_thrust_particle(&self.ship, &mut self.rng);
                self.thrust_particles.push(particle);
            }
        }
    }

    fn respawn_ship(&mut self) {
        let (cx, cy) = self.bounds.center();
        self.ship = Ship::spawn(cx, cy, INVULN_TIME);
        tracing::debug!(lives = self.lives, "ship respawned");
    }

    /// Spawns a bullet from the ship nose. Silently refused while the ship is
    /// dead, the cooldown is running or the bullet cap is reached.
    pub(super) fn try_fire(&mut self) -> bool {
        if !self.ship.alive || self.fire_cooldown > 0.0 || self.bullets.len() >= MAX_BULLETS {
            return false;
        }

        let (nose_x, nose_y) = velocity(self.ship.angle, SHIP_SIZE);
        let (bvx, bvy) = velocity(self.ship.angle, BULLET_SPEED);
        self.bullets.push(Bullet {
            x: wrap(self.ship.x + nose_x, self.bounds.width),
            y: wrap(self.ship.y + nose_y, self.bounds.height),
            vx: self.ship.vx + bvx,
            vy: self.ship.vy + bvy,
            life: BULLET_LIFETIME,
        });
        self.fire_cooldown = FIRE_RATE;
        true
    }

    pub(super) fn try_hyperspace(&mut self) -> bool {
        if !self.ship.alive || self.hyperspace_cooldown > 0.0 {
            return false;
        }

        let (old_x, old_y) = (self.ship.x, self.ship.y);
        self.spawn_explosion(
            old_x,
            old_y,
            HYPERSPACE_BURST_PARTICLES,
            HYPERSPACE_BURST_SPEED,
            HYPERSPACE_BURST_LIFE,
        );

        let new_x = self.rng.gen_range(0.0..self.bounds.width);
        let new_y = self.rng.gen_range(0.0..self.bounds.height);
        self.ship.x = new_x;
        self.ship.y = new_y;
        self.ship.vx = 0.0;
        self.ship.vy = 0.0;
        self.spawn_explosion(
            new_x,
            new_y,
            HYPERSPACE_BURST_PARTICLES,
            HYPERSPACE_BURST_SPEED,
            HYPERSPACE_BURST_LIFE,
        );

        self.hyperspace_cooldown = HYPERSPACE_COOLDOWN;
        tracing::debug!(x = new_x, y = new_y, "hyperspace jump");
        true
    }

    fn update_asteroids(&mut self, dt: f32) {
        let bounds = self.bounds;
        for asteroid in &mut self.asteroids {
            asteroid.x = wrap(asteroid.x + asteroid.vx * dt, bounds.width);
            asteroid.y = wrap(asteroid.y + asteroid.vy * dt, bounds.height);
            asteroid.rotation = (asteroid.rotation + asteroid.rotation_speed * dt).rem_euclid(TAU);
        }
    }

    fn update_bullets(&mut self, dt: f32) {
        let bounds = self.bounds;
        for bullet in &mut self.bullets {
            bullet.x = wrap(bullet.x + bullet.vx * dt, bounds.width);
            bullet.y = wrap(bullet.y + bullet.vy * dt, bounds.height);
            bullet.life -= dt;
        }
        self.bullets.retain(|bullet| bullet.life > 0.0);
    }

    fn update_particles(&mut self, dt: f32) {
        for pool in [&mut self.particles, &mut self.thrust_particles] {
            for particle in pool.iter_mut() {
                particle.x += particle.vx * dt;
                particle.y += particle.vy * dt;
                particle.life -= dt;
            }
            pool.retain(|particle| particle.life > 0.0);
        }
    }

    fn handle_collisions(&mut self) {
        let bounds = self.bounds;

        // Only asteroids alive at the start of the pass can be hit; fragments
        // spawned by this pass wait until next frame.
        let asteroid_count = self.asteroids.len();
        let mut claimed = vec![false; asteroid_count];
        let mut spent = vec![false; self.bullets.len()];
        let mut hits = Vec::new();

        for (bullet_index, bullet) in self.bullets.iter().enumerate() {
            for asteroid_index in 0..asteroid_count {
                if claimed[asteroid_index] {
                    continue;
                }
                let asteroid = &self.asteroids[asteroid_index];
                if circles_overlap(
                    bullet.x,
                    bullet.y,
                    0.0,
                    asteroid.x,
                    asteroid.y,
                    asteroid.radius(),
                    bounds.width,
                    bounds.height,
                ) {
                    claimed[asteroid_index] = true;
                    spent[bullet_index] = true;
                    hits.push(asteroid_index);
                    break;
                }
            }
        }

        if !hits.is_empty() {
            let mut index = 0;
            self.bullets.retain(|_| {
                let keep = !spent[index];
                index += 1;
                keep
            });

            // Descending order keeps pending indices valid across swap_remove.
            hits.sort_unstable_by(|a, b| b.cmp(a));
            for asteroid_index in hits {
                self.destroy_asteroid(asteroid_index);
            }
        }

        if !self.ship.alive || self.ship.invulnerable {
            return;
        }

        let ship = self.ship;
        let struck = self.asteroids.iter().any(|asteroid| {
            circles_overlap(
                ship.x,
                ship.y,
                SHIP_RADIUS,
                asteroid.x,
                asteroid.y,
                asteroid.radius(),
                bounds.width,
                bounds.height,
            )
        });
        if struck {
            self.destroy_ship();
        }
    }

    /// Removes the asteroid at `index`, scores it, and leaves two fragments of
    /// the next size class in its place.
    pub(super) fn destroy_asteroid(&mut self, index: usize) {
        if index >= self.asteroids.len() {
            return;
        }

        let asteroid = self.asteroids.swap_remove(index);
        self.outcome.asteroids_destroyed += 1;
        self.add_score(asteroid.size.score());
        self.spawn_explosion(
            asteroid.x,
            asteroid.y,
            asteroid.size.explosion_particles(),
            ASTEROID_EXPLOSION_SPEED,
            ASTEROID_EXPLOSION_LIFE,
        );

        if let Some(child) = asteroid.size.child() {
            for _ in 0..2 {
                let fragment = create_asteroid(asteroid.x, asteroid.y, child, &mut self.rng);
                self.asteroids.push(fragment);
            }
        }
    }

    fn destroy_ship(&mut self) {
        let (x, y) = (self.ship.x, self.ship.y);
        self.ship.alive = false;
        self.ship.vx = 0.0;
        self.ship.vy = 0.0;
        self.ship.thrusting = false;
        self.spawn_explosion(
            x,
            y,
            SHIP_EXPLOSION_PARTICLES,
            SHIP_EXPLOSION_SPEED,
            SHIP_EXPLOSION_LIFE,
        );

        self.lives = self.lives.saturating_sub(1);
        self.outcome.ship_destroyed = true;

        if self.lives == 0 {
            self.mode = ScreenMode::GameOver;
            self.ship.respawn_timer = 0.0;
            tracing::info!(
                score = self.score,
                high_score = self.high_score,
                level = self.level,
                "game over"
            );
        } else {
            self.ship.respawn_timer = RESPAWN_DELAY;
            tracing::debug!(lives = self.lives, "ship destroyed");
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.outcome.high_score_raised = true;
        }

        while self.score >= self.next_extra_life_score {
            self.lives += 1;
            self.next_extra_life_score = self
                .next_extra_life_score
                .saturating_add(EXTRA_LIFE_SCORE_STEP);
            tracing::debug!(lives = self.lives, "extra life awarded");
            if self.next_extra_life_score == u32::MAX {
                break;
            }
        }
    }

    fn spawn_explosion(&mut self, x: f32, y: f32, count: usize, speed: f32, life: f32) {
        let burst = create_explosion(x, y, count, speed, life, &mut self.rng);
        self.particles.extend(burst);
    }

    fn update_progression(&mut self, dt: f32) {
        if self.mode != ScreenMode::Playing || !self.asteroids.is_empty() || !self.ship.alive {
            return;
        }

        self.level_clear_timer += dt;
        if self.level_clear_timer >= LEVEL_CLEAR_DELAY {
            self.advance_level();
        }
    }

    fn advance_level(&mut self) {
        let (cx, cy) = self.bounds.center();

        self.level += 1;
        let count = INITIAL_ASTEROIDS + self.level as usize - 1;
        self.asteroids = spawn_asteroids(count, self.bounds, &mut self.rng);
        self.bullets.clear();
        self.ship = Ship::spawn(cx, cy, INVULN_TIME);
        self.level_clear_timer = 0.0;
        self.outcome.level_advanced = true;

        tracing::info!(level = self.level, asteroids = count, "level cleared");
    }

    pub(super) fn validate_invariants(&self) -> Result<(), RuleCode> {
        let Bounds { width, height } = self.bounds;

        if self.level == 0 {
            return Err(RuleCode::LevelNonZero);
        }

        let mode_lives_consistent = match self.mode {
            ScreenMode::Playing | ScreenMode::Paused | ScreenMode::Menu => self.lives > 0,
            ScreenMode::GameOver => self.lives == 0,
        };
        if !mode_lives_consistent {
            return Err(RuleCode::ModeLivesConsistency);
        }

        if self.high_score < self.score {
            return Err(RuleCode::HighScoreBelowScore);
        }

        if self.next_extra_life_score <= self.score && self.next_extra_life_score != u32::MAX {
            return Err(RuleCode::NextExtraLifeScore);
        }

        let ship = &self.ship;
        if !(ship.x.is_finite() && ship.y.is_finite() && ship.vx.is_finite() && ship.vy.is_finite())
        {
            return Err(RuleCode::ShipNonFinite);
        }
        if !(0.0..width).contains(&ship.x) || !(0.0..height).contains(&ship.y) {
            return Err(RuleCode::ShipBounds);
        }
        if ship.invulnerable_timer < 0.0
            || ship.respawn_timer < 0.0
            || ship.invulnerable != (ship.invulnerable_timer > 0.0)
        {
            return Err(RuleCode::ShipTimerRange);
        }

        if self.bullets.len() > MAX_BULLETS {
            return Err(RuleCode::BulletLimit);
        }
        for bullet in &self.bullets {
            let in_bounds = (0.0..width).contains(&bullet.x) && (0.0..height).contains(&bullet.y);
            if !in_bounds || !(bullet.life > 0.0) {
                return Err(RuleCode::BulletState);
            }
        }

        for asteroid in &self.asteroids {
            let in_bounds =
                (0.0..width).contains(&asteroid.x) && (0.0..height).contains(&asteroid.y);
            if !in_bounds || asteroid.shape.len() < ASTEROID_VERTS_MIN {
                return Err(RuleCode::AsteroidState);
            }
        }

        if !(0.0..=FIRE_RATE).contains(&self.fire_cooldown)
            || !(0.0..=HYPERSPACE_COOLDOWN).contains(&self.hyperspace_cooldown)
        {
            return Err(RuleCode::CooldownRange);
        }

        if self.menu_cursor >= MENU_OPTIONS || self.pause_cursor >= PAUSE_OPTIONS {
            return Err(RuleCode::CursorRange);
        }

        Ok(())
    }
}

#[inline]
fn move_cursor(cursor: usize, options: usize, pressed: &Buttons) -> usize {
    let mut cursor = cursor % options;
    if pressed.menu_up {
        cursor = (cursor + options - 1) % options;
    }
    if pressed.menu_down {
        cursor = (cursor + 1) % options;
    }
    cursor
}
