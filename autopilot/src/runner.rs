use crate::bots::{bot_fingerprint, create_bot, AutopilotBot};
use crate::config::RunConfig;
use crate::render::TraceSink;
use anyhow::{anyhow, Context, Result};
use asteroids_core::{
    replay, Buttons, Driver, HighScoreStore, InputSource, InputTape, ScreenMode, Session,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub max_frames: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub high_score: u32,
    pub final_rng_state: u32,
    pub final_lives: u32,
    pub final_level: u32,
    pub game_over: bool,
    pub asteroids_destroyed: u32,
    pub ships_lost: u32,
    pub levels_cleared: u32,
    pub action_frames: u32,
    pub turn_frames: u32,
    pub thrust_frames: u32,
    pub fire_frames: u32,
}

#[derive(Clone, Debug)]
pub struct RunArtifact {
    pub metrics: RunMetrics,
    pub tape: InputTape,
    /// Serialized world at the end of the run.
    pub snapshot: String,
}

/// Feeds a bot's decisions into a driver and tallies what it pressed.
struct BotInput<'a> {
    bot: &'a mut dyn AutopilotBot,
    action_frames: u32,
    turn_frames: u32,
    thrust_frames: u32,
    fire_frames: u32,
}

impl InputSource for BotInput<'_> {
    fn next_input(&mut self, session: &Session) -> Buttons {
        let buttons = self.bot.next_input(session);
        if !buttons.is_empty() {
            self.action_frames += 1;
        }
        if buttons.left || buttons.right {
            self.turn_frames += 1;
        }
        if buttons.thrust {
            self.thrust_frames += 1;
        }
        if buttons.fire {
            self.fire_frames += 1;
        }
        buttons
    }
}

pub fn run_bot<S: HighScoreStore>(
    bot_id: &str,
    seed: u32,
    config: &RunConfig,
    store: S,
) -> Result<RunArtifact> {
    let mut bot = create_bot(bot_id).ok_or_else(|| anyhow!("unknown bot '{bot_id}'"))?;
    run_bot_instance(bot.as_mut(), seed, config, store)
}

pub fn run_bot_instance<S: HighScoreStore>(
    bot: &mut dyn AutopilotBot,
    seed: u32,
    config: &RunConfig,
    store: S,
) -> Result<RunArtifact> {
    if config.max_frames == 0 {
        return Err(anyhow!("max_frames must be > 0"));
    }
    if !(config.dt.is_finite() && config.dt > 0.0) {
        return Err(anyhow!("dt must be positive, got {}", config.dt));
    }

    bot.reset(seed);
    let bot_id = bot.id();
    let input = BotInput {
        bot,
        action_frames: 0,
        turn_frames: 0,
        thrust_frames: 0,
        fire_frames: 0,
    };

    let mut driver = Driver::new(
        config.width,
        config.height,
        seed,
        input,
        TraceSink::new(),
        store,
    )
    .record();
    driver
        .session()
        .validate()
        .map_err(|rule| anyhow!("initial invariant failure: {rule}"))?;

    let mut asteroids_destroyed = 0u32;
    let mut ships_lost = 0u32;
    let mut levels_cleared = 0u32;

    while driver.session().frame_count() < config.max_frames
        && driver.session().mode() != ScreenMode::GameOver
    {
        let outcome = driver
            .run_frame(config.dt)
            .context("failed to persist high score")?;
        asteroids_destroyed += outcome.asteroids_destroyed;
        ships_lost += u32::from(outcome.ship_destroyed);
        levels_cleared += u32::from(outcome.level_advanced);

        driver.session().validate().map_err(|rule| {
            anyhow!(
                "invariant {rule} broken at frame {}",
                driver.session().frame_count()
            )
        })?;

        if outcome.quit_requested {
            break;
        }
    }

    let (action_frames, turn_frames, thrust_frames, fire_frames) = {
        let input = driver.input();
        (
            input.action_frames,
            input.turn_frames,
            input.thrust_frames,
            input.fire_frames,
        )
    };

    let (session, tape) = driver.finish().context("failed to persist high score")?;
    let tape = tape.ok_or_else(|| anyhow!("driver did not record a tape"))?;

    let replayed = replay(&tape).map_err(|err| anyhow!("recorded tape is invalid: {err}"))?;
    if replayed.final_score != session.score()
        || replayed.rng_state != session.rng_state()
        || replayed.frame_count != session.frame_count()
        || replayed.high_score != session.high_score()
    {
        return Err(anyhow!(
            "replay diverged: live score={} high={} rng={:#010x}, replay score={} high={} rng={:#010x}",
            session.score(),
            session.high_score(),
            session.rng_state(),
            replayed.final_score,
            replayed.high_score,
            replayed.rng_state
        ));
    }

    let snapshot = session
        .save_state()
        .map_err(|err| anyhow!("failed to snapshot session: {err}"))?;

    tracing::info!(
        bot = bot_id,
        seed,
        frames = session.frame_count(),
        score = session.score(),
        "run finished"
    );

    Ok(RunArtifact {
        metrics: RunMetrics {
            bot_id: bot_id.to_string(),
            bot_fingerprint: bot_fingerprint(bot_id).unwrap_or_else(|| "unknown".to_string()),
            seed,
            max_frames: config.max_frames,
            frame_count: session.frame_count(),
            final_score: session.score(),
            high_score: session.high_score(),
            final_rng_state: session.rng_state(),
            final_lives: session.lives(),
            final_level: session.level(),
            game_over: session.mode() == ScreenMode::GameOver,
            asteroids_destroyed,
            ships_lost,
            levels_cleared,
            action_frames,
            turn_frames,
            thrust_frames,
            fire_frames,
        },
        tape,
        snapshot,
    })
}

pub fn write_tape(path: &Path, tape: &InputTape) -> Result<()> {
    let json = tape
        .to_json()
        .map_err(|err| anyhow!("failed to encode tape: {err}"))?;
    write_file(path, json.as_bytes())
}

pub fn read_tape(path: &Path) -> Result<InputTape> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    InputTape::from_json(&json).map_err(|err| anyhow!("invalid tape {}: {err}", path.display()))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}
