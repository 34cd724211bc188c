use anyhow::Result;
use asteroids_autopilot::benchmark::{run_benchmark, BenchmarkConfig, Objective};
use asteroids_autopilot::bots::bot_ids;
use asteroids_autopilot::config::RunConfig;
use asteroids_autopilot::runner::{read_tape, run_bot, write_tape};
use asteroids_core::{replay, MemoryHighScoreStore, ScreenMode, Session};

fn short_config(max_frames: u32) -> RunConfig {
    RunConfig {
        max_frames,
        ..RunConfig::default()
    }
}

#[test]
fn every_bot_completes_a_smoke_run() -> Result<()> {
    let seed = 0xDEAD_BEEF;
    for bot in bot_ids() {
        let artifact = run_bot(bot, seed, &short_config(300), MemoryHighScoreStore::new())?;
        assert!(artifact.metrics.frame_count > 0, "bot={bot}");
        assert!(artifact.metrics.frame_count <= 300, "bot={bot}");
        assert_eq!(artifact.metrics.bot_id, bot);
        assert_eq!(artifact.tape.frames.len() as u32, artifact.metrics.frame_count);
    }
    Ok(())
}

#[test]
fn recorded_tape_replays_to_the_same_result() -> Result<()> {
    let artifact = run_bot(
        "hunter-aggressive",
        0xC0FF_EE11,
        &short_config(1_200),
        MemoryHighScoreStore::new(),
    )?;
    let result = replay(&artifact.tape)?;
    assert_eq!(result.final_score, artifact.metrics.final_score);
    assert_eq!(result.frame_count, artifact.metrics.frame_count);
    assert_eq!(result.rng_state, artifact.metrics.final_rng_state);
    assert_eq!(result.level, artifact.metrics.final_level);
    Ok(())
}

#[test]
fn same_seed_same_bot_is_deterministic() -> Result<()> {
    let config = short_config(900);
    let a = run_bot("hunter-steady", 7, &config, MemoryHighScoreStore::new())?;
    let b = run_bot("hunter-steady", 7, &config, MemoryHighScoreStore::new())?;
    assert_eq!(a.metrics.final_score, b.metrics.final_score);
    assert_eq!(a.metrics.final_rng_state, b.metrics.final_rng_state);
    assert_eq!(a.tape, b.tape);
    Ok(())
}

#[test]
fn snapshot_restores_final_world() -> Result<()> {
    let artifact = run_bot("spinner", 11, &short_config(600), MemoryHighScoreStore::new())?;
    let session = Session::restore_state(&artifact.snapshot)?;
    assert_eq!(session.score(), artifact.metrics.final_score);
    assert_eq!(session.frame_count(), artifact.metrics.frame_count);
    assert_ne!(session.mode(), ScreenMode::Menu);
    Ok(())
}

#[test]
fn idle_bot_never_scores() -> Result<()> {
    let artifact = run_bot("idle", 3, &short_config(600), MemoryHighScoreStore::new())?;
    assert_eq!(artifact.metrics.final_score, 0);
    assert_eq!(artifact.metrics.fire_frames, 0);
    Ok(())
}

#[test]
fn unknown_bot_and_zero_frames_are_rejected() {
    assert!(run_bot("nope", 1, &short_config(10), MemoryHighScoreStore::new()).is_err());
    assert!(run_bot("idle", 1, &short_config(0), MemoryHighScoreStore::new()).is_err());
}

#[test]
fn tape_file_round_trip() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let artifact = run_bot("spinner", 5, &short_config(240), MemoryHighScoreStore::new())?;
    let path = tmp.path().join("tapes/spinner.json");
    write_tape(&path, &artifact.tape)?;
    let loaded = read_tape(&path)?;
    assert_eq!(loaded, artifact.tape);
    Ok(())
}

#[test]
fn benchmark_smoke_outputs_expected_files() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let report = run_benchmark(BenchmarkConfig {
        bots: vec!["hunter-steady".to_string(), "spinner".to_string()],
        seeds: vec![0xDEAD_BEEF, 0xC0FF_EE11],
        run: short_config(600),
        objective: Objective::Score,
        out_dir: Some(tmp.path().to_path_buf()),
        save_top: 1,
        jobs: Some(2),
    })?;

    assert_eq!(report.run_count, 4);
    assert_eq!(report.bot_rankings.len(), 2);
    assert_eq!(report.saved_tapes.len(), 1);
    assert!(tmp.path().join("summary.json").exists());
    assert!(tmp.path().join("runs.csv").exists());
    assert!(tmp.path().join("rankings.csv").exists());
    Ok(())
}

#[test]
fn benchmark_rejects_empty_inputs() {
    let config = BenchmarkConfig {
        bots: vec!["idle".to_string()],
        seeds: Vec::new(),
        run: short_config(10),
        objective: Objective::Survival,
        out_dir: None,
        save_top: 0,
        jobs: None,
    };
    assert!(run_benchmark(config).is_err());
}
