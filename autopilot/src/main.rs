use anyhow::{anyhow, Result};
use asteroids_autopilot::benchmark::{resolve_bots, run_benchmark, BenchmarkConfig, Objective};
use asteroids_autopilot::bots::{bot_ids, bot_manifest_entries, create_bot, describe_bots};
use asteroids_autopilot::config::RunConfig;
use asteroids_autopilot::runner::{read_tape, run_bot, write_file, write_tape};
use asteroids_autopilot::store::ConfiguredStore;
use asteroids_autopilot::util::{
    clock_seed, parse_seed, parse_seed_csv, parse_seed_file, seed_range, seed_to_hex,
};
use asteroids_core::replay;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asteroids-autopilot")]
#[command(about = "Headless Asteroids runner: drive sessions with bots, record and replay tapes")]
struct Cli {
    /// Playfield width (defaults to ASTEROIDS_WIDTH or 800)
    #[arg(long, global = true)]
    width: Option<f32>,
    /// Playfield height (defaults to ASTEROIDS_HEIGHT or 600)
    #[arg(long, global = true)]
    height: Option<f32>,
    /// Seconds per simulated frame (defaults to ASTEROIDS_DT or 1/60)
    #[arg(long, global = true)]
    dt: Option<f32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available bots
    ListBots {
        /// Print the full manifest with config fingerprints as JSON
        #[arg(long)]
        manifest: bool,
    },
    /// Play one session with a bot and report the result
    Run {
        #[arg(long)]
        bot: String,
        /// Decimal or 0x-prefixed hex; the clock is used when omitted
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        max_frames: Option<u32>,
        /// Persist the high score here (defaults to ASTEROIDS_HIGH_SCORE_PATH)
        #[arg(long)]
        high_score: Option<PathBuf>,
        #[arg(long)]
        tape_out: Option<PathBuf>,
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },
    /// Replay a recorded tape and print the final state
    Replay {
        #[arg(long)]
        tape: PathBuf,
    },
    /// Run every bot over a range of seeds in parallel
    Benchmark {
        #[arg(long)]
        bots: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 8)]
        seed_count: u32,
        #[arg(long)]
        max_frames: Option<u32>,
        #[arg(long, value_enum, default_value_t = CliObjective::Score)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        save_top: usize,
        #[arg(long)]
        jobs: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Score,
    Survival,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Score => Objective::Score,
            CliObjective::Survival => Objective::Survival,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli {
        width,
        height,
        dt,
        command,
    } = Cli::parse();

    let mut config = RunConfig::from_env();
    if let Some(width) = width {
        config.width = width;
    }
    if let Some(height) = height {
        config.height = height;
    }
    if let Some(dt) = dt {
        config.dt = dt;
    }

    match command {
        Commands::ListBots { manifest } => {
            if manifest {
                println!("{}", serde_json::to_string_pretty(&bot_manifest_entries())?);
            } else {
                for (id, description) in describe_bots() {
                    println!("{id:20} {description}");
                }
            }
        }
        Commands::Run {
            bot,
            seed,
            max_frames,
            high_score,
            tape_out,
            snapshot_out,
        } => {
            if create_bot(&bot).is_none() {
                let available = bot_ids().join(", ");
                return Err(anyhow!("unknown bot '{bot}'. available: {available}"));
            }
            let seed = match seed {
                Some(seed) => parse_seed(&seed)?,
                None => clock_seed(),
            };
            if let Some(max_frames) = max_frames {
                config.max_frames = max_frames;
            }
            if high_score.is_some() {
                config.high_score_path = high_score;
            }

            let store = ConfiguredStore::from_path(config.high_score_path.as_deref());
            let artifact = run_bot(&bot, seed, &config, store)?;

            if let Some(path) = &tape_out {
                write_tape(path, &artifact.tape)?;
            }
            if let Some(path) = &snapshot_out {
                write_file(path, artifact.snapshot.as_bytes())?;
            }

            let metrics = &artifact.metrics;
            println!("bot={}", metrics.bot_id);
            println!("bot_fingerprint={}", metrics.bot_fingerprint);
            println!("seed={}", seed_to_hex(seed));
            println!("frames={}", metrics.frame_count);
            println!("score={}", metrics.final_score);
            println!("high_score={}", metrics.high_score);
            println!("lives={}", metrics.final_lives);
            println!("level={}", metrics.final_level);
            println!("game_over={}", metrics.game_over);
            println!("rng={:#010x}", metrics.final_rng_state);
            if let Some(path) = tape_out {
                println!("tape={}", path.display());
            }
            if let Some(path) = snapshot_out {
                println!("snapshot={}", path.display());
            }
        }
        Commands::Replay { tape } => {
            let input = read_tape(&tape)?;
            let result = replay(&input).map_err(|err| anyhow!("replay failed: {err}"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Benchmark {
            bots,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_frames,
            objective,
            out_dir,
            save_top,
            jobs,
        } => {
            let bots = resolve_bots(bots.as_deref())?;
            for bot in &bots {
                if create_bot(bot).is_none() {
                    return Err(anyhow!("unknown bot '{bot}'"));
                }
            }

            let seeds = if let Some(raw) = seeds {
                parse_seed_csv(&raw)?
            } else if let Some(path) = seed_file {
                parse_seed_file(&path)?
            } else {
                let start = match seed_start {
                    Some(raw) => parse_seed(&raw)?,
                    None => clock_seed(),
                };
                seed_range(start, seed_count)
            };
            if let Some(max_frames) = max_frames {
                config.max_frames = max_frames;
            }

            let objective = Objective::from(objective);
            let report = run_benchmark(BenchmarkConfig {
                bots,
                seeds,
                run: config,
                objective,
                out_dir: out_dir.clone(),
                save_top,
                jobs,
            })?;

            println!("objective={}", objective.as_str());
            println!("runs={}", report.run_count);
            for (idx, bot) in report.bot_rankings.iter().enumerate() {
                println!(
                    "#{:<2} {:20} avg_score={:.1} max_score={} avg_frames={:.0} max_level={} objective={:.1}",
                    idx + 1,
                    bot.bot_id,
                    bot.avg_score,
                    bot.max_score,
                    bot.avg_frames,
                    bot.max_level,
                    bot.objective_value
                );
            }
            if let Some(dir) = out_dir {
                println!("summary={}", dir.join("summary.json").display());
            }
        }
    }

    Ok(())
}
