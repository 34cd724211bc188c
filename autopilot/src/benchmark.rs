use crate::bots::bot_ids;
use crate::config::RunConfig;
use crate::runner::{run_bot, write_file, write_tape, RunArtifact, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use asteroids_core::MemoryHighScoreStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Score,
    Survival,
}

impl Objective {
    pub fn run_value(self, metrics: &RunMetrics) -> f64 {
        match self {
            Self::Score => {
                (metrics.final_score as f64)
                    + (metrics.frame_count as f64) * 0.05
                    + (metrics.final_lives as f64) * 100.0
            }
            Self::Survival => {
                (metrics.frame_count as f64)
                    + (metrics.final_lives as f64) * 600.0
                    + (metrics.final_score as f64) * 0.1
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Survival => "survival",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run: RunConfig,
    pub objective: Objective,
    pub out_dir: Option<PathBuf>,
    pub save_top: usize,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub seed: u32,
    pub seed_hex: String,
    pub frame_count: u32,
    pub final_score: u32,
    pub final_lives: u32,
    pub final_level: u32,
    pub game_over: bool,
    pub objective_value: f64,
    pub asteroids_destroyed: u32,
    pub ships_lost: u32,
    pub fire_frames: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotAggregate {
    pub bot_id: String,
    pub bot_fingerprint: String,
    pub runs: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_frames: f64,
    pub max_level: u32,
    pub survival_rate: f64,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub max_frames: u32,
    pub jobs: Option<usize>,
    pub bots: Vec<String>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub bot_rankings: Vec<BotAggregate>,
    pub runs: Vec<RunRecord>,
    pub saved_tapes: Vec<String>,
}

struct InternalRun {
    artifact: RunArtifact,
    objective_value: f64,
}

pub fn resolve_bots(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(bot_ids().iter().map(|id| (*id).to_string()).collect()),
        Some(raw) => {
            let mut bots = Vec::new();
            for token in raw.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                bots.push(token.to_string());
            }
            if bots.is_empty() {
                return Err(anyhow!("--bots resolved to empty list"));
            }
            Ok(bots)
        }
    }
}

/// Runs every bot against every seed in parallel. Each run owns its session
/// and an in-memory high-score store, so runs never share state.
pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.bots.is_empty() {
        return Err(anyhow!("benchmark requires at least one bot"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }

    let run_jobs: Vec<(String, u32)> = config
        .bots
        .iter()
        .flat_map(|bot| config.seeds.iter().map(move |seed| (bot.clone(), *seed)))
        .collect();
    tracing::info!(runs = run_jobs.len(), jobs = ?config.jobs, "benchmark started");

    let run_one = |(bot_id, seed): &(String, u32)| -> Result<InternalRun> {
        let artifact = run_bot(bot_id, *seed, &config.run, MemoryHighScoreStore::new())
            .with_context(|| format!("benchmark run failed for bot={bot_id} seed={seed:#x}"))?;
        let objective_value = config.objective.run_value(&artifact.metrics);
        Ok(InternalRun {
            artifact,
            objective_value,
        })
    };

    let run_results: Vec<Result<InternalRun>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| run_jobs.par_iter().map(run_one).collect())
    } else {
        run_jobs.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(run_results.len());
    for result in run_results {
        runs.push(result?);
    }

    let rankings = rank_bots(&runs, config.run.max_frames);

    let mut run_records: Vec<RunRecord> = runs
        .iter()
        .map(|run| {
            let metrics = &run.artifact.metrics;
            RunRecord {
                bot_id: metrics.bot_id.clone(),
                bot_fingerprint: metrics.bot_fingerprint.clone(),
                seed: metrics.seed,
                seed_hex: seed_to_hex(metrics.seed),
                frame_count: metrics.frame_count,
                final_score: metrics.final_score,
                final_lives: metrics.final_lives,
                final_level: metrics.final_level,
                game_over: metrics.game_over,
                objective_value: run.objective_value,
                asteroids_destroyed: metrics.asteroids_destroyed,
                ships_lost: metrics.ships_lost,
                fire_frames: metrics.fire_frames,
            }
        })
        .collect();

    run_records.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.final_score.cmp(&a.final_score))
            .then_with(|| b.frame_count.cmp(&a.frame_count))
    });

    let mut saved_tapes = Vec::new();
    if let Some(out_dir) = &config.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed creating {}", out_dir.display()))?;
        if config.save_top > 0 {
            saved_tapes = save_top_tapes(out_dir, &runs, config.save_top)?;
        }
    }

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        max_frames: config.run.max_frames,
        jobs: config.jobs,
        bots: config.bots,
        seeds: config.seeds,
        run_count: run_records.len(),
        bot_rankings: rankings,
        runs: run_records,
        saved_tapes,
    };

    if let Some(out_dir) = &config.out_dir {
        write_runs_csv(&out_dir.join("runs.csv"), &report.runs)?;
        write_rankings_csv(&out_dir.join("rankings.csv"), &report.bot_rankings)?;
        let encoded =
            serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?;
        write_file(&out_dir.join("summary.json"), &encoded)?;
    }

    Ok(report)
}

fn rank_bots(runs: &[InternalRun], max_frames: u32) -> Vec<BotAggregate> {
    let mut grouped: HashMap<&str, Vec<&InternalRun>> = HashMap::new();
    for run in runs {
        grouped
            .entry(run.artifact.metrics.bot_id.as_str())
            .or_default()
            .push(run);
    }

    let mut rankings: Vec<BotAggregate> = grouped
        .into_iter()
        .map(|(bot_id, bot_runs)| {
            let count = bot_runs.len();
            let metrics = || bot_runs.iter().map(|run| &run.artifact.metrics);
            let survived = metrics()
                .filter(|m| !m.game_over && m.frame_count >= max_frames)
                .count();

            BotAggregate {
                bot_id: bot_id.to_string(),
                bot_fingerprint: metrics()
                    .next()
                    .map(|m| m.bot_fingerprint.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                runs: count,
                avg_score: metrics().map(|m| m.final_score as f64).sum::<f64>() / count as f64,
                max_score: metrics().map(|m| m.final_score).max().unwrap_or_default(),
                avg_frames: metrics().map(|m| m.frame_count as f64).sum::<f64>() / count as f64,
                max_level: metrics().map(|m| m.final_level).max().unwrap_or_default(),
                survival_rate: survived as f64 / count as f64,
                objective_value: bot_runs.iter().map(|r| r.objective_value).sum::<f64>()
                    / count as f64,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_score.total_cmp(&a.avg_score))
            .then_with(|| a.bot_id.cmp(&b.bot_id))
    });
    rankings
}

fn save_top_tapes(out_dir: &Path, runs: &[InternalRun], count: usize) -> Result<Vec<String>> {
    let mut order: Vec<&InternalRun> = runs.iter().collect();
    order.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| {
                b.artifact
                    .metrics
                    .final_score
                    .cmp(&a.artifact.metrics.final_score)
            })
    });

    let save_dir = out_dir.join("top");
    let mut saved = Vec::new();
    for (idx, run) in order.into_iter().take(count).enumerate() {
        let metrics = &run.artifact.metrics;
        let path = save_dir.join(format!(
            "rank{:02}-{}-seed{:08x}-score{}.json",
            idx + 1,
            metrics.bot_id,
            metrics.seed,
            metrics.final_score
        ));
        write_tape(&path, &run.artifact.tape)?;
        saved.push(path.to_string_lossy().into_owned());
    }
    Ok(saved)
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "bot_id,bot_fingerprint,seed_hex,seed,frame_count,final_score,final_lives,final_level,game_over,objective_value,asteroids_destroyed,ships_lost,fire_frames\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            row.bot_id,
            row.bot_fingerprint,
            row.seed_hex,
            row.seed,
            row.frame_count,
            row.final_score,
            row.final_lives,
            row.final_level,
            row.game_over,
            row.objective_value,
            row.asteroids_destroyed,
            row.ships_lost,
            row.fire_frames
        ));
    }
    write_file(path, csv.as_bytes())
}

fn write_rankings_csv(path: &Path, rows: &[BotAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,bot_id,bot_fingerprint,runs,avg_score,max_score,avg_frames,max_level,survival_rate,objective_value\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{:.2},{},{:.2},{},{:.4},{:.4}\n",
            idx + 1,
            row.bot_id,
            row.bot_fingerprint,
            row.runs,
            row.avg_score,
            row.max_score,
            row.avg_frames,
            row.max_level,
            row.survival_rate,
            row.objective_value
        ));
    }
    write_file(path, csv.as_bytes())
}
