//! growth-runner: batch generator, revenue pass and viewer for
//! simulated SaaS growth trajectories.
//!
//! Usage:
//!   growth-runner --model linear --count 3 --quarters 12 --out data
//!   growth-runner --all --seed 7 --out data --revenue
//!   growth-runner --config batch.json
//!   growth-runner --annotate data
//!   growth-runner --serve data/saas_growth_quadratic_1.json

use anyhow::{Context, Result};
use saas_growth_core::{
    batch::run_batch,
    config::BatchConfig,
    growth::GrowthModel,
    snapshot::Snapshot,
    store::TrajectoryStore,
    trajectory::TrajectorySummary,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ViewerRequest {
    GetTrajectory,
    GetQuarter { index: usize },
    Summary,
    Quit,
}

#[derive(serde::Serialize)]
struct BatchManifest<'a> {
    generated_at: String,
    seed: u64,
    quarters: usize,
    replicates: usize,
    models: Vec<&'a str>,
    files: Vec<String>,
    failed: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if let Some(path) = string_arg(&args, "--serve") {
        return serve(Path::new(path));
    }
    if let Some(dir) = string_arg(&args, "--annotate") {
        return annotate(dir);
    }

    let config = build_config(&args)?;
    config.validate()?;

    println!("SaaS growth — growth-runner");
    println!("  models:     {}", config.models.iter().map(|m| m.tag()).collect::<Vec<_>>().join(", "));
    println!("  replicates: {}", config.replicates);
    println!("  quarters:   {}", config.quarters);
    println!("  seed:       {}", config.seed);
    println!("  out:        {}", config.output_dir.display());
    println!();

    let store = TrajectoryStore::open(&config.output_dir)?;
    let report = run_batch(&config, &store)?;

    for trajectory in &report.trajectories {
        print_summary(trajectory.model, trajectory.replicate, &trajectory.summary());
    }
    for model in &config.models {
        println!("Generated {} scenarios with {} growth pattern", config.replicates, model);
    }

    write_manifest(&store, &config, &report);

    if !report.failed.is_empty() {
        log::warn!("{} trajectory files could not be written", report.failed.len());
    }
    Ok(())
}

/// Start from `--config` (or defaults) and apply command-line overrides.
fn build_config(args: &[String]) -> Result<BatchConfig> {
    let mut config = match string_arg(args, "--config") {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };

    if args.iter().any(|a| a == "--all") {
        config.models = GrowthModel::ALL.to_vec();
    } else if let Some(tag) = string_arg(args, "--model") {
        let model: GrowthModel = tag.parse()?;
        config.models = vec![model];
    }
    config.replicates = parse_arg(args, "--count")?.unwrap_or(config.replicates);
    config.quarters = parse_arg(args, "--quarters")?.unwrap_or(config.quarters);
    config.seed = parse_arg(args, "--seed")?.unwrap_or(config.seed);
    config.start_year = parse_arg(args, "--start-year")?.unwrap_or(config.start_year);
    config.workers = parse_arg(args, "--workers")?.unwrap_or(config.workers);
    if let Some(out) = string_arg(args, "--out") {
        config.output_dir = out.into();
    }
    if args.iter().any(|a| a == "--revenue") {
        config.with_revenue = true;
    }
    Ok(config)
}

fn annotate(dir: &str) -> Result<()> {
    let store = TrajectoryStore::existing(dir)
        .with_context(|| format!("Error: {dir} is not a valid directory."))?;
    let report = store.annotate_revenue()?;
    println!(
        "Processed {} JSON files with revenue data ({} failed).",
        report.processed(),
        report.failed.len()
    );
    println!("Revenue calculation completed.");
    Ok(())
}

/// Line-delimited JSON request/response over stdin/stdout for one
/// stored trajectory. Read-only.
fn serve(path: &Path) -> Result<()> {
    let snapshots = TrajectoryStore::load(path)
        .with_context(|| format!("Cannot load trajectory {}", path.display()))?;
    log::info!("serving {} ({} quarters)", path.display(), snapshots.len());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: ViewerRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match request {
            ViewerRequest::Quit => break,
            ViewerRequest::GetTrajectory => {
                writeln!(stdout, "{}", serde_json::to_string(&snapshots)?)?;
            }
            ViewerRequest::GetQuarter { index } => {
                writeln!(stdout, "{}", quarter_response(&snapshots, index))?;
            }
            ViewerRequest::Summary => {
                let summary = TrajectorySummary::from_snapshots(&snapshots);
                writeln!(stdout, "{}", serde_json::to_string(&summary)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn quarter_response(snapshots: &[Snapshot], index: usize) -> serde_json::Value {
    match snapshots.get(index) {
        Some(snap) => serde_json::to_value(snap)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
        None => serde_json::json!({
            "error": format!("quarter {index} out of range (0..{})", snapshots.len())
        }),
    }
}

fn print_summary(model: &str, replicate: usize, summary: &TrajectorySummary) {
    println!(
        "  {model:<24} #{replicate} | {} → {} | headcount {} → {} (peak {}) | capital ${:.2}M | rounds at {:?}",
        summary.first_quarter.as_deref().unwrap_or("-"),
        summary.last_quarter.as_deref().unwrap_or("-"),
        summary.starting_headcount,
        summary.final_headcount,
        summary.peak_headcount,
        summary.final_capital,
        summary.funded_quarters,
    );
}

fn write_manifest(
    store: &TrajectoryStore,
    config: &BatchConfig,
    report: &saas_growth_core::batch::BatchReport,
) {
    let manifest = BatchManifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        seed: config.seed,
        quarters: config.quarters,
        replicates: config.replicates,
        models: config.models.iter().map(|m| m.tag()).collect(),
        files: report.written.iter().map(|p| p.display().to_string()).collect(),
        failed: report.failed.iter().map(|(p, e)| format!("{}: {e}", p.display())).collect(),
    };
    match store.save_manifest(&manifest) {
        Ok(path) => log::info!("wrote {}", path.display()),
        Err(e) => log::warn!("could not write batch manifest: {e}"),
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// A flag that is absent yields `None`; a flag that is present must
/// carry a value that parses.
fn parse_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let raw = args
        .get(pos + 1)
        .with_context(|| format!("{flag} requires a value"))?;
    raw.parse()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("invalid value '{raw}' for {flag}: {e}"))
}
