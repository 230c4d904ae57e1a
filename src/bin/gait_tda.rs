//! Gait TDA: Distinguishing Trials by Hip-Knee Coordination
//!
//! Each input file is a joint-angle recording (hip angle, hip angular
//! velocity, knee angle, knee angular velocity per row). For every trial
//! the continuous relative phase (CRP) and its derivative form a 2-D point
//! cloud; clouds are normalized against ranges pooled over all trials, their
//! persistence diagrams are computed and compared pairwise.
//!
//! ## Usage
//!
//! ```bash
//! gait_tda walk_1.txt walk_2.txt run_1.txt
//! gait_tda --config pipeline.toml --log-level debug data/*.txt
//! gait_tda --demo 4
//! ```
//!
//! `--demo N` replaces the recordings with N noisy FitzHugh-Nagumo
//! trajectories at increasing drive.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use phase_space_tda::geometry::phase::{normalized_cloud, range};
use phase_space_tda::recording::{pooled_ranges, RelativePhase};
use phase_space_tda::topology::seeded_rng;
use phase_space_tda::{
    analyze_trials, BatchReport, FitzHughNagumo, JointRecording, PipelineConfig, PointCloud,
    Result, TdaError,
};

/// Compare gait trials by the persistent homology of their relative phase.
#[derive(Parser, Debug)]
#[command(name = "gait_tda", version, about, long_about = None)]
struct Args {
    /// Recording files, one trial each
    #[arg(required_unless_present = "demo")]
    files: Vec<PathBuf>,

    /// TOML pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error. RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run on N synthetic trajectories instead of recordings
    #[arg(long, value_name = "N", conflicts_with = "files")]
    demo: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║          GAIT TDA: PERSISTENT HOMOLOGY OF RELATIVE PHASE       ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Landmarks:          {}", config.landmark_count);
    println!(
        "  Scale sweep:        {} .. {} step {}",
        config.scale.start, config.scale.stop, config.scale.step
    );
    println!("  Compared intervals: {}", config.top_k_intervals);
    println!("  Adjacency cutoff:   {}", config.adjacency_threshold);
    println!();

    let trials = match args.demo {
        Some(n) => demo_trials(n)?,
        None => recorded_trials(&args.files)?,
    };

    let report = analyze_trials(&trials, &config)?;
    print_report(&report, config.top_k_intervals);
    Ok(())
}

/// Load every recording and build CRP clouds on pooled ranges
fn recorded_trials(files: &[PathBuf]) -> Result<Vec<(String, PointCloud)>> {
    let mut names = Vec::with_capacity(files.len());
    let mut phases: Vec<RelativePhase> = Vec::with_capacity(files.len());

    for path in files {
        let recording = JointRecording::from_path(path)?;
        info!(path = %path.display(), n_samples = recording.len(), "computing relative phase");
        phases.push(recording.relative_phase()?);
        names.push(
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        );
    }

    let (crp_range, crp_dot_range) = pooled_ranges(&phases)?;
    names
        .into_iter()
        .zip(&phases)
        .map(|(name, phase)| Ok((name, phase.to_cloud(crp_range, crp_dot_range)?)))
        .collect()
}

/// Noisy FitzHugh-Nagumo limit cycles at increasing drive
fn demo_trials(n: usize) -> Result<Vec<(String, PointCloud)>> {
    if n < 2 {
        return Err(TdaError::InvalidParameter(format!(
            "demo needs at least 2 trajectories, got {n}"
        )));
    }

    let mut rng = seeded_rng(42);
    let mut raw = Vec::with_capacity(n);
    for i in 0..n {
        let i_ext = 0.5 + 0.5 * i as f64 / (n - 1) as f64;
        let mut fhn = FitzHughNagumo::new(i_ext);
        fhn.run(2000);
        let cloud = fhn.noisy_trajectory(300, 4, 0.02, &mut rng)?;
        raw.push((format!("fhn_I={i_ext:.2}"), cloud));
    }

    let xs: Vec<f64> = raw.iter().flat_map(|(_, c)| c.iter().map(|p| p.x)).collect();
    let ys: Vec<f64> = raw.iter().flat_map(|(_, c)| c.iter().map(|p| p.y)).collect();
    let (x_range, y_range) = match (range(&xs), range(&ys)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(TdaError::DegenerateInput("empty demo trajectories".into())),
    };

    raw.into_iter()
        .map(|(name, cloud)| {
            let (x, y): (Vec<f64>, Vec<f64>) = cloud.iter().map(|p| (p.x, p.y)).unzip();
            Ok((name, normalized_cloud(&x, &y, x_range, y_range)?))
        })
        .collect()
}

fn print_report(report: &BatchReport, top_k: usize) {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("PERSISTENCE DIAGRAMS (longest {top_k} intervals)");
    println!("═══════════════════════════════════════════════════════════════════");
    for (name, diagram) in report.names.iter().zip(&report.diagrams) {
        println!("{name} ({} intervals)", diagram.len());
        let shown = diagram.len().saturating_sub(top_k);
        for interval in diagram.intervals()[shown..].iter().rev() {
            println!(
                "  [{:>6.3}, {:>6.3})  persistence {:>6.3}",
                interval.birth,
                interval.death,
                interval.persistence()
            );
        }
    }
    println!();

    print_matrix("DISTANCE MATRIX (normalized)", &report.names, |i, j| {
        format!("{:>8.3}", report.normalized.values()[[i, j]])
    });
    print_matrix("ADJACENCY MATRIX", &report.names, |i, j| {
        format!("{:>8}", report.adjacency[[i, j]])
    });

    let isolated: Vec<&str> = report
        .names
        .iter()
        .enumerate()
        .filter(|&(i, _)| report.adjacency.row(i).iter().all(|&a| a == 0))
        .map(|(_, name)| name.as_str())
        .collect();
    if !isolated.is_empty() {
        warn!(trials = ?isolated, "trials without neighbours");
    }
}

fn print_matrix(title: &str, names: &[String], cell: impl Fn(usize, usize) -> String) {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("{title}");
    println!("═══════════════════════════════════════════════════════════════════");
    print!("{:>14}", "");
    for j in 0..names.len() {
        print!("{:>8}", j);
    }
    println!();
    for (i, name) in names.iter().enumerate() {
        print!("{:>2} {:>11}", i, truncate(name, 11));
        for j in 0..names.len() {
            print!("{}", cell(i, j));
        }
        println!();
    }
    println!();
}

fn truncate(name: &str, width: usize) -> &str {
    match name.char_indices().nth(width) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}
