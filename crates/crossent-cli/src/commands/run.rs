//! Run command: optimize a benchmark function and report progress.
//!
//! The optimizer itself never stops; this driver owns the stopping
//! policy, the per-generation CSV log and checkpointing.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use crossent::prelude::*;
use crossent::{Checkpoint, GenerationReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::info::format_vector;
use crate::error::{CliError, Result};

/// Generations run when neither limit is given
const DEFAULT_GENERATIONS: u64 = 100;

#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    /// Benchmark function (sphere, rosenbrock, rastrigin, ackley)
    #[arg(short, long, default_value = "sphere")]
    pub function: String,

    /// Number of variables
    #[arg(short, long, default_value = "2")]
    pub dim: usize,

    /// Starting value for every coordinate
    #[arg(long, default_value = "2.0", allow_negative_numbers = true)]
    pub start: f64,

    /// Samples per generation (default: max(100, 10 * dim))
    #[arg(short, long)]
    pub population_size: Option<usize>,

    /// Elite members per generation (default: population / 10)
    #[arg(short, long)]
    pub selection_size: Option<usize>,

    /// Initial variance in every dimension
    #[arg(long)]
    pub variance: Option<f64>,

    /// Noise schedule (zero, constant, linear)
    #[arg(long)]
    pub noise: Option<String>,

    /// Constant noise level, or intercept of linear noise
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    pub noise_a: f64,

    /// Slope of linear noise per generation
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    pub noise_b: f64,

    /// Elite weighting (equal, linear, superlinear)
    #[arg(short, long)]
    pub recombination: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many generations
    #[arg(short, long, conflicts_with = "max_evaluations")]
    pub generations: Option<u64>,

    /// Stop once this many objective evaluations were made
    #[arg(long)]
    pub max_evaluations: Option<u64>,

    /// Write one CSV row per generation
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Save the final state as a JSON checkpoint
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Continue from a JSON checkpoint
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Optimizer settings as JSON; flags take precedence
    #[arg(long, conflicts_with = "resume")]
    pub config: Option<PathBuf>,
}

/// When the driver stops calling `step`.
///
/// Limits count from the start of this invocation, so a resumed run gets
/// a fresh budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoppingPolicy {
    /// Fixed number of generations
    Generations(u64),
    /// Evaluation budget; the last generation may overshoot it
    Evaluations(u64),
}

impl StoppingPolicy {
    pub(crate) fn from_args(
        generations: Option<u64>,
        max_evaluations: Option<u64>,
    ) -> Result<Self> {
        let policy = match (generations, max_evaluations) {
            (Some(_), Some(_)) => {
                return Err(CliError::InvalidArgument(
                    "--generations and --max-evaluations are exclusive".to_string(),
                ))
            }
            (Some(n), None) => Self::Generations(n),
            (None, Some(n)) => Self::Evaluations(n),
            (None, None) => Self::Generations(DEFAULT_GENERATIONS),
        };
        if policy.limit() == 0 {
            return Err(CliError::InvalidArgument(format!("{policy} is not a budget")));
        }
        Ok(policy)
    }

    fn limit(&self) -> u64 {
        match *self {
            Self::Generations(n) | Self::Evaluations(n) => n,
        }
    }

    pub(crate) fn is_done(&self, generations: u64, evaluations: u64) -> bool {
        match *self {
            Self::Generations(n) => generations >= n,
            Self::Evaluations(n) => evaluations >= n,
        }
    }
}

impl fmt::Display for StoppingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generations(n) => write!(f, "{n} generations"),
            Self::Evaluations(n) => write!(f, "{n} evaluations"),
        }
    }
}

fn load_config(path: &Path) -> Result<CrossEntropyConfig> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn parse_noise(args: &RunArgs) -> Result<Option<NoiseSchedule>> {
    args.noise
        .as_deref()
        .map(|kind| {
            NoiseSchedule::parse(kind, args.noise_a, args.noise_b)
                .ok_or_else(|| CliError::InvalidArgument(format!("Unknown noise schedule: {kind}")))
        })
        .transpose()
}

fn parse_recombination(args: &RunArgs) -> Result<Option<Recombination>> {
    args.recombination
        .as_deref()
        .map(|name| {
            Recombination::parse(name)
                .ok_or_else(|| CliError::InvalidArgument(format!("Unknown recombination: {name}")))
        })
        .transpose()
}

/// Config file (if any) overridden by explicit flags.
pub(crate) fn build_config(args: &RunArgs) -> Result<CrossEntropyConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CrossEntropyConfig::default(),
    };
    if let Some(n) = args.population_size {
        config = config.with_population_size(n);
    }
    if let Some(n) = args.selection_size {
        config = config.with_selection_size(n);
    }
    if let Some(v) = args.variance {
        config = config.with_initial_variance(v);
    }
    if let Some(noise) = parse_noise(args)? {
        config = config.with_noise(noise);
    }
    if let Some(recombination) = parse_recombination(args)? {
        config = config.with_recombination(recombination);
    }
    config.validate()?;
    Ok(config)
}

fn resume(
    args: &RunArgs,
    path: &Path,
    kind: BenchmarkKind,
    rng: StdRng,
) -> Result<(CrossEntropy, Benchmark)> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let checkpoint = Checkpoint::load(path)?;
    let objective = Benchmark::with_start(kind, checkpoint.mean.clone());
    let mut cem = CrossEntropy::from_checkpoint(checkpoint, rng)?;

    if args.population_size.is_some() || args.selection_size.is_some() {
        let population_size = args.population_size.unwrap_or(cem.population_size()?);
        let selection_size = args.selection_size.unwrap_or(cem.selection_size()?);
        cem.set_sizes(population_size, selection_size)?;
    }
    if let Some(v) = args.variance {
        cem.set_variance_all(v)?;
    }
    if let Some(noise) = parse_noise(args)? {
        cem.set_noise(noise)?;
    }
    if let Some(recombination) = parse_recombination(args)? {
        cem.set_recombination(recombination);
    }
    Ok((cem, objective))
}

fn print_header(
    args: &RunArgs,
    objective: &Benchmark,
    cem: &CrossEntropy,
    stopping: StoppingPolicy,
) -> Result<()> {
    println!("Cross-Entropy Run");
    println!("=================");
    println!("Function:       {}", objective.kind().as_str());
    println!("Dimension:      {}", cem.dimension()?);
    println!("Population:     {}", cem.population_size()?);
    println!("Selection:      {}", cem.selection_size()?);
    println!("Recombination:  {}", cem.recombination().as_str());
    println!("Noise:          {}", cem.noise().description());
    println!("Stopping:       {stopping}");
    if let Some(path) = &args.resume {
        println!("Resumed from:   {} (generation {})", path.display(), cem.generation()?);
    }
    println!();
    Ok(())
}

fn print_summary(report: &GenerationReport, collapsed: &[usize], elapsed_secs: f64) {
    println!("Result");
    println!("------");
    println!("Generations:    {}", report.generation);
    println!("Evaluations:    {}", report.evaluations);
    if let Some(best) = &report.best {
        println!("Best fitness:   {:.6e}", best.fitness);
        println!("Best point:     {}", format_vector(&best.point));
    }
    println!("Mean:           {}", format_vector(&report.mean));
    println!("Variance:       {}", format_vector(&report.variance));
    if !collapsed.is_empty() {
        println!("Collapsed dims: {collapsed:?}");
    }
    println!("Time:           {elapsed_secs:.3}s");
}

pub(crate) fn run(args: &RunArgs) -> Result<()> {
    let kind = BenchmarkKind::parse(&args.function)
        .ok_or_else(|| CliError::InvalidArgument(format!("Unknown function: {}", args.function)))?;
    let stopping = StoppingPolicy::from_args(args.generations, args.max_evaluations)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (mut cem, mut objective) = match &args.resume {
        Some(path) => resume(args, path, kind, rng)?,
        None => {
            let objective = Benchmark::new(kind, args.dim, args.start);
            let mut cem = CrossEntropy::new(build_config(args)?);
            cem.init(&objective, rng)?;
            (cem, objective)
        }
    };
    print_header(args, &objective, &cem, stopping)?;

    let mut csv_out = match &args.csv {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)?;
            writer.write_record(GenerationReport::csv_header(cem.dimension()?))?;
            Some(writer)
        }
        None => None,
    };

    let first_generation = cem.generation()?;
    let first_evaluation = cem.evaluations()?;
    let started = Instant::now();
    while !stopping.is_done(
        cem.generation()? - first_generation,
        cem.evaluations()? - first_evaluation,
    ) {
        cem.step(&mut objective)?;
        let report = cem.report()?;
        debug!(
            generation = report.generation,
            min = report.fitness.min,
            "generation finished"
        );
        if let Some(writer) = csv_out.as_mut() {
            writer.write_record(report.csv_record())?;
        }
    }
    if let Some(mut writer) = csv_out {
        writer.flush()?;
    }

    if let Some(path) = &args.checkpoint {
        cem.checkpoint()?.save(path)?;
        info!(path = %path.display(), "checkpoint written");
    }

    let collapsed = cem.distribution()?.degenerate_dimensions();
    print_summary(&cem.report()?, &collapsed, started.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RunArgs,
    }

    fn parse(flags: &[&str]) -> RunArgs {
        let argv = std::iter::once("crossent").chain(flags.iter().copied());
        TestCli::parse_from(argv).args
    }

    #[test]
    fn test_stopping_policy() {
        assert_eq!(
            StoppingPolicy::from_args(None, None).unwrap(),
            StoppingPolicy::Generations(DEFAULT_GENERATIONS)
        );
        let evals = StoppingPolicy::from_args(None, Some(250)).unwrap();
        assert!(!evals.is_done(2, 200));
        assert!(evals.is_done(3, 300));
        assert!(StoppingPolicy::Generations(5).is_done(5, 0));
        assert!(matches!(
            StoppingPolicy::from_args(Some(0), None),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(StoppingPolicy::from_args(Some(1), Some(1)).is_err());
    }

    #[test]
    fn test_flags_build_config() {
        let args = parse(&[
            "-p", "40", "-s", "4", "--noise", "linear", "--noise-a", "1", "--noise-b", "-0.1",
            "-r", "superlinear",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.population_size, Some(40));
        assert_eq!(config.selection_size, Some(4));
        assert_eq!(config.noise, NoiseSchedule::linear(1.0, -0.1));
        assert_eq!(config.recombination, Recombination::Superlinear);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"population_size": 30, "noise": {"kind": "constant", "z": 0.5}}"#,
        )
        .unwrap();

        let args = parse(&["--config", path.to_str().unwrap(), "-p", "60"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.population_size, Some(60));
        assert_eq!(config.noise, NoiseSchedule::constant(0.5));
        assert_eq!(config.initial_variance, 1.0);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let args = parse(&["--noise", "cubic"]);
        assert!(matches!(build_config(&args), Err(CliError::InvalidArgument(_))));

        let args = parse(&["--function", "himmelblau"]);
        assert!(matches!(run(&args), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_sizes_are_validation_errors() {
        let args = parse(&["-p", "5", "-s", "6", "-g", "1"]);
        assert!(matches!(run(&args), Err(CliError::ValidationFailed(_))));
    }

    #[test]
    fn test_run_writes_csv_and_checkpoint() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("run.csv");
        let state = dir.path().join("state.json");
        let args = parse(&[
            "-d", "3", "-p", "20", "-s", "4", "-g", "7", "--seed", "11",
            "--csv", csv.to_str().unwrap(),
            "--checkpoint", state.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let mut reader = csv::Reader::from_path(&csv).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            GenerationReport::csv_header(3)
        );
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 7);
        let last = &records[6];
        assert_eq!(last.len(), headers.len());
        assert_eq!(&last[0], "7");
        assert_eq!(&last[1], "140");

        let checkpoint = Checkpoint::load(&state).unwrap();
        assert_eq!(checkpoint.generation, 7);
        assert_eq!(checkpoint.evaluations, 140);
        assert_eq!(checkpoint.mean.len(), 3);
    }

    #[test]
    fn test_csv_noise_column_reads_back() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("noisy.csv");
        let args = parse(&[
            "-p", "10", "-s", "2", "-g", "2", "--seed", "5", "--noise", "linear",
            "--noise-a", "0.5", "--noise-b", "-0.1", "--csv", csv.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let mut reader = csv::Reader::from_path(&csv).unwrap();
        let noise_col = reader
            .headers()
            .unwrap()
            .iter()
            .position(|h| h == "noise")
            .unwrap();
        for record in reader.records() {
            assert_eq!(&record.unwrap()[noise_col], "z(t) = 0.5 - t * 0.1");
        }
    }

    #[test]
    fn test_non_finite_noise_is_validation_error() {
        let args = parse(&["--noise", "constant", "--noise-a", "inf", "-g", "1"]);
        assert!(matches!(build_config(&args), Err(CliError::ValidationFailed(_))));
    }

    #[test]
    fn test_resume_continues_counters() {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("state.json");
        let path = state.to_str().unwrap();

        run(&parse(&[
            "-p", "10", "-s", "2", "-g", "3", "--seed", "1", "--checkpoint", path,
        ]))
        .unwrap();
        run(&parse(&[
            "--resume", path, "--max-evaluations", "25", "--seed", "2", "--checkpoint", path,
        ]))
        .unwrap();

        let checkpoint = Checkpoint::load(&state).unwrap();
        assert_eq!(checkpoint.generation, 6);
        assert_eq!(checkpoint.evaluations, 60);
    }

    #[test]
    fn test_resume_missing_file() {
        let args = parse(&["--resume", "/nonexistent/state.json"]);
        assert!(matches!(run(&args), Err(CliError::FileNotFound(_))));
    }
}
