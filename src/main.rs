use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use qecsim::benchmark::{estimate, sweep, ErrorRateEstimate, SweepPoint};
use qecsim::config::{NoiseConfig, SimulationConfig};
use qecsim::simulation::run_cycle;
use qecsim::symplectic::{diagnose, valid_code, SymplecticVector};
use serde::Serialize;
use serde_json::to_writer_pretty;
use std::fs::File;
use std::time::Instant;

const QECSIM_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "qecsim", version = QECSIM_VERSION,
    about = "qecsim - quantum error-correction simulator.\n\
             Encodes a logical qubit, applies noise, measures a syndrome, decodes, and estimates logical error rates.",
    long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Runs a single error-correction cycle and prints every stage.
    Simulate {
        /// Simulation config (.json) path
        #[arg(long)]
        config: String,
        /// Override the config seed.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Estimates the logical error rate over many independent trials.
    Benchmark {
        /// Simulation config (.json) path
        #[arg(long)]
        config: String,
        /// Override the config trial count.
        #[arg(long)]
        trials: Option<usize>,
        /// Override the config seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Comma-separated noise probabilities to sweep instead of the config's single value.
        #[arg(long, value_delimiter = ',', value_name = "PROBABILITIES")]
        sweep: Option<Vec<f64>>,
        /// Write the results as JSON to this path.
        #[arg(long)]
        output: Option<String>,
    },
    /// Checks whether Pauli-string generators form a valid [[n, k]] stabilizer code.
    Validate {
        /// Generators such as ZZI IZZ
        #[arg(required = true)]
        generators: Vec<String>,
        /// Number of logical qubits.
        #[arg(long, default_value_t = 1)]
        k: usize,
    },
    /// Prints the qecsim version.
    Version,
}

#[derive(Serialize)]
#[serde(untagged)]
enum BenchmarkReport {
    Single(ErrorRateEstimate),
    Sweep(Vec<SweepPoint>),
}

fn load_config(path: &str, trials: Option<usize>, seed: Option<u64>) -> Result<SimulationConfig, String> {
    let mut config = SimulationConfig::from_path(path).map_err(|e| e.to_string())?;
    if let Some(t) = trials {
        config.trials = t;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    Ok(config)
}

fn run_simulate(config: &SimulationConfig) -> Result<(), String> {
    let pipeline = config.build().map_err(|e| e.to_string())?;
    let trace = run_cycle(
        &pipeline.logical_state,
        pipeline.code.as_ref(),
        pipeline.noise.as_ref(),
        pipeline.decoder.as_ref(),
        &pipeline.key,
    )
    .map_err(|e| e.to_string())?;
    let decoded = pipeline
        .code
        .decode_collapsed(&trace.corrected)
        .map_err(|e| e.to_string())?;

    println!("logical state:   {}", pipeline.logical_state);
    println!("encoded state:   {}", trace.encoded);
    println!("noisy state:     {}", trace.noisy);
    println!("measured state:  {}", trace.collapsed.to_braket());
    println!("syndrome:        {:?}", trace.syndrome.bits());
    println!("corrected state: {}", trace.corrected.to_braket());
    println!("decoded logical: {}", decoded.to_braket());
    Ok(())
}

fn run_benchmark(
    config: &SimulationConfig,
    probabilities: Option<Vec<f64>>,
    output: Option<String>,
) -> Result<(), String> {
    let pipeline = config.build().map_err(|e| e.to_string())?;
    let start_time = Instant::now();

    let report = match probabilities {
        None => {
            let result = estimate(
                &pipeline.logical_state,
                pipeline.code.as_ref(),
                pipeline.noise.as_ref(),
                pipeline.decoder.as_ref(),
                &pipeline.key,
                pipeline.trials,
            )
            .map_err(|e| e.to_string())?;
            println!(
                "{} noise p={}: {} / {} logical errors, rate {:.6} (± {:.6})",
                pipeline.noise.name(),
                pipeline.noise.probability(),
                result.failures,
                result.trials,
                result.rate,
                result.std_error
            );
            BenchmarkReport::Single(result)
        }
        Some(ps) => {
            // --- sweep progress bar ---
            let progress_bar = ProgressBar::new(ps.len() as u64);
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
                    .map_err(|e| e.to_string())?
                    .progress_chars("##->"),
            );
            progress_bar.set_message("estimating error rates...");
            let base = config.noise.clone();
            let points = sweep(
                &pipeline.logical_state,
                pipeline.code.as_ref(),
                pipeline.decoder.as_ref(),
                &ps,
                |p| NoiseConfig::with_probability(&base, p).build(),
                &pipeline.key,
                pipeline.trials,
                |_| progress_bar.inc(1),
            )
            .map_err(|e| e.to_string())?;
            progress_bar.finish_with_message("sweep done.");
            for point in &points {
                println!(
                    "p={:<8} rate {:.6} (± {:.6})",
                    point.probability, point.estimate.rate, point.estimate.std_error
                );
            }
            BenchmarkReport::Sweep(points)
        }
    };
    info!(
        "benchmark finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| format!("cannot create {}: {}", path, e))?;
        to_writer_pretty(file, &report).map_err(|e| e.to_string())?;
        println!("wrote results to '{}'", path);
    }
    Ok(())
}

fn run_validate(generators: &[String], k: usize) -> Result<(), String> {
    let parsed = generators
        .iter()
        .map(|g| SymplecticVector::from_pauli(g))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    let n = parsed.first().map_or(0, |g| g.num_qubits());
    let reasons = diagnose(&parsed, n, k);
    let valid = reasons.is_empty() && valid_code(&parsed, n, k).unwrap_or(false);
    if valid {
        println!("valid [[{}, {}]] stabilizer code", n, k);
    } else {
        println!("invalid generator set:");
        for reason in reasons {
            println!("  - {}", reason);
        }
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { config, seed } => {
            let config = load_config(&config, None, seed)?;
            run_simulate(&config)
        }
        Commands::Benchmark {
            config,
            trials,
            seed,
            sweep,
            output,
        } => {
            let config = load_config(&config, trials, seed)?;
            run_benchmark(&config, sweep, output)
        }
        Commands::Validate { generators, k } => run_validate(&generators, k),
        Commands::Version => {
            println!("qecsim version {}", QECSIM_VERSION);
            Ok(())
        }
    }
}
