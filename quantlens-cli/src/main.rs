//! QuantLens - terminal explainer for neural-network compression
//!
//! Renders the same numbers as the browser explainer, as text.
//!
//! ## Environment Variables
//! - `QUANTLENS_SEED`, `QUANTLENS_MATRIX_SIZE`, `QUANTLENS_TEMPERATURE`,
//!   `QUANTLENS_SPARSITY`: session defaults (see `LensConfig::from_env`)
//! - `RUST_LOG`: log filter (default: `quantlens=info`)

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quantlens_core::prelude::*;

#[derive(Parser)]
#[command(name = "quantlens")]
#[command(author = "Silvano Neto")]
#[command(version = "2026.1.16")]
#[command(about = "QuantLens - quantization, pruning and distillation explained", long_about = None)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Symmetric,
    Asymmetric,
}

impl From<ModeArg> for QuantMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Symmetric => QuantMode::Symmetric,
            ModeArg::Asymmetric => QuantMode::Asymmetric,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Weights,
    Relu,
}

impl From<PresetArg> for QuantPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Weights => QuantPreset::Weights,
            PresetArg::Relu => QuantPreset::ReluActivations,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PruneArg {
    Unstructured,
    Structured,
}

impl From<PruneArg> for PruningMode {
    fn from(p: PruneArg) -> Self {
        match p {
            PruneArg::Unstructured => PruningMode::Unstructured,
            PruneArg::Structured => PruningMode::Structured,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HardwareArg {
    Cpu,
    Npu,
}

impl From<HardwareArg> for HardwareProfile {
    fn from(h: HardwareArg) -> Self {
        match h {
            HardwareArg::Cpu => HardwareProfile::Standard,
            HardwareArg::Npu => HardwareProfile::Accelerator,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Map a real value onto the INT8 grid
    Quantize {
        /// Start from a preset range and input
        #[arg(short, long, value_enum)]
        preset: Option<PresetArg>,

        /// Quantization mode
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Lower end of the real range
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,

        /// Upper end of the real range
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,

        /// Value to quantize
        #[arg(short, long, allow_negative_numbers = true)]
        input: Option<f64>,

        /// Also print the transfer-function staircase
        #[arg(long)]
        staircase: bool,
    },

    /// Temperature softmax over class scores
    Softmax {
        /// Softmax temperature (1 - 20)
        #[arg(short, long, env = "QUANTLENS_TEMPERATURE")]
        temperature: Option<f64>,

        /// Class scores as LABEL=LOGIT (default: the retriever photo)
        #[arg(short, long = "class", value_name = "LABEL=LOGIT")]
        classes: Vec<String>,
    },

    /// Distillation loss between a student and the teacher's scores
    Distill {
        /// Softmax temperature
        #[arg(short, long, default_value_t = 4.0)]
        temperature: f64,

        /// Weight of the soft-target term
        #[arg(short, long, default_value_t = 0.7)]
        alpha: f64,

        /// Student logits, comma separated, aligned with the teacher classes
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        student: Vec<f64>,

        /// Index of the true class
        #[arg(short, long, default_value_t = 0)]
        label: usize,
    },

    /// Prune the seeded weight matrix and the demo network
    Prune {
        /// Target sparsity in percent (0 - 99)
        #[arg(short, long, env = "QUANTLENS_SPARSITY")]
        sparsity: Option<f64>,

        /// Pruning granularity for the network view
        #[arg(short, long, value_enum, default_value = "unstructured")]
        mode: PruneArg,

        /// Weight-matrix seed
        #[arg(long, env = "QUANTLENS_SEED")]
        seed: Option<u64>,
    },

    /// Accuracy / speedup trade-off curves
    Tradeoff {
        /// Pruning granularity
        #[arg(short, long, value_enum, default_value = "structured")]
        mode: PruneArg,

        /// Target hardware
        #[arg(long, value_enum, default_value = "cpu")]
        hardware: HardwareArg,

        /// Sparsity to mark on the curve, in percent
        #[arg(short, long)]
        sparsity: Option<f64>,

        /// Rows to print from the sampled curve
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Show information about QuantLens
    Info,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantlens=info,quantlens_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = command_config(&cli.command, &LensConfig::from_env());
    let json = cli.json;

    match cli.command {
        Commands::Quantize { preset, mode, min, max, input, staircase } => {
            let preset: QuantPreset = preset.map(Into::into).unwrap_or(config.preset);
            let base = preset.config();
            let qcfg = QuantizationConfig::new(
                mode.map(Into::into).unwrap_or(base.mode),
                min.unwrap_or(base.real_min),
                max.unwrap_or(base.real_max),
            );
            let input = input.unwrap_or(preset.input());

            let session = VisualizationSession::new(config).context("invalid session config")?;
            let view = session
                .quantization_view(&qcfg, input)
                .context("cannot quantize with this range")?;
            tracing::debug!(scale = view.params.scale, "quantized");

            emit(json, &view, || render::quantization(&view, staircase))
        }

        Commands::Softmax { temperature, classes } => {
            let temperature = temperature.unwrap_or(config.temperature);
            let scores = if classes.is_empty() {
                default_scores()
            } else {
                classes
                    .iter()
                    .map(|c| parse_class(c))
                    .collect::<Result<Vec<_>>>()?
            };

            let session = VisualizationSession::new(LensConfig { temperature, ..config })
                .context("invalid session config")?;
            let dist = session.softmax_view(&scores, temperature)?;

            emit(json, &dist, || render::distribution(&scores, &dist))
        }

        Commands::Distill { temperature, alpha, student, label } => {
            let teacher: Vec<f64> = default_scores().iter().map(|s| s.logit).collect();
            let student = if student.is_empty() {
                vec![4.0, 3.0, 1.0, 0.0]
            } else {
                student
            };

            let loss_fn = DistillationLoss::new(temperature, alpha)?;
            let report = DistillReport {
                temperature,
                alpha,
                soft: loss_fn.soft_loss(&student, &teacher)?,
                hard: loss_fn.hard_loss(&student, label)?,
                total: loss_fn.forward(&student, &teacher, label)?,
                teacher: distribution(&default_scores(), temperature)?.percentages,
                student: softmax_with_temperature(&student, temperature)?
                    .into_iter()
                    .map(|p| p * 100.0)
                    .collect(),
            };

            emit(json, &report, || render::distill(&report))
        }

        Commands::Prune { sparsity, mode, seed } => {
            let sparsity = sparsity.unwrap_or(config.sparsity);
            let config = LensConfig { seed: seed.unwrap_or(config.seed), ..config };

            let session = VisualizationSession::new(config).context("invalid session config")?;
            let matrix = session.matrix_view(sparsity)?;
            let network = session.network_view(mode.into(), sparsity)?;

            let report = PruneReport { matrix, network };
            emit(json, &report, || {
                render::prune(session.weights(), &report.matrix, &report.network)
            })
        }

        Commands::Tradeoff { mode, hardware, sparsity, rows } => {
            let sparsity = sparsity.unwrap_or(config.sparsity);
            let session = VisualizationSession::new(config).context("invalid session config")?;
            let view = session.tradeoff_view(mode.into(), hardware.into(), sparsity)?;

            emit(json, &view, || render::tradeoff(&view, rows))
        }

        Commands::Info => {
            render::info();
            Ok(())
        }
    }
}

/// Defaults plus only the environment values `command` reads
///
/// An out-of-range `QUANTLENS_TEMPERATURE` must not break `prune`, and a bad
/// matrix size must not break `softmax`.
fn command_config(command: &Commands, env: &LensConfig) -> LensConfig {
    let defaults = LensConfig::default();
    match command {
        Commands::Softmax { .. } => LensConfig {
            temperature: env.temperature,
            ..defaults
        },
        Commands::Prune { .. } => LensConfig {
            seed: env.seed,
            matrix_size: env.matrix_size,
            sparsity: env.sparsity,
            ..defaults
        },
        Commands::Tradeoff { .. } => LensConfig {
            sparsity: env.sparsity,
            ..defaults
        },
        Commands::Quantize { .. } | Commands::Distill { .. } | Commands::Info => defaults,
    }
}

#[derive(Serialize)]
struct DistillReport {
    temperature: f64,
    alpha: f64,
    soft: f64,
    hard: f64,
    total: f64,
    teacher: Vec<f64>,
    student: Vec<f64>,
}

#[derive(Serialize)]
struct PruneReport {
    matrix: MatrixView,
    network: NetworkView,
}

fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", table());
    }
    Ok(())
}

fn parse_class(arg: &str) -> Result<ClassScore> {
    let (label, logit) = arg
        .rsplit_once('=')
        .with_context(|| format!("expected LABEL=LOGIT, got '{}'", arg))?;
    let logit: f64 = logit
        .trim()
        .parse()
        .with_context(|| format!("invalid logit in '{}'", arg))?;
    Ok(ClassScore::new(label.trim(), logit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class() {
        let c = parse_class("Tabby Cat=2.5").unwrap();
        assert_eq!(c.label, "Tabby Cat");
        assert_eq!(c.logit, 2.5);
        assert_eq!(parse_class("x=-5").unwrap().logit, -5.0);
        assert!(parse_class("nope").is_err());
        assert!(parse_class("a=b").is_err());
    }

    #[test]
    fn test_command_config_ignores_unused_env_values() {
        let env = LensConfig {
            temperature: 0.5,
            matrix_size: 0,
            seed: 9,
            ..LensConfig::default()
        };

        let quantize = Cli::try_parse_from(["quantlens", "quantize"]).unwrap();
        assert!(command_config(&quantize.command, &env).validate().is_ok());

        let tradeoff = Cli::try_parse_from(["quantlens", "tradeoff"]).unwrap();
        assert!(command_config(&tradeoff.command, &env).validate().is_ok());

        let softmax = Cli::try_parse_from(["quantlens", "softmax", "-t", "2"]).unwrap();
        let cfg = command_config(&softmax.command, &env);
        assert_eq!(cfg.matrix_size, 100);
        assert_eq!(cfg.temperature, 0.5);

        let prune = Cli::try_parse_from(["quantlens", "prune", "-s", "10", "--seed", "3"]).unwrap();
        let cfg = command_config(&prune.command, &env);
        assert_eq!(cfg.temperature, 1.0);
        assert_eq!(cfg.seed, 9);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["quantlens", "quantize", "--preset", "relu", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Quantize { preset: Some(PresetArg::Relu), .. }));

        let cli = Cli::try_parse_from(["quantlens", "distill", "-s", "1,-2,3,0"]).unwrap();
        match cli.command {
            Commands::Distill { student, .. } => assert_eq!(student, vec![1.0, -2.0, 3.0, 0.0]),
            _ => panic!("expected distill"),
        }
    }
}
