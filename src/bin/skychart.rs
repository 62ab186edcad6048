//! skychart CLI
//!
//! Thin wrapper around the library: load a chart configuration, apply
//! command-line overrides, generate and write the chart.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use skychart::{AlgorithmKind, ChartConfig, ChartEngine, ChartFormat};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generate a random star chart with invented constellations.
#[derive(Parser, Debug)]
#[command(name = "skychart")]
#[command(version = skychart::VERSION)]
#[command(about = "Generate a random star chart with invented constellations")]
#[command(after_help = "EXAMPLES:
  # Default chart as JSON on stdout
  skychart

  # Reproduce a chart and list its constellations
  skychart chart.json --star-seed 1 --constellation-seed 2 --name-seed 3 --format summary

  # Try another algorithm on the same sky
  skychart chart.json --algorithm star-neighbors -o sky.json
")]
struct Cli {
    /// Chart configuration (JSON); defaults apply when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    format: FormatArg,

    /// Constellation algorithm, overriding the config
    #[arg(long = "algorithm", value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// Seed for star geometry, size and color
    #[arg(long = "star-seed", value_name = "N")]
    star_seed: Option<u64>,

    /// Seed for constellation construction
    #[arg(long = "constellation-seed", value_name = "N")]
    constellation_seed: Option<u64>,

    /// Seed for constellation names
    #[arg(long = "name-seed", value_name = "N")]
    name_seed: Option<u64>,

    /// Newline-delimited constellation name list
    #[arg(long = "names", value_name = "FILE")]
    names: Option<PathBuf>,

    /// Single tile, no wraparound replicas
    #[arg(long = "no-replicate")]
    no_replicate: bool,

    /// Write the effective parameters (with resolved seeds) as JSON
    #[arg(long = "export-parameters", value_name = "FILE")]
    export_parameters: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Full chart for renderers
    Json,
    /// One line per constellation
    Summary,
}

impl From<FormatArg> for ChartFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ChartFormat::Json,
            FormatArg::Summary => ChartFormat::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    /// Chain growth from the last added star
    Basic,
    /// Centroid growth with centroid-radius annexation
    #[value(name = "median-neighbors", alias = "median_neighbors")]
    MedianNeighbors,
    /// Centroid growth with per-member annexation
    #[value(name = "star-neighbors", alias = "star_neighbors")]
    StarNeighbors,
    /// Delaunay triangulation growth
    Delaunay,
}

impl From<AlgorithmArg> for AlgorithmKind {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Basic => AlgorithmKind::Basic,
            AlgorithmArg::MedianNeighbors => AlgorithmKind::MedianNeighbors,
            AlgorithmArg::StarNeighbors => AlgorithmKind::StarNeighbors,
            AlgorithmArg::Delaunay => AlgorithmKind::Delaunay,
        }
    }
}

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration file (or defaults) and apply command-line overrides
fn load_config(cli: &Cli) -> anyhow::Result<ChartConfig> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };

    if let Some(algorithm) = cli.algorithm {
        config.constellations.algorithm = AlgorithmKind::from(algorithm).to_string();
    }
    if let Some(seed) = cli.star_seed {
        config.stars.random_seed = Some(seed);
    }
    if let Some(seed) = cli.constellation_seed {
        config.constellations.random_seed = Some(seed);
    }
    if let Some(seed) = cli.name_seed {
        config.constellations.name_random_seed = Some(seed);
    }
    if let Some(names) = &cli.names {
        config.constellations.name_source = Some(names.clone());
    }
    if cli.no_replicate {
        config.box_size.replicate = false;
    }
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let engine = ChartEngine::new(config)?.with_format(cli.format.into());
    let chart = engine.generate()?;

    if let Some(path) = &cli.export_parameters {
        let parameters = engine.config().with_seeds(chart.seeds).to_json()?;
        fs::write(path, parameters)
            .with_context(|| format!("writing parameters to {}", path.display()))?;
        info!("Parameters written to {}", path.display());
    }

    let rendered = engine.render(&chart)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing chart to {}", path.display()))?;
            info!("Chart written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
