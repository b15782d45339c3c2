use std::{
    fs::File,
    io::{self, BufWriter, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trf_hos::{classify, scan, write_report, HosConfig, Reader};

#[derive(Parser)]
#[command(name = "trf-hos")]
#[command(version)]
#[command(about = "Flag Higher-Order Structure candidates in Tandem Repeat Finder .dat output")]
#[command(
    long_about = "Pairs tandem repeats of the same sequence that cover the same span and whose periods are close to an integer multiple of each other, then grades each pair.\n\nHOS? column: HOS when both the score ratio and the identity gain of the longer period pass, hos when one does, ??? for chains of three or more repeats."
)]
struct Cli {
    /// Tandem Repeat Finder .dat file, or '-' for stdin
    input: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Maximum distance between starts, and between ends, of paired repeats
    #[arg(long, default_value = "10")]
    offset: usize,

    /// Period ratio the longer repeat must exceed
    #[arg(long, default_value = "1.5")]
    min_ratio: f64,

    /// How far the period ratio may stray from a whole number
    #[arg(long, default_value = "0.15")]
    frac_tolerance: f64,

    /// Score ratio (longer/shorter) above which a pair is supported
    #[arg(long, default_value = "1.15")]
    score_ratio: f64,

    /// Identity gain (longer - shorter) above which a pair is supported
    #[arg(long, default_value = "5")]
    identity_delta: f64,
}

impl Cli {
    fn config(&self) -> HosConfig {
        HosConfig {
            offset: self.offset,
            min_ratio: self.min_ratio,
            frac_tolerance: self.frac_tolerance,
            score_ratio: self.score_ratio,
            identity_delta: self.identity_delta,
        }
    }

    fn open_input(&self) -> anyhow::Result<Box<dyn Read>> {
        if self.input.as_os_str() == "-" {
            return Ok(Box::new(io::stdin()));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("failed to open {}", self.input.display()))?;
        Ok(Box::new(file))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("trf_hos=debug,info")
    } else {
        EnvFilter::new("trf_hos=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = cli.config();
    let input = cli.open_input()?;

    let store = scan(Reader::new(input), &config)?;
    info!(sequences = store.len(), "finished reading input");

    let rows = classify(store, &config);
    info!(rows = rows.len(), "writing report");

    let stdout = io::stdout();
    write_report(BufWriter::new(stdout.lock()), &rows)?;

    Ok(())
}
