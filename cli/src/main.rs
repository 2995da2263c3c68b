use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use compressor::cli::{Cli, Command};
use compressor::io::{collect_generation, load_image};
use compressor::report::Report;
use compressor_core::{CompressionSession, EncodeRunner, Quality, default_adapters};

/// Upper bound for one generation; encoders are not preemptible.
const RESULT_TIMEOUT: Duration = Duration::from_secs(300);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match &cli.command {
        Command::Compare {
            input,
            quality,
            workers,
            json,
        } => handle_compare(input, *quality, *workers, *json),
        Command::Sweep {
            input,
            values,
            threshold,
            workers,
            json,
        } => handle_sweep(input, values, *threshold, *workers, *json),
    }
}

fn handle_compare(input: &Path, quality: f32, workers: usize, json: bool) -> Result<()> {
    let image = load_image(input).context("Failed to load input image")?;
    let quality = Quality::new(quality)?;
    let config = Cli::to_config(workers, 0.0, quality.value());

    let (tx, rx) = mpsc::channel();
    let runner = EncodeRunner::new(default_adapters(), tx, &config)
        .context("Failed to start encode runner")?;
    let expected = runner.formats().count();

    let generation = runner.submit(Arc::new(image), quality);
    let completions = collect_generation(&rx, generation, expected, RESULT_TIMEOUT)?;
    runner.shutdown();

    print_report(&Report::new(generation, quality, generation.get(), completions), json)
}

fn handle_sweep(
    input: &Path,
    values: &[f32],
    threshold: f32,
    workers: usize,
    json: bool,
) -> Result<()> {
    let Some((&last, drag)) = values.split_last() else {
        anyhow::bail!("At least one quality value is required");
    };

    let image = load_image(input).context("Failed to load input image")?;
    let initial = drag.first().copied().unwrap_or(last);
    let config = Cli::to_config(workers, threshold, initial);

    let (tx, rx) = mpsc::channel();
    let mut session =
        CompressionSession::new(image, tx, &config).context("Failed to start encode runner")?;
    let expected = session.runner().formats().count();

    for &value in drag.iter().skip(1) {
        match session.quality_changed(value) {
            Some(generation) => log::debug!("quality {value:.2} -> generation {generation}"),
            None => log::debug!("quality {value:.2} filtered (threshold {threshold})"),
        }
    }
    let generation = session.quality_settled(last);

    let completions = collect_generation(&rx, generation, expected, RESULT_TIMEOUT)?;
    let report = Report::new(generation, session.quality(), generation.get(), completions);
    session.shutdown();

    print_report(&report, json)
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        report.print_summary();
    }
    Ok(())
}
