use std::path::PathBuf;

use clap::{Parser, Subcommand};

use compressor_core::{Quality, RunnerConfig};

/// Compare JPEG and HEIC output size and encode latency for an image
#[derive(Debug, Parser)]
#[command(name = "compressor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode an image once at a single quality
    Compare {
        /// Input image file
        input: PathBuf,

        /// Compression quality 0.0–1.0
        #[arg(short, long, default_value_t = 0.5, value_parser = parse_quality)]
        quality: f32,

        /// Encode worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 2)]
        workers: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a drag of the quality control and report the final generation
    Sweep {
        /// Input image file
        input: PathBuf,

        /// Quality values in drag order; the last one is where the control is released
        #[arg(long, value_delimiter = ',', required = true, value_parser = parse_quality)]
        values: Vec<f32>,

        /// Minimum change during the drag before a new encode starts
        #[arg(short, long, default_value_t = 0.1)]
        threshold: f32,

        /// Encode worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 2)]
        workers: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_quality(s: &str) -> Result<f32, String> {
    let value: f32 = s.trim().parse().map_err(|e| format!("{s}: {e}"))?;
    Quality::new(value)
        .map(Quality::value)
        .map_err(|e| e.to_string())
}

impl Cli {
    pub fn to_config(workers: usize, threshold: f32, initial_quality: f32) -> RunnerConfig {
        RunnerConfig {
            workers,
            debounce_threshold: threshold,
            initial_quality,
            ..RunnerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from(["compressor", "compare", "in.png", "-q", "0.8"]).unwrap();
        match cli.command {
            Command::Compare { quality, workers, json, .. } => {
                assert_eq!(quality, 0.8);
                assert_eq!(workers, 2);
                assert!(!json);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_parse_sweep_values() {
        let cli = Cli::try_parse_from([
            "compressor", "sweep", "in.png", "--values", "0.1,0.35,0.8", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Sweep { values, threshold, .. } => {
                assert_eq!(values, vec![0.1, 0.35, 0.8]);
                assert_eq!(threshold, 0.1);
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["compressor", "compare", "in.png", "-q", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["compressor", "sweep", "in.png", "--values", "0.2,nan"]).is_err());
    }

    #[test]
    fn test_to_config() {
        let config = Cli::to_config(4, 0.25, 0.3);
        assert_eq!(config.workers, 4);
        assert_eq!(config.debounce_threshold, 0.25);
        assert_eq!(config.initial_quality, 0.3);
    }
}
