use crate::models::Language;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "water-wallet",
    version,
    about = "Crop water-feasibility advisor with profit-per-drop recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a crop is water-feasible and suggest alternatives
    Analyze(AnalyzeArgs),
    /// Show the groundwater reading for a region
    Groundwater {
        /// District or region name
        region: String,
    },
    /// List the crop catalog
    Crops,
    /// Import historical training records from a JSON file
    ImportHistory {
        /// JSON array of {annual_rain_mm, soil_moisture, temp_c, groundwater_depth_m, available_water_mm}
        path: PathBuf,
    },
    /// Validate config and test provider connections
    Check,
    /// Run interactive setup
    Init,
}

#[derive(clap::Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Read the request as JSON from a file, or `-` for stdin; flags override its fields
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Crop id (case-insensitive)
    #[arg(long)]
    pub crop: Option<String>,

    /// Field area in hectares
    #[arg(long, allow_negative_numbers = true)]
    pub area: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// District used for the groundwater lookup
    #[arg(long)]
    pub region: Option<String>,

    /// Message language (en, hi)
    #[arg(long, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Evaluate as if it were this month (1-12) instead of the current one
    #[arg(long)]
    pub month: Option<u32>,
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse::<Language>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "water-wallet",
            "analyze",
            "--crop",
            "Wheat",
            "--area",
            "2.5",
            "--lon",
            "-73.8",
            "--language",
            "hi",
            "--month",
            "11",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.crop.as_deref(), Some("Wheat"));
                assert_eq!(args.area, Some(2.5));
                assert_eq!(args.lon, Some(-73.8));
                assert_eq!(args.language, Some(Language::Hi));
                assert_eq!(args.month, Some(11));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn non_numeric_area_is_rejected() {
        assert!(Cli::try_parse_from(["water-wallet", "analyze", "--area", "two"]).is_err());
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["water-wallet", "analyze", "--language", "fr"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["water-wallet", "crops", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Crops));
    }
}
