mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands};
use config::Config;
use datasources::{MonitoringNetworkClient, NasaPowerClient};
use db::Database;
use error::{Result, WaterWalletError};
use logic::estimator::TrainingSample;
use logic::{train_estimator, AnalysisService, CropCatalog, FeatureAdapter};
use models::AnalysisRequest;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Analyze(args) => {
            let request = build_request(&args)?;
            let db = open_history(&config, cli.data_dir.as_ref());
            let service = build_service(&config, db.as_ref())?;
            let report = service.analyze(request).await?;
            print_json(&report)
        }
        Commands::Groundwater { region } => {
            let adapter = build_adapter(&config)?;
            let reading = adapter.acquire_groundwater(&region).await;
            print_json(&reading)
        }
        Commands::Crops => print_json(CropCatalog::builtin().crops()),
        Commands::ImportHistory { path } => {
            let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
            let samples = read_history(&path)?;
            let source = path.display().to_string();
            let inserted = db.insert_historical_samples(&samples, &source)?;
            println!(
                "Imported {} records ({} total) into {}",
                inserted,
                db.count_historical_samples()?,
                db.path().display()
            );
            Ok(())
        }
        Commands::Check => check(&config).await,
        Commands::Init => Ok(()),
    }
}

fn build_adapter(
    config: &Config,
) -> Result<FeatureAdapter<NasaPowerClient, MonitoringNetworkClient>> {
    let environmental = if config.environmental.enabled {
        Some(NasaPowerClient::new(config.environmental.clone())?)
    } else {
        tracing::info!("Environmental provider disabled - using safety defaults");
        None
    };

    let groundwater = if config.groundwater.enabled {
        Some(MonitoringNetworkClient::new(config.groundwater.clone())?)
    } else {
        tracing::info!("Groundwater provider disabled - using historical averages");
        None
    };

    Ok(FeatureAdapter::new(environmental, groundwater, config))
}

/// Builds the shared estimator and catalog once, before any request is handled.
fn build_service(
    config: &Config,
    db: Option<&Database>,
) -> Result<AnalysisService<NasaPowerClient, MonitoringNetworkClient>> {
    let history = match db {
        Some(db) if config.estimator.use_historical => match db.load_historical_samples() {
            Ok(rows) if !rows.is_empty() => Some(rows),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read historical samples: {}", e);
                None
            }
        },
        _ => None,
    };

    let catalog = CropCatalog::with_default(&config.defaults.crop)
        .map_err(|e| WaterWalletError::Config(format!("defaults.crop: {}", e)))?;
    let estimator = train_estimator(&config.estimator, history)?;
    let adapter = build_adapter(config)?;

    Ok(AnalysisService::new(
        adapter,
        Arc::new(estimator),
        Arc::new(catalog),
        config,
    ))
}

/// The historical store is optional; analysis proceeds without it.
fn open_history(config: &Config, data_dir: Option<&std::path::PathBuf>) -> Option<Database> {
    if !config.estimator.use_historical {
        return None;
    }

    match Config::db_path(data_dir).and_then(|path| Database::open(&path)) {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!("Historical store unavailable: {}", e);
            None
        }
    }
}

fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest> {
    let mut request = match args.request {
        Some(ref path) => AnalysisRequest::from_json(&read_input(path)?)?,
        None => AnalysisRequest::default(),
    };

    if args.crop.is_some() {
        request.crop = args.crop.clone();
    }
    if args.area.is_some() {
        request.area = args.area;
    }
    if args.lat.is_some() {
        request.lat = args.lat;
    }
    if args.lon.is_some() {
        request.lon = args.lon;
    }
    if args.region.is_some() {
        request.region = args.region.clone();
    }
    if args.language.is_some() {
        request.language = args.language;
    }
    if args.month.is_some() {
        request.month = args.month;
    }

    Ok(request)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            WaterWalletError::InvalidRequest(format!("cannot read {}: {}", path.display(), e))
        })
    }
}

fn read_history(path: &Path) -> Result<Vec<TrainingSample>> {
    let content = std::fs::read_to_string(path)?;
    let samples: Vec<TrainingSample> = serde_json::from_str(&content)?;
    if samples.is_empty() {
        return Err(WaterWalletError::InvalidData(format!(
            "{} contains no records",
            path.display()
        )));
    }
    Ok(samples)
}

async fn check(config: &Config) -> Result<()> {
    println!("Configuration OK");

    let nasa = if config.environmental.enabled {
        Some(NasaPowerClient::new(config.environmental.clone())?)
    } else {
        None
    };
    let network = if config.groundwater.enabled {
        Some(MonitoringNetworkClient::new(config.groundwater.clone())?)
    } else {
        None
    };

    let (environmental, groundwater) = tokio::join!(
        async {
            match nasa {
                Some(ref client) => status_label(
                    client
                        .test_connection(config.defaults.latitude, config.defaults.longitude)
                        .await,
                ),
                None => "DISABLED",
            }
        },
        async {
            match network {
                Some(ref client) => status_label(client.test_connection().await),
                None => "DISABLED",
            }
        }
    );

    println!("NASA POWER: {} | Groundwater network: {}", environmental, groundwater);
    Ok(())
}

fn status_label(result: Result<bool>) -> &'static str {
    match result {
        Ok(true) => "OK",
        Ok(false) => "OFFLINE",
        Err(e) => {
            tracing::warn!("Connection test failed: {}", e);
            "OFFLINE"
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
