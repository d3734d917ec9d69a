//! agro-advisor CLI - main entry point.
//!
//! Subcommands:
//! - decode: normalize a backend envelope read from a file or stdin
//! - diagnose: upload a crop image and print the diagnosis
//! - advise: weather-based risk advice for the last diagnosis
//! - weather: forecast summary for a location
//! - show / reset: inspect or clear the saved session

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::error;

use agro_advisor::advisor::Advisor;
use agro_advisor::advisory::decode_advisory_with_depth;
use agro_advisor::client::{HttpBackend, ImageUpload};
use agro_advisor::envelope::{decode_with_depth, export};
use agro_advisor::observability::init_tracing;
use agro_advisor::report::{render_advisory, render_diagnosis, render_forecast};
use agro_advisor::store::SessionStore;
use agro_advisor::weather::WeatherClient;
use agro_advisor::{Config, Error, Result};

#[derive(Parser, Debug)]
#[command(name = "agro-advisor", version, about = "Crop disease diagnosis and weather advisory")]
struct Cli {
    /// JSON config file (env overrides still apply).
    #[arg(long, global = true, env = "AGRO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a backend envelope and print the normalized JSON.
    Decode {
        /// File holding the raw envelope; stdin when omitted.
        file: Option<PathBuf>,

        /// Decode a weather advisory instead of a diagnosis.
        #[arg(long)]
        advisory: bool,

        /// Override the maximum number of unwrapped layers.
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Upload a crop image for disease diagnosis.
    Diagnose {
        #[arg(long)]
        image: PathBuf,

        #[arg(long)]
        location: String,

        #[arg(long, default_value = "")]
        crop: String,

        /// Print normalized JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Weather-based crop risk advice for the last diagnosis.
    Advise {
        /// Response language code (defaults to the configured language).
        #[arg(long)]
        lang: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the forecast for a location.
    Weather {
        #[arg(long)]
        location: String,
    },

    /// Show the saved session.
    Show,

    /// Clear the saved session.
    Reset,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return exit_code(&err);
        }
    };
    init_tracing(&config.observability);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            exit_code(&err)
        }
    }
}

fn exit_code(err: &Error) -> ExitCode {
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}

fn advisor(config: &Config) -> Result<Advisor<HttpBackend>> {
    let backend = HttpBackend::new(&config.backend)?;
    let store = SessionStore::open(&config.store.path);
    Ok(Advisor::new(backend, store)
        .with_max_unwrap_depth(config.decoder.max_unwrap_depth)
        .with_default_lang(config.backend.default_lang.clone()))
}

async fn run(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Decode {
            file,
            advisory,
            max_depth,
        } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    tokio::io::stdin().read_to_string(&mut text).await?;
                    text
                }
            };
            let depth = max_depth.unwrap_or(config.decoder.max_unwrap_depth);
            let output = if advisory {
                serde_json::to_string_pretty(&decode_advisory_with_depth(raw, depth)?)?
            } else {
                serde_json::to_string_pretty(&export::to_value(&decode_with_depth(raw, depth)?))?
            };
            println!("{output}");
        }
        Command::Diagnose {
            image,
            location,
            crop,
            json,
        } => {
            let upload = ImageUpload::from_path(&image, &location, &crop)?;
            let outcome = advisor(&config)?.diagnose(upload).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&export::to_value(&outcome.diagnosis))?);
            } else {
                print!("{}", render_diagnosis(&outcome.diagnosis, outcome.confidence));
            }
        }
        Command::Advise { lang, json } => {
            let advisory = advisor(&config)?.advise(lang.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&advisory)?);
            } else {
                print!("{}", render_advisory(&advisory));
            }
        }
        Command::Weather { location } => {
            let report = WeatherClient::new(config.weather.clone())?
                .forecast(&location)
                .await?;
            print!("{}", render_forecast(&report));
        }
        Command::Show => {
            let (state, diagnosis) = advisor(&config)?.current()?;
            println!("Location: {}", state.location);
            println!("Crop:     {}", state.crop);
            if let Some(saved_at) = state.saved_at {
                println!("Saved:    {}", saved_at.to_rfc3339());
            }
            match (diagnosis, &state.result) {
                (Some(diagnosis), Some(result)) => {
                    print!("{}", render_diagnosis(&diagnosis, result.confidence_percent().ok()));
                }
                _ => println!("No diagnosis yet."),
            }
        }
        Command::Reset => {
            advisor(&config)?.reset()?;
            println!("Session cleared.");
        }
    }
    Ok(())
}
