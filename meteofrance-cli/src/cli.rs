use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::Password;
use meteofrance_core::{Config, Rain, RainProvider, Snow};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteofrance", version, about = "Météo-France rain and snow forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API token and optional defaults.
    Configure {
        /// API root to use instead of the public endpoint.
        #[arg(long)]
        base_url: Option<String>,

        /// Language of descriptions: "fr", or anything else for English.
        #[arg(long)]
        language: Option<String>,
    },

    /// Show the next-hour rain forecast at a GPS point or from a saved document.
    Rain {
        #[arg(
            long,
            allow_negative_numbers = true,
            required_unless_present = "file",
            requires = "lon"
        )]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Overrides the configured language.
        #[arg(long)]
        lang: Option<String>,

        /// Read a rain JSON document instead of calling the API.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        file: Option<PathBuf>,
    },

    /// Show a massif snow and avalanche report from a saved JSON document.
    Snow {
        path: PathBuf,

        /// Look up the total snow depth at this altitude (m).
        #[arg(long, allow_negative_numbers = true)]
        altitude: Option<i32>,

        /// Look up the avalanche risk for a location value, e.g. "> 2200".
        #[arg(long)]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { base_url, language } => configure(base_url, language)?,
            Command::Rain {
                lat,
                lon,
                lang,
                file,
            } => {
                let rain = match (file, lat, lon) {
                    (Some(path), _, _) => Some(load_rain(&path)?),
                    (None, Some(lat), Some(lon)) => fetch_rain(lat, lon, lang).await?,
                    _ => anyhow::bail!("Either --file or both --lat and --lon are required"),
                };

                match rain {
                    Some(rain) => print!("{}", render::rain_report(&rain)?),
                    None => println!("No rain data for this location"),
                }
            }
            Command::Snow {
                path,
                altitude,
                location,
            } => {
                let snow = load_snow(&path)?;
                print!(
                    "{}",
                    render::snow_report(&snow, altitude, location.as_deref())?
                );
            }
        }

        Ok(())
    }
}

fn configure(base_url: Option<String>, language: Option<String>) -> Result<()> {
    let mut cfg = Config::load()?;

    let token = Password::new("API token (leave empty for none):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API token")?;
    cfg.set_token(token);

    if base_url.is_some() {
        cfg.base_url = base_url;
    }
    if language.is_some() {
        cfg.language = language;
    }

    cfg.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn fetch_rain(lat: f64, lon: f64, lang: Option<String>) -> Result<Option<Rain>> {
    let cfg = Config::load()?;
    let language = lang.unwrap_or_else(|| cfg.language().to_string());
    let provider: Box<dyn RainProvider> = Box::new(cfg.client());

    tracing::debug!(?provider, "using rain provider");
    provider.get_rain(lat, lon, &language).await
}

fn load_rain(path: &Path) -> Result<Rain> {
    let body = read_document(path)?;
    Rain::from_json(&body).with_context(|| format!("Invalid rain document: {}", path.display()))
}

fn load_snow(path: &Path) -> Result<Snow> {
    let body = read_document(path)?;
    Snow::from_json(&body).with_context(|| format!("Invalid snow document: {}", path.display()))
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
