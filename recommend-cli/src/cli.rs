use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{CustomType, CustomUserError, Text, validator::Validation};
use recommend_core::{
    Config, FormController, FormInput, Outcome, Variant, client_from_config,
    config::DEFAULT_BASE_URL,
    render::DEFAULT_PLACEHOLDER_IMAGE,
};

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "recommend",
    version,
    about = "Ask a recommendation server for products or trip advice"
)]
pub struct Cli {
    /// Server root, overriding the configured one.
    #[arg(long, global = true, env = "RECOMMEND_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the server URL, timeout and placeholder image.
    Configure,

    /// Recommend products for a need.
    Products {
        /// What you are looking for.
        prompt: String,

        /// Write the rendered HTML here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Recommend what to bring for a trip, based on destination weather and season.
    Trip {
        /// What you need advice on.
        prompt: String,

        /// Destination.
        #[arg(long)]
        location: String,

        /// Travel date (YYYY-MM-DD); if absent, means "now".
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure(config_to_edit(Config::load()))?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Products { prompt, out } => {
                let config = request_config(Config::load()?, self.base_url)?;
                let input = FormInput::prompt(prompt);
                recommend(&config, Variant::Products, input, out).await
            }
            Command::Trip {
                prompt,
                location,
                date,
                out,
            } => {
                let config = request_config(Config::load()?, self.base_url)?;
                let input = FormInput {
                    prompt,
                    location: Some(location),
                    date,
                };
                recommend(&config, Variant::Trip, input, out).await
            }
        }
    }
}

/// Stored config with the command-line base URL applied on top.
fn request_config(mut config: Config, base_url: Option<String>) -> anyhow::Result<Config> {
    if let Some(base_url) = base_url {
        config.set_base_url(base_url)?;
    }
    tracing::debug!(base_url = ?config.base_url, "configuration loaded");
    Ok(config)
}

/// Starting point for `configure`; an unreadable config file is replaced, not fatal.
fn config_to_edit(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|err| {
        tracing::warn!(error = ?err, "ignoring unreadable configuration");
        Config::default()
    })
}

async fn recommend(
    config: &Config,
    variant: Variant,
    input: FormInput,
    out: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let client = client_from_config(config)?;
    let controller = FormController::new(variant, client, TerminalView::default())
        .with_render_options(config.render_options());

    let outcome = controller.activate(input).await;
    if outcome != Outcome::Rendered {
        return Ok(ExitCode::FAILURE);
    }

    let view = controller.into_view();
    let html = view
        .results()
        .context("Server response rendered no results")?;
    match out {
        Some(path) => {
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!("{html}"),
    }

    Ok(ExitCode::SUCCESS)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Text::new("Server base URL:")
        .with_default(&current)
        .prompt()?;
    config.set_base_url(base_url)?;

    let timeout = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;
    config.timeout_secs = Some(timeout);

    let current = config
        .placeholder_image
        .clone()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_string());
    let placeholder = Text::new("Placeholder image for products without a thumbnail:")
        .with_default(&current)
        .prompt()?;
    config.placeholder_image = Some(placeholder);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    if *secs == 0 {
        return Ok(Validation::Invalid("Timeout must be at least 1 second".into()));
    }
    Ok(Validation::Valid)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected a date like 2025-07-01: {err}"))
}
