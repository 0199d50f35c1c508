use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use clockdur_common::{ClockdurError, DurationConverter, ErrorReporting, StoreAs};
use clockdur_config::{Config, ConverterOptions, FieldOptions};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "clockdur")]
#[command(about = "clockdur (HH:MM[:SS] duration field converter)")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file [default: <config dir>/clockdur/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Take options from a [fields.<NAME>] section
    #[arg(long, global = true)]
    field: Option<String>,

    /// Unit of the stored value (seconds or minutes)
    #[arg(long, global = true, value_parser = parse_store_as)]
    store_as: Option<StoreAs>,

    /// Always show the seconds field
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    display_seconds: Option<bool>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a stored value to HH:MM[:SS]
    Display {
        /// Stored value; omit for no value
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Convert HH:MM[:SS] to a stored value
    Normalize {
        /// Display string; omit for no value
        #[arg(allow_hyphen_values = true)]
        text: Option<String>,
    },

    /// Validate the configuration and show the resolved options
    Check,
}

#[derive(Serialize)]
struct DisplayOutput<'a> {
    field: Option<&'a str>,
    options: ConverterOptions,
    input: Option<&'a str>,
    display: Option<String>,
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    field: Option<&'a str>,
    options: ConverterOptions,
    input: Option<&'a str>,
    normalized: Option<u64>,
    human: Option<String>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    default: ConverterOptions,
    fields: BTreeMap<&'a str, ConverterOptions>,
}

fn parse_store_as(value: &str) -> std::result::Result<StoreAs, String> {
    value.parse().map_err(|e: clockdur_common::ConfigError| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("✗ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Display { value } => {
            let options = resolve_options(&config, cli)?;
            let converter = build_converter(&options)?;
            let display = converter
                .to_display_text(value.as_deref())
                .map_err(|e| report("Display conversion failed", e))?;

            if cli.json {
                let output = DisplayOutput {
                    field: cli.field.as_deref(),
                    options,
                    input: value.as_deref(),
                    display,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", display.as_deref().unwrap_or("(none)"));
            }
        }

        Commands::Normalize { text } => {
            let options = resolve_options(&config, cli)?;
            let converter = build_converter(&options)?;
            let normalized = converter
                .to_normalized(text.as_deref())
                .map_err(|e| report("Normalize conversion failed", e))?;
            let human = normalized.and_then(|n| human_duration(n, converter.store_as()));

            if cli.json {
                let output = NormalizeOutput {
                    field: cli.field.as_deref(),
                    options,
                    input: text.as_deref(),
                    normalized,
                    human,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match (normalized, human) {
                    (Some(n), Some(human)) => println!("{} ({})", n, human),
                    (Some(n), None) => println!("{}", n),
                    (None, _) => println!("(none)"),
                }
            }
        }

        Commands::Check => {
            let mut fields = BTreeMap::new();
            for name in config.field_names() {
                fields.insert(name, config.options_for(name));
            }

            if cli.json {
                let output = CheckOutput {
                    default: config.default,
                    fields,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("✓ Configuration is valid");
                println!("default: {}", describe(&config.default));
                for (name, options) in &fields {
                    println!("{}: {}", name, describe(options));
                }
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let loaded = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load_or_default(),
    };

    loaded.map_err(|e| report("Configuration error", e))
}

/// Field section first, then explicit flags on top.
fn resolve_options(config: &Config, cli: &Cli) -> Result<ConverterOptions> {
    let mut options = match &cli.field {
        Some(name) => config
            .field_options(name)
            .map_err(|e| report("Configuration error", e))?,
        None => config.default,
    };

    options.merge(&FieldOptions {
        display_seconds: cli.display_seconds,
        store_as: cli.store_as,
    });

    log::debug!(
        "Resolved options for {}: {:?}",
        cli.field.as_deref().unwrap_or("[default]"),
        options
    );
    Ok(options)
}

fn build_converter(options: &ConverterOptions) -> Result<DurationConverter> {
    options
        .build()
        .map_err(|e| report("Configuration error", e))
}

fn report(context: &str, e: ClockdurError) -> anyhow::Error {
    e.log_error(context);
    anyhow!("{}", e.user_friendly_message())
}

fn human_duration(normalized: u64, store_as: StoreAs) -> Option<String> {
    let secs = match store_as {
        StoreAs::Seconds => normalized,
        StoreAs::Minutes => normalized.checked_mul(60)?,
    };

    Some(humantime::format_duration(Duration::from_secs(secs)).to_string())
}

fn describe(options: &ConverterOptions) -> String {
    let width = if options.display_seconds { "HH:MM:SS" } else { "HH:MM" };
    format!("store_as={}, display={}", options.store_as, width)
}
