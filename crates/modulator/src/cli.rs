//! Command-line definition and dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use linecode::ModulationType;
use modulator::{ModulateRequest, ModulatorService};
use platform::{ModulatorConfig, PinProvider};

#[derive(Parser)]
#[command(name = "pcm-modulator")]
#[command(about = "Generate, plot and transmit 5-bit PCM line-coded signals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON configuration file (missing fields use the defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seconds per bit, overrides the configuration file
    #[arg(long, global = true)]
    pub bit_duration: Option<f64>,

    /// Samples per bit, overrides the configuration file (values < 1 become 1)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub samples_per_bit: Option<i32>,

    /// Use the log-only GPIO backend instead of real hardware
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported modulation types
    Modulations,
    /// Print the modulated and original signal samples
    Generate {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Render the modulated signal as a PNG
    Plot {
        #[command(flatten)]
        request: RequestArgs,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
    /// Transmit the modulated signal on GPIO pins, one after another
    Send {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Report whether GPIO is disabled, busy or idle
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

#[derive(clap::Args)]
pub struct RequestArgs {
    /// Modulation type (e.g. "NRZ-M", manchester, unipolar-rz, ami)
    #[arg(short, long)]
    pub modulation: Option<ModulationType>,

    /// Five binary digits
    #[arg(long)]
    pub message: Option<String>,

    /// BCM pins to drive (defaults to the configured pin)
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    pub pins: Vec<i64>,

    /// Read the whole request from a JSON file instead
    #[arg(long, conflicts_with_all = ["modulation", "message", "pins"])]
    pub request: Option<PathBuf>,
}

impl RequestArgs {
    fn into_request(self) -> Result<ModulateRequest> {
        if let Some(path) = self.request {
            return read_json(&path);
        }
        let (Some(modulation), Some(message)) = (self.modulation, self.message) else {
            bail!("--modulation and --message are required (or pass --request <file>)");
        };
        let request = ModulateRequest::new(message, modulation);
        if self.pins.is_empty() {
            Ok(request)
        } else {
            Ok(request.with_pins(self.pins)?)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

impl Cli {
    /// Configuration file plus command-line overrides, validated.
    pub fn load_config(&self) -> Result<ModulatorConfig> {
        let mut config = match &self.config {
            Some(path) => read_json(path)?,
            None => ModulatorConfig::default(),
        };
        if let Some(seconds) = self.bit_duration {
            config.bit_duration_s = seconds;
        }
        if let Some(samples) = self.samples_per_bit {
            config.samples_per_bit = samples;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Run `command` against a service built over `hardware`.
pub async fn execute<P>(command: Commands, config: ModulatorConfig, hardware: Option<P>) -> Result<()>
where
    P: PinProvider + Send + 'static,
{
    let service = ModulatorService::from_config(config, hardware).context("building service")?;

    match command {
        Commands::Modulations => {
            for name in service.supported_modulations().supported_modulations {
                println!("{name}");
            }
        }
        Commands::Generate { request, format } => {
            let request = request.into_request()?;
            let modulated = service.generate(request.modulation_type, &request.binary_data)?;
            let original = service.generate_original_signal(&request.binary_data)?;
            match format {
                Format::Csv => {
                    println!("t,modulated,original");
                    for ((t, m), o) in modulated.points().zip(original.samples.iter()) {
                        println!("{t},{m},{o}");
                    }
                }
                Format::Json => {
                    let body = serde_json::json!({
                        "modulation_type": request.modulation_type,
                        "binary_data": request.binary_data,
                        "time_axis": modulated.time_axis,
                        "modulated": modulated.samples,
                        "original": original.samples,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
            }
        }
        Commands::Plot { request, out } => {
            let request = request.into_request()?;
            let png = service.plot(&request)?;
            modulator::plot::save_png(&png, &out)?;
            tracing::info!(path = %out.display(), bytes = png.len(), "plot written");
        }
        Commands::Send { request } => {
            let request = request.into_request()?;
            match service.send_to_pins_async(request).await {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(err) => {
                    let status = err.http_status();
                    let completed: Vec<String> =
                        err.completed_pins().iter().map(u8::to_string).collect();
                    return Err(anyhow::Error::new(err).context(format!(
                        "send failed (status {status}, completed pins [{}])",
                        completed.join(", ")
                    )));
                }
            }
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&service.status_report())?);
        }
    }
    Ok(())
}
