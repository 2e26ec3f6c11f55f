//! Aethernet CLI
//!
//! One-shot commands against the sensor server:
//! - Print the current snapshot
//! - Override the system decision
//! - Update thresholds
//! - Show savings and link status

use aethernet::{
    Config, ReadoutId, Readouts, SensorApi, SensorClient, SensorSnapshot, ThresholdRequest,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aethernet-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "One-shot commands for the Aethernet sensor server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sensor server URL (default: from config / AETHERNET_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the latest sensor snapshot
    Snapshot,

    /// Force the system decision
    Override {
        /// Override action (store, redirect, clear)
        action: String,
    },

    /// Set the decision thresholds
    Thresholds {
        /// Humidity threshold (%)
        #[arg(long)]
        humidity: String,
        /// Temperature threshold (°C)
        #[arg(long)]
        temperature: String,
    },

    /// Show estimated energy and water savings
    Savings,

    /// Show the server's telemetry link status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let discovery = Config::discover();
    let mut config = discovery.config.clone();
    if let Some(url) = cli.base_url {
        config.server.base_url = url;
    }
    aethernet::logging::init(&config.logging)?;
    discovery.log();

    if let Commands::Config { output } = &cli.command {
        let content = aethernet::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let client = SensorClient::new(config.server.client_config())?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Snapshot => {
            let snapshot = client
                .fetch_snapshot()
                .await
                .map_err(|e| request_failed(&client, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot);
            }
        }

        Commands::Override { action } => {
            let response = client
                .submit_override(&action)
                .await
                .map_err(|e| request_failed(&client, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "System Override: {}",
                    response.new_decision.as_deref().unwrap_or("cleared")
                );
            }
        }

        Commands::Thresholds {
            humidity,
            temperature,
        } => {
            let request = ThresholdRequest::new(humidity, temperature);
            let response = client
                .submit_thresholds(&request)
                .await
                .map_err(|e| request_failed(&client, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "Thresholds saved (humidity {}, temperature {})",
                    request.humidity, request.temperature
                );
            }
        }

        Commands::Savings => {
            let savings = client
                .fetch_savings()
                .await
                .map_err(|e| request_failed(&client, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&savings)?);
            } else {
                println!("{:<20} {:.2} kWh", "Energy saved", savings.energy_savings_kwh);
                println!("{:<20} {:.2} L", "Water saved", savings.water_savings_liters);
                println!("{:<20} {}", "Efficiency gain", savings.efficiency_gain);
            }
        }

        Commands::Status => {
            let status = client
                .fetch_link_status()
                .await
                .map_err(|e| request_failed(&client, e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Aethernet v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Server: {}", client.base_url());
                println!("Telemetry link: {}", status.status);
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn request_failed(client: &SensorClient, err: aethernet::ApiError) -> anyhow::Error {
    anyhow::anyhow!("Request to {} failed: {}", client.base_url(), err)
}

fn print_snapshot(snapshot: &SensorSnapshot) {
    let mut readouts = Readouts::default();
    readouts.apply(snapshot);

    println!("{:<18} {}", "Reading", "Value");
    println!("{}", "-".repeat(50));
    for id in ReadoutId::ALL {
        println!("{:<18} {}", id.label(), readouts.get(id));
    }
}
