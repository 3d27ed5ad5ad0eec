//! Command line front-end for quadmap that resolves campus addresses to coordinates.

mod cfg;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quadmap_core::resolver::{AddressResolver, geocode_address};
use quadmap_provider_google as google;
use reqwest::Client;

use crate::cfg::Cfg;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a street address to `lat,lng`.
    Geocode {
        /// Print `{"lat":..,"lng":..}` instead of `lat,lng`.
        #[arg(long)]
        json: bool,
        /// Address words, joined with spaces.
        #[arg(required = true)]
        address: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = Cfg::from_env()?;

    // HTTP + resolver setup
    let client = Client::builder().user_agent("quadmap/0.1").build()?;
    let provider = google::geocoder(client, cfg.google);
    let resolver = AddressResolver::new(provider, cfg.resolver);

    match args.command {
        Command::Geocode { json, address } => {
            let address = address.join(" ");
            let coordinate = geocode_address(&resolver, &address).await;
            let line = if json {
                serde_json::to_string(&coordinate)?
            } else {
                coordinate.to_string()
            };
            print_line(&line);
        }
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "command output")]
fn print_line(line: &str) {
    println!("{line}");
}
