use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_planner::dto::{LineView, RouteView, StationView, list_lines, list_stations};
use bus_planner::graph::GraphCache;
use bus_planner::network::JsonFileSource;
use bus_planner::planner::{Planner, PlannerConfig, SearchRequest, TransferChoice};

/// Bus route planner over a JSON network file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Network file with stations, lines and memberships
    #[arg(long, env = "BUS_NETWORK_PATH", default_value = "network.json")]
    network: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan routes between two stations (id or part of a name)
    Plan {
        start: String,
        end: String,
        /// Maximum number of line changes
        #[arg(long, default_value_t = 2)]
        max_transfers: usize,
        /// Try every shared station when changing lines
        #[arg(long)]
        all_transfers: bool,
    },
    /// List stations, optionally filtered by id or name
    Stations { query: Option<String> },
    /// List lines, or the lines through one station
    Lines { station: Option<String> },
    /// List the stations of one line (id or name)
    Line { identifier: String },
    /// Write the network as loaded, bad rows dropped, to another file
    Export { output: PathBuf },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cache = GraphCache::load(JsonFileSource::new(&cli.network))?;
    let snapshot = cache.snapshot();

    match cli.command {
        Command::Plan {
            start,
            end,
            max_transfers,
            all_transfers,
        } => {
            let mut config = PlannerConfig::default();
            if all_transfers {
                config = config.with_transfer_choice(TransferChoice::All);
            }
            let result = Planner::new(&cache, &config).plan(&SearchRequest::new(
                start,
                end,
                max_transfers,
            ));
            let views: Vec<RouteView> = result
                .routes
                .iter()
                .map(|r| RouteView::from_route(r, &snapshot))
                .collect();
            print_json(&views)?;
        }
        Command::Stations { query: None } => print_json(&list_stations(&snapshot))?,
        Command::Stations { query: Some(query) } => {
            let views: Vec<StationView> = snapshot
                .search_stations(&query)
                .into_iter()
                .map(StationView::from_station)
                .collect();
            print_json(&views)?;
        }
        Command::Lines { station: None } => print_json(&list_lines(&snapshot))?,
        Command::Lines {
            station: Some(station),
        } => {
            let views: Vec<LineView> = snapshot
                .lines_at_station(&station)
                .into_iter()
                .map(|l| LineView::from_line(l, &snapshot))
                .collect();
            print_json(&views)?;
        }
        Command::Line { identifier } => {
            let views: Vec<StationView> = snapshot
                .stations_on_line(&identifier)
                .into_iter()
                .map(StationView::from_station)
                .collect();
            print_json(&views)?;
        }
        Command::Export { output } => {
            let target = JsonFileSource::new(&output);
            target.save(&snapshot.to_network_data())?;
            info!(path = %target.path().display(), "Network exported");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
