use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use transitroute_cli::commands::route::{handle_route_command, RouteCommandArgs};
use transitroute_cli::commands::stats::handle_stats_command;
use transitroute_cli::output::{AlgorithmArg, OutputFormat, WeightArg};
use transitroute_lib::{NodeId, DEFAULT_MAX_SPEED_KMH};

#[derive(Parser, Debug)]
#[command(author, version, about = "Road-network route planning utilities")]
struct Cli {
    /// Path to the JSON network file.
    #[arg(long, global = true, env = "TRANSITROUTE_GRAPH")]
    graph: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan one or more routes between two node ids.
    Route {
        /// Starting node id.
        #[arg(long = "from")]
        from: NodeId,
        /// Destination node id.
        #[arg(long = "to")]
        to: NodeId,
        /// Edge attribute to minimise.
        #[arg(long, value_enum, default_value_t = WeightArg::TravelTime)]
        weight: WeightArg,
        /// Search algorithm.
        #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
        algorithm: AlgorithmArg,
        /// Number of loopless alternatives to return.
        #[arg(long, default_value_t = 1)]
        alternatives: usize,
        /// Top speed assumed by the travel-time heuristic, in km/h.
        #[arg(long = "max-speed", default_value_t = DEFAULT_MAX_SPEED_KMH)]
        max_speed: f64,
        /// Abort planning after this many milliseconds.
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
    },
    /// Print node and edge statistics for the network.
    Stats,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let graph_path = cli
        .graph
        .ok_or_else(|| anyhow::anyhow!("no network given; pass --graph or set TRANSITROUTE_GRAPH"))?;

    match cli.command {
        Command::Route {
            from,
            to,
            weight,
            algorithm,
            alternatives,
            max_speed,
            timeout_ms,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                weight,
                algorithm,
                alternatives,
                max_speed,
                timeout_ms,
            };
            handle_route_command(&graph_path, cli.format, &args)
        }
        Command::Stats => handle_stats_command(&graph_path, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
