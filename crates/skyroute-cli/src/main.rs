use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyroute_lib::{
    find_mst, generate, output, place_random_orders, Error as LibError, NetworkConfig,
    RouteStrategy, Simulation, SimulationConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drone delivery network routing and analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a network, deliver random orders, and report the run.
    Simulate {
        #[command(flatten)]
        network: NetworkArgs,

        /// Number of random orders to place.
        #[arg(long, default_value_t = 5)]
        orders: usize,

        #[command(flatten)]
        routing: RoutingArgs,
    },
    /// Plan a single route across a generated network.
    Route {
        /// Origin vertex id.
        #[arg(long = "from")]
        from: String,
        /// Destination vertex id.
        #[arg(long = "to")]
        to: String,

        #[command(flatten)]
        network: NetworkArgs,

        #[command(flatten)]
        routing: RoutingArgs,
    },
    /// Print the minimum spanning tree of a generated network.
    Mst {
        #[command(flatten)]
        network: NetworkArgs,
    },
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Number of vertices to generate.
    #[arg(long, default_value_t = 10)]
    nodes: usize,

    /// Requested number of edges. Clamped to keep the network connected
    /// and simple.
    #[arg(long, default_value_t = 15)]
    edges: usize,

    /// Seed for a reproducible network.
    #[arg(long)]
    seed: Option<u64>,
}

impl NetworkArgs {
    fn config(&self) -> NetworkConfig {
        NetworkConfig {
            nodes: self.nodes,
            edges: self.edges,
            seed: self.seed,
            ..NetworkConfig::default()
        }
    }
}

#[derive(Args, Debug)]
struct RoutingArgs {
    /// Battery budget for constrained searches.
    #[arg(long, default_value_t = 50.0)]
    battery: f64,

    /// Route planning strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Constrained)]
    strategy: Strategy,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    /// Battery-aware search over the live graph.
    Constrained,
    /// Unconstrained lookup against the all-pairs index.
    Precomputed,
}

impl From<Strategy> for RouteStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Constrained => RouteStrategy::Constrained,
            Strategy::Precomputed => RouteStrategy::Precomputed,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            network,
            orders,
            routing,
        } => handle_simulate(&network, orders, &routing),
        Command::Route {
            from,
            to,
            network,
            routing,
        } => handle_route(&network, &routing, &from, &to),
        Command::Mst { network } => handle_mst(&network),
    }
}

fn handle_simulate(network: &NetworkArgs, orders: usize, routing: &RoutingArgs) -> Result<()> {
    let mut sim = build_simulation(network, routing)?;
    let mut rng = match network.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let placed =
        place_random_orders(&mut sim, orders, &mut rng).context("failed to place random orders")?;

    for id in placed {
        match sim.complete_order(id, routing.strategy.into()) {
            Ok(plan) => println!(
                "Order #{id} delivered via {} (cost {:.1})",
                plan.steps.join(" -> "),
                plan.cost
            ),
            Err(LibError::RouteNotFound {
                origin,
                destination,
            }) => println!("Order #{id} undeliverable: no feasible route between {origin} and {destination}"),
            Err(err) => return Err(err).context("order processing failed"),
        }
    }

    println!();
    print!("{}", output::render_orders(sim.orders()));
    println!();
    print!("{}", output::render_frequent_routes(&sim.frequent_routes()));
    println!();
    print!("{}", output::render_summary(&sim.summary()));
    Ok(())
}

fn handle_route(network: &NetworkArgs, routing: &RoutingArgs, from: &str, to: &str) -> Result<()> {
    let mut sim = build_simulation(network, routing)?;
    let plan = sim
        .find_path(from, to, routing.strategy.into())
        .with_context(|| format!("failed to plan a route from {from} to {to}"))?;
    print!("{}", output::render_plan(&plan));
    Ok(())
}

fn handle_mst(network: &NetworkArgs) -> Result<()> {
    let graph =
        generate(&network.config()).context("failed to generate the delivery network")?;
    print!("{}", output::render_mst(&find_mst(&graph)));
    Ok(())
}

fn build_simulation(network: &NetworkArgs, routing: &RoutingArgs) -> Result<Simulation> {
    let graph =
        generate(&network.config()).context("failed to generate the delivery network")?;
    let config = SimulationConfig {
        battery_limit: routing.battery,
        ..SimulationConfig::default()
    };
    Ok(Simulation::new(graph, config))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
