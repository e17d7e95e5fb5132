//! `hashring` — route keys over a consistent hashing ring.
//!
//! # Usage
//!
//! ```text
//! hashring -n server1 -n server2 route user1 user2      # who owns these keys
//! hashring -c ring.toml route post1                      # nodes from a config file
//! hashring -c ring.toml distribution -k 100000           # per-node load
//! hashring -c ring.toml --hasher blake3 distribution      # compare hashers
//! hashring -c ring.toml remove server2 user1 user2 post1  # reassignment on leave
//! ```

mod config;
mod report;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hashring::{HashAlgorithm, Ring};
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "hashring",
    version,
    about = "Route keys to nodes with consistent hashing"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node to place on the ring. Repeat for several nodes; a repeated name
    /// gets extra weight. Replaces nodes from the config file.
    #[arg(short, long = "node", global = true)]
    nodes: Vec<String>,

    /// Virtual nodes per physical node.
    #[arg(short, long, global = true)]
    replicas: Option<usize>,

    /// Hash function for placement.
    #[arg(long, value_enum, global = true)]
    hasher: Option<HasherArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the owning node of each key.
    Route {
        /// Keys to route.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Route synthetic keys and print how many land on each node.
    Distribution {
        /// Number of keys to route.
        #[arg(short = 'k', long, default_value = "10000")]
        count: usize,

        /// Prefix for the synthetic keys (`{prefix}{i}`).
        #[arg(short, long, default_value = "key")]
        prefix: String,
    },

    /// Show which keys move when a node leaves the ring.
    Remove {
        /// Node to remove.
        node: String,

        /// Keys to route before and after the removal.
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HasherArg {
    Md5,
    Blake3,
}

impl From<HasherArg> for HashAlgorithm {
    fn from(arg: HasherArg) -> Self {
        match arg {
            HasherArg::Md5 => HashAlgorithm::Md5,
            HasherArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    telemetry::init(&config.log.level);

    // CLI args override config file values.
    config.apply_overrides(cli.nodes, cli.replicas, cli.hasher.map(Into::into));

    let ring = Ring::from_config(&config.ring).context("invalid ring configuration")?;
    info!(
        nodes = ring.node_count(),
        vnodes = ring.vnode_count(),
        replicas = ring.replicas(),
        hasher = ?config.ring.hasher,
        "ring built"
    );

    let output = match cli.command {
        Commands::Route { keys } => report::render_routes(&ring, &keys),
        Commands::Distribution { count, prefix } => {
            debug!(count, %prefix, "routing synthetic keys");
            report::render_distribution(&report::distribution(&ring, count, &prefix))
        }
        Commands::Remove { node, keys } => {
            if !ring.contains_node(&node) {
                info!(%node, "node is not on the ring, nothing will move");
            }
            report::render_removal(&report::removal(&ring, &node, &keys))
        }
    };

    print!("{output}");
    Ok(())
}
