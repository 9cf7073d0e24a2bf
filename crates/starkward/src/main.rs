//! # Starkward
//!
//! Guardian co-signing service for Starknet accounts.
//!
//! ## Usage
//!
//! ```bash
//! export STARKWARD_NETWORK=sepolia
//! export STARKWARD_RPC_URL=https://rpc.example/v0_7
//! export STARKWARD_GUARDIAN_KEY=0x...
//!
//! # Start the guardian HTTP service
//! starkward serve
//!
//! # Print the guardian public key for account setup
//! starkward guardian-key
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use starkward::logging::init_logging;
use starkward::provider::RpcProvider;
use starkward::server;
use starkward::verifier::Verifier;
use starkward_core::config::Config;
use starkward_crypto::{chain_id_felt, GuardianSigner};

/// Exit code for startup or runtime errors.
const EXIT_ERROR: i32 = 1;

/// Guardian co-signing service for Starknet accounts.
#[derive(Parser)]
#[command(name = "starkward", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the guardian HTTP service.
    Serve {
        /// Override the configured listen port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the guardian public key for account setup.
    GuardianKey,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(EXIT_ERROR);
    }

    let result = match cli.command {
        Commands::Serve { port } => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Failed to create tokio runtime: {e}");
                    std::process::exit(EXIT_ERROR);
                }
            };
            rt.block_on(run_serve(port))
        }
        Commands::GuardianKey => run_guardian_key(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(EXIT_ERROR);
    }
}

/// Load configuration, assemble the pipeline, and serve until killed.
async fn run_serve(port_override: Option<u16>) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let port = port_override.unwrap_or(config.port);

    let chain_id = chain_id_felt(config.network.chain_tag()).map_err(|e| e.to_string())?;
    let signer = GuardianSigner::from_key_str(&config.guardian_key).map_err(|e| e.to_string())?;
    tracing::info!(
        network = %config.network,
        guardian = %format!("{:#x}", signer.public_key()),
        "starting guardian service",
    );

    let provider = Arc::new(RpcProvider::new(config.rpc_url));
    let verifier = Arc::new(Verifier::new(
        provider.clone(),
        provider,
        signer,
        chain_id,
    ));

    server::serve(port, verifier).await.map_err(|e| e.to_string())
}

/// Print the guardian public key derived from the configured key.
fn run_guardian_key() -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let signer = GuardianSigner::from_key_str(&config.guardian_key).map_err(|e| e.to_string())?;
    println!("{:#x}", signer.public_key());
    Ok(())
}
