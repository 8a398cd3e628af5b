// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tripcast - a multi-user, AI-mediated travel-planning chatroom.
//!
//! This is the binary entry point for the gateway process.

mod null_gateway;
mod serve;

use clap::{Parser, Subcommand};

/// Tripcast - a multi-user, AI-mediated travel-planning chatroom.
#[derive(Parser, Debug)]
#[command(name = "tripcast", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server.
    Serve,
    /// Manage tripcast configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Config management subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate the configuration file and report any errors.
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action: ConfigCommands::Validate }) => match tripcast_config::load_and_validate() {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(_errors) => {
                // load_and_validate already rendered diagnostics to stderr.
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            let config = match tripcast_config::load_and_validate() {
                Ok(config) => config,
                Err(_errors) => {
                    std::process::exit(1);
                }
            };

            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
