// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chatlink - a conversation bridge between a website chat widget and a
//! Slack workspace.
//!
//! This is the binary entry point for the Chatlink server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Chatlink - bridge a website chat widget to a Slack workspace.
#[derive(Parser, Debug)]
#[command(name = "chatlink", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Chatlink gateway server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match chatlink_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("chatlink: invalid configuration");
            for error in &errors {
                eprintln!("  - {error}");
            }
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("chatlink serve: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("chatlink: use --help for available commands");
        }
    }
}
