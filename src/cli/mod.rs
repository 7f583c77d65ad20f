//! Command line interface for the account API

pub mod serve;

use clap::{Parser, Subcommand};

/// Account API - user registration, login, and session tokens
#[derive(Parser)]
#[command(name = "account-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(serve::ServeArgs),
}
