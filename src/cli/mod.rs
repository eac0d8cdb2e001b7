//! CLI module - Command-line interface for Chirper
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Chirper - a small micro-blogging backend
#[derive(Parser)]
#[command(name = "chirper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon", alias = "-d", alias = "--daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Register an identity without going through the API
    CreateUser {
        /// Username (word characters, `.`, `@`, `+`, `-`; at most 30)
        username: String,
        /// Initial password
        #[arg(long)]
        password: String,
        /// Contact email
        #[arg(long, default_value = "")]
        email: String,
        /// Mark the identity as staff
        #[arg(long)]
        staff: bool,
        /// Mark the identity as superuser
        #[arg(long)]
        superuser: bool,
    },

    /// List registered identities
    #[command(alias = "ls")]
    Users,

    /// Print the home timeline an identity would see
    Timeline {
        /// Username whose followees' chirps are shown
        username: String,
    },
}

pub use commands::*;
