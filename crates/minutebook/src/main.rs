// SPDX-FileCopyrightText: 2026 Minutebook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minutebook - meeting agendas, minutes and versioned reports.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod check;
mod documents;
mod meetings;
mod output;
mod reports;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use minutebook_core::{AgendaContent, MinutesContent};

use crate::app::App;
use crate::output::Output;

/// Minutebook - meeting agendas, minutes and versioned reports.
#[derive(Parser, Debug)]
#[command(name = "minutebook", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, list, show and delete meetings.
    #[command(subcommand)]
    Meeting(meetings::MeetingCommand),
    /// Work with a meeting's agenda history.
    #[command(subcommand)]
    Agenda(documents::DocumentCommand),
    /// Work with a meeting's minutes history.
    #[command(subcommand)]
    Minutes(documents::DocumentCommand),
    /// Generate, regenerate and list reports.
    #[command(subcommand)]
    Report(reports::ReportCommand),
    /// Check configuration, storage, rasterizer and mail settings.
    Check {
        /// Also open a connection to the SMTP relay.
        #[arg(long)]
        deep: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => minutebook_config::load_and_validate_path(path),
        None => minutebook_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            minutebook_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);
    let out = Output::new(cli.plain);

    let app = match App::open(config).await {
        Ok(app) => app,
        Err(e) => {
            out.error(&format!("failed to open storage: {e}"));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Meeting(cmd) => meetings::run(&app, &out, cmd).await,
        Commands::Agenda(cmd) => documents::run::<AgendaContent>(&app, &out, cmd).await,
        Commands::Minutes(cmd) => documents::run::<MinutesContent>(&app, &out, cmd).await,
        Commands::Report(cmd) => reports::run(&app, &out, cmd).await,
        Commands::Check { deep } => check::run_check(&app, &out, deep).await,
    };

    if let Err(e) = app.close().await {
        tracing::warn!(error = %e, "storage did not close cleanly");
    }
    if let Err(e) = result {
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` wins when set. Logs go to stderr so command output stays
/// pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("minutebook={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
