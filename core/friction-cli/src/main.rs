//! friction: capture friction moments from the terminal and review the
//! findings built from them.
//!
//! ## Subcommands
//!
//! - `login` / `logout`: Manage the saved API token
//! - `capture`: Save highlighted text, optionally with its page URL
//! - `paste`: Save a bulk paste (argument or stdin)
//! - `report` / `open-reports`: Run a snapshot and open the web reports
//! - `findings` / `review`: List findings per status chip and act on them
//! - `status`, `theme`, `config`: Session and local settings
//! - `shell`: Interactive loop that keeps cooldown and cache between gestures

mod commands;
mod interactive;
mod logging;
mod opener;
mod render;

use clap::{Parser, Subcommand};
use friction_core::{
    load_client_config, HttpRemoteClient, ReportOpener, SessionStore, StorageConfig,
    SyncController,
};

use crate::commands::Command;
use crate::opener::{BrowserOpener, PrintOpener};

#[derive(Parser)]
#[command(name = "friction")]
#[command(about = "Capture friction moments and review findings")]
#[command(version)]
struct Cli {
    /// Print the reports URL instead of opening a browser
    #[arg(long, global = true)]
    no_open: bool,

    #[command(subcommand)]
    command: TopLevel,
}

#[derive(Subcommand)]
enum TopLevel {
    #[command(flatten)]
    Gesture(Command),

    /// Interactive shell (keeps cooldown, cache and status between gestures)
    Shell,
}

fn main() {
    let storage = StorageConfig::resolve();
    let _logging_guard = logging::init(storage.as_ref().map(|s| s.logs_dir()).as_deref());
    let cli = Cli::parse();

    let Some(storage) = storage else {
        tracing::error!("Home directory not found; set FRICTION_HOME");
        std::process::exit(1);
    };

    let config = load_client_config(&storage);
    let remote = match HttpRemoteClient::new(&config) {
        Ok(remote) => remote,
        Err(e) => {
            tracing::error!(error = %e, "friction failed to start");
            std::process::exit(1);
        }
    };
    let opener: Box<dyn ReportOpener> = if cli.no_open {
        Box::new(PrintOpener)
    } else {
        Box::new(BrowserOpener)
    };
    let session = SessionStore::load(&storage.session_file());
    let mut controller = SyncController::new(session, remote, &config, opener);
    tracing::debug!(api_base = %config.api_base(), "Controller ready");

    match cli.command {
        TopLevel::Shell => interactive::run(&mut controller, &storage),
        TopLevel::Gesture(command) => {
            let name = command.name();
            let result = commands::execute(&mut controller, &storage, command);
            if let Some(status) = render::status(&controller) {
                println!("{}", status);
            }
            if let Err(e) = result {
                if e.is_local_rejection() {
                    tracing::warn!(error = %e, "friction {} rejected", name);
                } else {
                    tracing::error!(error = %e, "friction {} failed", name);
                }
                std::process::exit(1);
            }
        }
    }
}
