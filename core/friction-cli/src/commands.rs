//! User gestures shared by one-shot invocations and the interactive shell.

use std::io::{self, BufRead, Read};

use clap::Subcommand;
use friction_core::{
    load_stored_client_config, save_client_config, CaptureSource, RemoteApi, Result,
    ReviewAction, StatusFilter, StorageConfig, SyncController, SyncError,
};

use crate::render;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save the API token (read from stdin when omitted)
    Login {
        #[arg(value_name = "TOKEN")]
        token: Option<String>,
    },

    /// Forget the saved token
    Logout,

    /// Save highlighted text as a moment
    Capture {
        #[arg(required = true, value_name = "TEXT")]
        text: Vec<String>,

        /// Page the text was highlighted on
        #[arg(long)]
        url: Option<String>,
    },

    /// Save a bulk paste as a moment (reads stdin when no text is given)
    Paste {
        #[arg(value_name = "TEXT")]
        text: Vec<String>,
    },

    /// Run a snapshot, then open the reports page
    Report,

    /// Open the reports page without running a snapshot
    OpenReports,

    /// List findings for a status chip
    Findings {
        #[arg(long, short, default_value = "unreviewed", value_parser = parse_filter)]
        status: StatusFilter,

        /// Case-insensitive text filter over topic, summary and anchor
        #[arg(long, short)]
        query: Option<String>,

        /// Print the grouped findings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a review action (confirm, defer, resolve) to a finding
    Review {
        #[arg(value_name = "FINDING_ID")]
        id: String,

        #[arg(value_parser = parse_action)]
        action: ReviewAction,

        /// Chip the finding is listed under
        #[arg(long, short, default_value = "unreviewed", value_parser = parse_filter)]
        status: StatusFilter,
    },

    /// Probe the API and show session state
    Status,

    /// Cycle the color theme
    Theme,

    /// Show or update config.json
    Config {
        #[arg(long)]
        api_base: Option<String>,

        #[arg(long)]
        reports_url: Option<String>,

        #[arg(long)]
        cooldown_ms: Option<u64>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Capture { .. } => "capture",
            Command::Paste { .. } => "paste",
            Command::Report => "report",
            Command::OpenReports => "open-reports",
            Command::Findings { .. } => "findings",
            Command::Review { .. } => "review",
            Command::Status => "status",
            Command::Theme => "theme",
            Command::Config { .. } => "config",
        }
    }
}

pub fn parse_filter(value: &str) -> std::result::Result<StatusFilter, String> {
    StatusFilter::parse(value)
        .ok_or_else(|| format!("unknown status '{}' (unreviewed, confirmed, deferred)", value))
}

pub fn parse_action(value: &str) -> std::result::Result<ReviewAction, String> {
    ReviewAction::parse(value)
        .ok_or_else(|| format!("unknown action '{}' (confirm, defer, resolve)", value))
}

/// Runs one gesture against the controller and prints its result.
pub fn execute<R: RemoteApi>(
    controller: &mut SyncController<R>,
    storage: &StorageConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => read_stdin_line()?,
            };
            controller.save_token(&token)?;
            println!("{}", render::connection(controller));
        }
        Command::Logout => controller.logout()?,
        Command::Capture { text, url } => {
            controller.capture(&text.join(" "), CaptureSource::Highlight { url })?;
        }
        Command::Paste { text } => {
            let text = if text.is_empty() {
                read_stdin_all()?
            } else {
                text.join(" ")
            };
            controller.capture(&text, CaptureSource::BulkPaste)?;
        }
        Command::Report => {
            let run = controller.generate_report()?;
            if !run.snapshot_started {
                println!("Snapshot run failed; showing existing reports.");
            }
        }
        Command::OpenReports => {
            controller.open_reports();
        }
        Command::Findings {
            status,
            query,
            json,
        } => {
            controller.set_filter(status);
            let view = controller.set_query(query.unwrap_or_default());
            if json {
                let out = serde_json::to_string_pretty(&view).map_err(|source| SyncError::Json {
                    context: "serialize findings".to_string(),
                    source,
                })?;
                println!("{}", out);
            } else {
                print!("{}", render::findings(&view, &controller.available_actions()));
            }
        }
        Command::Review { id, action, status } => {
            controller.set_filter(status);
            controller.review(&id, action)?;
            print!(
                "{}",
                render::findings(&controller.view(), &controller.available_actions())
            );
        }
        Command::Status => {
            controller.check_connection();
            println!("{}", render::connection(controller));
        }
        Command::Theme => {
            controller.toggle_theme()?;
        }
        Command::Config {
            api_base,
            reports_url,
            cooldown_ms,
        } => configure(storage, api_base, reports_url, cooldown_ms)?,
    }
    Ok(())
}

fn configure(
    storage: &StorageConfig,
    api_base: Option<String>,
    reports_url: Option<String>,
    cooldown_ms: Option<u64>,
) -> Result<()> {
    let mut config = load_stored_client_config(storage);
    let changed = api_base.is_some() || reports_url.is_some() || cooldown_ms.is_some();

    if let Some(api_base) = api_base {
        config.api_base = api_base;
    }
    if let Some(reports_url) = reports_url {
        config.reports_url = reports_url;
    }
    if let Some(cooldown_ms) = cooldown_ms {
        config.capture_cooldown_ms = cooldown_ms;
    }

    if changed {
        save_client_config(storage, &config)?;
        tracing::info!(path = %storage.config_file().display(), "Client config saved");
        println!("Saved {} (applies on next start).", storage.config_file().display());
    }

    let out = serde_json::to_string_pretty(&config).map_err(|source| SyncError::Json {
        context: "serialize client config".to_string(),
        source,
    })?;
    println!("{}", out);
    Ok(())
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|source| SyncError::Io {
            context: "read token from stdin".to_string(),
            source,
        })?;
    Ok(line)
}

fn read_stdin_all() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut text)
        .map_err(|source| SyncError::Io {
            context: "read paste from stdin".to_string(),
            source,
        })?;
    Ok(text)
}
