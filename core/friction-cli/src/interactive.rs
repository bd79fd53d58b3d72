//! Line-oriented shell over one long-lived controller.
//!
//! One-shot invocations start from a fresh controller, so the capture
//! cooldown and the findings cache reset every time. The shell keeps them
//! alive across gestures and picks up token changes written by other
//! `friction` processes before each line.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use friction_core::{RemoteApi, StorageConfig, SyncController};

use crate::commands::{self, Command};
use crate::render;

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Gesture(Command),

    /// Filter the loaded findings by text without re-fetching
    Search {
        #[arg(value_name = "TEXT")]
        text: Vec<String>,
    },

    /// Show the current findings view
    Show,

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

pub fn run<R: RemoteApi>(controller: &mut SyncController<R>, storage: &StorageConfig) {
    println!("{}", render::connection(controller));
    controller.refresh_findings();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("friction> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "Failed to read shell input");
                break;
            }
            None => break,
        };

        if controller.sync_session_changes() {
            println!("Session changed elsewhere: {}", render::connection(controller));
        }

        let args = split_args(&line);
        if args.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Exit => break,
            ShellCommand::Show => print!(
                "{}",
                render::findings(&controller.view(), &controller.available_actions())
            ),
            ShellCommand::Search { text } => {
                let view = controller.set_query(text.join(" "));
                print!("{}", render::findings(&view, &controller.available_actions()));
            }
            ShellCommand::Gesture(Command::Paste { text }) if text.is_empty() => {
                println!("Usage: paste <text>");
            }
            ShellCommand::Gesture(command) => {
                let name = command.name();
                if let Err(err) = commands::execute(controller, storage, command) {
                    tracing::debug!(command = name, error = %err, "Shell gesture failed");
                }
                if let Some(status) = render::status(controller) {
                    println!("{}", status);
                }
            }
        }
    }
}

/// Splits a shell line on whitespace, keeping double-quoted runs together.
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}
