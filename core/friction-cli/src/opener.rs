//! Report destinations: the system browser, or stdout when there is none.

use std::process::{Command, Stdio};

use friction_core::ReportOpener;

/// Hands the URL to the platform's default URL handler.
pub struct BrowserOpener;

impl ReportOpener for BrowserOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        launcher(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to open reports: {}", e))?;
        tracing::debug!(url, "Opened reports in browser");
        Ok(())
    }
}

/// Prints the URL instead of launching anything (`--no-open`, headless hosts).
pub struct PrintOpener;

impl ReportOpener for PrintOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        println!("Reports: {}", url);
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(url);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
