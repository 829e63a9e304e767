//! Command implementations behind the `extwizard` binary

pub mod commands;
pub mod history;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while waiting on the network
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub(crate) fn print_header(title: &str) {
    println!("{}", title.bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!();
}

pub(crate) fn print_warning(message: &str) {
    println!("{}", format!("⚠️  {}", message).yellow());
}
