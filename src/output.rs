//! # Output Configuration and Status Formatting
//!
//! This module provides utilities for controlling CLI output appearance and
//! for rendering the per-repository status lines printed by the command
//! executor.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Status Lines
//!
//! A status line pairs a left-aligned message (the repository path) with a
//! centered status token: `OK` (green), `FAIL` or `ERROR` (red). When colors
//! are enabled the token column is widened to 15 characters so the embedded
//! ANSI escape sequences still center the visible token; plain tokens use a
//! 6-character column.

use std::env;

/// Per-repo outcome of one dispatched git command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The process ran and exited zero.
    Ok,
    /// The process ran and exited non-zero.
    Fail,
    /// The process could not be started at all.
    Error,
}

impl RunStatus {
    /// Whether this outcome counts as a success in the aggregate fold.
    pub fn succeeded(&self) -> bool {
        matches!(self, RunStatus::Ok)
    }
}

/// Width of the message column in a status line.
const MESSAGE_WIDTH: usize = 100;
/// Token column width when colors are enabled (leaves room for ANSI escapes).
const COLOR_STATUS_WIDTH: usize = 15;
/// Token column width for plain-text output.
const PLAIN_STATUS_WIDTH: usize = 6;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// # Behavior
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // Check NO_COLOR first (https://no-color.org/)
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        // Check CLICOLOR=0 disables colors
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        // Check CLICOLOR_FORCE=1 forces colors
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        // Check TERM=dumb
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Use console crate's detection for TTY and color support
        console::Term::stdout().features().colors_supported()
    }

    /// The token column width for the current color mode.
    pub fn status_width(&self) -> usize {
        if self.use_color {
            COLOR_STATUS_WIDTH
        } else {
            PLAIN_STATUS_WIDTH
        }
    }

    /// Render a status token, colorized when enabled.
    pub fn status_token(&self, status: RunStatus) -> String {
        let plain = match status {
            RunStatus::Ok => "OK",
            RunStatus::Fail => "FAIL",
            RunStatus::Error => "ERROR",
        };
        if !self.use_color {
            return plain.to_string();
        }
        let styled = match status {
            RunStatus::Ok => console::style(plain).green(),
            RunStatus::Fail | RunStatus::Error => console::style(plain).red(),
        };
        styled.force_styling(true).to_string()
    }

    /// Render one status line: left-aligned message, centered status token.
    pub fn format_status_line(&self, message: &str, status: RunStatus) -> String {
        format!(
            "{:<mwidth$}[{:^swidth$}]",
            message,
            self.status_token(status),
            mwidth = MESSAGE_WIDTH,
            swidth = self.status_width(),
        )
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Replace non-printable and non-ASCII characters with a single space.
///
/// Applied to captured stdout before console display only; data handed back
/// to structured-mode callers is never sanitized. Newlines and tabs are
/// preserved so multi-line git output keeps its shape.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c == '\n' || c == '\t' || (' '..='~').contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}
