//! CLI definitions for simple-dummy.

use clap::Parser;

/// Simple Dummy CLI.
#[derive(Parser)]
#[command(name = "simple-dummy")]
#[command(about = "A test application for build system standardization")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub(crate) struct Cli {
    /// Pass `--daemon` to run the background worker until SIGINT/SIGTERM;
    /// anything else runs a short foreground loop
    #[arg(
        value_name = "MODE",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// How the worker should be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunMode {
    Foreground,
    Daemon,
}

impl Cli {
    /// Only the first argument matters, and only when it is `--daemon`.
    pub fn mode(&self) -> RunMode {
        match self.args.first().map(String::as_str) {
            Some("--daemon") => RunMode::Daemon,
            _ => RunMode::Foreground,
        }
    }
}
