//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triage CLI - Multimodal triage intake.
#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides the profile)
    #[arg(long, global = true, env = "TRIAGE_API_BASE")]
    pub base_url: Option<String>,

    /// API key (overrides the profile)
    #[arg(long, global = true, env = "TRIAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (risk level only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one triage over the given files
    Run(RunArgs),

    /// Check the service health endpoint
    Health,

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter an interactive intake session
    Session,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Voice recording (audio/*)
    #[arg(short, long)]
    pub audio: Option<PathBuf>,

    /// Lab report (application/pdf)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Medical image (image/*)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Export a printable report to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Write the exported report as JSON instead of HTML
    #[arg(long, requires = "export")]
    pub json_report: bool,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Service base URL
        #[arg(short, long)]
        url: String,
        /// API key
        #[arg(short = 'k', long)]
        key: Option<String>,
        /// Request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["triage"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "triage",
            "run",
            "--audio",
            "complaint.wav",
            "--image",
            "xray.png",
            "--export",
            "report.html",
        ]);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.audio, Some(PathBuf::from("complaint.wav")));
                assert!(args.document.is_none());
                assert_eq!(args.image, Some(PathBuf::from("xray.png")));
                assert_eq!(args.export, Some(PathBuf::from("report.html")));
                assert!(!args.json_report);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_json_report_requires_export() {
        let result = Cli::try_parse_from(["triage", "run", "--json-report"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "triage",
            "health",
            "--base-url",
            "http://10.0.0.2:8000",
            "--api-key",
            "secret",
        ]);
        assert!(matches!(cli.command, Some(Command::Health)));
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(cli.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_profile_set() {
        let cli = Cli::parse_from([
            "triage", "profile", "set", "lab", "--url", "http://lab:8000", "--timeout", "30",
        ]);
        match cli.command {
            Some(Command::Profile(ProfileArgs {
                action: ProfileAction::Set { name, url, key, timeout },
            })) => {
                assert_eq!(name, "lab");
                assert_eq!(url, "http://lab:8000");
                assert!(key.is_none());
                assert_eq!(timeout, Some(30));
            }
            _ => panic!("Expected profile set"),
        }
    }
}
