//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "measures")]
#[command(about = "Browse code-quality measures of a project, one directory at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive drilldown browser
    Browse {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the children of a component as a table
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Fetch every page instead of the first one
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Where measures come from and what to show
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON fixture to read measures from
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Server base URL (defaults to `[source] url` from the config)
    #[arg(long)]
    pub url: Option<String>,

    /// Key of the component to start from
    #[arg(short, long)]
    pub component: Option<String>,

    /// Main metric, shown in the first value column
    #[arg(short, long, default_value = "ncloc")]
    pub metric: String,

    /// Additional metrics, shown as extra columns
    #[arg(long = "with", value_delimiter = ',')]
    pub extra_metrics: Vec<String>,

    /// Branch to read measures for
    #[arg(long, conflicts_with = "pull_request")]
    pub branch: Option<String>,

    /// Pull request to read measures for
    #[arg(long)]
    pub pull_request: Option<String>,

    /// Components per page (defaults to `[source] page_size`)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl SourceArgs {
    /// Main metric first, extras after, without duplicates
    pub fn metric_keys(&self) -> Vec<String> {
        let mut keys = vec![self.metric.clone()];
        for key in &self.extra_metrics {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse() {
        let cli = Cli::try_parse_from([
            "measures",
            "browse",
            "--file",
            "demo.json",
            "-m",
            "coverage",
            "--with",
            "ncloc,coverage,bugs",
            "--branch",
            "develop",
        ])
        .unwrap();
        let Commands::Browse { source } = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(source.file, Some(PathBuf::from("demo.json")));
        assert_eq!(source.metric_keys(), vec!["coverage", "ncloc", "bugs"]);
        assert_eq!(source.branch.as_deref(), Some("develop"));
    }

    #[test]
    fn test_branch_and_pull_request_conflict() {
        let result = Cli::try_parse_from([
            "measures",
            "list",
            "--branch",
            "develop",
            "--pull-request",
            "42",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_and_url_conflict() {
        let result = Cli::try_parse_from([
            "measures",
            "list",
            "--file",
            "a.json",
            "--url",
            "https://sonar.example.com",
        ]);
        assert!(result.is_err());
    }
}
