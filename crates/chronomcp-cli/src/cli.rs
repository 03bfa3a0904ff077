//! Command line arguments

use std::path::PathBuf;

use chronomcp_config::constants::ENV_CHRONOSPHERE_ORG_NAME;
use clap::Parser;

/// MCP server for the Chronosphere observability platform.
///
/// Serves alert, event, log, metric and configuration tools to MCP clients
/// over stdio and/or HTTP.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "chronomcp", version, about, long_about = None)]
pub struct Cli {
    /// YAML config file
    #[arg(short = 'c', long = "config-file", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Static API token, used when a request does not forward its own
    /// [fallback: CHRONOSPHERE_API_TOKEN]
    #[arg(long, value_name = "TOKEN", conflicts_with = "api_token_filename")]
    pub api_token: Option<String>,

    /// File containing the static API token
    #[arg(long, value_name = "PATH")]
    pub api_token_filename: Option<PathBuf>,

    /// Organization name; the API lives at https://<org>.chronosphere.io
    #[arg(long, value_name = "ORG", env = ENV_CHRONOSPHERE_ORG_NAME)]
    pub org_name: Option<String>,

    /// Query logs through LogScale (token from LOGSCALE_API_TOKEN)
    #[arg(long)]
    pub use_logscale: bool,

    /// Override the API base URL derived from the org name
    #[arg(long, value_name = "URL", hide = true)]
    pub api_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_token_flags_conflict() {
        let err = Cli::try_parse_from([
            "chronomcp",
            "--api-token",
            "a",
            "--api-token-filename",
            "/tmp/token",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["chronomcp", "-v", "-c", "chronomcp.yaml", "--use-logscale"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.use_logscale);
        assert_eq!(cli.config_file, Some(PathBuf::from("chronomcp.yaml")));
    }

    #[test]
    fn test_api_url_is_hidden() {
        let help = Cli::command().render_long_help().to_string();
        assert!(!help.contains("--api-url"));
        assert!(help.contains("--org-name"));
    }
}
