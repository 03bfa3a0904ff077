//! Upstream settings resolved from flags, environment and config

use std::path::Path;

use chronomcp_client::{logscale_base_url, org_base_url, ApiClientConfig, LogscaleConfig};
use chronomcp_config::constants::{ENV_CHRONOSPHERE_API_TOKEN, ENV_LOGSCALE_API_TOKEN};
use chronomcp_config::Config;
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("--api-token and --api-token-filename are mutually exclusive")]
    ConflictingTokenSources,

    #[error("failed to read API token file {path}: {reason}")]
    TokenFile { path: String, reason: String },

    #[error("API token file {0} is empty")]
    EmptyTokenFile(String),

    #[error(
        "an API token is required for the stdio transport: pass --api-token, \
         --api-token-filename or set CHRONOSPHERE_API_TOKEN"
    )]
    MissingToken,

    #[error("--org-name (or CHRONOSPHERE_ORG_NAME) or --api-url is required")]
    MissingOrg,

    #[error("--use-logscale requires --org-name")]
    LogscaleWithoutOrg,

    #[error("--use-logscale requires LOGSCALE_API_TOKEN")]
    MissingLogscaleToken,
}

/// Everything needed to build the upstream client.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub logscale: Option<(String, String)>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("logscale", &self.logscale.as_ref().map(|(url, _)| url))
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_token_file(path: &Path) -> Result<String, SettingsError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::TokenFile {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    non_empty(Some(raw)).ok_or(SettingsError::EmptyTokenFile(display))
}

/// Static token: `--api-token`, then `--api-token-filename`, then the
/// environment.
pub fn resolve_api_token<E>(cli: &Cli, env: E) -> Result<Option<String>, SettingsError>
where
    E: Fn(&str) -> Option<String>,
{
    match (&cli.api_token, &cli.api_token_filename) {
        (Some(_), Some(_)) => Err(SettingsError::ConflictingTokenSources),
        (Some(token), None) => Ok(non_empty(Some(token.clone()))),
        (None, Some(path)) => read_token_file(path).map(Some),
        (None, None) => Ok(non_empty(env(ENV_CHRONOSPHERE_API_TOKEN))),
    }
}

impl Settings {
    pub fn resolve<E>(cli: &Cli, config: &Config, env: E) -> Result<Self, SettingsError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let api_token = resolve_api_token(cli, &env)?;
        // Over HTTP each request may forward its own token.
        if api_token.is_none() && config.server.transport.stdio.enabled {
            return Err(SettingsError::MissingToken);
        }

        let org = non_empty(cli.org_name.clone());
        let base_url = match (non_empty(cli.api_url.clone()), &org) {
            (Some(url), _) => url,
            (None, Some(org)) => org_base_url(org),
            (None, None) => return Err(SettingsError::MissingOrg),
        };

        let logscale = if cli.use_logscale {
            let org = org.as_ref().ok_or(SettingsError::LogscaleWithoutOrg)?;
            let token = non_empty(env(ENV_LOGSCALE_API_TOKEN)).ok_or(SettingsError::MissingLogscaleToken)?;
            Some((logscale_base_url(org), token))
        } else {
            None
        };

        Ok(Self {
            base_url,
            api_token,
            logscale,
        })
    }

    pub fn client_config(&self, config: &Config) -> ApiClientConfig {
        ApiClientConfig::new(self.base_url.clone())
            .static_token(self.api_token.clone())
            .logscale(self.logscale.as_ref().map(|(base_url, api_token)| LogscaleConfig {
                base_url: base_url.clone(),
                api_token: api_token.clone(),
            }))
            .timeout(config.upstream.timeout())
            .user_agent(config.upstream.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn with_org(org: Option<&str>) -> Cli {
        Cli {
            org_name: org.map(String::from),
            ..Cli::default()
        }
    }

    fn sse_only() -> Config {
        let mut config = Config::default();
        config.server.transport.stdio.enabled = false;
        config.server.transport.sse.enabled = true;
        config
    }

    #[test]
    fn test_flag_beats_environment() {
        let cli = Cli {
            api_token: Some("flag".into()),
            ..with_org(Some("acme"))
        };
        let token = resolve_api_token(&cli, env(&[("CHRONOSPHERE_API_TOKEN", "env")])).unwrap();
        assert_eq!(token.as_deref(), Some("flag"));
    }

    #[test]
    fn test_token_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token  ").unwrap();
        let cli = Cli {
            api_token_filename: Some(file.path().to_path_buf()),
            ..Cli::default()
        };
        let token = resolve_api_token(&cli, env(&[("CHRONOSPHERE_API_TOKEN", "env")])).unwrap();
        assert_eq!(token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_token_file_errors() {
        let empty = tempfile::NamedTempFile::new().unwrap();
        let cli = Cli {
            api_token_filename: Some(empty.path().to_path_buf()),
            ..Cli::default()
        };
        assert!(matches!(
            resolve_api_token(&cli, env(&[])),
            Err(SettingsError::EmptyTokenFile(_))
        ));

        let cli = Cli {
            api_token_filename: Some("/nonexistent/chronomcp/token".into()),
            ..Cli::default()
        };
        assert!(matches!(
            resolve_api_token(&cli, env(&[])),
            Err(SettingsError::TokenFile { .. })
        ));
    }

    #[test]
    fn test_both_token_sources_conflict() {
        let cli = Cli {
            api_token: Some("a".into()),
            api_token_filename: Some("/tmp/b".into()),
            ..Cli::default()
        };
        assert_eq!(
            resolve_api_token(&cli, env(&[])),
            Err(SettingsError::ConflictingTokenSources)
        );
    }

    #[test]
    fn test_missing_token_only_fatal_for_stdio() {
        let err = Settings::resolve(&with_org(Some("acme")), &Config::default(), env(&[])).unwrap_err();
        assert_eq!(err, SettingsError::MissingToken);

        let settings = Settings::resolve(&with_org(Some("acme")), &sse_only(), env(&[])).unwrap();
        assert_eq!(settings.api_token, None);
        assert_eq!(settings.base_url, "https://acme.chronosphere.io");
    }

    #[test]
    fn test_api_url_overrides_org() {
        let cli = Cli {
            api_url: Some("http://127.0.0.1:9000".into()),
            ..with_org(Some("acme"))
        };
        let settings = Settings::resolve(&cli, &sse_only(), env(&[])).unwrap();
        assert_eq!(settings.base_url, "http://127.0.0.1:9000");

        let err = Settings::resolve(&with_org(None), &sse_only(), env(&[])).unwrap_err();
        assert_eq!(err, SettingsError::MissingOrg);
    }

    #[test]
    fn test_logscale_needs_org_and_token() {
        let cli = Cli {
            use_logscale: true,
            ..with_org(Some("acme"))
        };
        let err = Settings::resolve(&cli, &sse_only(), env(&[])).unwrap_err();
        assert_eq!(err, SettingsError::MissingLogscaleToken);

        let settings =
            Settings::resolve(&cli, &sse_only(), env(&[("LOGSCALE_API_TOKEN", "ls")])).unwrap();
        assert_eq!(
            settings.logscale,
            Some(("https://acme.logs.chronosphere.io".to_string(), "ls".to_string()))
        );

        let cli = Cli {
            use_logscale: true,
            api_url: Some("http://127.0.0.1:9000".into()),
            ..Cli::default()
        };
        let err = Settings::resolve(&cli, &sse_only(), env(&[("LOGSCALE_API_TOKEN", "ls")])).unwrap_err();
        assert_eq!(err, SettingsError::LogscaleWithoutOrg);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let settings = Settings {
            base_url: "https://acme.chronosphere.io".into(),
            api_token: Some("secret".into()),
            logscale: Some(("https://acme.logs.chronosphere.io".into(), "ls-secret".into())),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret"));
    }
}
