use std::path::Path;

use crate::error::Error;
use crate::lookup::DEFAULT_API_URL;
use crate::types::{Credential, DefaultSource, ResolutionContext, is_dot_segment};

/// Name of the optional project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".issue-expander.toml";

/// Project configuration loaded from `.issue-expander.toml`.
/// Every field is optional; command-line flags and environment variables win.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// REST API root, for GitHub Enterprise installations.
    api_url: Option<String>,
    /// `owner/repository` used when a reference omits them.
    default_source: Option<String>,
}

/// Raw TOML structure for `.issue-expander.toml`.
/// Tokens are deliberately not accepted here; they belong in the environment.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct IssueExpanderTomlConfig {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    default_source: Option<String>,
}

/// Everything the run needs, after merging flags, environment, and config file.
#[derive(Debug)]
pub struct Settings {
    /// REST API root to send lookups to.
    pub api_url: String,
    /// Defaults and credential for the substitution pass.
    pub context: ResolutionContext,
}

impl Config {
    /// Load config from `.issue-expander.toml` in the given root directory.
    /// Returns an empty config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config file the
    /// user wrote is never silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: IssueExpanderTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            api_url: raw.api_url,
            default_source: raw.default_source,
        })
    }

    /// Merge with values from the command line (which clap has already merged
    /// with the environment). Explicit values override the config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDefaultSource` if the effective default source is
    /// not `owner/repository`.
    pub fn resolve(
        self,
        default_source: Option<String>,
        api_url: Option<String>,
        token: Option<String>,
    ) -> Result<Settings, Error> {
        let default_source = default_source
            .or(self.default_source)
            .map(|value| parse_default_source(&value))
            .transpose()?;

        let api_url = api_url
            .or(self.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // An exported-but-empty token variable means "no token".
        let credential = token.filter(|t| !t.trim().is_empty()).map(Credential::new);

        Ok(Settings {
            api_url,
            context: ResolutionContext {
                credential,
                default_source,
            },
        })
    }
}

/// Parse `owner/repository`. Both halves use the same character set as
/// references (`[A-Za-z0-9.-]+`), so a default can name anything a reference can.
///
/// # Errors
///
/// Returns `Error::InvalidDefaultSource` for anything else.
pub fn parse_default_source(value: &str) -> Result<DefaultSource, Error> {
    let invalid = || Error::InvalidDefaultSource {
        value: value.to_string(),
    };

    let (owner, repository) = value.split_once('/').ok_or_else(invalid)?;
    if !is_source_name(owner) || !is_source_name(repository) {
        return Err(invalid());
    }

    Ok(DefaultSource {
        owner: owner.to_string(),
        repository: repository.to_string(),
    })
}

/// Non-empty, not `.` or `..`, and only ASCII alphanumerics, `.` and `-`.
fn is_source_name(s: &str) -> bool {
    !s.is_empty() && !is_dot_segment(s) && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
