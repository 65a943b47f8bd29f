/// Crate-level error types for issue-expander diagnostics.
use std::path::PathBuf;

/// Run-level failures. Each one stops the run with exit status 1; failures
/// resolving a single reference are `LookupError`s instead and never end up here.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("http client: {0}")]
    HttpClient(
        /// The wrapped reqwest error.
        #[from]
        reqwest::Error,
    ),

    /// The configured API base URL is not an absolute http(s) URL.
    #[error("invalid api url `{url}`: {reason}")]
    InvalidApiUrl {
        /// Description of what is wrong with the URL.
        reason: String,
        /// The URL as configured.
        url: String,
    },

    /// The default source is not of the form `owner/repository`.
    #[error("default source must be in the format 'group/repository', got `{value}`")]
    InvalidDefaultSource {
        /// The rejected value.
        value: String,
    },

    /// The input file does not exist on disk.
    #[error("input not found: {}", path.display())]
    InputNotFound {
        /// Path to the missing input.
        path: PathBuf,
    },

    /// Underlying I/O error reading input or writing output.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
