//! Remote issue lookup: the `IssueLookup` seam and its GitHub REST implementation.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;

use crate::error::Error;
use crate::types::{Credential, IssueRecord, LookupKey};

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Sent with every request; GitHub rejects requests without a user agent.
const USER_AGENT: &str = concat!("issue-expander/", env!("CARGO_PKG_VERSION"));

/// Why a single reference could not be resolved. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The tracker answered 2xx but the body was not an issue.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Parser error description.
        reason: String,
        /// Request URL.
        url: String,
    },

    /// The tracker says the issue does not exist (or is not visible to us).
    #[error("not found: {url}")]
    NotFound {
        /// Request URL.
        url: String,
    },

    /// The tracker refused the request because the quota is exhausted.
    #[error("rate limited: {url}")]
    RateLimited {
        /// Whether a credential was attached to the request.
        authenticated: bool,
        /// Request URL.
        url: String,
    },

    /// The request never got an HTTP response.
    #[error("transport error for {url}: {reason}")]
    Transport {
        /// Underlying error description.
        reason: String,
        /// Request URL.
        url: String,
    },

    /// The tracker rejected the supplied credential.
    #[error("unauthorized: {url}")]
    Unauthorized {
        /// Request URL.
        url: String,
    },

    /// Any other non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
    },
}

/// Fetches a single issue by key.
pub trait IssueLookup {
    /// Fetch the issue named by `key`. Exactly one attempt, no retries.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` describing why the issue could not be fetched.
    fn lookup(&self, key: &LookupKey) -> Result<IssueRecord, LookupError>;
}

/// Blocking client for `GET /repos/{owner}/{repo}/issues/{number}`.
pub struct GithubClient {
    /// API base URL without a trailing slash.
    api_url: String,
    /// Shared HTTP connection pool.
    client: reqwest::blocking::Client,
    /// Token attached as a bearer credential, if configured.
    credential: Option<Credential>,
}

impl GithubClient {
    /// Build a client against `api_url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidApiUrl` if `api_url` is not an http(s) URL,
    /// or `Error::HttpClient` if the TLS backend cannot be initialised.
    pub fn new(api_url: &str, credential: Option<Credential>) -> Result<Self, Error> {
        let trimmed = api_url.trim_end_matches('/');
        let has_host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(Error::InvalidApiUrl {
                reason: "expected an absolute http:// or https:// URL".to_string(),
                url: api_url.to_string(),
            });
        }

        let client = reqwest::blocking::Client::builder().user_agent(USER_AGENT).build()?;

        return Ok(Self {
            api_url: trimmed.to_string(),
            client,
            credential,
        });
    }

    /// The REST endpoint for one issue.
    pub fn issue_url(&self, key: &LookupKey) -> String {
        return format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_url, key.owner, key.repository, key.number
        );
    }
}

impl IssueLookup for GithubClient {
    fn lookup(&self, key: &LookupKey) -> Result<IssueRecord, LookupError> {
        let url = self.issue_url(key);
        tracing::debug!(%url, "requesting issue");

        let mut request = self.client.get(&url).header(ACCEPT, "application/vnd.github+json");
        if let Some(credential) = &self.credential {
            request = request.bearer_auth(credential.expose());
        }

        let response = request.send().map_err(|err| {
            return LookupError::Transport {
                reason: err.to_string(),
                url: url.clone(),
            };
        })?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "tracker responded");
        if let Some(err) = classify_failure_status(status, &url, self.credential.is_some()) {
            return Err(err);
        }

        let body = response.bytes().map_err(|err| {
            return LookupError::Transport {
                reason: err.to_string(),
                url: url.clone(),
            };
        })?;

        return parse_issue_body(&body, &url);
    }
}

/// Map a non-success status to its lookup error. Returns `None` for 2xx.
fn classify_failure_status(status: StatusCode, url: &str, authenticated: bool) -> Option<LookupError> {
    if status.is_success() {
        return None;
    }

    let url = url.to_string();
    let err = match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => LookupError::NotFound { url },
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => LookupError::RateLimited { authenticated, url },
        StatusCode::UNAUTHORIZED => LookupError::Unauthorized { url },
        other => LookupError::UnexpectedStatus {
            status: other.as_u16(),
            url,
        },
    };
    return Some(err);
}

/// Decode a successful response body.
///
/// # Errors
///
/// Returns `LookupError::MalformedResponse` if the body is not JSON or lacks
/// `title`/`html_url`.
fn parse_issue_body(body: &[u8], url: &str) -> Result<IssueRecord, LookupError> {
    return serde_json::from_slice(body).map_err(|err| {
        return LookupError::MalformedResponse {
            reason: err.to_string(),
            url: url.to_string(),
        };
    });
}
