/// Core domain types for issue references, lookup keys, and fetched issues.
use std::fmt;
use std::ops::Range;

/// A span of text recognised as naming an issue or pull request.
/// Produced by the matcher and discarded once its line is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Issue number exactly as written, digits only. Never parsed as an integer
    /// so leading zeros survive into the rendered link.
    pub number: String,
    /// Owner captured from the reference itself, if the syntax carries one.
    pub owner: Option<String>,
    /// Repository captured from the reference itself, if the syntax carries one.
    pub repository: Option<String>,
    /// Byte range of the whole reference within the scanned text.
    pub span: Range<usize>,
}

impl Reference {
    /// The captured owner/repository pair, only when both are present.
    pub fn explicit_source(&self) -> Option<(&str, &str)> {
        return match (&self.owner, &self.repository) {
            (Some(owner), Some(repository)) => Some((owner.as_str(), repository.as_str())),
            _ => None,
        };
    }
}

/// Identity of one trackable item. Two references with equal keys name
/// the same issue and share a single remote lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    /// Issue number as written.
    pub number: String,
    /// Account or organisation owning the repository.
    pub owner: String,
    /// Repository name.
    pub repository: String,
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}/{}#{}", self.owner, self.repository, self.number);
    }
}

/// The fields of a tracker issue this tool consumes. Unknown fields in the
/// response body are ignored.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct IssueRecord {
    /// Canonical web URL of the issue or pull request.
    pub html_url: String,
    /// Issue title, inserted into the link text verbatim.
    pub title: String,
}

/// An API token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        return Self(token.into());
    }

    /// The raw token, for building the authorization header.
    pub fn expose(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str("Credential(<redacted>)");
    }
}

/// Fallback owner/repository applied to references that omit them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSource {
    /// Default owner.
    pub owner: String,
    /// Default repository.
    pub repository: String,
}

/// Caller-supplied settings, fixed for one substitution pass.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Token attached to outbound lookups, if any.
    pub credential: Option<Credential>,
    /// Owner/repository used for `#123` and `GH-123` style references.
    pub default_source: Option<DefaultSource>,
}

impl ResolutionContext {
    /// Work out which owner/repository a reference points at.
    /// Explicit captures win; otherwise the default source applies.
    /// Returns `None` when neither is available.
    pub fn lookup_key_for(&self, reference: &Reference) -> Option<LookupKey> {
        let (owner, repository) = match reference.explicit_source() {
            Some(pair) => pair,
            None => {
                let source = self.default_source.as_ref()?;
                (source.owner.as_str(), source.repository.as_str())
            },
        };

        if is_dot_segment(owner) || is_dot_segment(repository) {
            return None;
        }

        return Some(LookupKey {
            number: reference.number.clone(),
            owner: owner.to_string(),
            repository: repository.to_string(),
        });
    }
}

/// `.` and `..` would be collapsed by URL normalisation into a different endpoint.
pub fn is_dot_segment(name: &str) -> bool {
    return name == "." || name == "..";
}
