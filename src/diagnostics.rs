use crate::error::Error;
use crate::lookup::LookupError;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render a run-level error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::InvalidDefaultSource { value } => render_invalid_default_source(value),
        Error::InvalidApiUrl { url, reason } => render_invalid_api_url(url, reason),
        Error::InputNotFound { path } => format!("\
# Error: Input Not Found

`{}` does not exist.

## Fix

Pass an existing file, or `-` to read from stdin.
", path.display()),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::HttpClient(e) => format!("\
# Error: HTTP Client

Could not initialise the HTTP client: {e}
"),
        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.issue-expander.toml` is not valid:

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_invalid_default_source(value: &str) -> String {
    format!("\
# Error: Invalid Default Source

Error: default source must be in the format 'group/repository', got `{value}`.

## Fix

    issue-expander --default-source adamwolf/issue-expander FILE
")
}

fn render_invalid_api_url(url: &str, reason: &str) -> String {
    format!("\
# Error: Invalid API URL

`{url}`: {reason}.

## Fix

Use the REST root of your tracker, for example:

    issue-expander --api-url https://api.github.com FILE
")
}

/// One-line operator message for a reference that could not be resolved.
/// Returns `None` for failures that are expected and stay silent.
pub fn render_lookup_failure(e: &LookupError) -> Option<String> {
    match e {
        LookupError::NotFound { .. } => None,
        LookupError::RateLimited { authenticated, .. } => {
            let mut message = "Unable to look up issue due to rate limit error.".to_string();
            if !authenticated {
                message.push_str(" Try providing a token with --github-token.");
            }
            Some(message)
        },
        LookupError::MalformedResponse { url, .. } => Some(format!("Unable to parse response from {url}")),
        LookupError::Unauthorized { url } => Some(format!("Unable to look up {url}: the supplied token was rejected.")),
        LookupError::Transport { url, reason } => Some(format!("Unable to reach {url}: {reason}")),
        LookupError::UnexpectedStatus { status, url } => Some(format!("Unable to look up {url}: tracker answered {status}")),
    }
}

/// Print a lookup failure to stderr if it deserves the operator's attention.
pub fn report_lookup_failure(e: &LookupError) {
    tracing::debug!(error = %e, "lookup failed");
    if let Some(message) = render_lookup_failure(e) {
        eprintln!("{message}");
    }
}
