mod cache;
mod config;
mod diagnostics;
mod error;
mod expander;
mod lookup;
mod matcher;
#[cfg(test)]
mod testing;
mod types;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::expander::Expander;
use crate::lookup::GithubClient;

/// Environment variable holding a `tracing` filter, e.g. `issue_expander=trace`.
const LOG_ENV: &str = "ISSUE_EXPANDER_LOG";

#[derive(Parser)]
#[command(
    name = "issue-expander",
    version,
    about = "Turn references like \"foo/bar#123\" into Markdown links",
    long_about = "\
Turn references like \"foo/bar#123\" into Markdown links, like

    \"[Prevent side fumbling #123](https://github.com/foo/bar/pull/123)\"

issue-expander works for references to issues and to pull requests.

References are only expanded if they are found at GitHub. To expand references from private \
repositories, you'll need to pass your GitHub token. This can be done via environment \
variables or via command line options.

To interpret references like `#1138` as `adamwolf/issue-expander#1138`, specify defaults \
using `--default-source`."
)]
struct Cli {
    /// Input file, or `-` to read from stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Use USER/REPO when not specified in the issue reference (example: "adamwolf/issue-expander")
    #[arg(long, value_name = "USER/REPO")]
    default_source: Option<String>,

    /// GitHub token for looking up issue references. You may want to use the
    /// environment variable instead.
    #[arg(short = 'p', long, env = "ISSUE_EXPANDER_GITHUB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// REST API root, for GitHub Enterprise [default: https://api.github.com]
    #[arg(long, env = "ISSUE_EXPANDER_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Log lookups and cache hits to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

/// Send `tracing` output to stderr. `ISSUE_EXPANDER_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "warn,issue_expander=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve settings, then stream the input through the expander to stdout.
///
/// # Errors
///
/// Returns configuration errors before any input is read, and I/O errors
/// while filtering. Individual references that fail to resolve are not errors.
fn run(cli: Cli) -> Result<(), error::Error> {
    let settings = Config::load(Path::new("."))?.resolve(cli.default_source, cli.api_url, cli.github_token)?;
    tracing::debug!(api_url = %settings.api_url, default_source = ?settings.context.default_source, "settings resolved");

    let client = GithubClient::new(&settings.api_url, settings.context.credential.clone())?;
    let mut expander = Expander::new(settings.context, client);
    let stdout = io::stdout().lock();

    if cli.input == Path::new("-") {
        return expander.expand_reader(io::stdin().lock(), stdout);
    }

    let file = File::open(&cli.input).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            return error::Error::InputNotFound { path: cli.input.clone() };
        }
        return error::Error::Io(e);
    })?;
    return expander.expand_reader(BufReader::new(file), stdout);
}
