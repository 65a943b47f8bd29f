//! Reference resolution and substitution.

use std::io::{BufRead, Write};

use crate::cache::CachedLookup;
use crate::diagnostics;
use crate::error::Error;
use crate::lookup::IssueLookup;
use crate::matcher::ReferenceMatcher;
use crate::types::{IssueRecord, Reference, ResolutionContext};

/// Rewrites issue references into Markdown links.
///
/// One expander is one substitution pass: the context is fixed and the lookup
/// cache lives as long as the expander, so feeding it every line of a
/// document looks each issue up once.
pub struct Expander<L> {
    /// Defaults and credential for this pass.
    context: ResolutionContext,
    /// Memoized remote lookups.
    lookups: CachedLookup<L>,
    /// Compiled reference pattern.
    matcher: ReferenceMatcher,
}

impl<L: IssueLookup> Expander<L> {
    /// Create an expander with an empty cache.
    pub fn new(context: ResolutionContext, lookup: L) -> Self {
        return Self {
            context,
            lookups: CachedLookup::new(lookup),
            matcher: ReferenceMatcher::new(),
        };
    }

    /// Replace every resolvable reference in `text`. Everything else,
    /// including unresolvable references, is copied byte for byte.
    ///
    /// Replacements go into a fresh buffer and are never scanned again, so a
    /// title that itself mentions an issue is inserted as-is.
    pub fn expand(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied_up_to = 0;

        for reference in self.matcher.find_references(text) {
            out.push_str(text.get(copied_up_to..reference.span.start).unwrap_or_default());
            match self.resolve(&reference) {
                Some(link) => out.push_str(&link),
                None => out.push_str(text.get(reference.span.clone()).unwrap_or_default()),
            }
            copied_up_to = reference.span.end;
        }

        out.push_str(text.get(copied_up_to..).unwrap_or_default());
        return out;
    }

    /// Filter `reader` into `writer` one line at a time. Line terminators,
    /// including a missing final one, are preserved; each line is flushed as
    /// soon as it is expanded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading, writing, or UTF-8 decoding fails.
    pub fn expand_reader<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<(), Error> {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let expanded = self.expand(&line);
            writer.write_all(expanded.as_bytes())?;
            writer.flush()?;
        }
        return Ok(());
    }

    /// Resolve one reference to its rendered link, or `None` to leave it alone.
    fn resolve(&mut self, reference: &Reference) -> Option<String> {
        let Some(key) = self.context.lookup_key_for(reference) else {
            tracing::trace!(number = %reference.number, "no owner/repository for reference");
            return None;
        };

        return match self.lookups.fetch(&key) {
            Ok(record) => Some(render_link(&record, &reference.number)),
            Err(err) => {
                diagnostics::report_lookup_failure(&err);
                None
            },
        };
    }

    /// The lookup behind the cache.
    #[cfg(test)]
    pub const fn lookup(&self) -> &L {
        return self.lookups.inner();
    }
}

/// Render `[title #number](html_url)`. The title is not escaped.
pub fn render_link(record: &IssueRecord, number: &str) -> String {
    return format!("[{} #{number}]({})", record.title, record.html_url);
}
