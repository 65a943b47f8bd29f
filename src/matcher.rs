//! Recognition of issue references in plaintext.
//!
//! All four reference syntaxes live in one alternation, tried in this order
//! at any given start position:
//!
//! 1. `https://github.com/owner/repo/issues/123` (or `/pull/123`)
//! 2. `owner/repo#123`
//! 3. `#123`
//! 4. `GH-123`
//!
//! The scan is leftmost-first, so a more specific form that starts earlier
//! (`foo/bar#100`) always swallows the less specific one inside it (`#100`).
//!
//! Existing inline links (`[text](url)`) are stepped over whole, which keeps a
//! second run over already expanded output from touching the links it made.

use regex::{Captures, Regex};

use crate::types::Reference;

/// Combined reference pattern. Named groups tell the families apart; the
/// unnamed first branch matches an inline link to be copied verbatim. Link
/// text may hold one level of balanced brackets, as in `[[WIP] Fix it #3](url)`.
const REFERENCE_PATTERN: &str = concat!(
    r"\[(?:[^\[\]\n]|\[[^\[\]\n]*\])*\]\([^()\s]*\)",
    r"|",
    r"https://github\.com/(?P<url_owner>[A-Za-z0-9.-]+)/(?P<url_repository>[A-Za-z0-9.-]+)/(?:issues|pull)/(?P<url_number>[0-9]+)",
    r"|(?P<owner>[A-Za-z0-9.-]+)/(?P<repository>[A-Za-z0-9.-]+)#(?P<slug_number>[0-9]+)",
    r"|#(?P<bare_number>[0-9]+)",
    r"|\bGH-(?P<gh_number>[0-9]+)",
);

/// Scans text for issue references.
pub struct ReferenceMatcher {
    /// Compiled form of `REFERENCE_PATTERN`.
    pattern: Regex,
}

impl ReferenceMatcher {
    /// Compile the reference pattern.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded reference regex is invalid (compile-time invariant).
    #[allow(clippy::expect_used, reason = "constant pattern, covered by tests")]
    pub fn new() -> Self {
        return Self {
            pattern: Regex::new(REFERENCE_PATTERN).expect("valid regex"),
        };
    }

    /// Find every reference in `text`, left to right, without overlaps.
    pub fn find_references(&self, text: &str) -> Vec<Reference> {
        let mut references = Vec::new();
        let mut cursor = 0;

        while let Some(cap) = self.pattern.captures_at(text, cursor) {
            let Some(whole) = cap.get(0) else { break };

            match classify_capture(&cap, text) {
                Scanned::Link => cursor = whole.end(),
                Scanned::Reference(reference) => {
                    cursor = whole.end();
                    references.push(reference);
                },
                // Rejected candidates always start with an ASCII `#`.
                Scanned::Rejected => cursor = whole.start().saturating_add(1),
            }

            if cursor >= text.len() {
                break;
            }
        }

        return references;
    }
}

impl Default for ReferenceMatcher {
    fn default() -> Self {
        return Self::new();
    }
}

/// What one capture of the combined pattern turned out to be.
enum Scanned {
    /// An existing inline link, left alone.
    Link,
    /// An issue reference.
    Reference(Reference),
    /// A `#123` candidate whose neighbours disqualify it.
    Rejected,
}

/// Sort a capture of the combined pattern into link, reference, or reject.
fn classify_capture(cap: &Captures<'_>, text: &str) -> Scanned {
    let Some(whole) = cap.get(0) else {
        return Scanned::Rejected;
    };
    if whole.as_str().starts_with('[') {
        return Scanned::Link;
    }

    return match parse_reference_capture(cap, text) {
        Some(reference) => Scanned::Reference(reference),
        None => Scanned::Rejected,
    };
}

/// Turn a capture of one of the reference branches into a reference.
/// Returns `None` for a `#123` candidate whose neighbours disqualify it.
fn parse_reference_capture(cap: &Captures<'_>, text: &str) -> Option<Reference> {
    let whole = cap.get(0)?;
    let span = whole.range();

    if let Some(number) = cap.name("url_number") {
        return Some(Reference {
            number: number.as_str().to_string(),
            owner: cap.name("url_owner").map(|m| m.as_str().to_string()),
            repository: cap.name("url_repository").map(|m| m.as_str().to_string()),
            span,
        });
    }

    if let Some(number) = cap.name("slug_number") {
        return Some(Reference {
            number: number.as_str().to_string(),
            owner: cap.name("owner").map(|m| m.as_str().to_string()),
            repository: cap.name("repository").map(|m| m.as_str().to_string()),
            span,
        });
    }

    if let Some(number) = cap.name("bare_number") {
        if !is_standalone_number(text, whole.start(), whole.end()) {
            return None;
        }
        return Some(Reference {
            number: number.as_str().to_string(),
            owner: None,
            repository: None,
            span,
        });
    }

    let number = cap.name("gh_number")?;
    return Some(Reference {
        number: number.as_str().to_string(),
        owner: None,
        repository: None,
        span,
    });
}

/// A `#123` only counts when it is not glued to a word, another `#`, or a
/// hyphen before it, nor to a word or `#` after it.
fn is_standalone_number(text: &str, start: usize, end: usize) -> bool {
    let before = text.get(..start).and_then(|s| s.chars().next_back());
    let after = text.get(end..).and_then(|s| s.chars().next());

    let blocked_before = before.is_some_and(|c| c.is_ascii_alphanumeric() || c == '#' || c == '-');
    let blocked_after = after.is_some_and(|c| c.is_ascii_alphanumeric() || c == '#');

    return !blocked_before && !blocked_after;
}
