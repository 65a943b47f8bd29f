//! In-memory `IssueLookup` for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::lookup::{IssueLookup, LookupError};
use crate::types::{IssueRecord, LookupKey};

/// Answers lookups from a fixed table keyed by `owner/repo#number`.
/// Unknown keys are `NotFound`. Every call is counted.
pub struct FakeLookup {
    /// Number of `lookup` calls made.
    calls: Cell<usize>,
    /// Keys requested, in order.
    requested: RefCell<Vec<String>>,
    /// Canned answers.
    responses: HashMap<String, Result<IssueRecord, LookupError>>,
}

impl FakeLookup {
    /// An empty table: every lookup is `NotFound`.
    pub fn new() -> Self {
        return Self {
            calls: Cell::new(0),
            requested: RefCell::new(Vec::new()),
            responses: HashMap::new(),
        };
    }

    /// Answer `key` with an issue.
    pub fn with_issue(mut self, key: &str, title: &str, html_url: &str) -> Self {
        let record = IssueRecord {
            html_url: html_url.to_string(),
            title: title.to_string(),
        };
        self.responses.insert(key.to_string(), Ok(record));
        return self;
    }

    /// Answer `key` with an error.
    pub fn with_error(mut self, key: &str, err: LookupError) -> Self {
        self.responses.insert(key.to_string(), Err(err));
        return self;
    }

    /// How many lookups were made.
    pub fn calls(&self) -> usize {
        return self.calls.get();
    }

    /// Keys looked up, in call order.
    pub fn requested(&self) -> Vec<String> {
        return self.requested.borrow().clone();
    }
}

impl IssueLookup for FakeLookup {
    fn lookup(&self, key: &LookupKey) -> Result<IssueRecord, LookupError> {
        self.calls.set(self.calls.get().saturating_add(1));
        let name = key.to_string();
        self.requested.borrow_mut().push(name.clone());

        return match self.responses.get(&name) {
            Some(answer) => answer.clone(),
            None => Err(LookupError::NotFound {
                url: format!("fake://{name}"),
            }),
        };
    }
}
