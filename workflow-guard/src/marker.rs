//! Textual markers a workflow file is checked against.
//!
//! A marker is either a literal substring or a regular expression, paired with
//! the message reported when it is missing. Markers are declared as `static`
//! items; regexes are compiled on first use and shared afterwards.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// How a marker's pattern is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Plain substring search.
    Literal,
    /// Regular expression search (use `(?m)` for line anchors).
    Regex,
}

/// A required pattern and the description reported when it is absent.
#[derive(Debug)]
pub struct Marker {
    kind: MarkerKind,
    pattern: &'static str,
    description: &'static str,
    compiled: OnceLock<Regex>,
}

impl Marker {
    /// A marker satisfied when `pattern` occurs verbatim in the text.
    #[must_use]
    pub const fn literal(pattern: &'static str, description: &'static str) -> Self {
        Self {
            kind: MarkerKind::Literal,
            pattern,
            description,
            compiled: OnceLock::new(),
        }
    }

    /// A marker satisfied when the regular expression `pattern` matches somewhere in the text.
    #[must_use]
    pub const fn regex(pattern: &'static str, description: &'static str) -> Self {
        Self {
            kind: MarkerKind::Regex,
            pattern,
            description,
            compiled: OnceLock::new(),
        }
    }

    /// How the pattern is matched.
    #[must_use]
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Message reported when the marker is missing.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Whether the marker occurs in `text`.
    ///
    /// # Panics
    ///
    /// Panics on first use if a regex marker's pattern is not a valid regular
    /// expression. All markers are compile-time constants covered by tests.
    #[must_use]
    pub fn is_present(&self, text: &str) -> bool {
        match self.kind {
            MarkerKind::Literal => text.contains(self.pattern),
            MarkerKind::Regex => self.compiled().is_match(text),
        }
    }

    fn compiled(&self) -> &Regex {
        self.compiled
            .get_or_init(|| match Regex::new(self.pattern) {
                Ok(regex) => regex,
                Err(err) => panic!("Invalid marker regex {:?}: {err}", self.pattern),
            })
    }
}
