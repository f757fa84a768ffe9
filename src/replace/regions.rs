//! Protected Region Extraction
//!
//! Two kinds of delimited spans get special treatment in the pipeline:
//!
//! - `%...%` (up to 50 characters inside): **skip** regions, passed through
//!   untouched with the delimiters removed.
//! - `@...@` (up to 18 characters inside): **local** regions, rewritten with
//!   the local rule set only and then shielded from every later stage.
//!
//! # Example
//!
//! ```ignore
//! Input:     "Mi ŝatas%la kato%lan."
//! Span:      "%la kato%"  (inner "la kato")
//! Protected: "Mi ŝatasP1lan."
//! Restored:  "Mi ŝatasla katolan."
//! ```
//!
//! The scan is first-match and non-overlapping. Each region consumes one
//! placeholder from a finite pool, in scan order; regions past the end of the
//! pool are reported as dropped and stay unprotected.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static SKIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(.{1,50}?)%").expect("skip region pattern is valid"));
static LOCAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(.{1,18}?)@").expect("local region pattern is valid"));

/// Which delimiter pair a span was found with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Skip,
    Local,
}

impl RegionKind {
    pub fn delimiter(&self) -> char {
        match self {
            RegionKind::Skip => '%',
            RegionKind::Local => '@',
        }
    }

    /// Maximum number of characters between the delimiters
    pub fn max_inner_len(&self) -> usize {
        match self {
            RegionKind::Skip => 50,
            RegionKind::Local => 18,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            RegionKind::Skip => &SKIP_PATTERN,
            RegionKind::Local => &LOCAL_PATTERN,
        }
    }
}

/// A delimited span located in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSpan {
    pub kind: RegionKind,
    /// Full match including both delimiters
    pub matched: String,
    /// Content between the delimiters
    pub inner: String,
    /// Byte range of `matched` in the scanned text
    pub range: Range<usize>,
}

impl ProtectedSpan {
    /// The matched text with every delimiter character removed
    pub fn stripped(&self) -> String {
        strip_delimiters(&self.matched, self.kind)
    }
}

/// Remove every delimiter character of `kind` from `text`.
pub fn strip_delimiters(text: &str, kind: RegionKind) -> String {
    text.replace(kind.delimiter(), "")
}

/// Result of scanning for one kind of region against a placeholder pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionScan {
    /// Accepted spans, in scan order, at most `capacity` of them
    pub spans: Vec<ProtectedSpan>,
    /// Spans found but left unprotected because the pool was exhausted
    pub dropped: usize,
}

/// Locate every non-overlapping span of `kind`, left to right.
///
/// A candidate that touches any byte already claimed by an accepted span is
/// discarded, even on partial overlap.
pub fn find_regions(text: &str, kind: RegionKind) -> Vec<ProtectedSpan> {
    let mut spans = Vec::new();
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for captures in kind.pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let range = whole.range();
        let overlaps = claimed
            .iter()
            .any(|taken| range.start < taken.end && taken.start < range.end);
        if overlaps {
            continue;
        }
        claimed.push(range.clone());
        spans.push(ProtectedSpan {
            kind,
            matched: whole.as_str().to_string(),
            inner: inner.as_str().to_string(),
            range,
        });
    }

    spans
}

fn scan(text: &str, kind: RegionKind, capacity: usize) -> RegionScan {
    let mut spans = find_regions(text, kind);
    let dropped = spans.len().saturating_sub(capacity);
    spans.truncate(capacity);
    RegionScan { spans, dropped }
}

/// Find `%...%` regions, keeping at most `capacity` of them.
pub fn extract_skip_regions(text: &str, capacity: usize) -> RegionScan {
    scan(text, RegionKind::Skip, capacity)
}

/// Find `@...@` regions, keeping at most `capacity` of them.
pub fn extract_local_regions(text: &str, capacity: usize) -> RegionScan {
    scan(text, RegionKind::Local, capacity)
}
