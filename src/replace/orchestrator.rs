//! Substitution Orchestrator
//!
//! Runs the full single-pass pipeline over one piece of text:
//!
//! 1. Normalise spaces and letter notation
//! 2. Hide `%...%` regions behind skip placeholders, by position
//! 3. Rewrite the inside of `@...@` regions with the local rules, then hide
//!    them behind local placeholders, by position
//! 4. Forward pass of the global rules
//! 5. Two forward passes of the two-character-root rules, the second with
//!    `!`-wrapped tokens; both are resolved, second pass first
//! 6. Resolve the global placeholders
//! 7. Restore local regions as their rewritten content, delimiters removed
//! 8. Restore skip regions as their original content, delimiters removed
//! 9. HTML layout of newlines and runs of spaces, if the format is HTML
//!
//! Nothing here fails on text input. Running out of region placeholders is
//! reported through [`CapacityReport`] instead.

use std::ops::Range;

use tracing::{debug, warn};

use super::engine::{protect, protect_with, restore, restore_reversed};
use super::regions::{RegionKind, extract_local_regions, extract_skip_regions, strip_delimiters};
use super::rule::RuleBundle;
use crate::charset;
use crate::ruby::OutputFormat;

/// Wraps the second-pass root tokens so they cannot collide with the first pass
const SECOND_PASS_MARK: char = '!';

/// How many protected regions could not get a placeholder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityReport {
    pub skip_dropped: usize,
    pub local_dropped: usize,
}

impl CapacityReport {
    pub fn is_exhausted(&self) -> bool {
        self.skip_dropped > 0 || self.local_dropped > 0
    }

    pub fn merge(&mut self, other: CapacityReport) {
        self.skip_dropped += other.skip_dropped;
        self.local_dropped += other.local_dropped;
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.skip_dropped > 0 {
            warnings.push(format!(
                "{} %...% region(s) exceeded the skip placeholder pool and were not protected",
                self.skip_dropped
            ));
        }
        if self.local_dropped > 0 {
            warnings.push(format!(
                "{} @...@ region(s) exceeded the local placeholder pool and were not protected",
                self.local_dropped
            ));
        }
        warnings
    }
}

/// Output of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub capacity: CapacityReport,
}

impl Conversion {
    pub fn warnings(&self) -> Vec<String> {
        self.capacity.warnings()
    }
}

/// A region hidden behind a placeholder, with what it restores to
#[derive(Debug, Clone)]
struct Shielded {
    range: Range<usize>,
    placeholder: String,
    restored: String,
}

/// Replace exactly the accepted spans, by position. Spans are in scan order
/// and never overlap, so a copy of an accepted span elsewhere in the text is
/// left alone.
fn shield(text: &str, regions: &[Shielded]) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for region in regions {
        result.push_str(&text[last..region.range.start]);
        result.push_str(&region.placeholder);
        last = region.range.end;
    }
    result.push_str(&text[last..]);
    result
}

fn unshield(text: &str, regions: &[Shielded]) -> String {
    regions.iter().fold(text.to_string(), |acc, region| {
        acc.replace(&region.placeholder, &region.restored)
    })
}

/// Lay out plain text for HTML: `<br>` line breaks and non-breaking runs of spaces.
///
/// Triples are replaced before pairs; in the other order no triple would survive.
pub fn html_layout(text: &str) -> String {
    text.replace('\n', "<br>\n")
        .replace("   ", "&nbsp;&nbsp;&nbsp;")
        .replace("  ", "&nbsp;&nbsp;")
}

/// Run every stage of the pipeline on `text`.
pub fn run_single_pass(text: &str, bundle: &RuleBundle, format: OutputFormat) -> Conversion {
    let mut capacity = CapacityReport::default();

    let text = charset::normalize(text);

    let skip_scan = extract_skip_regions(&text, bundle.skip_placeholders.len());
    capacity.skip_dropped = skip_scan.dropped;
    let skip_regions = skip_scan
        .spans
        .iter()
        .zip(&bundle.skip_placeholders)
        .map(|(span, placeholder)| Shielded {
            range: span.range.clone(),
            placeholder: placeholder.clone(),
            restored: span.stripped(),
        })
        .collect::<Vec<_>>();
    let text = shield(&text, &skip_regions);

    let local_scan = extract_local_regions(&text, bundle.local_placeholders.len());
    capacity.local_dropped = local_scan.dropped;
    let local_regions = local_scan
        .spans
        .iter()
        .zip(&bundle.local_placeholders)
        .map(|(span, placeholder)| {
            let (protected, map) = protect(&span.inner, &bundle.local);
            Shielded {
                range: span.range.clone(),
                placeholder: placeholder.clone(),
                restored: strip_delimiters(&restore(&protected, &map), RegionKind::Local),
            }
        })
        .collect::<Vec<_>>();
    let text = shield(&text, &local_regions);

    debug!(
        skip = skip_regions.len(),
        local = local_regions.len(),
        "Shielded protected regions"
    );
    if capacity.is_exhausted() {
        for warning in capacity.warnings() {
            warn!("{}", warning);
        }
    }

    let (text, global_map) = protect(&text, &bundle.global);
    let (text, root_map) = protect(&text, &bundle.two_char);
    let (text, root_map_second) = protect_with(&text, &bundle.two_char, |placeholder| {
        format!("{SECOND_PASS_MARK}{placeholder}{SECOND_PASS_MARK}")
    });
    debug!(
        global = global_map.len(),
        roots = root_map.len(),
        roots_second = root_map_second.len(),
        "Forward passes complete"
    );

    let text = restore_reversed(&text, &root_map_second);
    let text = restore_reversed(&text, &root_map);
    let text = restore(&text, &global_map);

    let text = unshield(&text, &local_regions);
    let text = unshield(&text, &skip_regions);

    let text = if format.is_html() {
        html_layout(&text)
    } else {
        text
    };

    Conversion { text, capacity }
}
