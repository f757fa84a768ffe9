//! Line-chunked parallel execution of the pipeline
//!
//! The input is split into lines (newlines kept), the lines are grouped into
//! `workers` contiguous chunks and each chunk runs the whole single-pass
//! pipeline on a blocking worker thread. Outputs are joined in chunk order,
//! whichever worker finishes first.
//!
//! Every chunk starts from the beginning of both placeholder pools, so pool
//! capacity applies per chunk rather than to the whole text. Text that
//! straddles a chunk boundary is never seen as one unit: a rule whose `old`
//! contains a newline misses occurrences split across two chunks. Protected
//! regions never cross a newline and are not affected.

use std::sync::Arc;

use tracing::debug;

use super::error::{ConvertError, ConvertResult};
use super::orchestrator::{CapacityReport, Conversion, run_single_pass};
use super::rule::RuleBundle;
use crate::ruby::OutputFormat;

/// Split `text` into `workers` contiguous groups of whole lines.
///
/// Each group gets `lines / workers` lines (at least one), the last group
/// takes the remainder. Trailing groups may be empty when there are fewer
/// lines than workers.
pub fn split_into_chunks(text: &str, workers: usize) -> Vec<String> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let workers = workers.max(1);
    let per_chunk = (lines.len() / workers).max(1);

    (0..workers)
        .map(|i| {
            let start = (i * per_chunk).min(lines.len());
            let end = if i + 1 == workers {
                lines.len()
            } else {
                ((i + 1) * per_chunk).min(lines.len())
            };
            lines[start..end.max(start)].concat()
        })
        .collect()
}

/// Run the pipeline over `text` using up to `workers` blocking tasks.
///
/// Falls back to [`run_single_pass`] for one worker or single-line input.
pub async fn run_parallel(
    text: &str,
    workers: usize,
    bundle: Arc<RuleBundle>,
    format: OutputFormat,
) -> ConvertResult<Conversion> {
    let line_count = text.split_inclusive('\n').count();
    if workers <= 1 || line_count <= 1 {
        return Ok(run_single_pass(text, &bundle, format));
    }

    let chunks = split_into_chunks(text, workers);
    debug!(workers, lines = line_count, "Dispatching chunks");

    let handles: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            let bundle = Arc::clone(&bundle);
            tokio::task::spawn_blocking(move || run_single_pass(&chunk, &bundle, format))
        })
        .collect();

    let mut text = String::new();
    let mut capacity = CapacityReport::default();
    for (index, handle) in handles.into_iter().enumerate() {
        let part = handle
            .await
            .map_err(|e| ConvertError::Worker(format!("chunk {}: {}", index, e)))?;
        text.push_str(&part.text);
        capacity.merge(part.capacity);
    }

    Ok(Conversion { text, capacity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replace::rule::SubstitutionRule;

    fn bundle() -> Arc<RuleBundle> {
        Arc::new(
            RuleBundle::new()
                .with_global(vec![SubstitutionRule::new("kat", "猫", "$G1$")])
                .with_two_char(vec![SubstitutionRule::new("la", "LA", "$R1$")])
                .with_skip_placeholders(vec!["$S1$".to_string()]),
        )
    }

    #[test]
    fn test_split_even() {
        let chunks = split_into_chunks("a\nb\nc\nd\n", 2);
        assert_eq!(chunks, vec!["a\nb\n", "c\nd\n"]);
    }

    #[test]
    fn test_split_remainder_goes_to_last() {
        let chunks = split_into_chunks("a\nb\nc\nd\ne", 2);
        assert_eq!(chunks, vec!["a\nb\n", "c\nd\ne"]);
    }

    #[test]
    fn test_split_more_workers_than_lines() {
        let chunks = split_into_chunks("a\nb", 4);
        assert_eq!(chunks.concat(), "a\nb");
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0], "a\n");
        assert_eq!(chunks[1], "b");
    }

    #[test]
    fn test_split_preserves_text() {
        let text = "unu\ndu\ntri\nkvar\nkvin\nses\nsep";
        for workers in 1..=8 {
            assert_eq!(split_into_chunks(text, workers).concat(), text);
        }
    }

    #[tokio::test]
    async fn test_parallel_matches_single_pass() {
        let text = "la kato\n%la kato%\nkatido la\nla lala\n";
        let single = run_single_pass(text, &bundle(), OutputFormat::ReplacementOnly);
        let parallel = run_parallel(text, 3, bundle(), OutputFormat::ReplacementOnly)
            .await
            .unwrap();
        assert_eq!(parallel.text, single.text);
    }

    #[tokio::test]
    async fn test_parallel_pool_restarts_per_chunk() {
        // One skip placeholder is enough per chunk, not for the whole text.
        let text = "%kato%\n%katido%\n";
        let single = run_single_pass(text, &bundle(), OutputFormat::ReplacementOnly);
        assert_eq!(single.capacity.skip_dropped, 1);

        let parallel = run_parallel(text, 2, bundle(), OutputFormat::ReplacementOnly)
            .await
            .unwrap();
        assert_eq!(parallel.text, "kato\nkatido\n");
        assert_eq!(parallel.capacity.skip_dropped, 0);
    }

    #[tokio::test]
    async fn test_parallel_single_line_falls_back() {
        let parallel = run_parallel("la kato", 4, bundle(), OutputFormat::ReplacementOnly)
            .await
            .unwrap();
        assert_eq!(parallel.text, "LA 猫o");
    }

    #[tokio::test]
    async fn test_rule_across_chunk_boundary_is_missed() {
        let bundle = Arc::new(
            RuleBundle::new().with_global(vec![SubstitutionRule::new("a\nb", "AB", "$G1$")]),
        );
        let single = run_single_pass("a\nb\n", &bundle, OutputFormat::ReplacementOnly);
        assert_eq!(single.text, "AB\n");

        let parallel = run_parallel("a\nb\n", 2, bundle, OutputFormat::ReplacementOnly)
            .await
            .unwrap();
        assert_eq!(parallel.text, "a\nb\n");
    }

    #[tokio::test]
    async fn test_parallel_html_layout_per_chunk() {
        let parallel = run_parallel("a\nb\n", 2, bundle(), OutputFormat::HtmlRuby)
            .await
            .unwrap();
        assert_eq!(parallel.text, "a<br>\nb<br>\n");
    }
}
