/// Placeholder-protected substitution pipeline
///
/// This module rewrites Esperanto text root by root while keeping parts of the
/// text out of reach of the rules. It is built from a handful of pieces:
///
/// 1. **Rules** - `(old, new, placeholder)` triples grouped in a [`RuleBundle`]
/// 2. **Engine** - the forward (old → placeholder) and backward
///    (placeholder → new) passes every stage is made of
/// 3. **Regions** - `%...%` spans kept verbatim and `@...@` spans rewritten
///    with local rules only
/// 4. **Orchestrator** - sequences normalisation, protection, the global and
///    two-character-root passes, and restoration
/// 5. **Parallel** - the same pipeline over line chunks on worker threads
///
/// # Example
///
/// ```ignore
/// use esperanto_ruby::replace::{RuleBundle, SubstitutionRule, run_single_pass};
/// use esperanto_ruby::ruby::OutputFormat;
///
/// let bundle = RuleBundle::new()
///     .with_global(vec![SubstitutionRule::new("kat", "猫", "$00001$")])
///     .with_skip_placeholders(vec!["%1854%".to_string()]);
///
/// let result = run_single_pass("la kato, %la kato%", &bundle, OutputFormat::ReplacementOnly);
/// assert_eq!(result.text, "la 猫o, la kato");
/// ```
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod parallel;
pub mod regions;
pub mod rule;


pub use engine::{PlaceholderMap, apply, protect, restore};
pub use error::{ConvertError, ConvertResult};
pub use orchestrator::{CapacityReport, Conversion, html_layout, run_single_pass};
pub use parallel::{run_parallel, split_into_chunks};
pub use regions::{
    ProtectedSpan, RegionKind, RegionScan, extract_local_regions, extract_skip_regions,
};
pub use rule::{
    GeneratedRules, PlaceholderPool, RuleBundle, SubstitutionRule, capitalized_variants,
    rules_from_glosses,
};
