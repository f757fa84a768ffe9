//! Rule data for the substitution pipeline
//!
//! A [`SubstitutionRule`] is an `(old, new, placeholder)` triple. The
//! placeholder is a reserved token that must never occur in ordinary input;
//! the pipeline trusts this and does not check it. Rules travel together in a
//! [`RuleBundle`] with the two placeholder pools used for `%...%` and `@...@`
//! regions.

use super::error::{ConvertError, ConvertResult};
use crate::ruby::document::capitalize_word;
use crate::ruby::{CharWidthTable, OutputFormat, capitalize_ruby, format_gloss_pair};

/// One literal substitution staged through a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub old: String,
    pub new: String,
    pub placeholder: String,
}

impl SubstitutionRule {
    pub fn new(old: &str, new: &str, placeholder: &str) -> Self {
        SubstitutionRule {
            old: old.to_string(),
            new: new.to_string(),
            placeholder: placeholder.to_string(),
        }
    }

    /// Build a rule from a raw field list, as found in rule JSON files.
    ///
    /// `list` and `index` only feed the error message.
    pub fn from_fields(fields: Vec<String>, list: &str, index: usize) -> ConvertResult<Self> {
        let arity = fields.len();
        match <[String; 3]>::try_from(fields) {
            Ok([old, new, placeholder]) => Ok(SubstitutionRule {
                old,
                new,
                placeholder,
            }),
            Err(_) => Err(ConvertError::MalformedRule {
                list: list.to_string(),
                index,
                arity,
            }),
        }
    }
}

/// Validate a whole list of raw triples before any of them is used.
pub fn rules_from_fields(raw: Vec<Vec<String>>, list: &str) -> ConvertResult<Vec<SubstitutionRule>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, fields)| SubstitutionRule::from_fields(fields, list, index))
        .collect()
}

/// Ordered reserved tokens, consumed one per protected region.
pub type PlaceholderPool = Vec<String>;

/// Everything the orchestrator needs besides the input text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBundle {
    /// Applied to the whole text
    pub global: Vec<SubstitutionRule>,
    /// Applied only inside `@...@` regions
    pub local: Vec<SubstitutionRule>,
    /// Two-character roots, applied in two passes after the global rules
    pub two_char: Vec<SubstitutionRule>,
    /// One token per `%...%` region
    pub skip_placeholders: PlaceholderPool,
    /// One token per `@...@` region
    pub local_placeholders: PlaceholderPool,
}

impl RuleBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, rules: Vec<SubstitutionRule>) -> Self {
        self.global = rules;
        self
    }

    pub fn with_local(mut self, rules: Vec<SubstitutionRule>) -> Self {
        self.local = rules;
        self
    }

    pub fn with_two_char(mut self, rules: Vec<SubstitutionRule>) -> Self {
        self.two_char = rules;
        self
    }

    pub fn with_skip_placeholders(mut self, pool: PlaceholderPool) -> Self {
        self.skip_placeholders = pool;
        self
    }

    pub fn with_local_placeholders(mut self, pool: PlaceholderPool) -> Self {
        self.local_placeholders = pool;
        self
    }

    pub fn rule_count(&self) -> usize {
        self.global.len() + self.local.len() + self.two_char.len()
    }
}

/// Rules generated from `(root, gloss)` pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRules {
    pub rules: Vec<SubstitutionRule>,
    /// Entries left without a rule because the pool ran out
    pub dropped: usize,
}

/// Turn dictionary entries into substitution rules whose replacement is the
/// rendered gloss markup.
///
/// Longer roots come first so that a root containing a shorter one wins the
/// forward pass. Roots shorter than two characters are ignored.
pub fn rules_from_glosses(
    entries: &[(String, String)],
    format: OutputFormat,
    widths: &CharWidthTable,
    pool: &[String],
) -> GeneratedRules {
    let mut candidates: Vec<&(String, String)> = entries
        .iter()
        .filter(|(root, _)| root.chars().count() >= 2)
        .collect();
    candidates.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

    let dropped = candidates.len().saturating_sub(pool.len());
    let rules = candidates
        .into_iter()
        .zip(pool)
        .map(|((root, gloss), placeholder)| SubstitutionRule {
            old: root.clone(),
            new: format_gloss_pair(root, gloss, format, widths),
            placeholder: placeholder.clone(),
        })
        .collect();

    GeneratedRules { rules, dropped }
}

/// Sentence-initial copies of `rules`: `old` with its first letter upper-cased
/// and `new` passed through [`capitalize_ruby`], each taking the next token of
/// `pool`. Rules whose `old` is unchanged by capitalisation get no copy.
pub fn capitalized_variants(rules: &[SubstitutionRule], pool: &[String]) -> GeneratedRules {
    let candidates: Vec<(String, &SubstitutionRule)> = rules
        .iter()
        .map(|rule| (capitalize_word(&rule.old), rule))
        .filter(|(old, rule)| *old != rule.old)
        .collect();

    let dropped = candidates.len().saturating_sub(pool.len());
    let rules = candidates
        .into_iter()
        .zip(pool)
        .map(|((old, rule), placeholder)| SubstitutionRule {
            old,
            new: capitalize_ruby(&rule.new),
            placeholder: placeholder.clone(),
        })
        .collect();

    GeneratedRules { rules, dropped }
}
