/// Placeholder substitution engine
///
/// Every stage of the pipeline rewrites text through the same two-phase
/// primitive:
///
/// 1. **Forward**: for each rule in order, if `old` occurs in the text, replace
///    every occurrence with the rule's placeholder and record
///    `placeholder → new`.
/// 2. **Backward**: replace each recorded placeholder with its `new` value.
///
/// A later rule never sees an earlier rule's `new` text, only its placeholder,
/// so replacements cannot chain. Rule order decides precedence when one `old`
/// contains another.
///
/// # Example
/// ```ignore
/// let rules = vec![
///     SubstitutionRule::new("kato", "猫", "$001$"),
///     SubstitutionRule::new("猫", "cat", "$002$"),
/// ];
/// assert_eq!(apply("la kato", &rules), "la 猫");
/// ```
use super::rule::SubstitutionRule;

/// Ordered `placeholder → new` associations produced by a forward pass
///
/// Recording the same placeholder twice keeps its first position and takes
/// the later value. Rule sets that share placeholders between different
/// `old` values are misconfigured; this is not detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, placeholder: String, new: String) {
        match self.entries.iter_mut().find(|(p, _)| *p == placeholder) {
            Some(entry) => entry.1 = new,
            None => self.entries.push((placeholder, new)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(String, String)> {
        self.entries.iter()
    }
}

/// Forward phase. Returns the placeholder-substituted text and the
/// associations needed to undo it.
pub fn protect(text: &str, rules: &[SubstitutionRule]) -> (String, PlaceholderMap) {
    protect_with(text, rules, |placeholder| placeholder.to_string())
}

/// Forward phase with a custom token per rule, derived from its placeholder.
///
/// The second two-character-root pass uses this to keep its tokens distinct
/// from the first pass.
pub fn protect_with<F>(text: &str, rules: &[SubstitutionRule], token: F) -> (String, PlaceholderMap)
where
    F: Fn(&str) -> String,
{
    let mut result = text.to_string();
    let mut map = PlaceholderMap::new();

    for rule in rules {
        if rule.old.is_empty() || !result.contains(&rule.old) {
            continue;
        }
        let token = token(&rule.placeholder);
        result = result.replace(&rule.old, &token);
        map.record(token, rule.new.clone());
    }

    (result, map)
}

/// Backward phase, in recording order.
pub fn restore(text: &str, map: &PlaceholderMap) -> String {
    map.iter()
        .fold(text.to_string(), |acc, (placeholder, new)| {
            acc.replace(placeholder, new)
        })
}

/// Backward phase, most recently recorded placeholder first.
pub fn restore_reversed(text: &str, map: &PlaceholderMap) -> String {
    map.iter()
        .rev()
        .fold(text.to_string(), |acc, (placeholder, new)| {
            acc.replace(placeholder, new)
        })
}

/// Both phases in one call.
pub fn apply(text: &str, rules: &[SubstitutionRule]) -> String {
    let (protected, map) = protect(text, rules);
    restore(&protected, &map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_simple() {
        let rules = vec![SubstitutionRule::new("kat", "猫", "$001$")];
        assert_eq!(apply("la kato kaj la katido", &rules), "la 猫o kaj la 猫ido");
    }

    #[test]
    fn test_apply_no_match_is_noop() {
        let rules = vec![SubstitutionRule::new("hund", "犬", "$001$")];
        assert_eq!(apply("la kato", &rules), "la kato");
    }

    #[test]
    fn test_new_value_not_rematched() {
        // Without placeholders "kato" → "hundo" → "犬o" would chain.
        let rules = vec![
            SubstitutionRule::new("kato", "hundo", "$001$"),
            SubstitutionRule::new("hund", "犬", "$002$"),
        ];
        assert_eq!(apply("mia kato", &rules), "mia hundo");
    }

    #[test]
    fn test_rule_order_is_precedence() {
        let longer_first = vec![
            SubstitutionRule::new("amik", "友", "$001$"),
            SubstitutionRule::new("am", "爱", "$002$"),
        ];
        assert_eq!(apply("amiko amas", &longer_first), "友o 爱as");

        let shorter_first = vec![
            SubstitutionRule::new("am", "爱", "$002$"),
            SubstitutionRule::new("amik", "友", "$001$"),
        ];
        assert_eq!(apply("amiko amas", &shorter_first), "爱iko 爱as");
    }

    #[test]
    fn test_protect_records_only_matching_rules() {
        let rules = vec![
            SubstitutionRule::new("kat", "猫", "$001$"),
            SubstitutionRule::new("hund", "犬", "$002$"),
        ];
        let (protected, map) = protect("kato", &rules);
        assert_eq!(protected, "$001$o");
        assert_eq!(map.len(), 1);
        assert_eq!(restore(&protected, &map), "猫o");
    }

    #[test]
    fn test_duplicate_placeholder_later_value_wins() {
        let rules = vec![
            SubstitutionRule::new("kat", "猫", "$001$"),
            SubstitutionRule::new("hund", "犬", "$001$"),
        ];
        // Both olds share a token, so both restore to the later value.
        assert_eq!(apply("kato hundo", &rules), "犬o 犬o");
    }

    #[test]
    fn test_protect_with_wrapped_tokens() {
        let rules = vec![SubstitutionRule::new("la", "LA", "P")];
        let (protected, map) = protect_with("la", &rules, |p| format!("!{}!", p));
        assert_eq!(protected, "!P!");
        assert_eq!(restore(&protected, &map), "LA");
    }

    #[test]
    fn test_restore_reversed_order() {
        let mut map = PlaceholderMap::new();
        map.record("P1".to_string(), "x".to_string());
        map.record("P12".to_string(), "y".to_string());
        // Reversed order restores "P12" before "P1" can eat its prefix.
        assert_eq!(restore_reversed("P12 P1", &map), "y x");
        assert_eq!(restore("P12 P1", &map), "x2 x");
    }

    #[test]
    fn test_empty_old_is_ignored() {
        let rules = vec![SubstitutionRule::new("", "X", "P")];
        assert_eq!(apply("abc", &rules), "abc");
    }
}
