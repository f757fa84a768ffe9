use crate::replace::error::{ConvertError, ConvertResult};
use crate::replace::rule::{PlaceholderPool, RuleBundle, rules_from_fields};
use crate::ruby::CharWidthTable;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Raw rule lists as they appear in rule JSON files
///
/// Each list holds `[old, new, placeholder]` arrays. Arity is checked later so
/// the error can name the list and index.
#[derive(Debug, Default, Deserialize)]
struct RawRuleLists {
    #[serde(
        default,
        rename = "replacements_final_list",
        alias = "全域替换用のリスト(列表)型配列(replacements_final_list)"
    )]
    global: Vec<Vec<String>>,
    #[serde(
        default,
        rename = "replacements_list_for_localized_string",
        alias = "局部文字替换用のリスト(列表)型配列(replacements_list_for_localized_string)"
    )]
    local: Vec<Vec<String>>,
    #[serde(
        default,
        rename = "replacements_list_for_2char",
        alias = "二文字词根替换用のリスト(列表)型配列(replacements_list_for_2char)"
    )]
    two_char: Vec<Vec<String>>,
}

/// Name the file in JSON errors; other errors already carry their context.
fn with_path(path: &Path, error: ConvertError) -> ConvertError {
    match error {
        ConvertError::Json(e) => ConvertError::Config(format!("'{}': {}", path.display(), e)),
        other => other,
    }
}

fn read_file(path: &Path) -> ConvertResult<String> {
    fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the three rule lists from JSON text
///
/// The JSON should have the following structure (every key optional):
/// ```json
/// {
///     "replacements_final_list": [["old", "new", "placeholder"], ...],
///     "replacements_list_for_localized_string": [...],
///     "replacements_list_for_2char": [...]
/// }
/// ```
///
/// Placeholder pools are not part of this file; the returned bundle has
/// empty pools.
///
/// # Errors
/// - Invalid JSON, or lists that are not arrays of string arrays
/// - Any triple without exactly three fields (nothing is returned in that case)
pub fn parse_rule_bundle(json: &str) -> ConvertResult<RuleBundle> {
    let raw: RawRuleLists = serde_json::from_str(json)?;
    let bundle = RuleBundle::new()
        .with_global(rules_from_fields(raw.global, "replacements_final_list")?)
        .with_local(rules_from_fields(
            raw.local,
            "replacements_list_for_localized_string",
        )?)
        .with_two_char(rules_from_fields(raw.two_char, "replacements_list_for_2char")?);
    Ok(bundle)
}

/// Load the rule lists from a JSON file
///
/// # Errors
/// - File not found or unreadable
/// - See [`parse_rule_bundle`]
pub fn load_rule_bundle(path: &Path) -> ConvertResult<RuleBundle> {
    let content = read_file(path)?;
    let bundle = parse_rule_bundle(&content).map_err(|e| with_path(path, e))?;
    debug!(
        path = %path.display(),
        global = bundle.global.len(),
        local = bundle.local.len(),
        two_char = bundle.two_char.len(),
        "Loaded rule bundle"
    );
    Ok(bundle)
}

/// Parse a placeholder pool: one token per line, trimmed, blank lines ignored.
pub fn parse_placeholders(content: &str) -> PlaceholderPool {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load a placeholder pool from a text file
///
/// # Errors
/// - File not found or unreadable
/// - File contains no placeholders
pub fn load_placeholders(path: &Path) -> ConvertResult<PlaceholderPool> {
    let pool = parse_placeholders(&read_file(path)?);
    if pool.is_empty() {
        return Err(ConvertError::Config(format!(
            "placeholder file '{}' contains no placeholders",
            path.display()
        )));
    }
    Ok(pool)
}

/// Parse a character width table: `{"a": 9, "猫": 16, ...}`
///
/// Keys that are not exactly one character are skipped with a warning.
pub fn parse_char_widths(json: &str) -> ConvertResult<CharWidthTable> {
    let raw: HashMap<String, u32> = serde_json::from_str(json)?;
    let mut widths = HashMap::with_capacity(raw.len());
    for (key, width) in raw {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => {
                widths.insert(ch, width);
            }
            _ => warn!("Width table key '{}' is not a single character, skipping", key),
        }
    }
    Ok(CharWidthTable::from(widths))
}

/// Load a character width table from a JSON file
pub fn load_char_widths(path: &Path) -> ConvertResult<CharWidthTable> {
    let content = read_file(path)?;
    parse_char_widths(&content).map_err(|e| with_path(path, e))
}

/// Load rules and both placeholder pools into one bundle
pub fn load_bundle_with_pools(
    rules: &Path,
    skip_placeholders: &Path,
    local_placeholders: &Path,
) -> ConvertResult<RuleBundle> {
    Ok(load_rule_bundle(rules)?
        .with_skip_placeholders(load_placeholders(skip_placeholders)?)
        .with_local_placeholders(load_placeholders(local_placeholders)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replace::rule::SubstitutionRule;

    #[test]
    fn test_parse_rule_bundle() {
        let json = r#"{
            "replacements_final_list": [["kat", "猫", "$G1$"]],
            "replacements_list_for_localized_string": [["ab", "AB", "$L1$"]],
            "replacements_list_for_2char": [["la", "LA", "$R1$"], ["al", "AL", "$R2$"]]
        }"#;
        let bundle = parse_rule_bundle(json).unwrap();
        assert_eq!(bundle.global, vec![SubstitutionRule::new("kat", "猫", "$G1$")]);
        assert_eq!(bundle.local.len(), 1);
        assert_eq!(bundle.two_char.len(), 2);
        assert!(bundle.skip_placeholders.is_empty());
    }

    #[test]
    fn test_parse_rule_bundle_keeps_field_order() {
        let json = r#"{"replacements_final_list": [["old", "new", "$P$"], ["a", "b", "$Q$"]]}"#;
        let bundle = parse_rule_bundle(json).unwrap();
        assert_eq!(
            bundle.global,
            vec![
                SubstitutionRule::new("old", "new", "$P$"),
                SubstitutionRule::new("a", "b", "$Q$"),
            ]
        );
    }

    #[test]
    fn test_parse_rule_bundle_legacy_keys() {
        let json = r#"{
            "全域替换用のリスト(列表)型配列(replacements_final_list)": [["kat", "猫", "$G1$"]]
        }"#;
        let bundle = parse_rule_bundle(json).unwrap();
        assert_eq!(bundle.global.len(), 1);
        assert!(bundle.local.is_empty());
        assert!(bundle.two_char.is_empty());
    }

    #[test]
    fn test_parse_rule_bundle_missing_keys() {
        let bundle = parse_rule_bundle("{}").unwrap();
        assert_eq!(bundle.rule_count(), 0);
    }

    #[test]
    fn test_parse_rule_bundle_wrong_arity() {
        let json = r#"{"replacements_list_for_2char": [["la", "LA"]]}"#;
        match parse_rule_bundle(json).unwrap_err() {
            ConvertError::MalformedRule { list, index, arity } => {
                assert_eq!(list, "replacements_list_for_2char");
                assert_eq!(index, 0);
                assert_eq!(arity, 2);
            }
            other => panic!("Expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rule_bundle_invalid_json() {
        assert!(matches!(
            parse_rule_bundle("[not json"),
            Err(ConvertError::Json(_))
        ));
    }

    #[test]
    fn test_parse_placeholders() {
        let pool = parse_placeholders("  %1854%\n\n%1855%  \n\t\n%1856%");
        assert_eq!(pool, vec!["%1854%", "%1855%", "%1856%"]);
    }

    #[test]
    fn test_parse_char_widths() {
        let widths = parse_char_widths(r#"{"a": 9, "猫": 16, "ab": 3}"#).unwrap();
        assert_eq!(widths.len(), 2);
        assert_eq!(widths.width_of('a'), 9);
        assert_eq!(widths.width_of('猫'), 16);
        assert_eq!(widths.width_of('z'), 8);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_rule_bundle(Path::new("/nonexistent/rules.json"));
        match result.unwrap_err() {
            ConvertError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/rules.json"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_files_from_disk() {
        let dir = std::env::temp_dir().join(format!("esperanto-ruby-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let rules = dir.join("rules.json");
        let skip = dir.join("skip.txt");
        let local = dir.join("local.txt");
        fs::write(&rules, r#"{"replacements_final_list": [["kat", "猫", "$G1$"]]}"#).unwrap();
        fs::write(&skip, "$S1$\n$S2$\n").unwrap();
        fs::write(&local, "$L1$\n").unwrap();

        let bundle = load_bundle_with_pools(&rules, &skip, &local).unwrap();
        assert_eq!(bundle.global.len(), 1);
        assert_eq!(bundle.skip_placeholders, vec!["$S1$", "$S2$"]);
        assert_eq!(bundle.local_placeholders, vec!["$L1$"]);

        fs::write(&local, "\n\n").unwrap();
        assert!(matches!(
            load_bundle_with_pools(&rules, &skip, &local),
            Err(ConvertError::Config(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
