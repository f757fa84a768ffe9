//! Character normalisation for Esperanto text
//!
//! Esperanto's six accented letters (ĉ ĝ ĥ ĵ ŝ ŭ) are commonly typed in three
//! notations:
//!
//! - circumflex: `ĉ`, the reference form used by the substitution pipeline
//! - x-form: `cx`, a plain ASCII digraph
//! - hat form: `c^`, ASCII with a trailing caret
//!
//! [`normalize`] folds the other two notations into circumflex form and unifies
//! look-alike spaces. [`LetterForm`] converts finished output back into
//! whichever notation the reader asked for.

use std::str::FromStr;

/// A fixed mapping from one notation to another, applied entry by entry.
pub type CharMapping = [(&'static str, &'static str); 12];

pub const X_TO_CIRCUMFLEX: CharMapping = [
    ("cx", "ĉ"),
    ("gx", "ĝ"),
    ("hx", "ĥ"),
    ("jx", "ĵ"),
    ("sx", "ŝ"),
    ("ux", "ŭ"),
    ("Cx", "Ĉ"),
    ("Gx", "Ĝ"),
    ("Hx", "Ĥ"),
    ("Jx", "Ĵ"),
    ("Sx", "Ŝ"),
    ("Ux", "Ŭ"),
];

pub const CIRCUMFLEX_TO_X: CharMapping = [
    ("ĉ", "cx"),
    ("ĝ", "gx"),
    ("ĥ", "hx"),
    ("ĵ", "jx"),
    ("ŝ", "sx"),
    ("ŭ", "ux"),
    ("Ĉ", "Cx"),
    ("Ĝ", "Gx"),
    ("Ĥ", "Hx"),
    ("Ĵ", "Jx"),
    ("Ŝ", "Sx"),
    ("Ŭ", "Ux"),
];

pub const X_TO_HAT: CharMapping = [
    ("cx", "c^"),
    ("gx", "g^"),
    ("hx", "h^"),
    ("jx", "j^"),
    ("sx", "s^"),
    ("ux", "u^"),
    ("Cx", "C^"),
    ("Gx", "G^"),
    ("Hx", "H^"),
    ("Jx", "J^"),
    ("Sx", "S^"),
    ("Ux", "U^"),
];

pub const HAT_TO_X: CharMapping = [
    ("c^", "cx"),
    ("g^", "gx"),
    ("h^", "hx"),
    ("j^", "jx"),
    ("s^", "sx"),
    ("u^", "ux"),
    ("C^", "Cx"),
    ("G^", "Gx"),
    ("H^", "Hx"),
    ("J^", "Jx"),
    ("S^", "Sx"),
    ("U^", "Ux"),
];

pub const HAT_TO_CIRCUMFLEX: CharMapping = [
    ("c^", "ĉ"),
    ("g^", "ĝ"),
    ("h^", "ĥ"),
    ("j^", "ĵ"),
    ("s^", "ŝ"),
    ("u^", "ŭ"),
    ("C^", "Ĉ"),
    ("G^", "Ĝ"),
    ("H^", "Ĥ"),
    ("J^", "Ĵ"),
    ("S^", "Ŝ"),
    ("U^", "Ŭ"),
];

pub const CIRCUMFLEX_TO_HAT: CharMapping = [
    ("ĉ", "c^"),
    ("ĝ", "g^"),
    ("ĥ", "h^"),
    ("ĵ", "j^"),
    ("ŝ", "s^"),
    ("ŭ", "u^"),
    ("Ĉ", "C^"),
    ("Ĝ", "G^"),
    ("Ĥ", "H^"),
    ("Ĵ", "J^"),
    ("Ŝ", "S^"),
    ("Ŭ", "U^"),
];

/// Spaces that are easy to confuse with U+0020. The ideographic space
/// (U+3000) is deliberately not in this list.
const AMBIGUOUS_SPACES: [char; 10] = [
    '\u{00A0}', '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}',
    '\u{2009}', '\u{200A}',
];

/// Apply every entry of `mapping` as a literal replace-all, in table order.
pub fn replace_letters(text: &str, mapping: &CharMapping) -> String {
    let mut result = text.to_string();
    for (from, to) in mapping {
        if result.contains(from) {
            result = result.replace(from, to);
        }
    }
    result
}

/// Replace look-alike spaces with a plain ASCII space.
pub fn unify_spaces(text: &str) -> String {
    text.chars()
        .map(|c| if AMBIGUOUS_SPACES.contains(&c) { ' ' } else { c })
        .collect()
}

/// Fold hat and x notation into circumflex form.
///
/// Hat notation goes first: `c^` never contains an x-form digraph, while the
/// opposite order would rewrite text that already used carets.
pub fn to_circumflex(text: &str) -> String {
    let text = replace_letters(text, &HAT_TO_CIRCUMFLEX);
    replace_letters(&text, &X_TO_CIRCUMFLEX)
}

/// Canonicalise whitespace and letter notation. Total and idempotent.
pub fn normalize(text: &str) -> String {
    to_circumflex(&unify_spaces(text))
}

/// Notation used for the accented letters in the final output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterForm {
    #[default]
    Circumflex,
    XForm,
    Hat,
}

impl LetterForm {
    pub fn apply(&self, text: &str) -> String {
        match self {
            LetterForm::Circumflex => {
                let text = replace_letters(text, &X_TO_CIRCUMFLEX);
                replace_letters(&text, &HAT_TO_CIRCUMFLEX)
            }
            LetterForm::XForm => {
                let text = replace_letters(text, &CIRCUMFLEX_TO_X);
                replace_letters(&text, &HAT_TO_X)
            }
            LetterForm::Hat => {
                let text = replace_letters(text, &X_TO_HAT);
                replace_letters(&text, &CIRCUMFLEX_TO_HAT)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LetterForm::Circumflex => "circumflex",
            LetterForm::XForm => "x",
            LetterForm::Hat => "hat",
        }
    }
}

impl FromStr for LetterForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circumflex" => Ok(LetterForm::Circumflex),
            "x" | "x-form" => Ok(LetterForm::XForm),
            "hat" | "caret" | "^" => Ok(LetterForm::Hat),
            other => Err(format!(
                "unknown letter form '{}' (expected circumflex, x or hat)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_form_to_circumflex() {
        assert_eq!(normalize("Mi sxatas cxokoladon"), "Mi ŝatas ĉokoladon");
        assert_eq!(normalize("Gxis revido, Ux"), "Ĝis revido, Ŭ");
    }

    #[test]
    fn test_hat_form_to_circumflex() {
        assert_eq!(normalize("s^atas c^iujn"), "ŝatas ĉiujn");
    }

    #[test]
    fn test_hat_before_x() {
        // "c^x" must become "ĉx", not "c^" followed by a rewritten "cx"
        assert_eq!(to_circumflex("c^x"), "ĉx");
    }

    #[test]
    fn test_spaces_unified() {
        let text = "a\u{00A0}b\u{2003}c\u{200A}d";
        assert_eq!(normalize(text), "a b c d");
    }

    #[test]
    fn test_ideographic_space_untouched() {
        let text = "a\u{3000}b";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_normalize_idempotent_on_mixed_input() {
        let text = "cx^ sxx u^x\u{00A0}Hx";
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_letter_form_hat() {
        assert_eq!(LetterForm::Hat.apply("ŝatas cxokoladon"), "s^atas c^okoladon");
    }

    #[test]
    fn test_letter_form_x() {
        assert_eq!(LetterForm::XForm.apply("ŝatas c^okoladon"), "sxatas cxokoladon");
    }

    #[test]
    fn test_letter_form_circumflex() {
        assert_eq!(
            LetterForm::Circumflex.apply("sxatas c^okoladon"),
            "ŝatas ĉokoladon"
        );
    }

    #[test]
    fn test_letter_form_from_str() {
        assert_eq!("x".parse::<LetterForm>(), Ok(LetterForm::XForm));
        assert_eq!("HAT".parse::<LetterForm>(), Ok(LetterForm::Hat));
        assert!("tilde".parse::<LetterForm>().is_err());
    }
}
