//! Whole-document passes over formatted ruby output

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{OutputFormat, SizeClass};

static IDENTICAL_RUBY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ruby>([^<]+)<rt class="XXL_L">([^<]+)</rt></ruby>"#)
        .expect("identical ruby pattern is valid")
});

static LEADING_RUBY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.*?)(<ruby>)([^<]+)(<rt[^>]*>)([^<]*?(?:<br>[^<]*?){0,2})(</rt>)(</ruby>)?(.*)$",
    )
    .expect("leading ruby pattern is valid")
});

/// Drop the ruby wrapper where base and annotation are the same text in the
/// largest size class: `<ruby>vorto<rt class="XXL_L">vorto</rt></ruby>` → `vorto`.
pub fn collapse_identical_ruby(text: &str) -> String {
    IDENTICAL_RUBY_PATTERN
        .replace_all(text, |caps: &Captures| {
            if caps[1] == caps[2] {
                caps[1].to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Upper-case the first character and lower-case the rest.
pub(crate) fn capitalize_word(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Capitalise the start of a sentence that may begin with ruby markup.
///
/// When the text starts directly with a `<ruby>` element, both its base and
/// its annotation are capitalised. When there is other text before the first
/// ruby element, or no ruby element at all, the leading text is capitalised
/// instead.
pub fn capitalize_ruby(text: &str) -> String {
    let Some(caps) = LEADING_RUBY_PATTERN.captures(text) else {
        return capitalize_word(text);
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    if group(1).trim().is_empty() {
        format!(
            "{}{}{}{}{}{}{}{}",
            group(1),
            group(2),
            capitalize_word(group(3)),
            group(4),
            capitalize_word(group(5)),
            group(6),
            group(7),
            group(8)
        )
    } else {
        format!(
            "{}{}{}{}{}{}{}{}",
            capitalize_word(group(1)),
            group(2),
            group(3),
            group(4),
            group(5),
            group(6),
            group(7),
            group(8)
        )
    }
}

impl SizeClass {
    fn font_size_em(&self) -> f64 {
        match self {
            SizeClass::Xxxs | SizeClass::Xxs | SizeClass::Xs => 0.3,
            SizeClass::S => 0.4,
            SizeClass::M => 0.5,
            SizeClass::L => 0.6,
            SizeClass::Xl => 0.7,
            SizeClass::Xxl => 0.8,
        }
    }

    /// Negative top margin lifting the annotation above its base
    fn margin_top_em(&self) -> f64 {
        match self {
            SizeClass::Xxxs => -8.3,
            SizeClass::Xxs => -7.2,
            SizeClass::Xs => -6.1,
            SizeClass::S => -4.85,
            SizeClass::M => -4.0,
            SizeClass::L => -3.55,
            SizeClass::Xl => -3.2,
            SizeClass::Xxl => -2.8,
        }
    }
}

const SIZED_HEAD: &str = r#"<!DOCTYPE html>
<html lang="eo">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Ruby annotation</title>
    <style>
      html, body {
        -webkit-text-size-adjust: 100%;
        -moz-text-size-adjust: 100%;
        -ms-text-size-adjust: 100%;
        text-size-adjust: 100%;
      }
      :root {
        --ruby-color: blue;
        --ruby-font-size: 0.5em;
      }
      html {
        font-size: 100%;
      }
      .text-M_M {
        font-size: 1rem !important;
        font-family: Arial, sans-serif;
        line-height: 2.0 !important;
        display: block;
        position: relative;
      }
      ruby {
        display: inline-flex;
        flex-direction: column;
        align-items: center;
        vertical-align: top !important;
        line-height: 2.0 !important;
        margin: 0 !important;
        padding: 0 !important;
        font-size: 1rem !important;
      }
      rt {
        display: block !important;
        font-size: var(--ruby-font-size);
        color: var(--ruby-color);
        line-height: 1.05;
        text-align: center;
      }
"#;

const SIZED_HEAD_END: &str = r#"    </style>
  </head>
  <body>
  <p class="text-M_M">
"#;

const SIZED_TAIL: &str = "</p></body></html>";

const PLAIN_HEAD: &str = r#"<style>
ruby rt {
    color: blue;
}
</style>
"#;

const PLAIN_TAIL: &str = "<br>";

fn size_class_rules() -> String {
    SizeClass::ALL
        .iter()
        .map(|class| {
            format!(
                "      rt.{} {{\n        --ruby-font-size: {}em;\n        margin-top: {}em !important;\n        transform: translateY(0em) !important;\n      }}\n",
                class.css_class(),
                class.font_size_em(),
                class.margin_top_em()
            )
        })
        .collect()
}

/// Wrap converted text in the page chrome its format needs.
///
/// Sized ruby formats get a full HTML page with one CSS rule per size class,
/// plain ruby formats a short style block, text formats nothing.
pub fn wrap_document(body: &str, format: OutputFormat) -> String {
    if format.is_sized() {
        format!(
            "{}{}{}{}{}",
            SIZED_HEAD,
            size_class_rules(),
            SIZED_HEAD_END,
            body,
            SIZED_TAIL
        )
    } else if format.is_html() {
        format!("{}{}{}", PLAIN_HEAD, body, PLAIN_TAIL)
    } else {
        body.to_string()
    }
}
