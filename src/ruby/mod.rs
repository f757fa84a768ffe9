/// Ruby Formatter
///
/// Renders a base text and its gloss (a translation or logographic
/// equivalent) in one of seven output formats:
///
/// | Format                   | Output                                           |
/// |--------------------------|--------------------------------------------------|
/// | `html-ruby-sized`        | `<ruby>base<rt class="SIZE">gloss</rt></ruby>`   |
/// | `html-ruby-sized-swapped`| `<ruby>gloss<rt class="SIZE">base</rt></ruby>`   |
/// | `html-ruby`              | `<ruby>base<rt>gloss</rt></ruby>`                |
/// | `html-ruby-swapped`      | `<ruby>gloss<rt>base</rt></ruby>`                |
/// | `parentheses`            | `base(gloss)`                                    |
/// | `parentheses-swapped`    | `gloss(base)`                                    |
/// | `replacement-only`       | `gloss`                                          |
///
/// The sized formats pick one of eight [`SizeClass`]es from the width ratio
/// of the annotation to the annotated text, and break very long annotations
/// over two or three lines.
///
/// # Example
///
/// ```ignore
/// let widths = CharWidthTable::new().with_width('猫', 16);
/// let html = format_gloss_pair("kat", "猫", OutputFormat::HtmlRubySizedSwapped, &widths);
/// assert_eq!(html, r#"<ruby>猫<rt class="L_L">kat</rt></ruby>"#);
/// ```
pub mod document;
pub mod width;

use std::fmt;
use std::str::FromStr;

pub use document::{capitalize_ruby, collapse_identical_ruby, wrap_document};
pub use width::{
    CharWidthTable, DEFAULT_CHAR_WIDTH, insert_break_at_half, insert_break_at_thirds,
    measure_width,
};

/// How a (base, gloss) pair is rendered, and how the whole output is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Gloss over base, size class chosen from the width ratio
    #[default]
    HtmlRubySized,
    /// Base over gloss, size class chosen from the width ratio
    HtmlRubySizedSwapped,
    HtmlRuby,
    HtmlRubySwapped,
    Parentheses,
    ParenthesesSwapped,
    /// Only the gloss, as a plain replacement
    ReplacementOnly,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::HtmlRubySized,
        OutputFormat::HtmlRubySizedSwapped,
        OutputFormat::HtmlRuby,
        OutputFormat::HtmlRubySwapped,
        OutputFormat::Parentheses,
        OutputFormat::ParenthesesSwapped,
        OutputFormat::ReplacementOnly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::HtmlRubySized => "html-ruby-sized",
            OutputFormat::HtmlRubySizedSwapped => "html-ruby-sized-swapped",
            OutputFormat::HtmlRuby => "html-ruby",
            OutputFormat::HtmlRubySwapped => "html-ruby-swapped",
            OutputFormat::Parentheses => "parentheses",
            OutputFormat::ParenthesesSwapped => "parentheses-swapped",
            OutputFormat::ReplacementOnly => "replacement-only",
        }
    }

    /// Whether the pipeline output is HTML (and gets `<br>`/`&nbsp;` layout)
    pub fn is_html(&self) -> bool {
        matches!(
            self,
            OutputFormat::HtmlRubySized
                | OutputFormat::HtmlRubySizedSwapped
                | OutputFormat::HtmlRuby
                | OutputFormat::HtmlRubySwapped
        )
    }

    pub fn is_sized(&self) -> bool {
        matches!(
            self,
            OutputFormat::HtmlRubySized | OutputFormat::HtmlRubySizedSwapped
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .iter()
            .find(|format| format.name() == s)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.name()).collect();
                format!("unknown format '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Annotation size, from smallest font (longest annotation) to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Xxxs,
    Xxs,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

/// Ratio lower bounds, checked in order; the first one exceeded wins.
const SIZE_THRESHOLDS: [(f64, SizeClass); 7] = [
    (6.0, SizeClass::Xxxs),
    (9.0 / 3.0, SizeClass::Xxs),
    (9.0 / 4.0, SizeClass::Xs),
    (9.0 / 5.0, SizeClass::S),
    (9.0 / 6.0, SizeClass::M),
    (9.0 / 7.0, SizeClass::L),
    (9.0 / 8.0, SizeClass::Xl),
];

impl SizeClass {
    pub const ALL: [SizeClass; 8] = [
        SizeClass::Xxxs,
        SizeClass::Xxs,
        SizeClass::Xs,
        SizeClass::S,
        SizeClass::M,
        SizeClass::L,
        SizeClass::Xl,
        SizeClass::Xxl,
    ];

    /// Pick the class for `annotation width / annotated width`.
    ///
    /// A ratio of exactly a threshold falls to the next class down; NaN
    /// (both widths zero) is [`SizeClass::Xxl`].
    pub fn for_ratio(ratio: f64) -> SizeClass {
        SIZE_THRESHOLDS
            .iter()
            .find(|(threshold, _)| ratio > *threshold)
            .map(|(_, class)| *class)
            .unwrap_or(SizeClass::Xxl)
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SizeClass::Xxxs => "XXXS_S",
            SizeClass::Xxs => "XXS_S",
            SizeClass::Xs => "XS_S",
            SizeClass::S => "S_S",
            SizeClass::M => "M_M",
            SizeClass::L => "L_L",
            SizeClass::Xl => "XL_L",
            SizeClass::Xxl => "XXL_L",
        }
    }
}

/// Render `annotated` with `annotation` above it, sized by width ratio.
fn sized_ruby(annotated: &str, annotation: &str, widths: &CharWidthTable) -> String {
    let ratio =
        measure_width(annotation, widths) as f64 / measure_width(annotated, widths) as f64;
    let class = SizeClass::for_ratio(ratio);
    let annotation = match class {
        SizeClass::Xxxs => insert_break_at_thirds(annotation, widths),
        SizeClass::Xxs => insert_break_at_half(annotation, widths),
        _ => annotation.to_string(),
    };
    format!(
        r#"<ruby>{}<rt class="{}">{}</rt></ruby>"#,
        annotated,
        class.css_class(),
        annotation
    )
}

/// Render one (base, gloss) pair in `format`.
pub fn format_gloss_pair(
    base: &str,
    gloss: &str,
    format: OutputFormat,
    widths: &CharWidthTable,
) -> String {
    match format {
        OutputFormat::HtmlRubySized => sized_ruby(base, gloss, widths),
        OutputFormat::HtmlRubySizedSwapped => sized_ruby(gloss, base, widths),
        OutputFormat::HtmlRuby => format!("<ruby>{}<rt>{}</rt></ruby>", base, gloss),
        OutputFormat::HtmlRubySwapped => format!("<ruby>{}<rt>{}</rt></ruby>", gloss, base),
        OutputFormat::Parentheses => format!("{}({})", base, gloss),
        OutputFormat::ParenthesesSwapped => format!("{}({})", gloss, base),
        OutputFormat::ReplacementOnly => gloss.to_string(),
    }
}
