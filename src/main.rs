use clap::{Arg, ArgMatches, Command};
use esperanto_ruby::loader::{load_bundle_with_pools, load_char_widths};
use esperanto_ruby::ruby::capitalize_ruby;
use esperanto_ruby::{CharWidthTable, Converter, LetterForm, OutputFormat, format_gloss_pair};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format: html-ruby-sized, html-ruby-sized-swapped, html-ruby, html-ruby-swapped, parentheses, parentheses-swapped, replacement-only")
        .value_parser(|s: &str| s.parse::<OutputFormat>())
        .default_value("html-ruby-sized")
}

fn cli() -> Command {
    Command::new("esperanto-ruby")
        .version("0.1.0")
        .about("Annotate Esperanto roots with ruby glosses")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert a text with a rule bundle")
                .arg(
                    Arg::new("input")
                        .help("Input text file (default: stdin)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("rules")
                        .long("rules")
                        .short('r')
                        .help("Rule bundle JSON file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    Arg::new("skip-placeholders")
                        .long("skip-placeholders")
                        .help("Placeholder file for %...% regions, one token per line")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    Arg::new("local-placeholders")
                        .long("local-placeholders")
                        .help("Placeholder file for @...@ regions, one token per line")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("letters")
                        .long("letters")
                        .short('l')
                        .help("How to write ĉ ĝ ĥ ĵ ŝ ŭ in the output: circumflex, x or hat")
                        .value_parser(|s: &str| s.parse::<LetterForm>())
                        .default_value("circumflex"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .short('w')
                        .help("Number of worker threads (default: 1)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("document")
                        .long("document")
                        .short('d')
                        .help("Wrap the output in an HTML page or style block")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file (default: stdout)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("gloss")
                .about("Format one root with its gloss")
                .arg(Arg::new("base").help("Root to annotate").required(true).index(1))
                .arg(Arg::new("gloss").help("Gloss text").required(true).index(2))
                .arg(format_arg())
                .arg(
                    Arg::new("capitalize")
                        .long("capitalize")
                        .short('c')
                        .help("Capitalise the root and its gloss, as at the start of a sentence")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("char-widths")
                        .long("char-widths")
                        .help("Character width table JSON file")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Check that every resource file exists before any work starts.
fn require_files(files: &[(&str, &Path)]) -> Result<(), Box<dyn std::error::Error>> {
    let missing: Vec<_> = files.iter().filter(|(_, path)| !path.is_file()).collect();
    if missing.is_empty() {
        return Ok(());
    }
    for (flag, path) in &missing {
        eprintln!("❌ --{}: file not found: {}", flag, path.display());
    }
    eprintln!("   Check the path, or pass the file explicitly with the flag above");
    Err(format!("{} resource file(s) missing", missing.len()).into())
}

fn read_input(path: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read input '{}': {}", path.display(), e).into()),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

async fn run_convert(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let rules = matches.get_one::<PathBuf>("rules").unwrap();
    let skip = matches.get_one::<PathBuf>("skip-placeholders").unwrap();
    let local = matches.get_one::<PathBuf>("local-placeholders").unwrap();
    let format = *matches.get_one::<OutputFormat>("format").unwrap();
    let letters = *matches.get_one::<LetterForm>("letters").unwrap();
    let workers = *matches.get_one::<usize>("workers").unwrap();
    let output = matches.get_one::<PathBuf>("output");

    require_files(&[
        ("rules", rules.as_path()),
        ("skip-placeholders", skip.as_path()),
        ("local-placeholders", local.as_path()),
    ])?;

    let bundle = match load_bundle_with_pools(rules, skip, local) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("❌ Failed to load rules: {}", e);
            return Err(e.into());
        }
    };
    info!(
        rules = bundle.rule_count(),
        skip_pool = bundle.skip_placeholders.len(),
        local_pool = bundle.local_placeholders.len(),
        "Rule bundle ready"
    );

    let text = read_input(matches.get_one::<PathBuf>("input"))?;

    let mut converter = Converter::new(bundle);
    converter
        .with_format(format)
        .with_letter_form(letters)
        .with_workers(workers);

    let conversion = converter.convert_parallel(&text).await?;
    for warning in conversion.warnings() {
        eprintln!("⚠️  {}", warning);
    }

    let result = if matches.get_flag("document") {
        converter.render_document(&conversion.text)
    } else {
        conversion.text
    };

    match output {
        Some(path) => {
            fs::write(path, &result)
                .map_err(|e| format!("cannot write output '{}': {}", path.display(), e))?;
            info!(path = %path.display(), format = %format, workers, "Wrote output");
        }
        None => print!("{}", result),
    }
    Ok(())
}

fn run_gloss(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let base = matches.get_one::<String>("base").unwrap();
    let gloss = matches.get_one::<String>("gloss").unwrap();
    let format = *matches.get_one::<OutputFormat>("format").unwrap();

    let widths = match matches.get_one::<PathBuf>("char-widths") {
        Some(path) => {
            require_files(&[("char-widths", path.as_path())])?;
            load_char_widths(path)?
        }
        None => CharWidthTable::new(),
    };

    let rendered = format_gloss_pair(base, gloss, format, &widths);
    if matches.get_flag("capitalize") {
        println!("{}", capitalize_ruby(&rendered));
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

/// Filter from `RUST_LOG` directives, `info` when unset, blank or invalid.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    match cli().get_matches().subcommand() {
        Some(("convert", matches)) => run_convert(matches).await,
        Some(("gloss", matches)) => run_gloss(matches),
        _ => unreachable!("a subcommand is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("  ".to_string())).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(
            log_filter(Some("debug".to_string())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("esperanto_ruby=trace".to_string())).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_gloss_capitalize_flag() {
        let matches = cli().get_matches_from(["esperanto-ruby", "gloss", "kat", "cat", "--capitalize"]);
        let (name, gloss) = matches.subcommand().unwrap();
        assert_eq!(name, "gloss");
        assert!(gloss.get_flag("capitalize"));
        assert_eq!(
            *gloss.get_one::<OutputFormat>("format").unwrap(),
            OutputFormat::HtmlRubySized
        );
    }
}
