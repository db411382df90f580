mod config;
mod pipe;

use config::Config;

use std::io::{self, IsTerminal};
use std::process;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use colored::{control::set_override, Colorize};
use tempex_core::{Locale, Recognized, Recognizer};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::pipe::PipeModeConfig;

const LONG_ABOUT: &str = r##"
tempex finds dates, times, durations and other temporal expressions in text
and resolves them against a reference time.

SUPPORTED LOCALES:
  en-us   English
  fr-fr   French
  ja-jp   Japanese

RECOGNIZED:
  date, time, datetime, duration, daterange, timerange, datetimerange,
  set (recurrences) and holiday, plus modifier words such as "before",
  "depuis" or "以降" attached to them.

EXAMPLES:
  tempex "meeting before 10pm"                Time with a modifier
  tempex -L fr "vendredi prochain à 8h"       French
  tempex -L ja "明日の午後3時"                Japanese
  tempex -r 2024-01-15 "next friday"          Fixed reference time
  tempex -j "every 2 weeks"                   JSON output

TEE MODE:
  Piped input is passed through line by line with annotations:
    tail -f notes.txt | tempex          Annotate lines live
    cat notes.txt | tempex -H           Highlight spans inline
    cat notes.txt | tempex -j           One JSON object per line

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting    | CLI flag        | Env var           | Default
  -----------|-----------------|-------------------|---------
  locale     | -L, --locale    | TEMPEX_LOCALE     | en-us
  no_color   | -C, --no-color  | TEMPEX_NO_COLOR   | false
  highlight  | -H, --highlight | TEMPEX_HIGHLIGHT  | false

  Config file location: tempex --config-path
  Generate default config: tempex --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "tempex")]
#[command(version)]
#[command(about = "Find and resolve temporal expressions in text")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// The text to scan
    ///
    /// When omitted and stdin is piped, every input line is scanned.
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Locale of the input (en-us, fr-fr, ja-jp, or en, fr, ja)
    #[arg(long, short = 'L', value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Reference time to resolve against (default: now)
    ///
    /// Accepts `2024-01-15`, `2024-01-15T09:30` or `2024-01-15 09:30:00`.
    #[arg(long, short = 'r', value_name = "DATETIME", value_parser = parse_reference)]
    reference: Option<NaiveDateTime>,

    /// Output results as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// Highlight recognized spans inline (tee mode)
    #[arg(long, short = 'H')]
    highlight: bool,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding why a span was or wasn't kept.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// List supported locales
    #[arg(long)]
    locales: bool,

    /// Show config file path
    #[arg(long)]
    config_path: bool,

    /// Create default config file
    #[arg(long)]
    config_init: bool,
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    s.parse().map_err(|e: tempex_core::Error| e.to_string())
}

fn parse_reference(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("invalid reference time: {s}"))
}

fn print_locales() {
    println!("{}", "Supported Locales".bold().underline());
    println!();
    for locale in Locale::ALL {
        println!(
            "  {} {} - {}",
            "→".cyan(),
            locale.code().yellow(),
            locale.name()
        );
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => fail("Cannot determine config directory"),
        }
        return;
    }

    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => fail(e),
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let locale = if let Some(l) = cli.locale {
        tracing::debug!("locale = {} (from CLI)", l);
        l
    } else {
        let l = file_config.locale();
        let source = if std::env::var("TEMPEX_LOCALE").is_ok() {
            "env TEMPEX_LOCALE"
        } else if file_config.locale.is_some() {
            "config file"
        } else {
            "default"
        };
        tracing::debug!("locale = {} (from {})", l, source);
        l
    };

    if cli.no_color || file_config.no_color() {
        set_override(false);
    }
    let highlight = cli.highlight || file_config.highlight();

    if cli.locales {
        print_locales();
        return;
    }

    let recognizer = match Recognizer::new(locale) {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    let Some(input) = cli.input else {
        if io::stdin().is_terminal() {
            fail("no input given (pass text as an argument or pipe it in)");
        }
        let config = PipeModeConfig {
            highlight,
            json: cli.json,
            reference: cli.reference,
        };
        if let Err(e) = pipe::run_pipe_mode(&recognizer, &config) {
            fail(e);
        }
        return;
    };

    let found = match cli.reference {
        Some(reference) => recognizer.recognize_at(&input, reference),
        None => recognizer.recognize(&input),
    };

    if cli.json {
        match serde_json::to_string_pretty(&found) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(e),
        }
        return;
    }

    print_results(&recognizer, &found);
}

/// Standard human-readable output.
fn print_results(recognizer: &Recognizer, found: &[Recognized]) {
    if found.is_empty() {
        println!("{}", "(no temporal expressions found)".dimmed());
        return;
    }

    for recognized in found {
        let span = &recognized.span;
        println!(
            "{} {} {}",
            "▶".blue(),
            span.text.green().bold(),
            format!("[{}..{}]", span.start, span.end()).dimmed()
        );
        println!("  {}: {}", "category".cyan(), span.category);
        if !span.modifiers.is_empty() {
            let modifiers: Vec<_> = span
                .modifiers
                .iter()
                .map(|m| format!("{m:?}").to_lowercase())
                .collect();
            println!("  {}: {}", "modifiers".cyan(), modifiers.join(", "));
        }
        match &recognized.resolution {
            Some(resolution) => println!(
                "  {}: {}",
                "value".cyan(),
                resolution.describe(recognizer.configuration()).yellow()
            ),
            None => println!("  {}", "(unresolved)".dimmed()),
        }
    }
}
