//! Tee mode for processing stdin line by line.
//!
//! Passes every line through unchanged and prints an annotation under each
//! temporal expression found in it.

use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;
use colored::Colorize;
use tempex_core::{Recognized, Recognizer};
use unicode_width::UnicodeWidthStr;

/// Configuration for tee mode.
pub struct PipeModeConfig {
    /// Highlight recognized spans inline with color
    pub highlight: bool,
    /// Output as JSON lines instead of human-readable
    pub json: bool,
    /// Fixed reference time; the current time per line when unset
    pub reference: Option<NaiveDateTime>,
}

/// Run tee mode, processing stdin line by line.
pub fn run_pipe_mode(recognizer: &Recognizer, config: &PipeModeConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handle = stdin.lock();
    let mut out = stdout.lock();

    for line_result in handle.lines() {
        let line = line_result?;
        let found = match config.reference {
            Some(reference) => recognizer.recognize_at(&line, reference),
            None => recognizer.recognize(&line),
        };
        print_line_result(&mut out, recognizer, &line, &found, config)?;
    }

    Ok(())
}

/// Print a line with its annotations.
fn print_line_result(
    out: &mut impl Write,
    recognizer: &Recognizer,
    line: &str,
    found: &[Recognized],
    config: &PipeModeConfig,
) -> io::Result<()> {
    if config.json {
        return print_json_line(out, line, found);
    }

    if config.highlight && !found.is_empty() {
        print_highlighted_line(out, line, found)?;
    } else {
        writeln!(out, "{}", line)?;
    }

    for recognized in found {
        print_annotation(out, recognizer, line, recognized)?;
    }

    Ok(())
}

/// Print the line with recognized spans highlighted.
fn print_highlighted_line(out: &mut impl Write, line: &str, found: &[Recognized]) -> io::Result<()> {
    let mut last_end = 0;

    // spans arrive sorted and disjoint
    for recognized in found {
        let span = &recognized.span;
        if span.start > last_end {
            write!(out, "{}", &line[last_end..span.start])?;
        }
        write!(out, "{}", span.text.on_bright_yellow().black())?;
        last_end = span.end();
    }

    if last_end < line.len() {
        write!(out, "{}", &line[last_end..])?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print the annotation for one span, aligned under it.
fn print_annotation(
    out: &mut impl Write,
    recognizer: &Recognizer,
    line: &str,
    recognized: &Recognized,
) -> io::Result<()> {
    let indent = " ".repeat(display_col(line, recognized.span.start));
    let value = recognized.resolution.as_ref().map_or_else(
        || "(unresolved)".dimmed().to_string(),
        |r| r.describe(recognizer.configuration()),
    );

    writeln!(
        out,
        "{}{} {}: {}",
        indent,
        "\u{21b3}".cyan(),
        recognized.span.category.to_string().green().bold(),
        value
    )?;

    Ok(())
}

/// Terminal column of byte offset `start`, counting wide characters twice.
fn display_col(line: &str, start: usize) -> usize {
    line.get(..start).map_or(0, UnicodeWidthStr::width)
}

/// Print JSON output for a line.
fn print_json_line(out: &mut impl Write, line: &str, found: &[Recognized]) -> io::Result<()> {
    use serde_json::json;

    let output = json!({
        "line": line,
        "spans": found,
    });

    writeln!(out, "{}", output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempex_core::Locale;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn render(locale: Locale, line: &str, json: bool) -> String {
        colored::control::set_override(false);
        let recognizer = Recognizer::new(locale).unwrap();
        let config = PipeModeConfig {
            highlight: false,
            json,
            reference: Some(reference()),
        };
        let found = recognizer.recognize_at(line, reference());
        let mut out = Vec::new();
        print_line_result(&mut out, &recognizer, line, &found, &config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_col_counts_wide_chars() {
        assert_eq!(display_col("abc", 2), 2);
        assert_eq!(display_col("明日の", "明日".len()), 4);
    }

    #[test]
    fn test_annotation_is_aligned() {
        let output = render(Locale::English, "meeting before 10pm", false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "meeting before 10pm");
        assert_eq!(lines[1], "        \u{21b3} time: at 22:00");
    }

    #[test]
    fn test_line_without_spans_passes_through() {
        let output = render(Locale::French, "bonjour tout le monde", false);
        assert_eq!(output, "bonjour tout le monde\n");
    }

    #[test]
    fn test_json_line() {
        let output = render(Locale::Japanese, "3時以降", true);
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(value["line"], "3時以降");
        assert_eq!(value["spans"][0]["span"]["text"], "3時以降");
        assert_eq!(value["spans"][0]["span"]["modifiers"][0], "after");
    }
}
