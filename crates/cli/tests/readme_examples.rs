//! Runs the `tempex` commands shown in README.md against the built binary.
//!
//! A bare fenced block right after a bash block holds the output of the
//! last command in it; its first `▶` line must appear in the real output.

use std::process::{Command, Output};

struct Example {
    args: Vec<String>,
    expected: Option<String>,
}

/// Fenced blocks of README.md as (info string, lines).
fn fenced_blocks(readme: &str) -> Vec<(&str, Vec<&str>)> {
    let mut blocks = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in readme.lines() {
        match (line.strip_prefix("```"), current.take()) {
            (Some(info), None) => current = Some((info.trim(), Vec::new())),
            (Some(_), Some(block)) => blocks.push(block),
            (None, Some(mut block)) => {
                block.1.push(line.trim());
                current = Some(block);
            }
            (None, None) => {}
        }
    }

    blocks
}

/// Split a command line into arguments; only double quotes group words.
fn split_args(command: &str) -> Vec<String> {
    command
        .split('"')
        .enumerate()
        .flat_map(|(i, part)| {
            if i % 2 == 1 {
                vec![part.to_string()]
            } else {
                part.split_whitespace().map(String::from).collect()
            }
        })
        .collect()
}

fn readme_examples() -> Vec<Example> {
    let readme = include_str!("../../../README.md");
    let mut examples: Vec<Example> = Vec::new();
    let mut after_commands = false;

    for (info, lines) in fenced_blocks(readme) {
        if info == "bash" {
            let before = examples.len();
            examples.extend(
                lines
                    .iter()
                    .filter_map(|line| line.strip_prefix("tempex "))
                    .map(|command| Example {
                        args: split_args(command),
                        expected: None,
                    }),
            );
            after_commands = examples.len() > before;
        } else if info.is_empty() && after_commands {
            if let Some(last) = examples.last_mut() {
                last.expected = lines
                    .iter()
                    .find(|line| line.starts_with('▶'))
                    .map(|line| line.to_string());
            }
            after_commands = false;
        } else {
            after_commands = false;
        }
    }

    examples
}

fn run(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tempex"))
        .arg("--no-color")
        .args(args)
        .env_remove("TEMPEX_LOCALE")
        .output()
        .expect("Failed to run tempex")
}

#[test]
fn test_readme_examples_parse() {
    let examples = readme_examples();
    assert!(
        examples.len() >= 10,
        "Expected at least 10 tempex examples in README, found {}",
        examples.len()
    );
    assert_eq!(
        examples[0].expected.as_deref(),
        Some("▶ before 10pm [8..19]")
    );
    assert_eq!(
        split_args(r#"-L fr "rendez-vous avant 22h""#),
        ["-L", "fr", "rendez-vous avant 22h"]
    );
}

#[test]
fn test_readme_examples_run() {
    let mut failed = Vec::new();

    // --config-init would write into the real config directory
    let examples = readme_examples();
    let runnable = examples
        .iter()
        .filter(|e| !e.args.iter().any(|a| a.starts_with("--config")));

    for example in runnable {
        let output = run(&example.args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let command = example.args.join(" ");

        if !output.status.success() {
            failed.push(format!("{}: exit code {:?}", command, output.status.code()));
        } else if let Some(expected) = &example.expected {
            if !stdout.contains(expected.as_str()) {
                failed.push(format!("{}: expected '{}', got:\n{}", command, expected, stdout));
            }
        }
    }

    assert!(failed.is_empty(), "README examples failed:\n{}", failed.join("\n"));
}

#[test]
fn test_core_examples() {
    let critical_examples = [
        (vec!["meeting before 10pm"], "▶ before 10pm"),
        (vec!["-L", "fr", "rendez-vous avant 22h"], "▶ avant 22h"),
        (vec!["-L", "fr", "depuis le 1er mai"], "▶ depuis le 1er mai"),
        (vec!["-L", "ja", "3時以降に電話して"], "▶ 3時以降"),
        (vec!["-r", "2024-01-15", "next friday"], "value: on 2024-01-26"),
        (vec!["for 3 hours"], "value: 3h"),
    ];

    for (args, expected) in critical_examples {
        let args: Vec<String> = args.into_iter().map(String::from).collect();
        let output = run(&args);
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert!(
            stdout.contains(expected),
            "Expected {:?} to print '{}', got:\n{}",
            args,
            expected,
            stdout
        );
    }
}

#[test]
fn test_json_output() {
    let args = vec!["-j".to_string(), "every 2 weeks".to_string()];
    let output = run(&args);
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be JSON");
    assert_eq!(value[0]["span"]["category"], "set");
    assert_eq!(value[0]["resolution"]["period"], "P2W");
}

#[test]
fn test_unknown_locale_fails() {
    let args = vec!["-L".to_string(), "xx".to_string(), "today".to_string()];
    let output = run(&args);
    assert!(!output.status.success());
}
