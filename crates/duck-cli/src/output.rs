use atty::Stream;
use color_eyre::Result;
use duck_core::{to_json_response, CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(opts: &OutputOptions, command: &str, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    };

    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = to_json_response(command, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !opts.quiet {
        let message = format!("duck {command}: {}", outcome.message);
        println!("{}", style.status(&outcome.status, &message));
        for line in package_lines(&style, &outcome.details) {
            println!("{line}");
        }
        for line in repo_lines(&style, &outcome.details) {
            println!("{line}");
        }
        if let Some(hint) = hint_from_details(&outcome.details) {
            println!("{}", style.info(&format!("Hint: {hint}")));
        }
    }

    Ok(code)
}

/// One line per package from a `get` outcome's details.
fn package_lines(style: &Style, details: &Value) -> Vec<String> {
    let Some(packages) = details.get("packages").and_then(Value::as_array) else {
        return Vec::new();
    };
    packages
        .iter()
        .filter_map(|pkg| {
            let name = pkg.get("package").and_then(Value::as_str)?;
            match pkg.get("status").and_then(Value::as_str) {
                Some("installed") => {
                    let repo = pkg.get("repo").and_then(Value::as_str).unwrap_or("?");
                    Some(format!(
                        "  {} '{name}' from {}",
                        style.success("installed"),
                        style.repo(repo)
                    ))
                }
                _ => {
                    let error = pkg
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error");
                    Some(format!("  {} '{name}': {error}", style.failure("failed")))
                }
            }
        })
        .collect()
}

/// `- name => url` rows from a `repo list` outcome's details.
fn repo_lines(style: &Style, details: &Value) -> Vec<String> {
    let Some(repos) = details.get("repos").and_then(Value::as_array) else {
        return Vec::new();
    };
    repos
        .iter()
        .filter_map(|repo| {
            let name = repo.get("name").and_then(Value::as_str)?;
            let url = repo.get("url").and_then(Value::as_str)?;
            Some(format!("- {} => {}", style.repo(name), style.url(url)))
        })
        .collect()
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}
