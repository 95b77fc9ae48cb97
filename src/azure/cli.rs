//! Azure CLI command execution.
//!
//! Runs `az` (or any other program) and hands back its stdout.

use crate::config;
use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Splits on spaces while keeping 'single' or "double" quoted substrings whole.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|"([^"]*)"\s*|([^'"\s]+)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command line and return its stdout.
///
/// The first word is the program, the rest are passed as arguments without a
/// shell, so quoting only groups words.
///
/// # Errors
/// * the program can not be started
/// * it exits non zero (stderr is returned in the error)
/// * stdout is larger than [`config::MAX_CLI_OUTPUT_BYTES`] or not UTF-8
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let words = split_and_strip(cmd);
    log::trace!("split words={:?}", words);
    let (program, args) = words
        .split_first()
        .ok_or_else(|| format!("Empty command: {cmd:?}"))?;

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running {program}: {}", stderr.trim()).into());
    }

    log::debug!(
        "Success cmd: {cmd} stdout.len()={len} code={code:?}",
        len = output.stdout.len(),
        code = output.status.code()
    );
    if output.stdout.len() > config::MAX_CLI_OUTPUT_BYTES {
        return Err(format!(
            "Response too large: {} bytes for command: {:?}",
            output.stdout.len(),
            words
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .captures_iter(input)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .map(|m| m.as_str())
        .collect()
}
