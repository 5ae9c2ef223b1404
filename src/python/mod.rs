//! Python interpreter discovery.
//!
//! Finds a usable interpreter to seed the virtual environment: an explicit
//! override is probed first, then `python3`, then `python` on PATH.

use crate::error::{Result, VenvStageError};
use crate::shell::{execute, CommandLine, CommandOptions};
use regex::Regex;

/// Default interpreter candidates, probed in order.
const CANDIDATES: [&str; 2] = ["python3", "python"];

/// A resolved Python interpreter.
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Program name or path, as passed to `Command::new`.
    pub program: String,

    /// Version reported by `--version`, if probed.
    pub version: Option<String>,
}

impl Interpreter {
    /// Resolve an interpreter without probing.
    ///
    /// Used in dry-run mode so command previews work on hosts without
    /// Python installed.
    pub fn unprobed(override_program: Option<&str>) -> Self {
        Self {
            program: override_program.unwrap_or(CANDIDATES[0]).to_string(),
            version: None,
        }
    }
}

/// Discover a usable interpreter, probing each candidate with `--version`.
pub fn discover(override_program: Option<&str>) -> Result<Interpreter> {
    let mut tried = Vec::new();

    let candidates: Vec<&str> = match override_program {
        Some(program) => vec![program],
        None => CANDIDATES.to_vec(),
    };

    for candidate in candidates {
        tried.push(candidate.to_string());
        if let Some(version) = probe(candidate) {
            tracing::debug!("using interpreter {} ({})", candidate, version);
            return Ok(Interpreter {
                program: candidate.to_string(),
                version: Some(version),
            });
        }
    }

    Err(VenvStageError::PythonNotFound {
        tried: tried.join(", "),
    })
}

/// Run `<program> --version` and extract the version number.
///
/// Python 2 printed the version to stderr, Python 3 prints to stdout;
/// both streams are checked.
fn probe(program: &str) -> Option<String> {
    let cmd = CommandLine::new(program, &["--version"]);
    let result = execute(&cmd, &CommandOptions::captured()).ok()?;
    if !result.success {
        return None;
    }

    let combined = format!("{}{}", result.stdout, result.stderr);
    parse_version(&combined)
}

/// Extract a dotted version number from `--version` output.
fn parse_version(output: &str) -> Option<String> {
    let re = Regex::new(r"Python (\d+\.\d+(?:\.\d+)?)").expect("static regex");
    re.captures(output)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version_extracts_dotted_number() {
        assert_eq!(
            parse_version("Python 3.12.1\n"),
            Some("3.12.1".to_string())
        );
        assert_eq!(parse_version("Python 3.9\n"), Some("3.9".to_string()));
    }

    #[test]
    fn parse_version_rejects_garbage() {
        assert_eq!(parse_version("not an interpreter"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn unprobed_uses_override() {
        let interp = Interpreter::unprobed(Some("/opt/python/bin/python3.11"));
        assert_eq!(interp.program, "/opt/python/bin/python3.11");
        assert!(interp.version.is_none());
    }

    #[test]
    fn unprobed_defaults_to_python3() {
        let interp = Interpreter::unprobed(None);
        assert_eq!(interp.program, "python3");
    }

    #[test]
    fn discover_fails_for_bogus_override() {
        let err = discover(Some("definitely-not-python-xyz")).unwrap_err();
        assert!(err.to_string().contains("definitely-not-python-xyz"));
    }
}
