//! Runs `fixtures/*.json` cases through the library and reports mismatches.
//!
//! A fixture holds one declaration and a list of calls with the expected
//! outcome of each:
//!
//! ```json
//! {
//!   "declaration": {"family": "typed", "signature": {"name": "f", "params": ["x"]}, "positional": ["int"]},
//!   "calls": [
//!     {"call": {"args": [1]}, "expect": "ok"},
//!     {"call": {"args": ["a"]}, "expect": {"kind": "WrongType", "argument": "x", "message": "must be int"}}
//!   ]
//! }
//! ```
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use argcheck::binder::Args;
use argcheck::config::Settings;
use argcheck::decl::Declaration;
use argcheck::error::{CheckErrorKind, Error};
use colored::Colorize;
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    declaration: Declaration,
    #[serde(default)]
    settings: Option<Settings>,
    /// The declaration itself must be rejected at compile time.
    #[serde(default)]
    invalid_spec: bool,
    #[serde(default)]
    calls: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    call: serde_json::Value,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expect {
    Ok(OkMarker),
    Failure {
        kind: String,
        #[serde(default)]
        argument: Option<String>,
        /// Regex matched against the cause's message.
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OkMarker {
    Ok,
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_slice(&bytes);
    serde_path_to_error::deserialize(de)
        .map_err(|err| anyhow!("{}: at JSON path {} → {}", path.display(), err.path(), err.inner()))
}

fn run_case(binder: &argcheck::ArgumentBinder, case: &Case) -> Result<()> {
    let args = Args::from_json(&case.call)?;
    let outcome = binder.enforce(&args);
    match (&case.expect, outcome) {
        (Expect::Ok(_), Ok(())) => Ok(()),
        (Expect::Ok(_), Err(err)) => bail!("expected success, got: {err}"),
        (Expect::Failure { .. }, Ok(())) => bail!("expected a failure, call passed"),
        (Expect::Failure { kind, argument, message }, Err(err)) => {
            let expected = CheckErrorKind::from_name(kind).ok_or_else(|| anyhow!("unknown failure kind `{kind}`"))?;
            if err.cause.kind() != expected {
                bail!("expected {expected}, got {}: {err}", err.cause.kind());
            }
            if let Some(argument) = argument {
                if &err.argument != argument {
                    bail!("expected failure on `{argument}`, got `{}`", err.argument);
                }
            }
            if let Some(pattern) = message {
                let re = Regex::new(pattern).with_context(|| format!("bad message regex `{pattern}`"))?;
                if !re.is_match(err.cause.message()) {
                    bail!("message `{}` does not match /{pattern}/", err.cause.message());
                }
            }
            Ok(())
        }
    }
}

/// Returns the number of failed cases.
fn run_fixture(path: &Path) -> Result<usize> {
    let fixture = load_fixture(path)?;
    let settings = fixture.settings.unwrap_or_default();
    let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();

    let binder = match fixture.declaration.binder(&settings) {
        Ok(_) if fixture.invalid_spec => {
            println!("{} {name}: declaration compiled, expected InvalidSpec", "FAIL".red().bold());
            return Ok(1);
        }
        Ok(binder) => binder,
        Err(Error::Spec(err)) if fixture.invalid_spec => {
            println!("{} {name}: {err}", "ok".green().bold());
            return Ok(0);
        }
        Err(err) => return Err(err.into()),
    };

    let mut failed = 0;
    for (i, case) in fixture.calls.iter().enumerate() {
        match run_case(&binder, case) {
            Ok(()) => println!("{} {name}#{i}", "ok".green().bold()),
            Err(err) => {
                failed += 1;
                println!("{} {name}#{i}: {err:#}", "FAIL".red().bold());
            }
        }
    }
    Ok(failed)
}

fn fixture_paths() -> Result<Vec<PathBuf>> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
    let pattern = dir.join("*.json");
    let pattern = pattern.to_string_lossy();
    let mut paths = glob::glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    paths.sort();
    if paths.is_empty() {
        bail!("no fixtures matched {pattern}");
    }
    Ok(paths)
}

fn main() -> ExitCode {
    let paths = match fixture_paths() {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            return ExitCode::from(2);
        }
    };
    let mut failed = 0;
    for path in &paths {
        match run_fixture(path) {
            Ok(n) => failed += n,
            Err(err) => {
                failed += 1;
                println!("{} {}: {err:#}", "ERROR".red().bold(), path.display());
            }
        }
    }
    if failed == 0 {
        eprintln!("{}", format!("{} fixtures passed", paths.len()).as_str().green());
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", format!("{failed} case(s) failed").as_str().red());
        ExitCode::from(1)
    }
}
