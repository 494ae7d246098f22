//! CLI: check call documents against a declaration, or print its compiled table.
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use argcheck::binder::{ArgumentBinder, Args as CallArgs};
use argcheck::config::Settings;
use argcheck::decl::Declaration;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON call documents against a declarative argument spec
#[derive(Parser, Debug)]
#[command(name = "argcheck", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// check every call document; exit code 1 if any fails
    Check(CheckCmd),
    /// compile a declaration and print its checker table
    Compile(CompileCmd),
}

#[derive(Args, Debug, Clone)]
struct DeclSettings {
    /// declaration file (`family`, `signature`, `positional`, `named`)
    #[arg(long)]
    decl: PathBuf,

    /// settings file (receiver names, label width, failure logging)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JQ pre-process filter for each document, e.g. `.calls[]`
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckCmd {
    #[command(flatten)]
    decl: DeclSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// stop at the first failing document (checks run in input order)
    #[arg(long)]
    fail_fast: bool,
}

#[derive(clap::Parser, Debug)]
struct CompileCmd {
    #[command(flatten)]
    decl: DeclSettings,
}

/// One call document and where it came from.
struct Document {
    origin: String,
    json: serde_json::Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl DeclSettings {
    fn settings(&self) -> Result<Settings> {
        match &self.config {
            None => Ok(Settings::default()),
            Some(path) => Settings::from_json_file(path)
                .with_context(|| format!("failed to load settings from {}", path.display())),
        }
    }

    fn binder(&self, settings: &Settings) -> Result<ArgumentBinder> {
        let decl = Declaration::from_file(&self.decl)
            .with_context(|| format!("failed to load declaration {}", self.decl.display()))?;
        decl.binder(settings)
            .with_context(|| format!("failed to compile declaration {}", self.decl.display()))
    }
}

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut docs = Vec::new();
        for source_path in source_paths {
            let path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read input file {path_str}"))?;

            let mut values: Vec<serde_json::Value> = Vec::new();
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                    let value = serde_json::from_str(line)
                        .with_context(|| format!("failed to parse {path_str}:{}", line_no + 1))?;
                    values.push(value);
                }
            } else {
                values.push(
                    serde_json::from_str(&source).with_context(|| format!("failed to parse JSON source file {path_str}"))?,
                );
            }

            let mut found = Vec::new();
            for value in values {
                match self.jq_expr.as_ref() {
                    None => found.push(value),
                    Some(jq_expr) => {
                        let outputs = crate::jq_exec::run_jaq(jq_expr, &value)
                            .with_context(|| format!("failed to apply jq expression to {path_str}"))?;
                        found.extend(outputs);
                    }
                }
            }
            let single = found.len() == 1;
            docs.extend(found.into_iter().enumerate().map(|(i, json)| Document {
                origin: if single { path_str.clone() } else { format!("{path_str}#{i}") },
                json,
            }));
        }
        Ok(docs)
    }
}

fn check_document(binder: &ArgumentBinder, doc: &Document) -> std::result::Result<(), String> {
    let args = CallArgs::from_json(&doc.json).map_err(|err| format!("invalid call document: {err}"))?;
    binder.enforce(&args).map_err(|err| err.to_string())
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns `false` when any checked document failed.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                let settings = target.decl.settings()?;
                let binder = target.decl.binder(&settings)?;
                let docs = target.input_settings.load()?;
                if docs.is_empty() {
                    bail!("no call documents found in {:?}", target.input_settings.input);
                }

                let outcomes: Vec<(&Document, std::result::Result<(), String>)> = if target.fail_fast {
                    let mut outcomes = Vec::new();
                    for doc in &docs {
                        let outcome = check_document(&binder, doc);
                        let failed = outcome.is_err();
                        outcomes.push((doc, outcome));
                        if failed {
                            break;
                        }
                    }
                    outcomes
                } else {
                    docs.par_iter().map(|doc| (doc, check_document(&binder, doc))).collect()
                };

                let mut failed = 0usize;
                for (doc, outcome) in &outcomes {
                    match outcome {
                        Ok(()) => println!("{} {}", "ok".green().bold(), doc.origin),
                        Err(message) => {
                            failed += 1;
                            println!("{} {}: {message}", "FAIL".red().bold(), doc.origin);
                        }
                    }
                }
                let summary = format!("{} passed, {failed} failed", outcomes.len() - failed);
                if failed == 0 {
                    eprintln!("{}", summary.as_str().green());
                } else {
                    eprintln!("{}", summary.as_str().red());
                }
                Ok(failed == 0)
            }
            Command::Compile(target) => {
                let settings = target.decl.settings()?;
                let binder = target.decl.binder(&settings)?;
                println!("{} `{}`", binder.kind(), binder.callable().bold());
                for (name, checker) in binder.checkers() {
                    println!("  {} {checker}", format!("{name}:").as_str().cyan());
                }
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched_any = false;
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern}"))? {
            out.push(entry?);
            matched_any = true;
        }
        if !matched_any {
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
    }
    Ok(out)
}
