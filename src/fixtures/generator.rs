//! `GENERATOR.*`: a script that prints test cases as JSON.
//!
//! ```json
//! { "big": [ { "name": "n1000", "kind": "static", "input": "1000", "output": "2000" },
//!            { "name": "rand", "kind": "checker", "input": "17" } ] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use judgekit_core::describe_exit;
use serde::Deserialize;
use thiserror::Error;

use crate::resolve::script_program;

pub const GENERATOR_STEM: &str = "GENERATOR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeneratedCase {
    Static { name: String, input: String, output: String },
    Checker { name: String, input: String },
}

impl GeneratedCase {
    pub fn name(&self) -> &str {
        match self {
            GeneratedCase::Static { name, .. } | GeneratedCase::Checker { name, .. } => name,
        }
    }
}

pub type GeneratedPacks = BTreeMap<String, Vec<GeneratedCase>>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("cannot run generator `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator `{program}` exited with {}", describe_exit(.code))]
    Failed { program: String, code: Option<i32> },

    #[error("generator `{program}` printed invalid JSON: {source}")]
    Output {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse generator output.
pub fn parse(text: &str) -> Result<GeneratedPacks, serde_json::Error> {
    serde_json::from_str(text)
}

/// Run the generator script at `path` once and parse what it prints.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn run(path: &Path) -> Result<GeneratedPacks, GeneratorError> {
    let program = script_program(path);
    let output = program
        .to_std_command()
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| GeneratorError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(GeneratorError::Failed {
            program: program.to_string(),
            code: output.status.code(),
        });
    }

    let packs = serde_json::from_slice(&output.stdout).map_err(|source| GeneratorError::Output {
        program: program.to_string(),
        source,
    })?;
    tracing::debug!(bytes = output.stdout.len(), "generator finished");
    Ok(packs)
}
