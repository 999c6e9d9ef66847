//! Turn whatever the user pointed at into something runnable.
//!
//! Source files in a known compiled language are built next to the source (`solve.cpp` becomes `solve`).
//! Scripts run through their interpreter. Anything else is assumed to be an executable already.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use judgekit_core::describe_exit;
use thiserror::Error;

use crate::harness::Program;
use crate::report::Reporter;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to compile {}: `{compiler}` exited with {}", .source_path.display(), describe_exit(.code))]
    CompilationFailed {
        source_path: PathBuf,
        compiler: String,
        code: Option<i32>,
    },

    #[error("cannot run `{compiler}` to compile {}: {source}", .source_path.display())]
    CompilerUnavailable {
        source_path: PathBuf,
        compiler: String,
        #[source]
        source: io::Error,
    },
}

/// How a program was made runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Built from source; `program` is the fresh binary.
    Compiled { source: PathBuf, program: Program },
    /// Run through an interpreter.
    Interpreted(Program),
    /// Unknown file type, run as-is.
    Unsupported(Program),
}

impl Resolution {
    pub fn program(&self) -> &Program {
        match self {
            Resolution::Compiled { program, .. } | Resolution::Interpreted(program) | Resolution::Unsupported(program) => {
                program
            }
        }
    }

    pub fn into_program(self) -> Program {
        match self {
            Resolution::Compiled { program, .. } | Resolution::Interpreted(program) | Resolution::Unsupported(program) => {
                program
            }
        }
    }
}

/// Produces a runnable [`Program`] from a user-supplied path.
pub trait ProgramResolver {
    /// ## Errors
    /// - [`ResolveError`] when a source file cannot be built.
    fn resolve(&self, path: &Path, reporter: &mut dyn Reporter) -> Result<Resolution, ResolveError>;
}

/// Compiler table plus the shared script interpreters.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProgramResolver;

fn compiler_for(extension: &str) -> Option<&'static str> {
    match extension {
        "cpp" | "cc" | "cxx" => Some("g++"),
        "c" => Some("gcc"),
        "rs" => Some("rustc"),
        _ => None,
    }
}

fn interpreter_for(extension: &str) -> Option<&'static str> {
    match extension {
        "py" => Some("python3"),
        "sh" => Some("sh"),
        _ => None,
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(OsStr::to_str).unwrap_or("")
}

/// Build a [`Program`] for a script, picking the interpreter from its extension.
///
/// `.py` runs under `python3` and `.sh` under `sh`; anything else (`.check`, no extension, ...) is executed
/// directly.
pub fn script_program(path: &Path) -> Program {
    match interpreter_for(extension(path)) {
        Some(interpreter) => Program::new(interpreter).arg(path),
        None => Program::new(path),
    }
}

impl ProgramResolver for DefaultProgramResolver {
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    fn resolve(&self, path: &Path, reporter: &mut dyn Reporter) -> Result<Resolution, ResolveError> {
        let ext = extension(path);

        if let Some(compiler) = compiler_for(ext) {
            let binary = path.with_extension("");
            reporter.progress(&format!("Compiling {}...", path.display()));
            let status = Command::new(compiler)
                .arg("-o")
                .arg(&binary)
                .arg(path)
                .status()
                .map_err(|source| ResolveError::CompilerUnavailable {
                    source_path: path.to_path_buf(),
                    compiler: compiler.to_string(),
                    source,
                })?;
            if !status.success() {
                reporter.failure(&format!("Failed to compile {}.", path.display()));
                return Err(ResolveError::CompilationFailed {
                    source_path: path.to_path_buf(),
                    compiler: compiler.to_string(),
                    code: status.code(),
                });
            }
            reporter.success("Done!");
            tracing::debug!(binary = %binary.display(), "compiled");
            return Ok(Resolution::Compiled {
                source: path.to_path_buf(),
                program: Program::new(binary),
            });
        }

        if interpreter_for(ext).is_some() {
            return Ok(Resolution::Interpreted(script_program(path)));
        }

        tracing::warn!(path = %path.display(), "unknown program type, running it directly");
        reporter.warning(&format!(
            "WARNING: Unknown file type: {}. Running directly as executable.",
            path.display()
        ));
        Ok(Resolution::Unsupported(Program::new(path)))
    }
}
