//! The program under test (and any helper script the fixtures bring along).

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// An executable plus fixed leading arguments.
///
/// Compiled programs are just a path. Interpreted ones carry the script as an argument, e.g.
/// `python3 solution.py`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    command: PathBuf,
    args: Vec<OsString>,
}

impl Program {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Build a `tokio` command for this program.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.args(&self.args);
        cmd
    }

    /// Build a blocking `std` command for this program.
    pub fn to_std_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.command);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
