//! Checkers that live in an external script.
//!
//! Protocol: the script gets `{"input": ..., "output": ...}` as JSON on stdin. Exit code `0` accepts. Exit code
//! `1` rejects; whatever the script printed to stdout (trimmed) becomes the diagnostic. Anything else means the
//! checker is broken.

use std::io::{self, Write};
use std::process::Stdio;
use std::thread;

use judgekit_core::{CheckError, Checker};
use serde::Serialize;

use super::program::Program;

#[derive(Serialize)]
struct CheckRequest<'a> {
    input: &'a str,
    output: &'a str,
}

/// A [`Checker`] backed by a script run once per check.
#[derive(Debug, Clone)]
pub struct ScriptChecker {
    program: Program,
}

impl ScriptChecker {
    pub fn new(program: Program) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    fn fault(&self, what: impl std::fmt::Display) -> CheckError {
        CheckError::Fault(format!("`{}`: {what}", self.program))
    }
}

impl Checker for ScriptChecker {
    fn check(&self, input: &str, output: &str) -> Result<bool, CheckError> {
        let payload = serde_json::to_vec(&CheckRequest { input, output }).map_err(|e| self.fault(e))?;

        let mut child = self
            .program
            .to_std_command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.fault(format!("cannot start checker: {e}")))?;

        // Written from a separate thread so a chatty checker cannot deadlock on a full stdout pipe.
        let writer = child.stdin.take().map(|mut pipe| {
            thread::spawn(move || match pipe.write_all(&payload) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });
        let result = child.wait_with_output().map_err(|e| self.fault(e))?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| self.fault("stdin writer panicked"))?
                .map_err(|e| self.fault(e))?;
        }

        match result.status.code() {
            Some(0) => Ok(true),
            Some(1) => {
                let message = String::from_utf8_lossy(&result.stdout);
                let message = message.trim();
                if message.is_empty() {
                    Ok(false)
                } else {
                    Err(CheckError::Assertion(message.to_string()))
                }
            }
            Some(code) => Err(self.fault(format!("checker exited with code {code}"))),
            None => Err(self.fault("checker was terminated by a signal")),
        }
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn script(body: &str) -> ScriptChecker {
        ScriptChecker::new(Program::new("sh").args(["-c", body]))
    }

    #[test]
    fn exit_zero_accepts() {
        assert_eq!(script("cat > /dev/null; exit 0").check("5", "10"), Ok(true));
    }

    #[test]
    fn silent_rejection() {
        assert_eq!(script("cat > /dev/null; exit 1").check("5", "9"), Ok(false));
    }

    #[test]
    fn rejection_message_is_trimmed_stdout() {
        let err = script("cat > /dev/null; echo '  sum mismatch '; exit 1").check("5", "9").unwrap_err();
        assert_eq!(err, CheckError::Assertion("sum mismatch".into()));
    }

    #[test]
    fn request_is_json_on_stdin() {
        let err = script("cat; exit 1").check("5\n", "9").unwrap_err();
        assert_eq!(err, CheckError::Assertion(r#"{"input":"5\n","output":"9"}"#.into()));
    }

    #[test]
    fn other_exit_codes_are_faults() {
        let err = script("exit 3").check("5", "9").unwrap_err();
        assert!(matches!(err, CheckError::Fault(msg) if msg.contains("code 3")));
    }

    #[test]
    fn missing_script_is_a_fault() {
        let checker = ScriptChecker::new(Program::new("/definitely/not/a/checker"));
        assert!(matches!(checker.check("", ""), Err(CheckError::Fault(_))));
    }
}
