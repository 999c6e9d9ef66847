//! Reporting boundary between the harness and whoever is watching.
//!
//! The harness only ever pushes events; a reporter is never asked for anything back. Every test produces exactly
//! one `success` or `failure`, every pack one summary event, and every run one final event.

use std::io::{self, Write};

const ICON_SUCCESS: &str = "✓";
const ICON_FAILURE: &str = "✗";
const ICON_WARNING: &str = "⚠";

/// Pointer prefixed to per-test progress lines.
pub const ICON_POINTER: &str = "❯";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Sink for harness events.
///
/// Implement this trait to customize output (plain text, JSON lines, a GUI, ...).
pub trait Reporter {
    /// Neutral information (pack announcements, the summary header).
    fn info(&mut self, text: &str);

    /// Something is under way. The matching outcome usually follows on the same line.
    fn progress(&mut self, text: &str);

    fn success(&mut self, text: &str);

    fn failure(&mut self, text: &str);

    /// Something went only partly right. Reporters without a distinct style treat it as a failure.
    fn warning(&mut self, text: &str) {
        self.failure(text);
    }
}

/// Terminal reporter: icons, optional ANSI colors, progress kept on one line with its outcome.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    color: bool,
    /// A progress fragment was printed without a trailing newline.
    open_line: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            open_line: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, color: &str, text: &str) {
        let painted = self.paint(color, text);
        // A failed write to the terminal is not worth aborting a test run over.
        let _ = writeln!(self.out, "{painted}");
        let _ = self.out.flush();
        self.open_line = false;
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn info(&mut self, text: &str) {
        if self.open_line {
            let _ = writeln!(self.out);
        }
        self.line(CYAN, text);
    }

    fn progress(&mut self, text: &str) {
        let painted = self.paint(YELLOW, text);
        let _ = write!(self.out, "{painted} ");
        let _ = self.out.flush();
        self.open_line = true;
    }

    fn success(&mut self, text: &str) {
        self.line(GREEN, &format!("{ICON_SUCCESS} {text}"));
    }

    fn failure(&mut self, text: &str) {
        self.line(RED, &format!("{ICON_FAILURE} {text}"));
    }

    fn warning(&mut self, text: &str) {
        self.line(YELLOW, &format!("{ICON_WARNING} {text}"));
    }
}

/// A reported event, as captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Info(String),
    Progress(String),
    Success(String),
    Failure(String),
    Warning(String),
}

impl Event {
    pub fn text(&self) -> &str {
        match self {
            Event::Info(t) | Event::Progress(t) | Event::Success(t) | Event::Failure(t) | Event::Warning(t) => t,
        }
    }
}

/// Keeps every event in order. Used by tests and by embedders that render results themselves.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    /// Count of `success` + `failure` events.
    pub fn terminal_events(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Success(_) | Event::Failure(_)))
            .count()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }
}

impl Reporter for RecordingReporter {
    fn info(&mut self, text: &str) {
        self.events.push(Event::Info(text.to_string()));
    }

    fn progress(&mut self, text: &str) {
        self.events.push(Event::Progress(text.to_string()));
    }

    fn success(&mut self, text: &str) {
        self.events.push(Event::Success(text.to_string()));
    }

    fn failure(&mut self, text: &str) {
        self.events.push(Event::Failure(text.to_string()));
    }

    fn warning(&mut self, text: &str) {
        self.events.push(Event::Warning(text.to_string()));
    }
}
