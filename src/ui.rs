//! Terminal output abstraction
//!
//! Commands never print directly; everything user-facing goes through a [`Ui`]
//! so that tests can capture it and so diagnostics from the flag parser can be
//! routed to the error stream.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

/// Sink for user-facing output
pub trait Ui: Send + Sync {
    /// Print a line to standard output
    fn output(&self, message: &str);

    /// Print to standard output without a trailing newline
    fn output_raw(&self, message: &str);

    /// Print an informational line
    fn info(&self, message: &str);

    /// Print a warning line
    fn warn(&self, message: &str);

    /// Print an error line
    fn error(&self, message: &str);
}

/// Ui backed by the process stdout/stderr
pub struct BasicUi {
    color: bool,
}

impl BasicUi {
    /// Colors are enabled only when stderr is a terminal
    pub fn new() -> Self {
        BasicUi {
            color: io::stderr().is_terminal(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

impl Default for BasicUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for BasicUi {
    fn output(&self, message: &str) {
        println!("{}", message);
    }

    fn output_raw(&self, message: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout is not something we can report anywhere useful.
        let _ = stdout.write_all(message.as_bytes());
        let _ = stdout.flush();
    }

    fn info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn warn(&self, message: &str) {
        if self.color {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{}", message);
        }
    }

    fn error(&self, message: &str) {
        if self.color {
            eprintln!("{}", message.red());
        } else {
            eprintln!("{}", message);
        }
    }
}

/// Ui that records everything written to it
#[derive(Default)]
pub struct CaptureUi {
    output: Mutex<String>,
    errors: Mutex<Vec<String>>,
}

impl CaptureUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to standard output so far
    pub fn output_text(&self) -> String {
        self.output
            .lock()
            .map(|out| out.clone())
            .unwrap_or_default()
    }

    /// Lines written to the error stream, including warnings
    pub fn error_lines(&self) -> Vec<String> {
        self.errors
            .lock()
            .map(|errs| errs.clone())
            .unwrap_or_default()
    }

    fn push_output(&self, text: &str) {
        if let Ok(mut out) = self.output.lock() {
            out.push_str(text);
        }
    }

    fn push_error(&self, line: &str) {
        if let Ok(mut errs) = self.errors.lock() {
            errs.push(line.to_string());
        }
    }
}

impl Ui for CaptureUi {
    fn output(&self, message: &str) {
        self.push_output(message);
        self.push_output("\n");
    }

    fn output_raw(&self, message: &str) {
        self.push_output(message);
    }

    fn info(&self, message: &str) {
        self.push_error(message);
    }

    fn warn(&self, message: &str) {
        self.push_error(message);
    }

    fn error(&self, message: &str) {
        self.push_error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_ui_output() {
        let ui = CaptureUi::new();
        ui.output("line");
        ui.output_raw("raw");
        assert_eq!(ui.output_text(), "line\nraw");
    }

    #[test]
    fn test_capture_ui_errors() {
        let ui = CaptureUi::new();
        ui.error("first");
        ui.warn("second");
        assert_eq!(ui.error_lines(), vec!["first", "second"]);
    }
}
