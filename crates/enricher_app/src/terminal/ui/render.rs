use std::io::{self, Write};

use enricher_core::{FormViewModel, Notification, Severity};

use super::text::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Loading indicator line.
    Status(String),
    /// Result block shown under the form.
    Result { heading: String, body: String },
    /// Inline error shown under the input.
    Error(String),
    /// Transient notification, written to stderr.
    Notify(Notification),
}

/// Commands that move the terminal from `prev` to `next`.
///
/// Only changes are printed: a cleared error or result prints nothing.
pub fn render(prev: &FormViewModel, next: &FormViewModel) -> Vec<TerminalCommand> {
    let mut cmds = Vec::new();

    if next.loading && !prev.loading {
        cmds.push(TerminalCommand::Status(LOADING_LABEL.to_string()));
    }

    if next.result != prev.result {
        if let Some(result) = &next.result {
            cmds.push(TerminalCommand::Result {
                heading: RESULT_HEADING.to_string(),
                body: result.clone(),
            });
        }
    }

    if next.error != prev.error {
        if let Some(error) = &next.error {
            cmds.push(TerminalCommand::Error(error.clone()));
        }
    }

    cmds
}

pub fn header() -> String {
    format!(
        "{TITLE}\n{DESCRIPTION}\n\n{INPUT_LABEL}\n  e.g. {INPUT_PLACEHOLDER}\n\
         Press Enter to {SUBMIT_LABEL}, Ctrl-D to quit.\n"
    )
}

pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    };
    match &notification.description {
        Some(description) => format!("[{tag}] {}: {description}", notification.title),
        None => format!("[{tag}] {}", notification.title),
    }
}

/// Writes commands to an output stream and a notification stream.
pub struct Terminal<W: Write, E: Write> {
    out: W,
    notify: E,
}

impl Terminal<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> Terminal<W, E> {
    pub fn new(out: W, notify: E) -> Self {
        Self { out, notify }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", header())?;
        self.out.flush()
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }

    pub fn execute(&mut self, cmds: Vec<TerminalCommand>) -> io::Result<()> {
        for cmd in cmds {
            match cmd {
                TerminalCommand::Status(text) => writeln!(self.out, "{text}")?,
                TerminalCommand::Result { heading, body } => {
                    writeln!(self.out, "\n{heading}\n{body}\n")?;
                }
                TerminalCommand::Error(message) => writeln!(self.out, "  ! {message}")?,
                TerminalCommand::Notify(notification) => {
                    writeln!(self.notify, "{}", format_notification(&notification))?;
                    self.notify.flush()?;
                }
            }
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (W, E) {
        (self.out, self.notify)
    }
}
