//! Transcript - the diagnostic line stream
//!
//! Append-only. Every line is kept for inspection and also emitted through
//! `tracing`, which is what a human sees when the binary runs.

use serde::Serialize;
use std::fmt;

/// One diagnostic line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogLine {
    /// Something an example printed
    Content { text: String },
    Ok { title: String },
    Error { title: String, detail: String },
    Skipped { description: String },
}

impl LogLine {
    /// Whether this line records the outcome of a unit
    pub fn is_outcome(&self) -> bool {
        !matches!(self, LogLine::Content { .. })
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLine::Content { text } => f.write_str(text),
            LogLine::Ok { title } => write!(f, "[OK] {}", title),
            LogLine::Error { title, detail } => write!(f, "[ERROR] {}: {}", title, detail),
            LogLine::Skipped { description } => {
                write!(f, "[SKIPPED] {} was not found in the current HTML.", description)
            }
        }
    }
}

/// Outcome counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub ok: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// What the binary writes when a report path is configured
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub summary: Summary,
    pub lines: &'a [LogLine],
}

#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<LogLine>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: LogLine) {
        match &line {
            LogLine::Error { .. } => tracing::error!("{}", line),
            _ => tracing::info!("{}", line),
        }
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Text of every content line, in order
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            LogLine::Content { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().filter(|line| line.is_outcome())
    }

    pub fn summary(&self) -> Summary {
        self.outcomes().fold(Summary::default(), |mut summary, line| {
            match line {
                LogLine::Ok { .. } => summary.ok += 1,
                LogLine::Error { .. } => summary.failed += 1,
                LogLine::Skipped { .. } => summary.skipped += 1,
                LogLine::Content { .. } => {}
            }
            summary
        })
    }

    pub fn report(&self) -> Report<'_> {
        Report {
            summary: self.summary(),
            lines: &self.lines,
        }
    }
}
