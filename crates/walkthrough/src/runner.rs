//! Guarded example runner
//!
//! Runs titled example units one after another against a document. A unit
//! that cannot find its target returns [`Completion::Skipped`]; a unit that
//! fails (error or panic) is caught here. Either way the next unit runs.
//!
//! Every unit produces exactly one outcome line:
//!
//! ```text
//! [OK] <title>
//! [ERROR] <title>: <detail>
//! [SKIPPED] <description> was not found in the current HTML.
//! ```
//!
//! A caught panic does not reach the default panic hook, so nothing else is
//! printed for it; the full report is logged at `debug` level.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use dom::{Document, NodeId};
use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::ExampleError;
use crate::transcript::{LogLine, Transcript};

/// How a unit finished when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// A target was absent; the description names it
    Skipped(String),
}

impl Completion {
    pub fn missing(description: impl Into<String>) -> Self {
        Completion::Skipped(description.into())
    }
}

pub type ExampleResult = std::result::Result<Completion, ExampleError>;

/// The single logged outcome of one `run_example` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed(String),
    Skipped(String),
}

type Action<D> = Box<dyn FnOnce(&mut ExampleContext<'_, D>) -> ExampleResult>;

/// A titled demonstration, run once
pub struct ExampleUnit<D> {
    pub title: String,
    action: Action<D>,
}

impl<D> ExampleUnit<D> {
    pub fn new<F>(title: impl Into<String>, action: F) -> Self
    where
        F: FnOnce(&mut ExampleContext<'_, D>) -> ExampleResult + 'static,
    {
        Self {
            title: title.into(),
            action: Box::new(action),
        }
    }
}

/// What a unit sees while it runs
pub struct ExampleContext<'a, D> {
    document: &'a mut D,
    transcript: &'a mut Transcript,
}

impl<'a, D: Document> ExampleContext<'a, D> {
    pub fn document(&self) -> &D {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut *self.document
    }

    pub fn lookup_required(&self, identifier: &str) -> Option<NodeId> {
        lookup_required(&*self.document, identifier)
    }

    /// First element carrying the class label
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.document
            .get_elements_by_class_name(class)
            .first()
            .copied()
    }

    /// Write a content line
    pub fn log(&mut self, text: impl Into<String>) {
        self.transcript.push(LogLine::Content { text: text.into() });
    }

    /// Write `label: <node>` or `label: (none)`
    pub fn log_node(&mut self, label: &str, node: Option<NodeId>) -> Result<(), ExampleError> {
        let rendered = match node {
            Some(node) => self.document.describe(node)?,
            None => "(none)".to_string(),
        };
        self.log(format!("{}: {}", label, rendered));
        Ok(())
    }

    /// Write `label: [<node>, <node>]`
    pub fn log_nodes(&mut self, label: &str, nodes: &[NodeId]) -> Result<(), ExampleError> {
        let rendered = nodes
            .iter()
            .map(|&node| self.document.describe(node))
            .collect::<dom::Result<Vec<_>>>()?;
        self.log(format!("{}: [{}]", label, rendered.join(", ")));
        Ok(())
    }
}

/// Ask the document for a node by identifier. Absence is not an error.
pub fn lookup_required<D: Document + ?Sized>(document: &D, identifier: &str) -> Option<NodeId> {
    document.get_element_by_id(identifier)
}

/// Note that a target was not found. Informational, never error-level.
pub fn report_missing(transcript: &mut Transcript, description: &str) {
    transcript.push(LogLine::Skipped {
        description: description.to_string(),
    });
}

/// Runs example units sequentially against one document
pub struct Runner<'d, D> {
    document: &'d mut D,
    transcript: Transcript,
    config: RunnerConfig,
}

impl<'d, D: Document> Runner<'d, D> {
    pub fn new(document: &'d mut D) -> Self {
        Self::with_config(document, RunnerConfig::default())
    }

    pub fn with_config(document: &'d mut D, config: RunnerConfig) -> Self {
        Self {
            document,
            transcript: Transcript::new(),
            config,
        }
    }

    pub fn document(&self) -> &D {
        &*self.document
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Write a content line outside any unit
    pub fn log(&mut self, text: impl Into<String>) {
        self.transcript.push(LogLine::Content { text: text.into() });
    }

    /// Run one unit. Never fails: the outcome is logged and returned.
    pub fn run_example<F>(&mut self, title: &str, action: F) -> Outcome
    where
        F: FnOnce(&mut ExampleContext<'_, D>) -> ExampleResult,
    {
        debug!(title, "running example");

        let mut cx = ExampleContext {
            document: &mut *self.document,
            transcript: &mut self.transcript,
        };
        let result = if self.config.catch_panics {
            catch_quietly(|| action(&mut cx)).unwrap_or_else(|payload| {
                Err(ExampleError::Panicked(panic_message(payload.as_ref())))
            })
        } else {
            action(&mut cx)
        };

        match result {
            Ok(Completion::Done) => {
                self.transcript.push(LogLine::Ok {
                    title: title.to_string(),
                });
                Outcome::Ok
            }
            Ok(Completion::Skipped(description)) => {
                report_missing(&mut self.transcript, &description);
                Outcome::Skipped(description)
            }
            Err(err) => {
                let detail = err.to_string();
                self.transcript.push(LogLine::Error {
                    title: title.to_string(),
                    detail: detail.clone(),
                });
                Outcome::Failed(detail)
            }
        }
    }

    /// Run units in the given order
    pub fn run_all(&mut self, units: impl IntoIterator<Item = ExampleUnit<D>>) -> Vec<Outcome> {
        units
            .into_iter()
            .map(|unit| self.run_example(&unit.title, unit.action))
            .collect()
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = Cell::new(false);
}

/// Wrap the process panic hook once: while `QUIET_PANICS` is set on the
/// panicking thread the report goes to `debug!`, otherwise to the old hook.
fn install_quiet_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_PANICS.with(Cell::get) {
                debug!(%info, "example panicked");
            } else {
                previous(info);
            }
        }));
    });
}

fn catch_quietly<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    install_quiet_hook();
    let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET_PANICS.with(|quiet| quiet.set(was_quiet));
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
