//! DOM walkthrough
//!
//! Titled examples of reading, changing and traversing a document, each run
//! through a guarded runner that survives missing elements and failing
//! examples.
//!
//! ```text
//! catalog::all() → Runner::run_all(&mut D: Document) → Transcript
//!                        ↓ per unit
//!            [OK] / [ERROR] / [SKIPPED] line
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod runner;
pub mod transcript;

pub use config::{RunnerConfig, WalkthroughConfig};
pub use error::{ExampleError, WalkthroughError};
pub use runner::{
    lookup_required, report_missing, Completion, ExampleContext, ExampleResult, ExampleUnit,
    Outcome, Runner,
};
pub use transcript::{LogLine, Summary, Transcript};

use dom::Document;

/// Page the binary runs against when no fixture path is configured
pub const DEMO_PAGE: &str = include_str!("../fixtures/demo_page.json");

/// Run every catalog example in order, then the closing line
pub fn run_walkthrough<D: Document + 'static>(document: &mut D, config: RunnerConfig) -> Transcript {
    let mut runner = Runner::with_config(document, config);
    runner.run_all(catalog::all());
    runner.log(catalog::COMPLETED_MESSAGE);
    runner.into_transcript()
}
