//! Run the walkthrough against the demo page (or `DOM_WALKTHROUGH_PAGE`)
//! and print every diagnostic line to stderr.

use std::fs::File;
use std::io::BufWriter;

use dom::{loader, DomSerializer};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use walkthrough::{run_walkthrough, WalkthroughConfig, WalkthroughError, DEMO_PAGE};

fn main() -> Result<(), WalkthroughError> {
    // Bare lines: the transcript formats are the output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .init();

    let config = WalkthroughConfig::from_env();

    let mut page = match &config.page_path {
        Some(path) => {
            debug!(path = %path.display(), "loading page fixture");
            loader::load_path(path)?
        }
        None => loader::load_str(DEMO_PAGE)?,
    };

    let transcript = run_walkthrough(&mut page, config.runner.clone());

    let summary = transcript.summary();
    debug!(
        ok = summary.ok,
        failed = summary.failed,
        skipped = summary.skipped,
        "walkthrough finished"
    );
    debug!("final page:\n{}", DomSerializer::new().serialize(&page)?);

    if let Some(path) = &config.report_path {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &transcript.report())?;
        debug!(path = %path.display(), "report written");
    }

    Ok(())
}
