//! Runner and binary configuration

use std::ffi::OsString;
use std::path::PathBuf;

/// Path to a JSON page fixture; the embedded demo page is used when unset
pub const PAGE_ENV: &str = "DOM_WALKTHROUGH_PAGE";

/// Path the JSON report is written to; no report when unset
pub const REPORT_ENV: &str = "DOM_WALKTHROUGH_REPORT";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Turn a panicking example into an `[ERROR]` line instead of unwinding
    pub catch_panics: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

/// Configuration for the `dom-walkthrough` binary
#[derive(Debug, Clone, Default)]
pub struct WalkthroughConfig {
    pub page_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub runner: RunnerConfig,
}

impl WalkthroughConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Self {
            page_path: path(PAGE_ENV),
            report_path: path(REPORT_ENV),
            runner: RunnerConfig::default(),
        }
    }
}
