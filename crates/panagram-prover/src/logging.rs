//! stderr-only tracing setup and the scoped switch that silences it while the backend proves.
//!
//! stdout belongs to the encoded proof. Every event goes to stderr, and while a
//! [`SuppressedLogging`] guard is alive the filter is swapped to `off`.

use std::{
    io::{self, IsTerminal},
    sync::{
        atomic::{AtomicBool, Ordering},
        OnceLock,
    },
};

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, Registry,
};

use crate::{config::DEFAULT_LOG, error::AdapterError};

struct FilterControl {
    handle: reload::Handle<EnvFilter, Registry>,
    directives: String,
}

static FILTER: OnceLock<FilterControl> = OnceLock::new();
static SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Serializes tests that take the process-wide suppression toggle.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG))
}

/// Installs the global subscriber. A second call, or a subscriber installed
/// elsewhere, leaves the existing one in place.
pub fn init(directives: &str) {
    let (filter, handle) = reload::Layer::new(build_filter(directives));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_ansi(io::stderr().is_terminal()),
        )
        .try_init()
        .is_ok();
    if installed {
        let _ = FILTER.set(FilterControl { handle, directives: directives.to_owned() });
    }
}

/// Holds backend logging silenced until dropped. Not reentrant: one per process at a time.
#[must_use = "logging is restored as soon as the guard is dropped"]
pub struct SuppressedLogging {
    _private: (),
}

impl SuppressedLogging {
    pub fn acquire() -> Result<Self, AdapterError> {
        if SUPPRESSED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AdapterError::ProofGeneration(
                "backend log suppression is already held in this process".into(),
            ));
        }
        if let Some(ctl) = FILTER.get() {
            // reload only fails once the subscriber is gone, at which point nothing is logged anyway
            let _ = ctl.handle.reload(EnvFilter::new("off"));
        }
        Ok(Self { _private: () })
    }

    pub fn is_active() -> bool {
        SUPPRESSED.load(Ordering::Acquire)
    }
}

impl Drop for SuppressedLogging {
    fn drop(&mut self) {
        if let Some(ctl) = FILTER.get() {
            let _ = ctl.handle.reload(build_filter(&ctl.directives));
        }
        SUPPRESSED.store(false, Ordering::Release);
    }
}
