//! Logger setup shared by the binary and tests.
//!
//! Only this crate's records are raised to `debug` in verbose mode; everything
//! else stays at `warn` so Bevy internals do not drown the tick traces.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default `RUST_LOG`-style filter for the given verbosity.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Initializes the global logger.
///
/// `RUST_LOG` overrides [`default_filter`] when set.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None).format_module_path(false);

    // A logger may already be installed when tests call this repeatedly.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
