//! Logger setup shared by the demo binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, decision branches logged at debug level are
/// printed. Otherwise only info level and above are shown. `RUST_LOG` takes
/// precedence over both, e.g. `RUST_LOG=pathchase::traversal=trace`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Only fails when a logger is already installed, which repeated calls
    // from tests do on purpose.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
