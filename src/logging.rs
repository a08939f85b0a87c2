//! Logger bootstrap for the headless driver.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise the simulation's own modules log at
/// debug level when `verbose` is `true` and at info level when it is not,
/// while dependencies stay at warn.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let default_filter = format!("warn,{}={level}", env!("CARGO_CRATE_NAME"));
    let env = Env::default().default_filter_or(default_filter);
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn init_is_repeatable() {
        init(false);
        init(true);
        log::debug!("logger survives a second init");
    }
}
