// Logging setup for the CLI
//
// Levels follow RUST_LOG, e.g.:
//   RUST_LOG=debug gm run                 # shocks and halt details
//   RUST_LOG=gm_engine=trace gm run       # every iteration
// Without RUST_LOG only warnings from the engine and info from the CLI show.

// `gm` also prefixes `gm_engine`, so the engine needs its own directive.
const DEFAULT_FILTER: &str = "warn,gm=info,gm_engine=warn";

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false)
        .init();

    log::debug!("logging initialised");
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Metadata};

    fn enabled(filter: &env_logger::filter::Filter, target: &str, level: Level) -> bool {
        filter.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_default_filter_keeps_engine_at_warn() {
        let filter = env_logger::filter::Builder::new().parse(DEFAULT_FILTER).build();
        assert!(!enabled(&filter, "gm_engine::simulation", Level::Info));
        assert!(enabled(&filter, "gm_engine::simulation", Level::Warn));
        assert!(enabled(&filter, "gm", Level::Info));
        assert!(enabled(&filter, "gm::monte_carlo", Level::Info));
        assert!(!enabled(&filter, "gm", Level::Debug));
    }
}
