// Tracing subscriber setup for the `waymark` binary.
//
// Filtering is read from `WAYMARK_LOG` with the usual `EnvFilter` syntax
// (`debug`, `waymark_nav::builder=debug`, `warn,waymark_nav::store=info`).
// Output goes to stderr so stdout stays clean for `waymark config` and
// `waymark inspect --json`.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "WAYMARK_LOG";

/// Install the global subscriber. `default_level` applies when
/// `WAYMARK_LOG` is unset or unparsable. Later calls are ignored.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = subscriber.try_init();
}
