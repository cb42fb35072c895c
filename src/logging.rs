//! Diagnostics on stderr.
//!
//! Command output goes to stdout where scripts parse it, so log events are kept on stderr and
//! default to warnings only.  `RUST_LOG` or `--log-level` raise the level.
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

pub fn init(level: Option<LevelFilter>) {
    let env_filter = match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .with_env_var("RUST_LOG")
            .from_env_lossy(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
