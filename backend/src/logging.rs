//! Structured logging setup.
//!
//! `LOG_FORMAT=json` switches to JSON lines; anything else prints
//! human-readable text. `RUST_LOG` controls the filter and defaults to
//! `info`. Records emitted through the `log` facade (the `adapters` crate)
//! are forwarded into the same subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}
