//! General-purpose middleware for the API.
//!
//! Request tracing and CORS, applied to the whole router. Role gates live in
//! [`crate::auth::middleware`].

use axum::http::{HeaderValue, Method};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::HttpConfig;

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// CORS for the configured origins; `None` when no origin is configured.
pub fn cors_layer(http: &HttpConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = http
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origins_means_no_cors() {
        assert!(cors_layer(&HttpConfig::default()).is_none());
    }

    #[test]
    fn invalid_origins_are_skipped() {
        let http = HttpConfig {
            cors_origins: vec!["bad\norigin".into()],
            ..HttpConfig::default()
        };
        assert!(cors_layer(&http).is_none());

        let http = HttpConfig {
            cors_origins: vec!["https://shop.example.com".into()],
            ..HttpConfig::default()
        };
        assert!(cors_layer(&http).is_some());
    }
}
