//! CORS policy for the browser frontend.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use keyhub_core::config::CorsConfig;

fn wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == "*")
}

/// Parse every entry, skipping (and logging) the ones that are not valid.
fn parse_all<T: FromStr>(values: &[String], what: &str) -> Vec<T> {
    values
        .iter()
        .filter_map(|v| match v.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(value = %v, "Ignoring invalid CORS {}", what);
                None
            }
        })
        .collect()
}

/// Build the CORS layer. `"*"` in origins or headers allows any.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>(&config.allowed_origins, "origin"))
    };

    let headers = if wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parse_all::<HeaderName>(&config.allowed_headers, "header"))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(headers)
        .allow_methods(parse_all::<Method>(&config.allowed_methods, "method"))
        .max_age(Duration::from_secs(config.max_age_seconds))
}
