use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Build the CORS layer shared by the public routes.
///
/// A single configured origin is attached to every response, matching the
/// frontend contract; an unparsable origin falls back to `*`. The layer
/// also short-circuits `OPTIONS` preflights to 200 before routing, so no
/// handler code runs for them.
pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = allowed_origin.parse::<HeaderValue>().unwrap_or_else(|e| {
        tracing::error!(
            "Invalid CORS origin '{}': {}. Using fallback.",
            allowed_origin,
            e
        );
        HeaderValue::from_static("*")
    });

    let layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Credentials cannot be combined with a wildcard origin.
    if allowed_origin == "*" {
        layer
    } else {
        layer.allow_credentials(true)
    }
}
