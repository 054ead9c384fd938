//! Middleware for logging and cross-origin access.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Standard request logging:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::default()
}

/// CORS policy for browser clients served from another origin.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .max_age(3600)
}
