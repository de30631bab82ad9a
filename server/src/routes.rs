//! Route-Definitionen und Router-Aufbau fuer die REST-API

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Baut den vollstaendigen Router mit CORS- und Trace-Layer
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    // CORS: entweder spezifische Origins oder Any (nur fuer Entwicklung)
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(tower_http::cors::Any)
    };

    Router::new()
        // System
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        // Schluessel-Ledger
        .route("/request_key", post(handlers::schluessel::request_key))
        .route("/get_key/:key_id", get(handlers::schluessel::get_key))
        .route("/keys", get(handlers::schluessel::keys))
        // Nachrichten
        .route(
            "/decrypt_message",
            post(handlers::nachrichten::decrypt_message),
        )
        .route("/send_email", post(handlers::nachrichten::send_email))
        .route("/emails", get(handlers::nachrichten::emails))
        .route("/decrypt_email", post(handlers::nachrichten::decrypt_email))
        // Sessions
        .route("/login", post(handlers::sessions::login))
        .route("/logout", post(handlers::sessions::logout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
