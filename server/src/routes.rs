use axum::routing::get;

use crate::cors;
use crate::state::AppState;

pub mod auth;
pub mod callback;
pub mod proxy;

/// Build the application router with both endpoints.
pub fn routes(app_state: AppState) -> axum::Router {
    axum::Router::new()
        // The builder does the same thing for any non-OPTIONS method
        .route(
            "/auth",
            get(auth::authorize)
                .post(auth::authorize)
                .options(cors::preflight),
        )
        .route(
            "/token",
            get(callback::callback)
                .post(proxy::dispatch)
                .options(cors::preflight),
        )
        .layer(axum::middleware::from_fn(cors::apply_headers))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}
