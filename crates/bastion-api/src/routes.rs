use axum::{
    Router, middleware,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::middleware::require_session;
use crate::state::AppState;
use crate::websites;

/// Full console router. Everything outside `public_routes` sits behind the
/// session gate.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::home))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/dashboard", get(websites::dashboard))
        .route(
            "/add-website",
            get(websites::add_website_form).post(websites::create_website),
        )
        .route("/website/{id}", get(websites::website_detail))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
