use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{handlers, library, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let video_dir = state.video_dir().to_path_buf();
    let static_dir = state.config().library.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/entries", get(library::list_entries))
        .route(
            "/entries/{filename}",
            get(library::get_entry).put(library::put_entry),
        )
        .route("/tags", get(library::get_tags).put(library::put_tags))
        .route("/rescan", post(library::rescan));

    Router::new()
        .nest("/api/v1", api_routes)
        // Endpoints kept for the browser player pages
        .route("/ok", get(handlers::ok))
        .route("/info", get(library::info))
        .route("/update", post(library::update))
        .route("/db", get(library::dump))
        .route("/metrics", get(handlers::metrics))
        .nest_service("/video-file", ServeDir::new(video_dir))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
