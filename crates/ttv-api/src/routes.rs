//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::files::{download_file, list_musics, stream_file, upload_music};
use crate::handlers::tasks::{
    create_audio, create_subtitle, create_video, delete_task, get_task,
};
use crate::handlers::text::{create_script, create_terms};
use crate::handlers::{health, ready};
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, RateLimiterCache};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    // Task-creating routes are rate limited per client IP; everything
    // else is cheap enough to leave open.
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let task_routes = Router::new()
        .route("/videos", post(create_video))
        .route("/audio", post(create_audio))
        .route("/subtitle", post(create_subtitle))
        .route("/scripts", post(create_script))
        .route("/terms", post(create_terms))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let query_routes = Router::new()
        .route("/tasks/:task_id", get(get_task).delete(delete_task))
        .route("/musics", get(list_musics).post(upload_music))
        .route("/stream/*file_path", get(stream_file))
        .route("/download/*file_path", get(download_file));

    let api_routes = Router::new().merge(task_routes).merge(query_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
