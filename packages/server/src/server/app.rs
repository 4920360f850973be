//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::routes::{
    auth_youtube_callback_handler, auth_youtube_handler, create_goods_handler,
    delete_goods_handler, get_goods_handler, health_handler, list_goods_handler, ping_handler,
    test_handler, update_goods_handler, upload_short_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let app_state = AppState {
        db_pool: deps.db_pool.clone(),
        deps: Arc::new(deps),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/test", get(test_handler))
        .route("/health", get(health_handler))
        // Goods inventory
        .route("/goods", get(list_goods_handler).post(create_goods_handler))
        .route("/goods/", get(list_goods_handler).post(create_goods_handler))
        .route(
            "/goods/:goods_id",
            get(get_goods_handler)
                .put(update_goods_handler)
                .delete(delete_goods_handler),
        )
        // YouTube Shorts uploads
        .route("/uploads/shorts", post(upload_short_handler))
        .route("/uploads/auth/youtube", post(auth_youtube_handler))
        .route(
            "/uploads/auth/youtube/callback",
            get(auth_youtube_callback_handler),
        )
        .fallback(not_found)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
