use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(handlers::MAX_UPLOAD_BYTES))
}
