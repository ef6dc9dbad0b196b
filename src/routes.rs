use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::api;
use crate::error::AppError;
use crate::state::AppState;
use crate::web;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(web::router())
        .merge(api::router())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
