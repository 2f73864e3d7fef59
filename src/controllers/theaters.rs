use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::Theater;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theaters", post(create_theater))
        .route("/theaters", get(list_theaters))
}

// POST /api/theaters
#[derive(Debug, Deserialize)]
struct CreateTheaterRequest {
    name: String,
    location: Option<String>,
}

async fn create_theater(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTheaterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Название театра не должно быть пустым".to_string()));
    }

    let theater = sqlx::query_as::<_, Theater>(
        r#"
        INSERT INTO theaters (name, location)
        VALUES ($1, $2)
        RETURNING id, name, location
        "#,
    )
    .bind(&req.name)
    .bind(&req.location)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_theater sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось создать театр".to_string())
    })?;

    Ok((StatusCode::CREATED, Json(theater)))
}

// GET /api/theaters
async fn list_theaters(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let theaters = sqlx::query_as::<_, Theater>(
        "SELECT id, name, location FROM theaters ORDER BY id",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_theaters sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список театров".to_string())
    })?;

    Ok((StatusCode::OK, Json(theaters)))
}
