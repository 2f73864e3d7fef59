use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{hall, Hall, RowLayout};
use crate::services::seat_map;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/halls", post(create_hall))
        .route("/halls", get(list_halls))
}

// Наружу схема всегда отдается типизированным списком,
// сериализованная строка не покидает слой хранения
#[derive(Debug, Serialize)]
struct HallResponse {
    id: i64,
    theater_id: i64,
    name: Option<String>,
    rows_layout: Vec<RowLayout>,
}

// POST /api/halls
#[derive(Debug, Deserialize)]
struct CreateHallRequest {
    theater_id: i64,
    name: Option<String>,
    rows_layout: Vec<RowLayout>,
}

async fn create_hall(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateHallRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.theater_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "theater_id должен быть > 0".to_string()));
    }

    // Схема проверяется до записи: кривая схема не должна попасть в БД
    seat_map::validate_layout(&req.rows_layout).map_err(super::booking_error_response)?;

    let theater_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM theaters WHERE id = $1)")
            .bind(req.theater_id)
            .fetch_one(&state.db.pool)
            .await
            .map_err(|e| {
                tracing::error!("create_hall: ошибка проверки театра {}: {:?}", req.theater_id, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ошибка проверки театра".to_string())
            })?;
    if !theater_exists {
        return Err((StatusCode::NOT_FOUND, format!("Театр {} не найден", req.theater_id)));
    }

    let encoded = hall::encode_layout(&req.rows_layout).map_err(|e| {
        tracing::error!("create_hall: ошибка сериализации схемы: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось сериализовать схему рядов".to_string())
    })?;

    let saved = sqlx::query_as::<_, Hall>(
        r#"
        INSERT INTO halls (theater_id, name, rows_layout)
        VALUES ($1, $2, $3)
        RETURNING id, theater_id, name, rows_layout
        "#,
    )
    .bind(req.theater_id)
    .bind(&req.name)
    .bind(&encoded)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_hall sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось создать зал".to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(HallResponse {
            id: saved.id,
            theater_id: saved.theater_id,
            name: saved.name,
            rows_layout: req.rows_layout,
        }),
    ))
}

// GET /api/halls
async fn list_halls(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let halls = sqlx::query_as::<_, Hall>(
        "SELECT id, theater_id, name, rows_layout FROM halls ORDER BY id",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_halls sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список залов".to_string())
    })?;

    // Каждая схема декодируется на чтении
    let mut payload = Vec::with_capacity(halls.len());
    for h in halls {
        let rows_layout = h.layout().map_err(|e| {
            tracing::error!("list_halls: битая схема зала {}: {:?}", h.id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Некорректная схема рядов в БД".to_string())
        })?;
        payload.push(HallResponse {
            id: h.id,
            theater_id: h.theater_id,
            name: h.name,
            rows_layout,
        });
    }

    Ok((StatusCode::OK, Json(payload)))
}
