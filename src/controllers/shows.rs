use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{hall, RowLayout, Seat, Show};
use crate::services::seat_map;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", post(create_show))
        .route("/shows", get(list_shows))
        .route("/shows/{show_id}/seats", post(provision_seats))
        .route("/shows/{show_id}/seats", get(get_seats))
}

/* ---------- SHOWS ---------- */

// POST /api/shows
#[derive(Debug, Deserialize)]
struct CreateShowRequest {
    movie_id: i64,
    hall_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    price: f64,
}

async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateShowRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.movie_id <= 0 || req.hall_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "movie_id и hall_id должны быть > 0".to_string()));
    }
    if req.price < 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Цена не может быть отрицательной".to_string()));
    }

    // Проверяем, что фильм и зал существуют
    let refs_exist = sqlx::query_as::<_, (bool, bool)>(
        r#"
        SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1),
               EXISTS(SELECT 1 FROM halls WHERE id = $2)
        "#,
    )
    .bind(req.movie_id)
    .bind(req.hall_id)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_show: ошибка проверки ссылок: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Ошибка проверки фильма и зала".to_string())
    })?;

    if !refs_exist.0 {
        return Err((StatusCode::NOT_FOUND, format!("Фильм {} не найден", req.movie_id)));
    }
    if !refs_exist.1 {
        return Err((StatusCode::NOT_FOUND, format!("Зал {} не найден", req.hall_id)));
    }

    let show = sqlx::query_as::<_, Show>(
        r#"
        INSERT INTO shows (movie_id, hall_id, start_time, end_time, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, movie_id, hall_id, start_time, end_time, price
        "#,
    )
    .bind(req.movie_id)
    .bind(req.hall_id)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.price)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_show sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось создать сеанс".to_string())
    })?;

    Ok((StatusCode::CREATED, Json(show)))
}

// GET /api/shows
async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let shows = sqlx::query_as::<_, Show>(
        "SELECT id, movie_id, hall_id, start_time, end_time, price FROM shows ORDER BY start_time, id",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_shows sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список сеансов".to_string())
    })?;

    Ok((StatusCode::OK, Json(shows)))
}

/* ---------- SEATS ---------- */

// POST /api/shows/{show_id}/seats
//
// Схему можно передать в теле запроса; если ее нет, берется схема зала,
// в котором идет сеанс. Повторный вызов для того же сеанса - ошибка
// вызывающей стороны, дубликаты отсекает уникальный индекс.
#[derive(Debug, Deserialize)]
struct ProvisionSeatsRequest {
    rows_layout: Option<Vec<RowLayout>>,
}

async fn provision_seats(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i64>,
    Json(req): Json<ProvisionSeatsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if show_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "show_id должен быть > 0".to_string()));
    }

    let layout = match req.rows_layout {
        Some(layout) => layout,
        None => {
            let raw = sqlx::query_scalar::<_, String>(
                "SELECT h.rows_layout FROM halls h JOIN shows s ON s.hall_id = h.id WHERE s.id = $1",
            )
            .bind(show_id)
            .fetch_optional(&state.db.pool)
            .await
            .map_err(|e| {
                tracing::error!("provision_seats: ошибка чтения схемы зала: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ошибка чтения схемы зала".to_string())
            })?
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Сеанс {} не найден", show_id)))?;

            hall::decode_layout(&raw).map_err(|e| {
                tracing::error!("provision_seats: битая схема зала для сеанса {}: {:?}", show_id, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Некорректная схема рядов в БД".to_string())
            })?
        }
    };

    let seats = seat_map::provision_seats(&state.db.pool, show_id, &layout)
        .await
        .map_err(super::booking_error_response)?;

    Ok((StatusCode::CREATED, Json(seats)))
}

// GET /api/shows/{show_id}/seats
async fn get_seats(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if show_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "show_id должен быть > 0".to_string()));
    }

    let seats = sqlx::query_as::<_, Seat>(
        "SELECT id, show_id, row, number, booked FROM seats WHERE show_id = $1 ORDER BY row, number",
    )
    .bind(show_id)
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("get_seats sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список мест".to_string())
    })?;

    Ok((StatusCode::OK, Json(seats)))
}
