use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::Booking;
use crate::services::{booking, group_booking};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/group-booking", post(create_group_booking))
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    show_id: i64,
    seat_ids: Vec<i64>,
    user_group: Option<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.show_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "show_id должен быть > 0".to_string()));
    }
    if req.seat_ids.iter().any(|&id| id <= 0) {
        return Err((StatusCode::BAD_REQUEST, "Все seat_id должны быть > 0".to_string()));
    }

    let booking = booking::book_seats(
        &state.db.pool,
        state.config.booking.lock_timeout_ms,
        req.show_id,
        &req.seat_ids,
        req.user_group.as_deref(),
    )
    .await
    .map_err(super::booking_error_response)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT id, show_id, seat_ids, user_group, created_at FROM bookings ORDER BY created_at DESC, id",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_bookings sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список бронирований".to_string())
    })?;

    Ok((StatusCode::OK, Json(bookings)))
}

/* ---------- GROUP BOOKING ---------- */

// POST /api/group-booking
//
// Отказ в подборе блока - не ошибка: клиент получает 200 со
// структурным ответом success=false и списком альтернативных сеансов.
#[derive(Debug, Deserialize)]
struct GroupBookingRequest {
    show_id: i64,
    group_size: i32,
    user_group: Option<String>,
}

async fn create_group_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GroupBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.show_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "show_id должен быть > 0".to_string()));
    }

    let outcome = group_booking::group_book(
        &state.db.pool,
        state.config.booking.lock_timeout_ms,
        req.show_id,
        req.group_size,
        req.user_group.as_deref(),
    )
    .await
    .map_err(super::booking_error_response)?;

    Ok((StatusCode::OK, Json(outcome)))
}
