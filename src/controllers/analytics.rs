//! analytics.rs
//!
//! Модуль для получения аналитики продаж по фильмам.
//!
//! Включает в себя следующую функциональность:
//! - Подсчет проданных билетов по всем броням фильма.
//! - Расчет GMV (выручки) как суммы билетов, умноженных на цену сеанса.
//! - Необязательный фильтр по периоду времени начала сеансов.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;

use crate::services::analytics;
use crate::AppState;

/// Определяет маршруты, связанные с аналитикой.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analytics/movies/{movie_id}", get(get_movie_analytics))
}

/// GET /api/analytics/movies/{movie_id}
///
/// Возвращает итоги продаж по фильму за необязательный период:
/// количество билетов и общую выручку. Обе границы включительные.
#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
}

async fn get_movie_analytics(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if movie_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "ID фильма должен быть > 0".to_string()));
    }

    let totals = analytics::movie_analytics(
        &state.db.pool,
        movie_id,
        params.start_date,
        params.end_date,
    )
    .await
    .map_err(super::booking_error_response)?;

    tracing::info!(
        "Аналитика по фильму {}: {} билетов, GMV {:.2}",
        movie_id,
        totals.total_tickets,
        totals.total_gmv
    );

    Ok((StatusCode::OK, Json(totals)))
}
