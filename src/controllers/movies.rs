use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::Movie;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", post(create_movie))
        .route("/movies", get(list_movies))
}

// POST /api/movies
#[derive(Debug, Deserialize)]
struct CreateMovieRequest {
    name: String,
    duration_minutes: i32,
    genre: Option<String>,
    price: f64,
    release_date: Option<NaiveDateTime>,
}

async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Название фильма не должно быть пустым".to_string()));
    }
    if req.duration_minutes <= 0 {
        return Err((StatusCode::BAD_REQUEST, "Длительность должна быть > 0".to_string()));
    }
    if req.price < 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Цена не может быть отрицательной".to_string()));
    }

    let movie = sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movies (name, duration_minutes, genre, price, release_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, duration_minutes, genre, price, release_date
        "#,
    )
    .bind(&req.name)
    .bind(req.duration_minutes)
    .bind(&req.genre)
    .bind(req.price)
    .bind(req.release_date)
    .fetch_one(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("create_movie sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось создать фильм".to_string())
    })?;

    Ok((StatusCode::CREATED, Json(movie)))
}

// GET /api/movies
async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movies = sqlx::query_as::<_, Movie>(
        "SELECT id, name, duration_minutes, genre, price, release_date FROM movies ORDER BY id",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_movies sql error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Не удалось получить список фильмов".to_string())
    })?;

    Ok((StatusCode::OK, Json(movies)))
}
