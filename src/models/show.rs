use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub movie_id: i64,
    pub hall_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub price: f64,
}
