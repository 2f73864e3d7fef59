use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i32,
    pub genre: Option<String>,
    pub price: f64,
    pub release_date: Option<NaiveDateTime>,
}
