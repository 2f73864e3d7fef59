use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Атомарная единица успешного бронирования: одна строка на каждый
/// успешный exact- или group-запрос. После создания не изменяется.
///
/// `seat_ids` - типизированный массив идентификаторов мест, отсортированный
/// по возрастанию. Истина о занятости живет в `seats.booked`, бронь лишь
/// фиксирует, какие места были выданы вместе.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub show_id: i64,
    pub seat_ids: Vec<i64>,
    pub user_group: Option<String>,
    pub created_at: NaiveDateTime,
}
