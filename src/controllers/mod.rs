pub mod movies;
pub mod theaters;
pub mod halls;
pub mod shows;
pub mod bookings;
pub mod analytics;

use axum::http::StatusCode;
use axum::Router;
use std::sync::Arc;

use crate::error::BookingError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(theaters::routes())
        .merge(halls::routes())
        .merge(shows::routes())
        .merge(bookings::routes())
        .merge(analytics::routes())
}

// Переводит ошибку ядра в HTTP-ответ с сообщением для клиента
pub(crate) fn booking_error_response(err: BookingError) -> (StatusCode, String) {
    let message = match &err {
        BookingError::SeatAlreadyBooked => "Одно или несколько мест уже заняты".to_string(),
        BookingError::EmptySeatSelection => "Список мест не должен быть пустым".to_string(),
        BookingError::InvalidGroupSize => "Размер группы должен быть >= 1".to_string(),
        BookingError::InvalidLayout(reason) => format!("Некорректная схема рядов: {}", reason),
        BookingError::MovieNotFound(id) => format!("Фильм {} не найден", id),
        BookingError::ShowNotFound(id) => format!("Сеанс {} не найден", id),
        BookingError::SeatsNotFound { .. } => {
            "Часть запрошенных мест не найдена для этого сеанса".to_string()
        }
        BookingError::LockContention => {
            "Места заняты конкурирующим запросом, повторите попытку".to_string()
        }
        BookingError::Database(e) => {
            tracing::error!("database error: {:?}", e);
            "Ошибка базы данных".to_string()
        }
    };
    (err.status(), message)
}
