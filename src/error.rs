use axum::http::StatusCode;
use thiserror::Error;

/// Ошибки ядра бронирования.
///
/// Конфликты доступности мест - ожидаемый исход, а не фатальная ошибка:
/// контроллеры переводят их в клиентские статусы, booking-строка при этом
/// никогда не создается.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("one or more requested seats are already booked")]
    SeatAlreadyBooked,

    #[error("seat selection must not be empty")]
    EmptySeatSelection,

    #[error("group size must be at least 1")]
    InvalidGroupSize,

    #[error("invalid row layout: {0}")]
    InvalidLayout(String),

    #[error("movie {0} not found")]
    MovieNotFound(i64),

    #[error("show {0} not found")]
    ShowNotFound(i64),

    #[error("requested {requested} seats, found {found} for this show")]
    SeatsNotFound { requested: usize, found: usize },

    #[error("could not acquire seat locks in time, retry with backoff")]
    LockContention,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        // 55P03 = lock_not_available: истек lock_timeout транзакции
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("55P03") {
                return BookingError::LockContention;
            }
        }
        BookingError::Database(err)
    }
}

impl BookingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::SeatAlreadyBooked | BookingError::LockContention => StatusCode::CONFLICT,
            BookingError::EmptySeatSelection
            | BookingError::InvalidGroupSize
            | BookingError::InvalidLayout(_) => StatusCode::BAD_REQUEST,
            BookingError::MovieNotFound(_)
            | BookingError::ShowNotFound(_)
            | BookingError::SeatsNotFound { .. } => StatusCode::NOT_FOUND,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(BookingError::SeatAlreadyBooked.status(), StatusCode::CONFLICT);
        assert_eq!(BookingError::LockContention.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_input_maps_to_400() {
        assert_eq!(BookingError::EmptySeatSelection.status(), StatusCode::BAD_REQUEST);
        assert_eq!(BookingError::InvalidGroupSize.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BookingError::InvalidLayout("empty".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unknown_ids_map_to_404() {
        assert_eq!(BookingError::MovieNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(BookingError::ShowNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            BookingError::SeatsNotFound { requested: 3, found: 1 }.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn error_messages() {
        let err = BookingError::SeatsNotFound { requested: 3, found: 1 };
        assert_eq!(err.to_string(), "requested 3 seats, found 1 for this show");
    }
}
