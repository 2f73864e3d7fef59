//! booking.rs
//!
//! Точное бронирование: захват явно перечисленного набора мест.
//!
//! Дисциплина мутации одна на все ядро: эксклюзивная блокировка ровно тех
//! строк, которые собираемся пометить, перепроверка состояния уже под
//! блокировкой, мутация и вставка брони в одной транзакции. Места вне
//! транзакции с блокировкой не меняются никогда.

use sqlx::PgPool;
use tracing::info;

use crate::error::BookingError;
use crate::models::{Booking, Seat};

/// Проверяет выбор мест и приводит его к каноничному виду: сортировка и
/// дедупликация, порядок мест в брони детерминирован независимо от порядка
/// в запросе. Пустой запрос не должен тихо создавать пустую бронь.
fn validate_selection(seat_ids: &[i64]) -> Result<Vec<i64>, BookingError> {
    if seat_ids.is_empty() {
        return Err(BookingError::EmptySeatSelection);
    }
    let mut ids = seat_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

pub async fn book_seats(
    pool: &PgPool,
    lock_timeout_ms: u64,
    show_id: i64,
    seat_ids: &[i64],
    user_group: Option<&str>,
) -> Result<Booking, BookingError> {
    let ids = validate_selection(seat_ids)?;

    let mut tx = pool.begin().await?;
    super::set_lock_timeout(&mut tx, lock_timeout_ms).await?;

    // Эксклюзивно блокируем ровно запрошенные места этого сеанса.
    // Конкурент с пересекающимся набором встанет здесь до нашего коммита,
    // непересекающиеся наборы идут параллельно.
    let seats = sqlx::query_as::<_, Seat>(
        r#"
        SELECT id, show_id, row, number, booked
        FROM seats
        WHERE show_id = $1 AND id = ANY($2)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(show_id)
    .bind(&ids)
    .fetch_all(&mut *tx)
    .await?;

    if seats.len() != ids.len() {
        return Err(BookingError::SeatsNotFound {
            requested: ids.len(),
            found: seats.len(),
        });
    }

    // Перепроверка уже под блокировкой: если хоть одно место занято,
    // откатываемся целиком, частичных броней не бывает
    if seats.iter().any(|s| s.booked) {
        return Err(BookingError::SeatAlreadyBooked);
    }

    sqlx::query("UPDATE seats SET booked = TRUE WHERE id = ANY($1)")
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (show_id, seat_ids, user_group)
        VALUES ($1, $2, $3)
        RETURNING id, show_id, seat_ids, user_group, created_at
        "#,
    )
    .bind(show_id)
    .bind(&ids)
    .bind(user_group)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Бронь {} создана: сеанс {}, {} мест",
        booking.id,
        show_id,
        ids.len()
    );
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_ids_sorted_regardless_of_request_order() {
        assert_eq!(validate_selection(&[9, 3, 7, 1]).unwrap(), vec![1, 3, 7, 9]);
    }

    #[test]
    fn duplicate_seat_ids_collapse() {
        assert_eq!(validate_selection(&[5, 2, 5, 2, 5]).unwrap(), vec![2, 5]);
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert!(matches!(
            validate_selection(&[]),
            Err(BookingError::EmptySeatSelection)
        ));
    }
}
