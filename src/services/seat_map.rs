//! seat_map.rs
//!
//! Материализация карты мест сеанса из схемы рядов зала.
//!
//! Одно место на каждую пару (ряд, 1..=кол-во мест), все изначально
//! свободны. Повторный вызов для того же сеанса - ошибка вызывающей
//! стороны: внутренней дедупликации нет, дубликаты отсекает уникальный
//! индекс (show_id, row, number).

use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;

use crate::error::BookingError;
use crate::models::{RowLayout, Seat};

/// Проверяет схему рядов. Валидация падает до любого INSERT.
pub fn validate_layout(layout: &[RowLayout]) -> Result<(), BookingError> {
    if layout.is_empty() {
        return Err(BookingError::InvalidLayout("layout is empty".to_string()));
    }

    let mut seen_rows = HashSet::new();
    for entry in layout {
        if entry.row < 1 {
            return Err(BookingError::InvalidLayout(format!(
                "row number {} must be >= 1",
                entry.row
            )));
        }
        if entry.seats < 1 {
            return Err(BookingError::InvalidLayout(format!(
                "row {} must have at least 1 seat, got {}",
                entry.row, entry.seats
            )));
        }
        if !seen_rows.insert(entry.row) {
            return Err(BookingError::InvalidLayout(format!(
                "duplicate row number {}",
                entry.row
            )));
        }
    }

    Ok(())
}

/// Разворачивает схему в параллельные массивы (row, number) для UNNEST.
fn expand_layout(layout: &[RowLayout]) -> (Vec<i32>, Vec<i32>) {
    let mut rows = Vec::new();
    let mut numbers = Vec::new();
    for entry in layout {
        for number in 1..=entry.seats {
            rows.push(entry.row);
            numbers.push(number);
        }
    }
    (rows, numbers)
}

pub async fn provision_seats(
    pool: &PgPool,
    show_id: i64,
    layout: &[RowLayout],
) -> Result<Vec<Seat>, BookingError> {
    validate_layout(layout)?;

    let show_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM shows WHERE id = $1)")
        .bind(show_id)
        .fetch_one(pool)
        .await?;
    if !show_exists {
        return Err(BookingError::ShowNotFound(show_id));
    }

    let (rows, numbers) = expand_layout(layout);

    // Bulk insert одним запросом, порядок строк соответствует схеме
    let seats = sqlx::query_as::<_, Seat>(
        r#"
        INSERT INTO seats (show_id, row, number)
        SELECT $1, r, n FROM UNNEST($2::int4[], $3::int4[]) AS t(r, n)
        RETURNING id, show_id, row, number, booked
        "#,
    )
    .bind(show_id)
    .bind(&rows)
    .bind(&numbers)
    .fetch_all(pool)
    .await?;

    info!("Создана карта мест сеанса {}: {} мест", show_id, seats.len());
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row: i32, seats: i32) -> RowLayout {
        RowLayout { row, seats }
    }

    #[test]
    fn valid_layout_passes() {
        assert!(validate_layout(&[row(1, 3), row(2, 2)]).is_ok());
    }

    #[test]
    fn empty_layout_rejected() {
        assert!(matches!(
            validate_layout(&[]),
            Err(BookingError::InvalidLayout(_))
        ));
    }

    #[test]
    fn non_positive_seat_count_rejected() {
        assert!(validate_layout(&[row(1, 0)]).is_err());
        assert!(validate_layout(&[row(1, -2)]).is_err());
    }

    #[test]
    fn non_positive_row_number_rejected() {
        assert!(validate_layout(&[row(0, 5)]).is_err());
        assert!(validate_layout(&[row(-1, 5)]).is_err());
    }

    #[test]
    fn duplicate_row_rejected() {
        assert!(validate_layout(&[row(1, 3), row(2, 2), row(1, 4)]).is_err());
    }

    #[test]
    fn expand_produces_seat_per_pair() {
        // [{row:1, seats:3}, {row:2, seats:2}] -> ровно 5 мест
        let (rows, numbers) = expand_layout(&[row(1, 3), row(2, 2)]);
        assert_eq!(rows, vec![1, 1, 1, 2, 2]);
        assert_eq!(numbers, vec![1, 2, 3, 1, 2]);
    }
}
