//! analytics.rs
//!
//! Агрегация продаж по фильму: количество билетов и GMV за период.
//!
//! Чистое чтение без блокировок. Билеты считаются по мощности массива
//! seat_ids каждой брони, GMV - как количество билетов, умноженное на
//! цену сеанса. Пустой период - это нулевые итоги, а не ошибка.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::BookingError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieAnalytics {
    pub total_tickets: i64,
    pub total_gmv: f64,
}

/// Сворачивает пары (мест в брони, цена сеанса) в итоговые суммы.
fn aggregate_totals(rows: &[(i32, f64)]) -> MovieAnalytics {
    let mut total_tickets: i64 = 0;
    let mut total_gmv = 0.0;
    for &(seat_count, price) in rows {
        total_tickets += seat_count as i64;
        total_gmv += seat_count as f64 * price;
    }
    MovieAnalytics {
        total_tickets,
        total_gmv,
    }
}

pub async fn movie_analytics(
    pool: &PgPool,
    movie_id: i64,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
) -> Result<MovieAnalytics, BookingError> {
    let movie_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(movie_id)
            .fetch_one(pool)
            .await?;
    if !movie_exists {
        return Err(BookingError::MovieNotFound(movie_id));
    }

    // Обе границы включительные, фильтр по времени начала сеанса
    let rows = sqlx::query_as::<_, (i32, f64)>(
        r#"
        SELECT cardinality(b.seat_ids)::int4 AS seat_count, sh.price
        FROM bookings b
        JOIN shows sh ON sh.id = b.show_id
        WHERE sh.movie_id = $1
          AND ($2::timestamp IS NULL OR sh.start_time >= $2)
          AND ($3::timestamp IS NULL OR sh.start_time <= $3)
        "#,
    )
    .bind(movie_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool)
    .await?;

    Ok(aggregate_totals(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_tickets_and_gmv() {
        // Брони на 2 и 3 места при цене 10.0 -> 5 билетов, GMV 50.0
        let totals = aggregate_totals(&[(2, 10.0), (3, 10.0)]);
        assert_eq!(totals.total_tickets, 5);
        assert!((totals.total_gmv - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mixed_prices_weighted_by_seat_count() {
        let totals = aggregate_totals(&[(1, 12.5), (4, 8.0)]);
        assert_eq!(totals.total_tickets, 5);
        assert!((totals.total_gmv - 44.5).abs() < 1e-9);
    }

    #[test]
    fn no_bookings_yield_zero_totals() {
        let totals = aggregate_totals(&[]);
        assert_eq!(totals.total_tickets, 0);
        assert!(totals.total_gmv.abs() < f64::EPSILON);
    }
}
