//! group_booking.rs
//!
//! Групповое бронирование: поиск первого непрерывного блока из N соседних
//! мест в одном ряду.
//!
//! Ключевые моменты:
//! 1.  **Детерминированный выбор окна**: ряды сканируются по возрастанию
//!     номера ряда, внутри ряда окна - слева направо. Побеждает окно с
//!     наименьшим рядом, при равенстве - с наименьшим стартовым номером.
//! 2.  **Та же дисциплина блокировок, что и у точного бронирования**:
//!     свободные места сеанса блокируются FOR UPDATE до вычисления окна,
//!     и количество реально помеченных строк сверяется перед коммитом.
//! 3.  **Альтернативы вместо ошибки**: если окна нет, это не исключение, а
//!     структурный ответ success=false со списком сеансов того же фильма
//!     в том же зале, где свободных мест хватает на группу.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::error::BookingError;
use crate::models::{Booking, Seat};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowSuggestion {
    pub show_id: i64,
    pub available_seats: i64,
}

#[derive(Debug, Serialize)]
pub struct GroupBookingOutcome {
    pub success: bool,
    pub booking: Option<Booking>,
    pub suggestions: Option<Vec<ShowSuggestion>>,
}

/// Находит первое валидное окно из `group_size` мест подряд.
///
/// Вход должен быть отсортирован по (row, number). Окно валидно, только
/// если номера идут строго подряд: разрыв в ряду отбраковывает окно, даже
/// когда все его места по отдельности свободны.
fn find_contiguous_window(seats: &[Seat], group_size: usize) -> Option<&[Seat]> {
    if group_size == 0 {
        return None;
    }

    let mut start = 0;
    while start < seats.len() {
        let row = seats[start].row;
        let mut end = start;
        while end < seats.len() && seats[end].row == row {
            end += 1;
        }

        let row_seats = &seats[start..end];
        if row_seats.len() >= group_size {
            for offset in 0..=(row_seats.len() - group_size) {
                let window = &row_seats[offset..offset + group_size];
                let contiguous = window
                    .iter()
                    .enumerate()
                    .all(|(j, s)| s.number == window[0].number + j as i32);
                if contiguous {
                    return Some(window);
                }
            }
        }

        start = end;
    }

    None
}

pub async fn group_book(
    pool: &PgPool,
    lock_timeout_ms: u64,
    show_id: i64,
    group_size: i32,
    user_group: Option<&str>,
) -> Result<GroupBookingOutcome, BookingError> {
    if group_size < 1 {
        return Err(BookingError::InvalidGroupSize);
    }

    let (movie_id, hall_id) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT movie_id, hall_id FROM shows WHERE id = $1",
    )
    .bind(show_id)
    .fetch_optional(pool)
    .await?
    .ok_or(BookingError::ShowNotFound(show_id))?;

    let mut tx = pool.begin().await?;
    super::set_lock_timeout(&mut tx, lock_timeout_ms).await?;

    // Блокируем все свободные места сеанса: два конкурирующих групповых
    // запроса сериализуются здесь и не могут выбрать одно и то же окно
    let free_seats = sqlx::query_as::<_, Seat>(
        r#"
        SELECT id, show_id, row, number, booked
        FROM seats
        WHERE show_id = $1 AND booked = FALSE
        ORDER BY row, number
        FOR UPDATE
        "#,
    )
    .bind(show_id)
    .fetch_all(&mut *tx)
    .await?;

    if let Some(window) = find_contiguous_window(&free_seats, group_size as usize) {
        let mut ids: Vec<i64> = window.iter().map(|s| s.id).collect();
        ids.sort_unstable();

        // Перепроверка под блокировкой: помечаем только все еще свободные
        // места и сверяем количество затронутых строк с размером группы
        let updated = sqlx::query("UPDATE seats SET booked = TRUE WHERE id = ANY($1) AND booked = FALSE")
            .bind(&ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated != ids.len() as u64 {
            tx.rollback().await?;
            return Err(BookingError::LockContention);
        }

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
            "Групповая бронь {}: сеанс {}, ряд {}, места {}..{}",
            booking.id,
            show_id,
            window[0].row,
            window[0].number,
            window[window.len() - 1].number
        );
        return Ok(GroupBookingOutcome {
            success: true,
            booking: Some(booking),
            suggestions: None,
        });
    }

    // Окна нет: снимаем блокировки до подбора альтернатив
    tx.rollback().await?;

    let suggestions = suggest_other_shows(pool, movie_id, hall_id, show_id, group_size).await?;
    info!(
        "Нет блока из {} мест на сеансе {}, альтернатив: {}",
        group_size,
        show_id,
        suggestions.len()
    );

    Ok(GroupBookingOutcome {
        success: false,
        booking: None,
        suggestions: Some(suggestions),
    })
}

/// Сеансы того же фильма в том же зале, где свободных мест хватает на
/// группу. Размер группы не уменьшается автоматически: запросили N - ищем
/// и предлагаем только под N.
async fn suggest_other_shows(
    pool: &PgPool,
    movie_id: i64,
    hall_id: i64,
    exclude_show_id: i64,
    group_size: i32,
) -> Result<Vec<ShowSuggestion>, BookingError> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT sh.id, COUNT(st.id) FILTER (WHERE st.booked = FALSE) AS available_seats
        FROM shows sh
        LEFT JOIN seats st ON st.show_id = sh.id
        WHERE sh.movie_id = $1 AND sh.hall_id = $2 AND sh.id <> $3
        GROUP BY sh.id
        HAVING COUNT(st.id) FILTER (WHERE st.booked = FALSE) >= $4
        ORDER BY sh.id
        "#,
    )
    .bind(movie_id)
    .bind(hall_id)
    .bind(exclude_show_id)
    .bind(group_size as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(show_id, available_seats)| ShowSuggestion {
            show_id,
            available_seats,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::collections::HashSet;

    fn seat(id: i64, row: i32, number: i32) -> Seat {
        Seat {
            id,
            show_id: 1,
            row,
            number,
            booked: false,
        }
    }

    fn numbers(window: &[Seat]) -> Vec<i32> {
        window.iter().map(|s| s.number).collect()
    }

    #[test]
    fn gap_in_row_rejects_window() {
        // Ряд [1,2,3,5,6]: для группы из 3 валидно только окно [1,2,3]
        let seats = vec![
            seat(1, 1, 1),
            seat(2, 1, 2),
            seat(3, 1, 3),
            seat(5, 1, 5),
            seat(6, 1, 6),
        ];
        let window = find_contiguous_window(&seats, 3).expect("window [1,2,3] must be found");
        assert_eq!(numbers(window), vec![1, 2, 3]);
        // Через разрыв окна нет даже из свободных мест
        assert!(find_contiguous_window(&seats, 4).is_none());
    }

    #[test]
    fn leftmost_offset_wins_within_row() {
        let seats = vec![
            seat(1, 1, 1),
            seat(2, 1, 2),
            seat(3, 1, 3),
            seat(5, 1, 5),
            seat(6, 1, 6),
        ];
        let window = find_contiguous_window(&seats, 2).unwrap();
        assert_eq!(numbers(window), vec![1, 2]);
    }

    #[test]
    fn lowest_row_wins_across_rows() {
        // В ряду 1 только пара, в ряду 2 тройка: пара должна браться из ряда 1
        let seats = vec![
            seat(10, 1, 7),
            seat(11, 1, 8),
            seat(20, 2, 1),
            seat(21, 2, 2),
            seat(22, 2, 3),
        ];
        let pair = find_contiguous_window(&seats, 2).unwrap();
        assert_eq!((pair[0].row, numbers(pair)), (1, vec![7, 8]));

        let triple = find_contiguous_window(&seats, 3).unwrap();
        assert_eq!((triple[0].row, numbers(triple)), (2, vec![1, 2, 3]));
    }

    #[test]
    fn window_never_spans_rows() {
        // Конец ряда 1 и начало ряда 2 не склеиваются в один блок
        let seats = vec![seat(1, 1, 9), seat(2, 1, 10), seat(3, 2, 1)];
        assert!(find_contiguous_window(&seats, 3).is_none());
    }

    #[test]
    fn group_larger_than_any_row_finds_nothing() {
        let seats = vec![seat(1, 1, 1), seat(2, 1, 2), seat(3, 2, 1)];
        assert!(find_contiguous_window(&seats, 5).is_none());
        assert!(find_contiguous_window(&[], 2).is_none());
    }

    #[test]
    fn exact_row_fit_is_accepted() {
        let seats = vec![seat(1, 3, 4), seat(2, 3, 5), seat(3, 3, 6)];
        let window = find_contiguous_window(&seats, 3).unwrap();
        assert_eq!(numbers(window), vec![4, 5, 6]);
    }

    // Эталонная реализация для сверки: окно с минимальным (row, start),
    // все места которого присутствуют в свободном наборе
    fn brute_force_window(seats: &[Seat], group_size: usize) -> Option<(i32, i32)> {
        let present: HashSet<(i32, i32)> = seats.iter().map(|s| (s.row, s.number)).collect();
        seats
            .iter()
            .filter(|s| (0..group_size as i32).all(|j| present.contains(&(s.row, s.number + j))))
            .map(|s| (s.row, s.number))
            .min()
    }

    proptest! {
        #[test]
        fn window_matches_brute_force_reference(
            pairs in proptest::collection::btree_set((1i32..=4, 1i32..=10), 0..=25),
            group_size in 1usize..=5,
        ) {
            // BTreeSet уже упорядочен по (row, number) - как ORDER BY row, number
            let pairs: BTreeSet<(i32, i32)> = pairs;
            let seats: Vec<Seat> = pairs
                .iter()
                .enumerate()
                .map(|(i, &(row, number))| seat(i as i64 + 1, row, number))
                .collect();

            let expected = brute_force_window(&seats, group_size);
            let actual = find_contiguous_window(&seats, group_size)
                .map(|w| (w[0].row, w[0].number));
            prop_assert_eq!(actual, expected);

            // Найденное окно всегда целиком в одном ряду и строго подряд
            if let Some(window) = find_contiguous_window(&seats, group_size) {
                prop_assert_eq!(window.len(), group_size);
                for (j, s) in window.iter().enumerate() {
                    prop_assert_eq!(s.row, window[0].row);
                    prop_assert_eq!(s.number, window[0].number + j as i32);
                }
            }
        }
    }
}
