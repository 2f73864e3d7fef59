pub mod seat_map;
pub mod booking;
pub mod group_booking;
pub mod analytics;

use sqlx::{Postgres, Transaction};

// Ограничивает ожидание блокировок строк внутри транзакции: вместо
// вечного ожидания конкурирующий запрос получает 55P03 и уходит на retry.
// SET LOCAL не принимает bind-параметры, значение приходит из конфига.
pub(crate) async fn set_lock_timeout(
    tx: &mut Transaction<'_, Postgres>,
    timeout_ms: u64,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", timeout_ms))
        .execute(&mut **tx)
        .await?;
    Ok(())
}
