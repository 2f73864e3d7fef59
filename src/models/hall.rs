use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Один ряд зала: номер ряда и количество мест в нем.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    pub row: i32,
    pub seats: i32,
}

/// Зал хранит схему рядов сериализованной строкой (`rows_layout`).
/// Кодирование/декодирование происходит только на границе хранилища,
/// весь остальной код работает с типизированным `Vec<RowLayout>`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub theater_id: i64,
    pub name: Option<String>,
    pub rows_layout: String,
}

impl Hall {
    pub fn layout(&self) -> Result<Vec<RowLayout>, serde_json::Error> {
        decode_layout(&self.rows_layout)
    }
}

pub fn encode_layout(layout: &[RowLayout]) -> Result<String, serde_json::Error> {
    serde_json::to_string(layout)
}

pub fn decode_layout(raw: &str) -> Result<Vec<RowLayout>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_preserves_row_order() {
        let layout = decode_layout(r#"[{"row":2,"seats":4},{"row":1,"seats":3}]"#).unwrap();
        assert_eq!(
            layout,
            vec![RowLayout { row: 2, seats: 4 }, RowLayout { row: 1, seats: 3 }]
        );
    }

    #[test]
    fn decode_rejects_malformed_layout() {
        assert!(decode_layout("not a layout").is_err());
        assert!(decode_layout(r#"[{"row":1}]"#).is_err());
    }
}
