//! Универсальные трейты для отрисовки таблиц Stock Board.

use crate::models::{Money, StockAction, StockLevel};

/// Значение, которое умеет превращаться в текст ячейки таблицы.
pub trait ToCell {
    /// Текст ячейки.
    fn to_cell(&self) -> String;
}

/// Строка таблицы с фиксированным набором колонок.
///
/// Обычно реализуется через `#[derive(TableRow)]` из `board_macros`.
pub trait TableRow {
    /// Заголовки колонок.
    fn columns() -> &'static [&'static str];
    /// Ячейки строки, по одной на колонку.
    fn cells(&self) -> Vec<String>;
}

macro_rules! display_cell {
    ($($t:ty),*) => {
        $(impl ToCell for $t {
            fn to_cell(&self) -> String {
                self.to_string()
            }
        })*
    };
}

display_cell!(String, u32, usize, Money, StockAction, StockLevel);

impl ToCell for bool {
    fn to_cell(&self) -> String {
        let text = if *self { "Yes" } else { "No" };
        text.to_string()
    }
}
