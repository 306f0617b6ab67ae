//! Модели данных для приложений.

use crate::config::{CURRENCY_PREFIX, FULL_RESTOCK_LEVEL, LOW_STOCK_THRESHOLD};
use crate::errors::BoardError;
use crate::metrics::format_amount;
use board_macros::LabelEnum;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Товар складского учёта после нормализации.
///
/// `image_url` никогда не бывает пустым: загрузчик подставляет заглушку.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Непрозрачный идентификатор, стабильный между перезагрузками.
    pub id: String,
    /// Отображаемое название.
    pub name: String,
    /// Текущий остаток.
    pub quantity: u32,
    /// Цена за единицу.
    pub price: f64,
    /// Ссылка на изображение товара.
    pub image_url: String,
}

/// Вид складской операции.
#[derive(Debug, Clone, Copy, PartialEq, Eq, LabelEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    /// Пополнение.
    #[label("Added")]
    #[alias("add")]
    Add,
    /// Списание.
    #[label("Deducted")]
    #[alias("deduct")]
    Deduct,
}

impl StockAction {
    /// Разобрать «сырое» значение из хранилища: только `add` означает
    /// пополнение, любое другое значение трактуется как списание.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("add") {
            StockAction::Add
        } else {
            StockAction::Deduct
        }
    }
}

/// Историческая запись об изменении остатка.
///
/// `product_name` денормализован: журнал неизменяем и должен отображаться,
/// даже если товар переименован или удалён.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Название товара на момент операции.
    pub product_name: String,
    /// Количество изменённых единиц.
    pub quantity_changed: u32,
    /// Вид операции.
    pub action: StockAction,
    /// Дата и время в отображаемом виде.
    pub date: String,
}

/// Уровень запаса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, LabelEnum, Serialize)]
pub enum StockLevel {
    /// Остаток ниже порога.
    #[label("Low Stock")]
    #[alias("low")]
    Low,
    /// Достаточный остаток.
    #[label("Available")]
    Available,
}

impl StockLevel {
    /// Уровень запаса для остатка `quantity`.
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity < LOW_STOCK_THRESHOLD {
            StockLevel::Low
        } else {
            StockLevel::Available
        }
    }
}

/// Товар с производными показателями. Не сохраняется.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedProductRow<'a> {
    /// Исходный товар из снимка.
    pub product: &'a Product,
    /// Уровень запаса.
    pub stock_level: StockLevel,
    /// Оценка проданного с момента полного пополнения.
    pub sold_stock_estimate: u32,
    /// Были ли продажи (`sold_stock_estimate > 0`).
    pub is_sold: bool,
}

impl<'a> DerivedProductRow<'a> {
    /// Рассчитать показатели для товара.
    ///
    /// Оценка продаж эвристическая: журнал транзакций не используется.
    pub fn derive(product: &'a Product) -> Self {
        let sold_stock_estimate = FULL_RESTOCK_LEVEL.saturating_sub(product.quantity);

        Self {
            product,
            stock_level: StockLevel::for_quantity(product.quantity),
            sold_stock_estimate,
            is_sold: sold_stock_estimate > 0,
        }
    }
}

/// Денежное значение с фиксированным валютным префиксом.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Money(pub f64);

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", CURRENCY_PREFIX, format_amount(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: u32) -> Product {
        Product {
            id: "1".into(),
            name: "Soap".into(),
            quantity,
            price: 1.0,
            image_url: "img.png".into(),
        }
    }

    #[test]
    fn action_from_raw_only_add_is_add() {
        assert_eq!(StockAction::from_raw("add"), StockAction::Add);
        assert_eq!(StockAction::from_raw(" ADD "), StockAction::Add);
        assert_eq!(StockAction::from_raw("deduct"), StockAction::Deduct);
        assert_eq!(StockAction::from_raw("remove"), StockAction::Deduct);
        assert_eq!(StockAction::from_raw(""), StockAction::Deduct);
    }

    #[test]
    fn action_labels() {
        assert_eq!(StockAction::Add.to_string(), "Added");
        assert_eq!(StockAction::Deduct.to_string(), "Deducted");
        assert_eq!("deduct".parse::<StockAction>().unwrap(), StockAction::Deduct);
        assert!("sell".parse::<StockAction>().is_err());
    }

    #[test]
    fn stock_level_labels() {
        assert_eq!(StockLevel::Low.to_string(), "Low Stock");
        assert_eq!(StockLevel::Available.to_string(), "Available");
    }

    #[test]
    fn derive_boundaries() {
        let p = product(0);
        let row = DerivedProductRow::derive(&p);
        assert_eq!(row.stock_level, StockLevel::Low);
        assert_eq!(row.sold_stock_estimate, 20);
        assert!(row.is_sold);

        let p = product(5);
        assert_eq!(DerivedProductRow::derive(&p).stock_level, StockLevel::Available);

        let p = product(20);
        let row = DerivedProductRow::derive(&p);
        assert_eq!(row.sold_stock_estimate, 0);
        assert!(!row.is_sold);

        let p = product(35);
        assert_eq!(DerivedProductRow::derive(&p).sold_stock_estimate, 0);
    }

    #[test]
    fn money_has_prefix_and_two_decimals() {
        assert_eq!(Money(17.5).to_string(), "M17.50");
        assert_eq!(Money(0.0).to_string(), "M0.00");
        assert_eq!(Money(0.125).to_string(), "M0.13");
    }

    #[test]
    fn transaction_action_serializes_lowercase() {
        let t = Transaction {
            product_name: "Soap".into(),
            quantity_changed: 2,
            action: StockAction::Add,
            date: "today".into(),
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["action"], "add");
        assert_eq!(json["productName"], "Soap");
    }
}
