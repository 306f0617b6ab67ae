//! Движок метрик: чистые функции над снимком товаров.

use crate::models::{DerivedProductRow, Product};

/// Суммарная стоимость запаса: сумма `quantity * price` по всем товарам.
pub fn total_stock_value(products: &[Product]) -> f64 {
    products
        .iter()
        .map(|p| f64::from(p.quantity) * p.price)
        .sum()
}

/// Суммарная стоимость запаса, отформатированная до двух знаков.
///
/// ## Пример
///
/// ```
/// use board_core::metrics::total_stock_value_text;
///
/// assert_eq!(total_stock_value_text(&[]), "0.00");
/// ```
pub fn total_stock_value_text(products: &[Product]) -> String {
    format_amount(total_stock_value(products))
}

/// Денежное значение ровно с двумя знаками после запятой.
///
/// Половина цента округляется от нуля: `0.125` даёт `0.13`.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", (amount * 100.0).round() / 100.0)
}

/// Рассчитать производные показатели товара.
pub fn classify(product: &Product) -> DerivedProductRow<'_> {
    DerivedProductRow::derive(product)
}

/// Рассчитать показатели для всех товаров, сохраняя исходный порядок.
pub fn classify_all(products: &[Product]) -> Vec<DerivedProductRow<'_>> {
    products.iter().map(classify).collect()
}
