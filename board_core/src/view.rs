//! Сборщик представления: соединяет снимок, метрики, проекцию графика и
//! состояние фокуса в готовую к отрисовке структуру.
//!
//! Здесь ничего не вычисляется заново, только компонуются готовые значения.
//! Классификация пересчитывается при каждой сборке.

use crate::chart::{ChartPayload, chart_payload};
use crate::config::{
    CURRENCY_PREFIX, FOCUS_CARD_INSET, NO_PRODUCTS_MESSAGE, NO_TRANSACTIONS_MESSAGE,
};
use crate::focus::FocusState;
use crate::loader::Snapshot;
use crate::metrics::{classify_all, total_stock_value_text};
use crate::models::{DerivedProductRow, Money, StockAction, StockLevel, Transaction};
use crate::traits::{TableRow, ToCell};
use board_macros::TableRow;
use serde::Serialize;

/// Строка таблицы товаров.
#[derive(Debug, Clone, PartialEq, TableRow)]
pub struct ProductRow {
    #[column("Product Name")]
    pub name: String,
    #[column("Quantity")]
    pub quantity: u32,
    #[column("Price")]
    pub price: Money,
    #[column("Stock Level")]
    pub stock_level: StockLevel,
    #[column("Sold Stock")]
    pub sold_stock: u32,
    #[column("Sold Products")]
    pub sold: bool,
}

impl From<&DerivedProductRow<'_>> for ProductRow {
    fn from(row: &DerivedProductRow<'_>) -> Self {
        Self {
            name: row.product.name.clone(),
            quantity: row.product.quantity,
            price: Money(row.product.price),
            stock_level: row.stock_level,
            sold_stock: row.sold_stock_estimate,
            sold: row.is_sold,
        }
    }
}

/// Строка таблицы транзакций.
#[derive(Debug, Clone, PartialEq, TableRow)]
pub struct TransactionRow {
    #[column("Stock Name")]
    pub product_name: String,
    #[column("Quantity Changed")]
    pub quantity_changed: u32,
    #[column("Action")]
    pub action: StockAction,
    #[column("Date & Time")]
    pub date: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            product_name: t.product_name.clone(),
            quantity_changed: t.quantity_changed,
            action: t.action,
            date: t.date.clone(),
        }
    }
}

/// Тело таблицы.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableBody {
    /// Строки с ячейками.
    Rows { rows: Vec<Vec<String>> },
    /// Единственная информационная строка на все колонки.
    Empty { message: &'static str, colspan: usize },
}

/// Готовая к отрисовке таблица.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub body: TableBody,
}

impl Table {
    /// Построить таблицу из строк. Пустой набор строк даёт одну строку
    /// с сообщением `empty_message`.
    pub fn from_rows<R: TableRow>(rows: &[R], empty_message: &'static str) -> Self {
        let headers = R::columns().to_vec();
        let body = if rows.is_empty() {
            TableBody::Empty {
                message: empty_message,
                colspan: headers.len(),
            }
        } else {
            TableBody::Rows {
                rows: rows.iter().map(TableRow::cells).collect(),
            }
        };

        Self { headers, body }
    }

    /// Количество строк тела, включая информационную.
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows { rows } => rows.len(),
            TableBody::Empty { .. } => 1,
        }
    }
}

/// Плавающая карточка товара в фокусе.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusCard {
    pub name: String,
    pub image_url: String,
    /// Положение карточки в координатах графика.
    pub left: f64,
    pub top: f64,
}

/// Итоговое представление панели.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Поколение снимка, из которого собрано представление.
    pub generation: u64,
    /// Строка итога.
    pub summary: String,
    /// Итог без префикса, два знака.
    pub total_stock_value: String,
    pub chart: ChartPayload,
    pub products: Table,
    pub transactions: Table,
    pub focus_card: Option<FocusCard>,
}

/// Собрать представление из снимка и состояния фокуса.
pub fn assemble(snapshot: &Snapshot, focus: &FocusState) -> DashboardView {
    let total = total_stock_value_text(&snapshot.products);

    let product_rows: Vec<ProductRow> = classify_all(&snapshot.products)
        .iter()
        .map(ProductRow::from)
        .collect();
    let transaction_rows: Vec<TransactionRow> = snapshot
        .transactions
        .iter()
        .map(TransactionRow::from)
        .collect();

    let focus_card = focus
        .resolve(&snapshot.products)
        .map(|(product, offset)| FocusCard {
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            left: offset.x + FOCUS_CARD_INSET.0,
            top: offset.y + FOCUS_CARD_INSET.1,
        });

    DashboardView {
        generation: snapshot.generation,
        summary: format!("Total Stock Value: {}{}", CURRENCY_PREFIX, total),
        total_stock_value: total,
        chart: chart_payload(&snapshot.products),
        products: Table::from_rows(&product_rows, NO_PRODUCTS_MESSAGE),
        transactions: Table::from_rows(&transaction_rows, NO_TRANSACTIONS_MESSAGE),
        focus_card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{FocusTracker, HoverEvent, PointerOffset};
    use crate::models::Product;

    fn snapshot() -> Snapshot {
        Snapshot {
            products: vec![
                Product {
                    id: "1".into(),
                    name: "Soap".into(),
                    quantity: 3,
                    price: 2.5,
                    image_url: "soap.png".into(),
                },
                Product {
                    id: "2".into(),
                    name: "Gel".into(),
                    quantity: 25,
                    price: 10.0,
                    image_url: "gel.png".into(),
                },
            ],
            transactions: vec![Transaction {
                product_name: "Soap".into(),
                quantity_changed: 4,
                action: StockAction::Add,
                date: "1/2/2025, 10:00:00".into(),
            }],
            generation: 1,
        }
    }

    #[test]
    fn product_rows_are_rendered() {
        let view = assemble(&snapshot(), &FocusState::Idle);

        assert_eq!(
            view.products.headers,
            vec!["Product Name", "Quantity", "Price", "Stock Level", "Sold Stock", "Sold Products"]
        );
        let TableBody::Rows { rows } = &view.products.body else {
            panic!("ожидаются строки");
        };
        assert_eq!(rows[0], vec!["Soap", "3", "M2.50", "Low Stock", "17", "Yes"]);
        assert_eq!(rows[1], vec!["Gel", "25", "M10.00", "Available", "0", "No"]);
    }

    #[test]
    fn transaction_rows_are_rendered() {
        let view = assemble(&snapshot(), &FocusState::Idle);

        assert_eq!(
            view.transactions.headers,
            vec!["Stock Name", "Quantity Changed", "Action", "Date & Time"]
        );
        let TableBody::Rows { rows } = &view.transactions.body else {
            panic!("ожидаются строки");
        };
        assert_eq!(rows[0], vec!["Soap", "4", "Added", "1/2/2025, 10:00:00"]);
    }

    #[test]
    fn summary_has_prefix_and_two_decimals() {
        let view = assemble(&snapshot(), &FocusState::Idle);
        assert_eq!(view.summary, "Total Stock Value: M257.50");
        assert_eq!(view.total_stock_value, "257.50");
    }

    #[test]
    fn half_cent_total_and_price_round_up() {
        let mut snap = snapshot();
        snap.products.truncate(1);
        snap.products[0].quantity = 1;
        snap.products[0].price = 0.125;

        let view = assemble(&snap, &FocusState::Idle);
        assert_eq!(view.summary, "Total Stock Value: M0.13");
        assert_eq!(view.total_stock_value, "0.13");
        let TableBody::Rows { rows } = &view.products.body else {
            panic!("ожидаются строки");
        };
        assert_eq!(rows[0][2], "M0.13");
    }

    #[test]
    fn empty_snapshot_renders_marker_rows() {
        let view = assemble(&Snapshot::default(), &FocusState::Idle);

        assert_eq!(view.products.row_count(), 1);
        assert_eq!(
            view.products.body,
            TableBody::Empty {
                message: "No Products Available",
                colspan: 6
            }
        );
        assert_eq!(
            view.transactions.body,
            TableBody::Empty {
                message: "No Transactions Available",
                colspan: 4
            }
        );
        assert_eq!(view.summary, "Total Stock Value: M0.00");
    }

    #[test]
    fn focus_card_is_offset_by_inset() {
        let snap = snapshot();
        let mut tracker = FocusTracker::new();
        tracker.on_hover(&HoverEvent::over(1, 40.0, 30.0, (10.0, 10.0)), snap.products.len());

        let card = assemble(&snap, tracker.state()).focus_card.unwrap();
        assert_eq!(card.name, "Gel");
        assert_eq!(card.image_url, "gel.png");
        assert_eq!((card.left, card.top), (40.0, 30.0));
    }

    #[test]
    fn no_focus_card_when_idle_or_stale() {
        let snap = snapshot();
        assert!(assemble(&snap, &FocusState::Idle).focus_card.is_none());

        let stale = FocusState::Focused {
            index: 5,
            offset: PointerOffset::default(),
        };
        assert!(assemble(&snap, &stale).focus_card.is_none());
    }

    #[test]
    fn view_serializes_to_json() {
        let view = assemble(&snapshot(), &FocusState::Idle);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["totalStockValue"], "257.50");
        assert_eq!(json["products"]["body"]["kind"], "rows");
        assert!(json["focusCard"].is_null());
    }
}
