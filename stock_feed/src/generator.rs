//! Генератор складских операций.
//!
//! Работает с «сырыми» JSON-записями хранилища, чтобы не менять форму
//! чужих полей: меняется только `quantity` выбранного товара.

use crate::config::{ADD_PROBABILITY, DATE_FORMAT, DEMO_CATALOG, UNITS_PER_ADJUSTMENT};
use board_core::config::{PRODUCTS_KEY, TRANSACTIONS_KEY};
use board_core::errors::BoardError;
use board_core::loader::normalize_product;
use board_core::models::{Product, StockAction, Transaction};
use board_core::randomizer::{random_bool, random_in, random_item};
use board_core::store::{FileStore, RecordStore};
use chrono::Local;
use log::warn;
use serde_json::{Value, json};

/// Имитатор внешнего агента склада.
///
/// ## Доступные методы
///
/// - [`StockFeed::seed_if_empty`] — заполнить пустое хранилище
///   демонстрационным каталогом
/// - [`StockFeed::next_adjustment`] — случайно пополнить или списать товар
///   и записать операцию в журнал
pub struct StockFeed {
    store: FileStore,
}

impl StockFeed {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Записать демонстрационный каталог, если товаров нет.
    ///
    /// ## Returns
    ///
    /// `true`, если каталог был записан.
    pub fn seed_if_empty(&self) -> Result<bool, BoardError> {
        if !self.read_array(PRODUCTS_KEY)?.is_empty() {
            return Ok(false);
        }

        let catalog: Vec<Value> = DEMO_CATALOG
            .iter()
            .enumerate()
            .map(|(i, (name, quantity, price, image))| {
                let mut record = json!({
                    "id": i + 1,
                    "name": name,
                    "quantity": quantity,
                    "price": price,
                });
                if let Some(url) = image {
                    record["imageUrl"] = json!(url);
                }
                record
            })
            .collect();

        self.write_array(PRODUCTS_KEY, &catalog)?;
        if self.store.get(TRANSACTIONS_KEY)?.is_none() {
            self.write_array(TRANSACTIONS_KEY, &[])?;
        }
        Ok(true)
    }

    /// Выполнить одну случайную операцию.
    ///
    /// Пустой товар всегда пополняется, списание не уходит ниже нуля.
    /// Выбор идёт только среди корректных записей, остальные пропускаются.
    ///
    /// ## Returns
    ///
    /// Записанная операция или `None`, если корректных товаров нет.
    pub fn next_adjustment(&self) -> Result<Option<Transaction>, BoardError> {
        let mut products = self.read_array(PRODUCTS_KEY)?;
        let candidates: Vec<(usize, Product)> = products
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match normalize_product(index, raw) {
                Ok(product) => Some((index, product)),
                Err(err) => {
                    warn!("Товар #{index} пропущен генератором: {err}");
                    None
                }
            })
            .collect();
        let Some((index, product)) = random_item(&candidates).cloned() else {
            return Ok(None);
        };

        let units = random_in(UNITS_PER_ADJUSTMENT);
        let action = if product.quantity == 0 || random_bool(ADD_PROBABILITY) {
            StockAction::Add
        } else {
            StockAction::Deduct
        };
        let (quantity, changed) = apply(product.quantity, units, action);

        products[index]["quantity"] = json!(quantity);

        let transaction = Transaction {
            product_name: product.name,
            quantity_changed: changed,
            action,
            date: Local::now().format(DATE_FORMAT).to_string(),
        };

        let mut transactions = self.read_array(TRANSACTIONS_KEY)?;
        transactions.push(serde_json::to_value(&transaction)?);

        self.write_array(PRODUCTS_KEY, &products)?;
        self.write_array(TRANSACTIONS_KEY, &transactions)?;
        Ok(Some(transaction))
    }

    fn read_array(&self, key: &str) -> Result<Vec<Value>, BoardError> {
        match self.store.get(key)? {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Array(items) => Ok(items),
                Value::Null => Ok(Vec::new()),
                _ => Err(BoardError::value_err(format!(
                    "коллекция '{key}' не является массивом"
                ))),
            },
        }
    }

    fn write_array(&self, key: &str, items: &[Value]) -> Result<(), BoardError> {
        let raw = serde_json::to_string_pretty(items)?;
        self.store.put(key, &raw)
    }
}

/// Применить операцию к остатку.
///
/// ## Returns
///
/// Новый остаток и фактически изменённое количество.
fn apply(quantity: u32, units: u32, action: StockAction) -> (u32, u32) {
    match action {
        StockAction::Add => (quantity.saturating_add(units), units),
        StockAction::Deduct => {
            let changed = units.min(quantity);
            (quantity - changed, changed)
        }
    }
}
