//! Загрузчик снимка записей из хранилища.
//!
//! Граница с хранилищем слабо типизирована: записи разбираются как
//! произвольный JSON, проверяются и дополняются значениями по умолчанию.
//! Загрузка никогда не завершается ошибкой: отсутствующая или повреждённая
//! коллекция считается пустой, а некорректные записи пропускаются.

use crate::config::{PLACEHOLDER_IMAGE_URL, PRODUCTS_KEY, TRANSACTIONS_KEY};
use crate::errors::BoardError;
use crate::models::{Product, StockAction, Transaction};
use crate::store::{RecordStore, StoreEvent, Subscription};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};

/// Какие коллекции перечитываются по уведомлению хранилища.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshScope {
    /// Только товары. Журнал транзакций читается один раз при загрузке.
    #[default]
    ProductsOnly,
    /// Товары и транзакции.
    All,
}

/// Снимок коллекций. Полностью заменяется при каждой перезагрузке.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Товары в порядке хранилища.
    pub products: Vec<Product>,
    /// Транзакции в порядке хранилища.
    pub transactions: Vec<Transaction>,
    /// Номер поколения: растёт при каждой перезагрузке товаров.
    pub generation: u64,
}

/// Владелец снимка. Единственный компонент, который его изменяет.
#[derive(Debug)]
pub struct SnapshotLoader<S: RecordStore> {
    store: S,
    scope: RefreshScope,
    snapshot: Snapshot,
}

impl<S: RecordStore> SnapshotLoader<S> {
    /// Создать загрузчик с пустым снимком.
    pub fn new(store: S, scope: RefreshScope) -> Self {
        Self {
            store,
            scope,
            snapshot: Snapshot::default(),
        }
    }

    /// Прочитать обе коллекции и заменить снимок.
    pub fn load(&mut self) -> &Snapshot {
        self.snapshot = Snapshot {
            products: read_products(&self.store),
            transactions: read_transactions(&self.store),
            generation: self.snapshot.generation + 1,
        };
        info!(
            "Снимок #{} загружен: товаров {}, транзакций {}",
            self.snapshot.generation,
            self.snapshot.products.len(),
            self.snapshot.transactions.len()
        );
        &self.snapshot
    }

    /// Подписаться на уведомления хранилища.
    ///
    /// Каждое полученное событие следует передать в
    /// [`SnapshotLoader::on_external_change`]. Уничтожение подписки снимает её.
    pub fn subscribe(&self) -> Result<Subscription, BoardError> {
        self.store.subscribe()
    }

    /// Обработать внешнее изменение хранилища.
    ///
    /// Товары перечитываются всегда (с нормализацией), транзакции — только
    /// при [`RefreshScope::All`].
    pub fn on_external_change(&mut self, event: &StoreEvent) -> &Snapshot {
        debug!("Изменение хранилища: ключ '{}'", event.key);

        self.snapshot.products = read_products(&self.store);
        if self.scope == RefreshScope::All {
            self.snapshot.transactions = read_transactions(&self.store);
        }
        self.snapshot.generation += 1;

        info!(
            "Снимок #{} перезагружен: товаров {}",
            self.snapshot.generation,
            self.snapshot.products.len()
        );
        &self.snapshot
    }

    /// Текущий снимок (только чтение).
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Прочитать и нормализовать товары.
pub fn read_products(store: &impl RecordStore) -> Vec<Product> {
    read_collection(store, PRODUCTS_KEY)
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalize_product(index, raw) {
            Ok(product) => Some(product),
            Err(err) => {
                warn!("Товар #{} пропущен: {}", index, err);
                None
            }
        })
        .collect()
}

/// Прочитать транзакции.
pub fn read_transactions(store: &impl RecordStore) -> Vec<Transaction> {
    read_collection(store, TRANSACTIONS_KEY)
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalize_transaction(raw) {
            Ok(transaction) => Some(transaction),
            Err(err) => {
                warn!("Транзакция #{} пропущена: {}", index, err);
                None
            }
        })
        .collect()
}

/// Прочитать коллекцию как массив JSON-значений.
fn read_collection(store: &impl RecordStore, key: &str) -> Vec<Value> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("Коллекция '{}' отсутствует в хранилище", key);
            return Vec::new();
        }
        Err(err) => {
            warn!("Коллекция '{}' не прочитана: {}", key, err);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => Vec::new(),
        Ok(other) => {
            warn!(
                "Коллекция '{}' повреждена: ожидается массив, получено {}",
                key,
                json_kind(&other)
            );
            Vec::new()
        }
        Err(err) => {
            warn!("Коллекция '{}' повреждена: {}", key, err);
            Vec::new()
        }
    }
}

/// Проверить запись товара и заполнить необязательные поля.
///
/// Пустой или отсутствующий `imageUrl` заменяется на
/// [`PLACEHOLDER_IMAGE_URL`]; отсутствующий `id` — на позицию записи.
pub fn normalize_product(index: usize, raw: &Value) -> Result<Product, BoardError> {
    let record = as_record(raw)?;

    let id = match record.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("#{index}"),
    };

    let image_url = match record.get("imageUrl") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => PLACEHOLDER_IMAGE_URL.to_string(),
    };

    Ok(Product {
        id,
        name: required_text(record, "name")?,
        quantity: required_count(record, "quantity")?,
        price: required_amount(record, "price")?,
        image_url,
    })
}

/// Проверить запись транзакции.
pub fn normalize_transaction(raw: &Value) -> Result<Transaction, BoardError> {
    let record = as_record(raw)?;

    let action = match record.get("action") {
        Some(Value::String(s)) => StockAction::from_raw(s),
        _ => StockAction::Deduct,
    };

    let date = match record.get("date") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Ok(Transaction {
        product_name: required_text(record, "productName")?,
        quantity_changed: required_count(record, "quantityChanged")?,
        action,
        date,
    })
}

fn as_record(raw: &Value) -> Result<&Map<String, Value>, BoardError> {
    raw.as_object()
        .ok_or_else(|| BoardError::value_err(format!("ожидается объект, получено {}", json_kind(raw))))
}

fn required_text(record: &Map<String, Value>, field: &str) -> Result<String, BoardError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(BoardError::value_err(format!("поле '{field}' отсутствует"))),
    }
}

/// Неотрицательное целое: JSON-число или числовая строка.
fn required_count(record: &Map<String, Value>, field: &str) -> Result<u32, BoardError> {
    let count = match record.get(field) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    count
        .and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| {
            BoardError::value_err(format!(
                "поле '{field}' должно быть неотрицательным целым"
            ))
        })
}

/// Неотрицательное конечное число: JSON-число или числовая строка.
fn required_amount(record: &Map<String, Value>, field: &str) -> Result<f64, BoardError> {
    let amount = match record.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount
        .filter(|a| a.is_finite() && *a >= 0.0)
        .ok_or_else(|| {
            BoardError::value_err(format!(
                "поле '{field}' должно быть неотрицательным числом"
            ))
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn store_with(products: &str, transactions: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.put(PRODUCTS_KEY, products).unwrap();
        store.put(TRANSACTIONS_KEY, transactions).unwrap();
        store
    }

    #[test]
    fn missing_image_gets_placeholder() {
        let p = normalize_product(0, &json!({"id": 1, "name": "Soap", "quantity": 3, "price": 2.5})).unwrap();
        assert_eq!(p.image_url, PLACEHOLDER_IMAGE_URL);

        let p = normalize_product(0, &json!({"id": 1, "name": "Soap", "quantity": 3, "price": 2.5, "imageUrl": ""})).unwrap();
        assert_eq!(p.image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn present_image_is_unchanged() {
        let p = normalize_product(
            0,
            &json!({"id": "a", "name": "Soap", "quantity": 3, "price": 2.5, "imageUrl": "img/soap.png"}),
        )
        .unwrap();
        assert_eq!(p.image_url, "img/soap.png");
        assert_eq!(p.id, "a");
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let p = normalize_product(4, &json!({"name": "Soap", "quantity": "7", "price": "1.25"})).unwrap();
        assert_eq!(p.quantity, 7);
        assert_eq!(p.price, 1.25);
        assert_eq!(p.id, "#4");
    }

    #[test]
    fn invalid_product_records_are_rejected() {
        assert!(normalize_product(0, &json!("Soap")).is_err());
        assert!(normalize_product(0, &json!({"quantity": 1, "price": 1})).is_err());
        assert!(normalize_product(0, &json!({"name": "x", "quantity": -1, "price": 1})).is_err());
        assert!(normalize_product(0, &json!({"name": "x", "quantity": 1.5, "price": 1})).is_err());
        assert!(normalize_product(0, &json!({"name": "x", "quantity": 1, "price": -2})).is_err());
    }

    #[test]
    fn transaction_defaults() {
        let t = normalize_transaction(&json!({"productName": "Soap", "quantityChanged": 2})).unwrap();
        assert_eq!(t.action, StockAction::Deduct);
        assert_eq!(t.date, "");

        let t = normalize_transaction(
            &json!({"productName": "Soap", "quantityChanged": 2, "action": "add", "date": "1/2/2025, 10:00:00"}),
        )
        .unwrap();
        assert_eq!(t.action, StockAction::Add);
        assert_eq!(t.date, "1/2/2025, 10:00:00");
    }

    #[test]
    fn absent_collections_are_empty() {
        let mut loader = SnapshotLoader::new(MemoryStore::new(), RefreshScope::default());
        let snapshot = loader.load();

        assert!(snapshot.products.is_empty());
        assert!(snapshot.transactions.is_empty());
        assert_eq!(snapshot.generation, 1);
    }

    #[test]
    fn corrupt_collections_are_empty() {
        let store = store_with("{not json", r#"{"a": 1}"#);
        let mut loader = SnapshotLoader::new(store, RefreshScope::default());
        let snapshot = loader.load();

        assert!(snapshot.products.is_empty());
        assert!(snapshot.transactions.is_empty());
    }

    #[test]
    fn null_collection_is_empty() {
        let store = store_with("null", "null");
        assert!(read_products(&store).is_empty());
        assert!(read_transactions(&store).is_empty());
    }

    #[test]
    fn load_keeps_store_order_and_skips_bad_records() {
        let store = store_with(
            r#"[{"id":1,"name":"B","quantity":1,"price":1},
                {"id":2,"quantity":1,"price":1},
                {"id":3,"name":"A","quantity":9,"price":2}]"#,
            "[]",
        );
        let mut loader = SnapshotLoader::new(store, RefreshScope::default());
        let names: Vec<_> = loader
            .load()
            .products
            .iter()
            .map(|p| p.name.clone())
            .collect();

        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn change_rereads_products_only_by_default() {
        let store = store_with(
            r#"[{"id":1,"name":"Soap","quantity":1,"price":1}]"#,
            r#"[{"productName":"Soap","quantityChanged":1,"action":"add","date":"d1"}]"#,
        );
        let mut loader = SnapshotLoader::new(Arc::clone(&store), RefreshScope::ProductsOnly);
        loader.load();

        store
            .put(PRODUCTS_KEY, r#"[{"id":1,"name":"Soap","quantity":1,"price":1},{"id":2,"name":"Gel","quantity":4,"price":3}]"#)
            .unwrap();
        store.put(TRANSACTIONS_KEY, "[]").unwrap();

        let snapshot = loader.on_external_change(&StoreEvent {
            key: PRODUCTS_KEY.into(),
        });

        assert_eq!(snapshot.products.len(), 2);
        assert_eq!(snapshot.products[1].image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.generation, 2);
    }

    #[test]
    fn change_rereads_everything_with_all_scope() {
        let store = store_with(
            "[]",
            r#"[{"productName":"Soap","quantityChanged":1,"action":"add","date":"d1"}]"#,
        );
        let mut loader = SnapshotLoader::new(Arc::clone(&store), RefreshScope::All);
        loader.load();

        store.put(TRANSACTIONS_KEY, "[]").unwrap();
        let snapshot = loader.on_external_change(&StoreEvent {
            key: TRANSACTIONS_KEY.into(),
        });

        assert!(snapshot.transactions.is_empty());
    }

    #[test]
    fn reload_replaces_products_instead_of_merging() {
        let store = store_with(
            r#"[{"id":1,"name":"Soap","quantity":1,"price":1},{"id":2,"name":"Gel","quantity":4,"price":3}]"#,
            "[]",
        );
        let mut loader = SnapshotLoader::new(Arc::clone(&store), RefreshScope::default());
        loader.load();

        store.put(PRODUCTS_KEY, r#"[{"id":3,"name":"Wax","quantity":2,"price":5}]"#).unwrap();
        let snapshot = loader.on_external_change(&StoreEvent {
            key: PRODUCTS_KEY.into(),
        });

        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.products[0].id, "3");
    }

    #[test]
    fn subscription_delivers_store_writes() {
        let store = Arc::new(MemoryStore::new());
        let loader = SnapshotLoader::new(Arc::clone(&store), RefreshScope::default());
        let sub = loader.subscribe().unwrap();

        store.put(PRODUCTS_KEY, "[]").unwrap();

        assert_eq!(sub.receiver().try_recv().unwrap().key, PRODUCTS_KEY);
    }
}
