//! Постоянные параметры движка метрик и отображения.

/// Ключ коллекции товаров в хранилище.
pub const PRODUCTS_KEY: &str = "products";

/// Ключ коллекции транзакций в хранилище.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Изображение для товаров без собственного `imageUrl`.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Остаток строго меньше этого значения считается низким.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Уровень полного пополнения склада, от которого считаются продажи.
pub const FULL_RESTOCK_LEVEL: u32 = 20;

/// Валютный префикс денежных значений.
pub const CURRENCY_PREFIX: &str = "M";

/// Смещение карточки товара относительно указателя (x, y), в пикселях.
pub const FOCUS_CARD_INSET: (f64, f64) = (10.0, 10.0);

/// Подпись единственной серии графика.
pub const CHART_SERIES_LABEL: &str = "Product Quantities";

/// Цвет заливки столбцов графика.
pub const CHART_BACKGROUND_COLOR: &str = "rgba(75, 192, 192, 0.2)";

/// Цвет границы столбцов графика.
pub const CHART_BORDER_COLOR: &str = "rgba(75, 192, 192, 1)";

/// Толщина границы столбцов графика.
pub const CHART_BORDER_WIDTH: u32 = 1;

/// Сообщение пустой таблицы товаров.
pub const NO_PRODUCTS_MESSAGE: &str = "No Products Available";

/// Сообщение пустой таблицы транзакций.
pub const NO_TRANSACTIONS_MESSAGE: &str = "No Transactions Available";
