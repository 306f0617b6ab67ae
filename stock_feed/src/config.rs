//! Конфигурационный файл Stock Feed.

use std::ops::RangeInclusive;

/// Название директории для log-файлов.
pub const LOG_FOLDER: &str = "log";

/// Название каталога хранилища по умолчанию.
pub const DATA_FOLDER: &str = "data";

/// Пауза между складскими операциями по умолчанию, мс.
pub const DEFAULT_INTERVAL_MS: u64 = 1500;

/// Диапазон разрешённых пауз, мс.
pub const INTERVAL_MS_ALLOWED: RangeInclusive<u64> = RangeInclusive::new(50, 60_000);

/// Вероятность пополнения (иначе списание).
pub const ADD_PROBABILITY: f64 = 0.4;

/// Диапазон количества единиц в одной операции.
pub const UNITS_PER_ADJUSTMENT: RangeInclusive<u32> = RangeInclusive::new(1, 8);

/// Формат даты операции в журнале.
pub const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Демонстрационный каталог: название, остаток, цена, изображение.
///
/// У части товаров нет изображения: панель подставит заглушку.
pub const DEMO_CATALOG: &[(&str, u32, f64, Option<&str>)] = &[
    ("Maize Meal 10kg", 24, 115.0, Some("https://images.example.com/maize.jpg")),
    ("Cooking Oil 2L", 12, 64.5, Some("https://images.example.com/oil.jpg")),
    ("Brown Sugar 2kg", 4, 38.75, None),
    ("Rice 5kg", 18, 92.0, Some("https://images.example.com/rice.jpg")),
    ("Tea Bags 100", 2, 27.3, None),
];
