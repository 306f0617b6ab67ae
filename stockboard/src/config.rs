//! Конфигурация приложения.

use std::ops::RangeInclusive;

/// Название директории для log-файлов.
pub const LOG_FOLDER: &str = "log";

/// Название каталога хранилища по умолчанию.
pub const DATA_FOLDER: &str = "data";

/// Интервал опроса файлового хранилища по умолчанию, мс.
pub const DEFAULT_POLL_MS: u64 = 250;

/// Диапазон разрешённых интервалов опроса, мс.
pub const POLL_MS_ALLOWED: RangeInclusive<u64> = RangeInclusive::new(20, 10_000);

/// Как часто диспетчер проверяет флаг остановки при отсутствии событий, мс.
pub const DISPATCH_TICK_MS: u64 = 200;

/// Ширина самого длинного столбца текстового графика, символов.
pub const CHART_BAR_WIDTH: usize = 40;
