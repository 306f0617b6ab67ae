//! Проекция снимка товаров в серию для поверхности графика.
//!
//! Индекс подписи, индекс значения и индекс товара в снимке совпадают.
//! На этом соответствии построен трекер наведения ([`crate::focus`]).

use crate::config::{
    CHART_BACKGROUND_COLOR, CHART_BORDER_COLOR, CHART_BORDER_WIDTH, CHART_SERIES_LABEL,
};
use crate::models::Product;
use serde::Serialize;

/// Упорядоченная серия «подпись — значение».
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Названия товаров.
    pub labels: Vec<String>,
    /// Остатки товаров.
    pub values: Vec<u32>,
}

impl ChartSeries {
    /// Количество элементов серии.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Пустая ли серия.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Визуальное оформление серии. Не настраивается.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEncoding {
    pub series_label: &'static str,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
    pub begin_at_zero: bool,
    pub tooltip_enabled: bool,
    pub responsive: bool,
}

impl Default for ChartEncoding {
    fn default() -> Self {
        Self {
            series_label: CHART_SERIES_LABEL,
            background_color: CHART_BACKGROUND_COLOR,
            border_color: CHART_BORDER_COLOR,
            border_width: CHART_BORDER_WIDTH,
            begin_at_zero: true,
            // Наведение обрабатывает трекер фокуса.
            tooltip_enabled: false,
            responsive: true,
        }
    }
}

/// Данные для поверхности графика: серия и оформление.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub series: ChartSeries,
    pub encoding: ChartEncoding,
}

/// Построить серию в порядке снимка. Без сортировки и агрегации:
/// одинаковые названия остаются отдельными столбцами.
pub fn project(products: &[Product]) -> ChartSeries {
    let (labels, values) = products
        .iter()
        .map(|p| (p.name.clone(), p.quantity))
        .unzip();

    ChartSeries { labels, values }
}

/// Построить полные данные графика.
pub fn chart_payload(products: &[Product]) -> ChartPayload {
    ChartPayload {
        series: project(products),
        encoding: ChartEncoding::default(),
    }
}
