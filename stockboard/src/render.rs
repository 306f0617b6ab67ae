//! Отрисовка собранного представления: текстовые таблицы или JSON.

use crate::cli::OutputFormat;
use crate::config::CHART_BAR_WIDTH;
use board_core::chart::ChartSeries;
use board_core::errors::BoardError;
use board_core::view::{DashboardView, FocusCard, Table, TableBody};
use std::io::Write;

/// Вывод представления в `out` в выбранном формате.
pub struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Вывести представление целиком.
    pub fn full(&mut self, view: &DashboardView) -> Result<(), BoardError> {
        match self.format {
            OutputFormat::Json => self.json(view),
            OutputFormat::Text => {
                let text = dashboard_text(view);
                self.out.write_all(text.as_bytes())?;
                self.out.flush()?;
                Ok(())
            }
        }
    }

    /// Вывести изменение фокуса.
    ///
    /// В текстовом режиме печатается только строка карточки, в JSON — полное
    /// представление, как после любого события.
    pub fn focus(&mut self, view: &DashboardView) -> Result<(), BoardError> {
        match self.format {
            OutputFormat::Json => self.json(view),
            OutputFormat::Text => {
                writeln!(self.out, "{}", focus_line(view.focus_card.as_ref()))?;
                self.out.flush()?;
                Ok(())
            }
        }
    }

    fn json(&mut self, view: &DashboardView) -> Result<(), BoardError> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Текстовое представление панели.
pub fn dashboard_text(view: &DashboardView) -> String {
    let mut text = String::new();

    text.push_str(&format!("== Dashboard (snapshot #{}) ==\n\n", view.generation));
    text.push_str("Product Quantity Overview\n");
    text.push_str(&chart_text(&view.chart.series));
    text.push('\n');
    text.push_str(&view.summary);
    text.push_str("\n\nProduct Inventory\n");
    text.push_str(&table_text(&view.products));
    text.push_str("\nTransaction History\n");
    text.push_str(&table_text(&view.transactions));
    text.push('\n');
    text.push_str(&focus_line(view.focus_card.as_ref()));
    text.push('\n');

    text
}

/// Горизонтальный столбчатый график: ось от нуля, длина по максимуму.
pub fn chart_text(series: &ChartSeries) -> String {
    if series.is_empty() {
        return "  (no data)\n".to_string();
    }

    let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max_value = series.values.iter().copied().max().unwrap_or(0).max(1) as usize;

    series
        .labels
        .iter()
        .zip(&series.values)
        .enumerate()
        .map(|(index, (label, value))| {
            let bar = CHART_BAR_WIDTH * (*value as usize) / max_value;
            format!(
                "  [{index}] {label:<label_width$} | {} {value}\n",
                "#".repeat(bar)
            )
        })
        .collect()
}

/// Таблица в рамке. Пустое тело — одна строка на всю ширину.
pub fn table_text(table: &Table) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    if let TableBody::Rows { rows } = &table.body {
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let border = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!(" {cell:<w$} "))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let headers: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();
    let mut text = String::new();
    text.push_str(&border);
    text.push_str(&line(&headers));
    text.push_str(&border);

    match &table.body {
        TableBody::Rows { rows } => {
            for row in rows {
                text.push_str(&line(row));
            }
        }
        TableBody::Empty { message, colspan } => {
            // Ширина объединённой ячейки: колонки плюс разделители между ними.
            let span: usize = widths.iter().map(|w| w + 2).sum::<usize>() + colspan.saturating_sub(1);
            text.push_str(&format!("|{:^span$}|\n", message));
        }
    }

    text.push_str(&border);
    text
}

/// Строка плавающей карточки.
pub fn focus_line(card: Option<&FocusCard>) -> String {
    match card {
        Some(card) => format!(
            "[focus] {} ({}) at ({:.1}, {:.1})",
            card.name, card.image_url, card.left, card.top
        ),
        None => "[focus] none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::focus::FocusState;
    use board_core::loader::Snapshot;
    use board_core::models::Product;
    use board_core::view::assemble;

    fn snapshot() -> Snapshot {
        Snapshot {
            products: vec![Product {
                id: "1".into(),
                name: "Soap".into(),
                quantity: 3,
                price: 2.5,
                image_url: "soap.png".into(),
            }],
            transactions: vec![],
            generation: 2,
        }
    }

    #[test]
    fn empty_table_has_single_spanning_row() {
        let view = assemble(&Snapshot::default(), &FocusState::Idle);
        let text = table_text(&view.products);
        let lines: Vec<&str> = text.lines().collect();

        // Рамка, заголовок, рамка, строка-сообщение, рамка.
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("No Products Available"));
        assert_eq!(lines[3].chars().count(), lines[0].chars().count());
    }

    #[test]
    fn text_contains_summary_and_rows() {
        let view = assemble(&snapshot(), &FocusState::Idle);
        let text = dashboard_text(&view);

        assert!(text.contains("Total Stock Value: M7.50"));
        assert!(text.contains("Low Stock"));
        assert!(text.contains("No Transactions Available"));
        assert!(text.contains("[focus] none"));
    }

    #[test]
    fn chart_bars_scale_to_maximum() {
        let series = ChartSeries {
            labels: vec!["a".into(), "b".into()],
            values: vec![10, 5],
        };
        let text = chart_text(&series);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains(&"#".repeat(CHART_BAR_WIDTH)));
        assert!(lines[1].contains(&"#".repeat(CHART_BAR_WIDTH / 2)));
        assert!(!lines[1].contains(&"#".repeat(CHART_BAR_WIDTH / 2 + 1)));
    }

    #[test]
    fn json_renderer_writes_one_line() {
        let view = assemble(&snapshot(), &FocusState::Idle);
        let mut renderer = Renderer::new(Vec::new(), OutputFormat::Json);
        renderer.full(&view).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(json["totalStockValue"], "7.50");
    }

    #[test]
    fn focus_line_with_card() {
        let card = FocusCard {
            name: "Soap".into(),
            image_url: "soap.png".into(),
            left: 20.0,
            top: 15.5,
        };
        assert_eq!(focus_line(Some(&card)), "[focus] Soap (soap.png) at (20.0, 15.5)");
    }
}
