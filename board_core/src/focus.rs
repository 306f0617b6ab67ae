//! Трекер наведения: какой товар сейчас в фокусе и где указатель.
//!
//! Конечный автомат с двумя состояниями: `Idle` и `Focused`. Каждое событие
//! наведения полностью пересчитывает состояние, поэтому смещение указателя
//! обновляется и при движении внутри одного столбца.

use crate::models::Product;
use log::debug;
use serde::Serialize;

/// Смещение в пикселях относительно начала области построения графика.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

/// Событие наведения от поверхности графика.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverEvent {
    /// Индекс столбца под указателем, если он есть.
    pub element_index: Option<usize>,
    /// Координата указателя.
    pub pointer_x: f64,
    /// Координата указателя.
    pub pointer_y: f64,
    /// Левый верхний угол области построения (left, top).
    pub plot_origin: (f64, f64),
}

impl HoverEvent {
    /// Указатель над столбцом `index`.
    pub fn over(index: usize, pointer_x: f64, pointer_y: f64, plot_origin: (f64, f64)) -> Self {
        Self {
            element_index: Some(index),
            pointer_x,
            pointer_y,
            plot_origin,
        }
    }

    /// Под указателем нет ни одного столбца.
    pub fn leave(pointer_x: f64, pointer_y: f64) -> Self {
        Self {
            element_index: None,
            pointer_x,
            pointer_y,
            plot_origin: (0.0, 0.0),
        }
    }

    fn offset(&self) -> PointerOffset {
        PointerOffset {
            x: self.pointer_x - self.plot_origin.0,
            y: self.pointer_y - self.plot_origin.1,
        }
    }
}

/// Состояние фокуса.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FocusState {
    #[default]
    Idle,
    Focused {
        /// Позиция товара в текущем снимке.
        index: usize,
        offset: PointerOffset,
    },
}

impl FocusState {
    /// Позиция товара в фокусе.
    pub fn index(&self) -> Option<usize> {
        match self {
            FocusState::Idle => None,
            FocusState::Focused { index, .. } => Some(*index),
        }
    }

    /// Смещение указателя в фокусе.
    pub fn offset(&self) -> Option<PointerOffset> {
        match self {
            FocusState::Idle => None,
            FocusState::Focused { offset, .. } => Some(*offset),
        }
    }

    /// Найти товар в фокусе в снимке `products`.
    ///
    /// Индекс за пределами снимка (снимок перезагрузился) даёт `None`.
    pub fn resolve<'a>(&self, products: &'a [Product]) -> Option<(&'a Product, PointerOffset)> {
        match self {
            FocusState::Idle => None,
            FocusState::Focused { index, offset } => products.get(*index).map(|p| (p, *offset)),
        }
    }
}

/// Владелец состояния фокуса. Единственный компонент, который его изменяет.
#[derive(Debug, Default)]
pub struct FocusTracker {
    state: FocusState,
}

impl FocusTracker {
    /// Создать трекер в состоянии `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущее состояние (только чтение).
    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// Обработать событие наведения.
    ///
    /// `product_count` — длина текущей проекции. Индекс вне диапазона
    /// переводит трекер в `Idle`.
    pub fn on_hover(&mut self, event: &HoverEvent, product_count: usize) -> &FocusState {
        self.state = match event.element_index {
            Some(index) if index < product_count => FocusState::Focused {
                index,
                offset: event.offset(),
            },
            Some(index) => {
                debug!(
                    "Устаревший индекс наведения {} при {} товарах",
                    index, product_count
                );
                FocusState::Idle
            }
            None => FocusState::Idle,
        };
        &self.state
    }

    /// Перепроверить фокус после перезагрузки снимка.
    pub fn revalidate(&mut self, product_count: usize) -> &FocusState {
        if let FocusState::Focused { index, .. } = self.state
            && index >= product_count
        {
            debug!(
                "Фокус на товаре {} сброшен: в снимке {} товаров",
                index, product_count
            );
            self.state = FocusState::Idle;
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(count: usize) -> Vec<Product> {
        (0..count)
            .map(|i| Product {
                id: i.to_string(),
                name: format!("P{i}"),
                quantity: i as u32,
                price: 1.0,
                image_url: "img.png".to_string(),
            })
            .collect()
    }

    #[test]
    fn tracker_starts_idle() {
        assert_eq!(*FocusTracker::new().state(), FocusState::Idle);
    }

    #[test]
    fn hover_then_leave() {
        let snapshot = products(5);
        let mut tracker = FocusTracker::new();

        let state = *tracker.on_hover(&HoverEvent::over(2, 130.0, 85.0, (30.0, 20.0)), snapshot.len());
        assert_eq!(
            state,
            FocusState::Focused {
                index: 2,
                offset: PointerOffset { x: 100.0, y: 65.0 }
            }
        );
        let (product, _) = state.resolve(&snapshot).unwrap();
        assert_eq!(product, &snapshot[2]);

        let state = *tracker.on_hover(&HoverEvent::leave(10.0, 10.0), snapshot.len());
        assert_eq!(state, FocusState::Idle);
    }

    #[test]
    fn moving_over_same_element_updates_offset() {
        let mut tracker = FocusTracker::new();
        tracker.on_hover(&HoverEvent::over(1, 50.0, 50.0, (0.0, 0.0)), 3);
        tracker.on_hover(&HoverEvent::over(1, 55.0, 60.0, (0.0, 0.0)), 3);

        assert_eq!(tracker.state().offset(), Some(PointerOffset { x: 55.0, y: 60.0 }));
    }

    #[test]
    fn out_of_range_index_is_idle() {
        let mut tracker = FocusTracker::new();
        let state = tracker.on_hover(&HoverEvent::over(7, 1.0, 1.0, (0.0, 0.0)), 5);
        assert_eq!(*state, FocusState::Idle);
    }

    #[test]
    fn reload_to_shorter_snapshot_resets_focus() {
        let mut snapshot = products(5);
        let mut tracker = FocusTracker::new();
        tracker.on_hover(&HoverEvent::over(4, 1.0, 1.0, (0.0, 0.0)), snapshot.len());

        snapshot.truncate(3);
        assert!(tracker.state().resolve(&snapshot).is_none());
        assert_eq!(*tracker.revalidate(snapshot.len()), FocusState::Idle);
    }

    #[test]
    fn reload_keeping_index_keeps_focus() {
        let mut tracker = FocusTracker::new();
        tracker.on_hover(&HoverEvent::over(1, 1.0, 1.0, (0.0, 0.0)), 5);

        assert_eq!(tracker.revalidate(2).index(), Some(1));
    }
}
