//! Инструменты для генерации случайных складских событий.

use rand::distr::uniform::SampleUniform;
use rand::prelude::*;
use std::ops::RangeInclusive;

/// Выбрать случайный элемент среза.
///
/// ## Пример
///
/// ```
/// use board_core::randomizer::random_item;
///
/// let names = ["Soap", "Gel", "Wax"];
/// let picked = random_item(&names).unwrap();
///
/// assert!(names.contains(picked));
/// ```
///
/// ## Returns
///
/// Ссылка на случайный элемент. Если срез пустой, то `None`.
pub fn random_item<T>(items: &[T]) -> Option<&T> {
    let mut rng = rand::rng();
    items.choose(&mut rng)
}

/// Генерировать случайное число из диапазона (включительно).
///
/// Паникует, если диапазон пуст.
pub fn random_in<T>(range: RangeInclusive<T>) -> T
where
    T: SampleUniform + PartialOrd,
{
    let mut rng = rand::rng();
    rng.random_range(range)
}

/// Случайное значение `true` или `false`, с учётом предоставленного критерия
/// вероятности.
///
/// ## Args
///
/// - `prob` — вероятность результата быть `true`. Значения от 0 до 1.
///
/// Паникует, если `prob < 0` или `prob > 1`.
pub fn random_bool(prob: f64) -> bool {
    let mut rng = rand::rng();
    rng.random_bool(prob)
}
