//! Собственные типы ошибок приложения.
//!
//! Для поддержки функциональности применяется крейт `thiserror`.

use std::sync::PoisonError;
use thiserror::Error;

/// Дерево ошибок приложений Stock Board.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Некорректное значение.
    ///
    /// Например, отрицательное количество товара или неизвестная метка.
    #[error("неверное значение: {0}")]
    ValueError(String),

    /// Ошибка ввода-вывода: файлы хранилища, log-файл, вывод представления.
    #[error("ошибка ввода-вывода: {0}")]
    IoError(#[from] std::io::Error),

    /// Ошибка разбора JSON.
    #[error("ошибка разбора JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Некорректная команда поверхности графика.
    #[error("некорректная команда: {0}")]
    CommandError(String),

    /// Ошибка блокировки mutex.
    #[error("ошибка блокировки: {0}")]
    LockError(String),
}

impl<T> From<PoisonError<T>> for BoardError {
    fn from(err: PoisonError<T>) -> Self {
        BoardError::LockError(err.to_string())
    }
}

impl BoardError {
    /// Конструктор для ошибки [`BoardError::ValueError`].
    pub fn value_err(message: impl Into<String>) -> BoardError {
        Self::ValueError(message.into())
    }

    /// Конструктор для ошибки [`BoardError::CommandError`].
    pub fn command_err(message: impl Into<String>) -> BoardError {
        Self::CommandError(message.into())
    }
}
