//! Stock Board. Движок производных метрик и проекции представления для
//! снимка складских остатков.
//!
//! Поток данных однонаправленный: [`loader`] → {[`metrics`], [`chart`]} →
//! [`view`]. Трекер наведения [`focus`] управляется событиями указателя
//! и подключается к тому же сборщику представления.

use crate::errors::BoardError;
use log::*;
use simplelog::{CombinedLogger, Config, WriteLogger};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod chart;
pub mod config;
pub mod errors;
pub mod focus;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod randomizer;
pub mod store;
pub mod traits;
pub mod view;

/// Фабрика по созданию индивидуальных логгеров для приложений.
///
/// Инициализация требуется один раз при запуске приложения. Далее используются
/// стандартные макросы [`log::info`], [`log::warn`], [`log::error`] для
/// логирования событий.
///
/// ## Args
///
/// - `app_name` — название приложения (будет использовано для создания файла)
/// - `log_dir` — путь к директории расположения log-файлов (при отсутствии
///   пытается создать)
///
/// ## Пример
///
/// ```no_run
/// use board_core::{init_simple_logger, workspace_path};
///
/// init_simple_logger("stockboard", &workspace_path("log")).unwrap();
/// log::info!("Панель запущена");
/// ```
///
/// ## Ошибки
///
/// [`BoardError::IoError`] при ошибке создания директории или log-файла,
/// [`BoardError::ValueError`], если логгер уже инициализирован.
pub fn init_simple_logger(app_name: &str, log_dir: &Path) -> Result<(), BoardError> {
    fs::create_dir_all(log_dir)?;

    let log_file = File::create(log_dir.join(format!("{}.log", app_name)))?;
    let logger = WriteLogger::new(LevelFilter::Info, Config::default(), log_file);

    CombinedLogger::init(vec![logger])
        .map_err(|e| BoardError::value_err(format!("ошибка инициализации логгера: {e}")))
}

/// Путь к каталогу `folder` в корне workspace.
///
/// Для `debug`-сборки корень определяется по расположению `Cargo.toml`
/// крейта, для `release` — по расположению исполняемого файла.
pub fn workspace_path(folder: &str) -> PathBuf {
    workspace_root().join(folder)
}

#[cfg(debug_assertions)]
fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

#[cfg(not(debug_assertions))]
fn workspace_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
