//! Обработка аргументов командной строки при запуске приложения.
//!
//! Пользователь может указать:
//! - каталог файлового хранилища
//! - паузу между складскими операциями
//! - количество операций до остановки
//! - заполнение пустого хранилища демонстрационным каталогом

use crate::config::{DATA_FOLDER, DEFAULT_INTERVAL_MS, INTERVAL_MS_ALLOWED};
use board_core::workspace_path;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(about = "Stock Feed. Simulated warehouse agent writing stock adjustments.")]
#[command(author, version, long_about = None)]
struct CliArgs {
    /// Store directory with products.json and transactions.json.
    #[arg(short, long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Pause between adjustments in milliseconds.
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_MS, value_parser = validate_interval)]
    interval_ms: u64,

    /// Stop after this many adjustments (runs until CTRL-C when omitted).
    #[arg(short, long)]
    count: Option<u64>,

    /// Write a demo catalog when the store has no products.
    #[arg(long)]
    seed: bool,
}

/// Валидатор для поля `interval_ms`.
fn validate_interval(s: &str) -> Result<u64, String> {
    let ms: u64 = s.parse().map_err(|_| format!("invalid interval: {s}"))?;
    if INTERVAL_MS_ALLOWED.contains(&ms) {
        Ok(ms)
    } else {
        Err(format!(
            "interval {} not in range {}..={}",
            s,
            INTERVAL_MS_ALLOWED.start(),
            INTERVAL_MS_ALLOWED.end()
        ))
    }
}

/// Параметры, полученные из командной строки при запуске приложения.
#[derive(Debug)]
pub struct FeedSet {
    /// Каталог файлового хранилища.
    pub store_dir: PathBuf,
    /// Пауза между операциями.
    pub interval: Duration,
    /// Предел количества операций.
    pub count: Option<u64>,
    /// Заполнить пустое хранилище.
    pub seed: bool,
}

impl FeedSet {
    fn new(args: &CliArgs) -> Self {
        Self {
            store_dir: args
                .store
                .clone()
                .unwrap_or_else(|| workspace_path(DATA_FOLDER)),
            interval: Duration::from_millis(args.interval_ms),
            count: args.count,
            seed: args.seed,
        }
    }
}

/// Получить от пользователя первичные настройки приложения.
pub fn parse_cli_args() -> FeedSet {
    let args = CliArgs::parse();

    FeedSet::new(&args)
}
