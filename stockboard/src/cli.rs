//! Обработка аргументов командной строки при запуске приложения.
//! ## Пример
//!
//! ```text
//! $ stockboard --store ./data --poll-ms 500 --format json
//! ```

use crate::config::{DATA_FOLDER, DEFAULT_POLL_MS, POLL_MS_ALLOWED};
use board_core::loader::RefreshScope;
use board_core::workspace_path;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Формат вывода представления.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Текстовые таблицы.
    Text,
    /// Одна JSON-строка на каждое обновление.
    Json,
}

#[derive(Parser, Debug)]
#[clap(about = "Stock Board. Read-only inventory snapshot with live refresh.")]
#[clap(author, version, long_about = None)]
struct CliArgs {
    /// Store directory with products.json and transactions.json.
    #[clap(short, long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Store polling interval in milliseconds.
    #[clap(short, long, default_value_t = DEFAULT_POLL_MS, value_parser = poll_in_range)]
    poll_ms: u64,

    /// Re-read the transaction log on store changes too (products only by default).
    #[clap(long)]
    refresh_transactions: bool,

    /// Output format.
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Render the snapshot once and exit.
    #[clap(long)]
    once: bool,
}

/// Валидатор для поля `poll_ms`.
fn poll_in_range(s: &str) -> Result<u64, String> {
    let ms: u64 = s.parse().map_err(|_| format!("invalid interval: {s}"))?;
    if POLL_MS_ALLOWED.contains(&ms) {
        Ok(ms)
    } else {
        Err(format!(
            "interval {} not in range {}..={}",
            s,
            POLL_MS_ALLOWED.start(),
            POLL_MS_ALLOWED.end()
        ))
    }
}

/// Параметры, полученные из командной строки при запуске приложения.
#[derive(Debug)]
pub struct BoardSet {
    /// Каталог файлового хранилища.
    pub store_dir: PathBuf,
    /// Интервал опроса хранилища.
    pub poll_interval: Duration,
    /// Какие коллекции перечитываются по уведомлению.
    pub refresh_scope: RefreshScope,
    /// Формат вывода.
    pub format: OutputFormat,
    /// Одна отрисовка без ожидания событий.
    pub once: bool,
}

impl BoardSet {
    /// Создать экземпляр на основе аргументов из командной строки.
    fn new(args: &CliArgs) -> Self {
        let store_dir = args
            .store
            .clone()
            .unwrap_or_else(|| workspace_path(DATA_FOLDER));
        let refresh_scope = if args.refresh_transactions {
            RefreshScope::All
        } else {
            RefreshScope::ProductsOnly
        };

        Self {
            store_dir,
            poll_interval: Duration::from_millis(args.poll_ms),
            refresh_scope,
            format: args.format,
            once: args.once,
        }
    }
}

/// Получить от пользователя первичные настройки приложения.
pub fn parse_cli_args() -> BoardSet {
    let args = CliArgs::parse();

    BoardSet::new(&args)
}
