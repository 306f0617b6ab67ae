//! Stock Feed. Имитатор внешнего агента склада: периодически пополняет или
//! списывает случайный товар и дописывает операцию в журнал. Нужен, чтобы
//! проверить обновление Stock Board по уведомлениям хранилища.

use board_core::errors::BoardError;
use board_core::store::FileStore;
use board_core::{init_simple_logger, workspace_path};
use log::{error, info, warn};
use std::process::exit;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

mod cli;
mod config;
mod generator;

use cli::{FeedSet, parse_cli_args};
use config::LOG_FOLDER;
use generator::StockFeed;

fn main() {
    let settings = parse_cli_args();
    init_logger();

    info!("Stock Feed запущен: {:?}", settings);

    if let Err(err) = run(settings) {
        error!("Ошибка генератора: {}", err);
        eprintln!("Ошибка: {}", err);
        exit(1);
    }
}

/// Основной цикл генератора операций.
fn run(settings: FeedSet) -> Result<(), BoardError> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| BoardError::value_err(format!("ошибка установки Ctrl-C: {e}")))?;

    let store = FileStore::open(&settings.store_dir, settings.interval)?;
    let feed = StockFeed::new(store);

    if settings.seed && feed.seed_if_empty()? {
        println!("Записан демонстрационный каталог в {}", settings.store_dir.display());
        info!("Демонстрационный каталог записан");
    }

    println!("Завершить работу можно с помощью CTRL-C/CTRL-BREAK.\n");

    let mut done = 0u64;
    while running.load(Ordering::SeqCst) && settings.count.is_none_or(|limit| done < limit) {
        match feed.next_adjustment()? {
            Some(t) => {
                println!("{} | {} {} | {}", t.date, t.action, t.quantity_changed, t.product_name);
                info!("Операция: {:?}", t);
                done += 1;
            }
            None => warn!("В хранилище нет корректных товаров, операция пропущена"),
        }
        thread::sleep(settings.interval);
    }

    info!("Stock Feed остановлен после {} операций", done);
    Ok(())
}

/// Инициализировать логгер приложения.
fn init_logger() {
    let log_folder = workspace_path(LOG_FOLDER);
    if let Err(err) = init_simple_logger(env!("CARGO_PKG_NAME"), &log_folder) {
        eprintln!("Логгер не инициализирован: {}", err);
    }
}
