//! Stock Board. Консольная панель складских остатков: таблица товаров,
//! производные показатели продаж, обзорный график и карточка товара под
//! указателем. Снимок обновляется при каждом изменении хранилища.

#![warn(missing_docs)]

use board_core::errors::BoardError;
use board_core::store::FileStore;
use board_core::{init_simple_logger, workspace_path};
use crossbeam_channel::unbounded;
use log::{error, info};
use std::io;
use std::process::exit;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

mod cli;
mod config;
mod dispatcher;
mod render;
mod surface;

use cli::{BoardSet, parse_cli_args};
use config::LOG_FOLDER;
use dispatcher::Board;
use render::Renderer;
use surface::spawn_stdin_surface;

fn main() {
    let settings = parse_cli_args();

    // Инициализация логгера.
    init_logger();
    info!("Stock Board запущен: {:?}", settings);

    if let Err(err) = run(settings) {
        error!("Ошибка работы панели: {}", err);
        eprintln!("Ошибка: {}", err);
        exit(1);
    }

    info!("Stock Board остановлен");
}

/// Организатор работы панели.
fn run(settings: BoardSet) -> Result<(), BoardError> {
    let store = FileStore::open(&settings.store_dir, settings.poll_interval)?;
    let mut board = Board::new(store, settings.refresh_scope);
    board.load();
    if board.snapshot().products.is_empty() {
        info!("Хранилище {} не содержит товаров", settings.store_dir.display());
    }

    let mut renderer = Renderer::new(io::stdout(), settings.format);
    if settings.once {
        return renderer.full(&board.view());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let s = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    })
    .map_err(|e| BoardError::value_err(format!("ошибка установки Ctrl-C: {e}")))?;

    let subscription = board.subscribe()?;

    // Поток stdin не присоединяется: чтение блокирующее, процесс завершится сам.
    let (surface_tx, surface_rx) = unbounded();
    spawn_stdin_surface(surface_tx);

    eprintln!("Хранилище: {}", settings.store_dir.display());
    eprintln!("Команды: hover <i> <x> <y> <left> <top> | leave [<x> <y>] | render | quit");
    eprintln!("Завершить работу можно также с помощью CTRL-C.\n");

    dispatcher::run(&mut board, subscription, surface_rx, stop, &mut renderer)
}

/// Инициализировать логгер приложения.
///
/// Используется метод [`init_simple_logger`] из крейта [`board_core`].
/// Без логгера панель продолжает работу, сообщая об этом в stderr.
fn init_logger() {
    let log_folder = workspace_path(LOG_FOLDER);
    let app_name = env!("CARGO_PKG_NAME");
    if let Err(err) = init_simple_logger(app_name, &log_folder) {
        eprintln!("Логгер не инициализирован: {}", err);
    }
}
