//! Однопоточный диспетчер двух входящих потоков событий.
//!
//! Состояние (снимок и фокус) изменяется только внутри хода диспетчера:
//! поток наблюдения за хранилищем и поток поверхности графика лишь
//! отправляют сообщения, поэтому блокировки не нужны.

use crate::config::DISPATCH_TICK_MS;
use crate::render::Renderer;
use crate::surface::SurfaceEvent;
use board_core::errors::BoardError;
use board_core::focus::{FocusTracker, HoverEvent};
use board_core::loader::{RefreshScope, Snapshot, SnapshotLoader};
use board_core::store::{RecordStore, StoreEvent, Subscription};
use board_core::view::{DashboardView, assemble};
use crossbeam_channel::{Receiver, never, select};
use log::{info, warn};
use std::io::Write;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Две ячейки состояния панели с единственным писателем у каждой:
/// снимок принадлежит загрузчику, фокус — трекеру.
pub struct Board<S: RecordStore> {
    loader: SnapshotLoader<S>,
    tracker: FocusTracker,
}

impl<S: RecordStore> Board<S> {
    pub fn new(store: S, scope: RefreshScope) -> Self {
        Self {
            loader: SnapshotLoader::new(store, scope),
            tracker: FocusTracker::new(),
        }
    }

    /// Первичная загрузка снимка.
    pub fn load(&mut self) -> &Snapshot {
        self.loader.load()
    }

    /// Подписаться на изменения хранилища.
    pub fn subscribe(&self) -> Result<Subscription, BoardError> {
        self.loader.subscribe()
    }

    /// Перезагрузить снимок и перепроверить фокус по новой длине.
    pub fn on_store_event(&mut self, event: &StoreEvent) {
        let count = self.loader.on_external_change(event).products.len();
        self.tracker.revalidate(count);
    }

    /// Применить событие наведения к текущей проекции.
    pub fn on_hover(&mut self, event: &HoverEvent) {
        let count = self.loader.snapshot().products.len();
        self.tracker.on_hover(event, count);
    }

    /// Собрать представление из текущего состояния.
    pub fn view(&self) -> DashboardView {
        assemble(self.loader.snapshot(), self.tracker.state())
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.loader.snapshot()
    }
}

/// Запустить цикл диспетчера.
///
/// Завершается по флагу `stop`, команде `quit` или закрытию обоих каналов.
/// Подписка на хранилище снимается при выходе.
pub fn run<S: RecordStore, W: Write>(
    board: &mut Board<S>,
    subscription: Subscription,
    surface: Receiver<SurfaceEvent>,
    stop: Arc<AtomicBool>,
    renderer: &mut Renderer<W>,
) -> Result<(), BoardError> {
    let mut store_rx = subscription.receiver().clone();
    let mut surface_rx = surface;
    let tick = Duration::from_millis(DISPATCH_TICK_MS);

    renderer.full(&board.view())?;
    info!("Диспетчер запущен");

    loop {
        if stop.load(Ordering::SeqCst) {
            info!("Работа диспетчера прервана...");
            break;
        }

        let mut store_closed = false;
        let mut surface_closed = false;

        select! {
            recv(store_rx) -> msg => match msg {
                Ok(event) => {
                    // Несколько уведомлений подряд дают одну перезагрузку.
                    let pending = store_rx.try_iter().count();
                    if pending > 0 {
                        info!("Объединено уведомлений хранилища: {}", pending + 1);
                    }
                    board.on_store_event(&event);
                    renderer.full(&board.view())?;
                }
                Err(_) => {
                    warn!("Канал уведомлений хранилища закрыт");
                    store_closed = true;
                }
            },
            recv(surface_rx) -> msg => match msg {
                Ok(SurfaceEvent::Hover(event)) => {
                    board.on_hover(&event);
                    renderer.focus(&board.view())?;
                }
                Ok(SurfaceEvent::Render) => renderer.full(&board.view())?,
                Ok(SurfaceEvent::Quit) => {
                    info!("Получена команда завершения");
                    break;
                }
                Err(_) => {
                    info!("Поверхность графика отключена");
                    surface_closed = true;
                }
            },
            default(tick) => {}
        }

        if store_closed {
            store_rx = never();
        }
        if surface_closed {
            surface_rx = never();
        }
    }

    drop(subscription);
    info!("Диспетчер остановлен, подписка на хранилище снята");
    Ok(())
}
