//! Хранилище записей «ключ — значение» с уведомлениями об изменениях.
//!
//! Значения хранятся как «сырой» JSON-текст. Разбор и проверка формы
//! записей выполняются загрузчиком снимка ([`crate::loader`]).

use crate::errors::BoardError;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// Уведомление о записи в хранилище.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    /// Ключ изменённой коллекции.
    pub key: String,
}

/// Хранилище коллекций записей.
pub trait RecordStore {
    /// Прочитать «сырое» значение по ключу. `None`, если ключ отсутствует.
    fn get(&self, key: &str) -> Result<Option<String>, BoardError>;

    /// Подписаться на уведомления о любых записях в хранилище.
    fn subscribe(&self) -> Result<Subscription, BoardError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, BoardError> {
        (**self).get(key)
    }

    fn subscribe(&self) -> Result<Subscription, BoardError> {
        (**self).subscribe()
    }
}

/// Подписка на уведомления хранилища.
///
/// При уничтожении подписка снимается: флаг остановки выставляется,
/// поток-наблюдатель (если он есть) завершается и присоединяется.
#[derive(Debug)]
pub struct Subscription {
    events: Receiver<StoreEvent>,
    stop_flag: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl Subscription {
    fn new(
        events: Receiver<StoreEvent>,
        stop_flag: Arc<AtomicBool>,
        watcher: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            events,
            stop_flag,
            watcher,
        }
    }

    /// Канал уведомлений.
    pub fn receiver(&self) -> &Receiver<StoreEvent> {
        &self.events
    }

    /// Явно снять подписку.
    pub fn cancel(self) {
        drop(self)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.watcher.take()
            && let Err(err) = handle.join()
        {
            error!("Поток наблюдения за хранилищем завершился с паникой: {:?}", err);
        }
    }
}

/// Слушатель [`MemoryStore`].
#[derive(Debug)]
struct Listener {
    sender: Sender<StoreEvent>,
    stop_flag: Arc<AtomicBool>,
}

/// Хранилище в памяти процесса.
///
/// Каждая запись через [`MemoryStore::put`] рассылает уведомление всем
/// живым подписчикам.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<Listener>>,
}

impl MemoryStore {
    /// Создать пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }

    /// Записать значение и уведомить подписчиков.
    pub fn put(&self, key: &str, value: impl Into<String>) -> Result<(), BoardError> {
        self.records.lock()?.insert(key.to_string(), value.into());
        self.notify(key)
    }

    fn notify(&self, key: &str) -> Result<(), BoardError> {
        let event = StoreEvent {
            key: key.to_string(),
        };
        self.listeners.lock()?.retain(|listener| {
            !listener.stop_flag.load(Ordering::SeqCst) && listener.sender.send(event.clone()).is_ok()
        });
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoardError> {
        Ok(self.records.lock()?.get(key).cloned())
    }

    fn subscribe(&self) -> Result<Subscription, BoardError> {
        let (sender, events) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        self.listeners.lock()?.push(Listener {
            sender,
            stop_flag: Arc::clone(&stop_flag),
        });
        Ok(Subscription::new(events, stop_flag, None))
    }
}

/// Отпечаток файла коллекции.
///
/// `put` подменяет файл переименованием, поэтому на unix новый inode
/// отличает перезапись той же длины в пределах одного тика времени.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
    inode: u64,
}

impl FileStamp {
    fn of(meta: &fs::Metadata) -> Self {
        #[cfg(unix)]
        let inode = std::os::unix::fs::MetadataExt::ino(meta);
        #[cfg(not(unix))]
        let inode = 0;

        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            inode,
        }
    }
}

/// Хранилище на файловой системе: каталог с файлами `<key>.json`.
///
/// Изменения обнаруживаются опросом каталога с интервалом `poll_interval`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    poll_interval: Duration,
}

impl FileStore {
    /// Открыть (при необходимости создать) каталог хранилища.
    pub fn open(root: impl Into<PathBuf>, poll_interval: Duration) -> Result<Self, BoardError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            poll_interval,
        })
    }

    /// Записать значение по ключу.
    ///
    /// Запись идёт во временный файл с последующим переименованием, чтобы
    /// читатели не увидели файл наполовину.
    pub fn put(&self, key: &str, value: &str) -> Result<(), BoardError> {
        let target = self.path(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Снять отпечатки всех файлов коллекций каталога.
    fn scan(root: &Path) -> io::Result<HashMap<String, FileStamp>> {
        let mut stamps = HashMap::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name.starts_with('.') {
                continue;
            }
            let Some(key) = file_name.strip_suffix(".json") else {
                continue;
            };
            let meta = entry.metadata()?;
            stamps.insert(key.to_string(), FileStamp::of(&meta));
        }
        Ok(stamps)
    }

    /// Сравнить два отпечатка каталога и вернуть изменённые ключи.
    fn changed_keys(
        before: &HashMap<String, FileStamp>,
        after: &HashMap<String, FileStamp>,
    ) -> Vec<String> {
        let mut keys: Vec<String> = after
            .iter()
            .filter(|(key, stamp)| before.get(*key) != Some(stamp))
            .map(|(key, _)| key.clone())
            .chain(
                before
                    .keys()
                    .filter(|key| !after.contains_key(*key))
                    .cloned(),
            )
            .collect();
        keys.sort();
        keys
    }
}

impl RecordStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoardError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn subscribe(&self) -> Result<Subscription, BoardError> {
        let (sender, events) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_flag);
        let root = self.root.clone();
        let poll_interval = self.poll_interval;
        let mut known = Self::scan(&root)?;

        let watcher = thread::spawn(move || {
            info!("Наблюдение за хранилищем {} запущено", root.display());

            'watch: loop {
                thread::sleep(poll_interval);
                if stop.load(Ordering::SeqCst) {
                    break;
                }

                let current = match Self::scan(&root) {
                    Ok(stamps) => stamps,
                    Err(err) => {
                        warn!("Не удалось просмотреть каталог хранилища: {}", err);
                        continue;
                    }
                };

                for key in Self::changed_keys(&known, &current) {
                    if sender.send(StoreEvent { key }).is_err() {
                        break 'watch;
                    }
                }
                known = current;
            }

            info!("Наблюдение за хранилищем {} остановлено", root.display());
        });

        Ok(Subscription::new(events, stop_flag, Some(watcher)))
    }
}
