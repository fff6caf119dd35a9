use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

pub mod helpers;
mod migrations;
pub mod repositories;

use migrations::run_migrations;

pub use repositories::local_storage::StoredItem;

/// Path understood by SQLite as a private, non-durable database.
pub const IN_MEMORY_PATH: &str = ":memory:";

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to storage thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join storage thread: {join_err:?}");
            }
        }
    }
}

/// Handle to one profile database. All statements run on a single worker
/// thread, so every call observes the writes of the calls before it.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create storage directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("shree-lodge-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("Storage initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Storage thread shutting down");
            })
            .with_context(|| "failed to spawn storage worker thread")?;

        ready_rx
            .recv()
            .context("storage worker exited before signaling readiness")??;

        info!("Storage initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    /// Opens a database that lives only as long as this handle.
    pub fn in_memory() -> Result<Self> {
        Self::new(PathBuf::from(IN_MEMORY_PATH))
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("Storage caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to storage thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("storage thread terminated unexpectedly"))?
    }
}
