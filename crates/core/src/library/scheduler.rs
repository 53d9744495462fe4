//! Periodic backup job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Catalog, FlushError, Persistence};

/// Wakes every `interval` and flushes the catalog if it is dirty.
pub struct BackupScheduler {
    persistence: Arc<Persistence>,
    catalog: Arc<Catalog>,
    interval: Duration,

    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BackupScheduler {
    pub fn new(persistence: Arc<Persistence>, catalog: Arc<Catalog>, interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            persistence,
            catalog,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Spawn the backup loop.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Backup scheduler already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let persistence = Arc::clone(&self.persistence);
        let catalog = Arc::clone(&self.catalog);
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            info!("Backup loop started (interval {:?})", interval);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Backup loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        // Errors are logged and reflected in health by the gate itself.
                        if let Err(e) = Self::tick(&persistence, &catalog).await {
                            debug!("Backup tick failed, retrying next interval: {}", e);
                        }
                    }
                }
            }
            info!("Backup loop stopped");
        });

        *self.task.lock().await = Some(handle);
    }

    /// Signal the loop to exit and wait for it.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Backup scheduler not running");
            return;
        }

        info!("Stopping backup scheduler");
        let _ = self.shutdown_tx.send(());

        if let Some(handle) = self.task.lock().await.take() {
            if let Err(e) = handle.await {
                warn!("Backup loop ended abnormally: {}", e);
            }
        }
    }

    /// One scheduled tick: flush on a blocking thread if dirty.
    pub async fn tick(
        persistence: &Arc<Persistence>,
        catalog: &Arc<Catalog>,
    ) -> Result<bool, FlushError> {
        let persistence = Arc::clone(persistence);
        let catalog = Arc::clone(catalog);
        tokio::task::spawn_blocking(move || persistence.flush_if_dirty(&catalog))
            .await
            .map_err(|e| FlushError::Task(e.to_string()))?
    }
}
