//! Background task refreshing an [`IndexCache`] on a fixed interval.

use std::sync::Arc;

use log::{debug, info, warn};
use sindex_common::{
    Result,
    async_runtime::{self, JoinHandle},
    error::Error,
};
use tokio::{sync::watch, time::MissedTickBehavior};

use crate::{
    cache::{IndexCache, RefreshReport},
    config::RefreshConfig,
};

/// Handle to a running refresh loop.
///
/// A failed cycle is logged and the previously installed snapshot stays in
/// place until a later cycle succeeds. Dropping the handle stops the loop
/// without waiting for it; the cache itself is never closed by the refresher.
pub struct Refresher {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Starts the refresh loop on the current runtime.
    pub fn spawn(cache: Arc<IndexCache>, config: RefreshConfig) -> Result<Refresher> {
        config.validate()?;
        let (stop, stopped) = watch::channel(false);
        let task = async_runtime::spawn(run(cache, config, stopped));
        Ok(Refresher {
            stop,
            task: Some(task),
        })
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop and waits for it to exit. An in-flight refresh is
    /// abandoned without touching the cache.
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.stop.send(true);
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| Error::invalid_operation(format!("refresher task: {e}"))),
            None => Ok(()),
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

async fn run(cache: Arc<IndexCache>, config: RefreshConfig, mut stopped: watch::Receiver<bool>) {
    info!(
        "index refresher started: interval {:?}, timeout {:?}",
        config.interval(),
        config.timeout()
    );
    let mut ticker = tokio::time::interval(config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    if !config.refresh_on_start {
        // The first tick completes immediately.
        ticker.tick().await;
    }

    loop {
        tokio::select! {
            _ = stopped.changed() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = stopped.changed() => break,
            result = refresh_once(&cache, &config) => match result {
                Ok(report) => debug!(
                    "index refresh complete: {} indexes, {} skipped",
                    report.index_count,
                    report.diagnostics.len()
                ),
                Err(e) => warn!("index refresh failed, keeping previous snapshot: {e}"),
            },
        }
    }
    info!("index refresher stopped");
}

async fn refresh_once(cache: &IndexCache, config: &RefreshConfig) -> Result<RefreshReport> {
    match config.timeout() {
        Some(timeout) => async_runtime::with_timeout(timeout, cache.refresh())
            .await
            .unwrap_or_else(|| Err(Error::timeout("index refresh", timeout))),
        None => cache.refresh().await,
    }
}
