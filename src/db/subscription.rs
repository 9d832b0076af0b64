// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cancellable live-query handles.
//!
//! A subscription owns a background task that re-runs its query whenever the
//! backend signals a change and publishes the full result as the newest
//! snapshot. Dropping the handle or calling [`Subscription::close`] stops the
//! task and releases the backend listener.

use crate::db::Document;
use crate::error::AppError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

type Snapshot<T> = Option<Result<Arc<Vec<Document<T>>>, String>>;

/// Handle to a live query.
pub struct Subscription<T> {
    collection: &'static str,
    snapshots: watch::Receiver<Snapshot<T>>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    /// Start the refresh loop.
    ///
    /// `changes` yields one message per backend change notification, `fetch`
    /// runs the query, and `on_close` runs once when the loop exits.
    pub(crate) fn spawn<F, Fut, C>(
        collection: &'static str,
        mut changes: mpsc::Receiver<()>,
        fetch: F,
        on_close: C,
    ) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Document<T>>, AppError>> + Send,
        C: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            tracing::debug!(collection, "Subscription started");
            loop {
                let snapshot = match fetch().await {
                    Ok(docs) => Ok(Arc::new(docs)),
                    Err(e) => {
                        tracing::error!(collection, error = %e, "Live query refresh failed");
                        Err(e.to_string())
                    }
                };

                if tx.send(Some(snapshot)).is_err() {
                    break;
                }

                tokio::select! {
                    _ = &mut cancel_rx => break,
                    signal = changes.recv() => {
                        if signal.is_none() {
                            break;
                        }
                        // Coalesce bursts into one refresh.
                        while changes.try_recv().is_ok() {}
                    }
                }
            }

            on_close.await;
            tracing::debug!(collection, "Subscription closed");
        });

        Self {
            collection,
            snapshots: rx,
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }

    /// Wait for the next snapshot the caller has not seen yet.
    ///
    /// Returns `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Result<Arc<Vec<Document<T>>>, AppError>> {
        self.snapshots.changed().await.ok()?;
        let snapshot = self.snapshots.borrow_and_update().clone();
        snapshot.map(|s| s.map_err(AppError::Database))
    }

    /// Stop the refresh loop and wait for the backend listener to shut down.
    pub async fn close(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(collection = self.collection, error = %e, "Subscription task failed");
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn() -> std::future::Ready<Result<Vec<Document<u32>>, AppError>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32;
            std::future::ready(Ok(vec![Document {
                id: format!("doc-{n}"),
                data: n,
            }]))
        }
    }

    #[tokio::test]
    async fn test_initial_snapshot_then_refresh_on_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (signal, changes) = mpsc::channel(1);
        let mut sub = Subscription::spawn("things", changes, counting_fetch(calls.clone()), async {});

        let first = sub.next().await.unwrap().unwrap();
        assert_eq!(first[0].data, 0);

        signal.send(()).await.unwrap();
        let second = sub.next().await.unwrap().unwrap();
        assert_eq!(second[0].data, 1);

        sub.close().await;
    }

    #[tokio::test]
    async fn test_close_runs_on_close_hook() {
        let closed = Arc::new(AtomicUsize::new(0));
        let hook = closed.clone();
        let (_signal, changes) = mpsc::channel(1);

        let mut sub = Subscription::spawn(
            "things",
            changes,
            counting_fetch(Arc::new(AtomicUsize::new(0))),
            async move {
                hook.fetch_add(1, Ordering::SeqCst);
            },
        );
        sub.next().await.unwrap().unwrap();
        sub.close().await;

        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_cancels_refresh_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (signal, changes) = mpsc::channel(1);
        let mut sub = Subscription::spawn("things", changes, counting_fetch(calls.clone()), async {});
        sub.next().await.unwrap().unwrap();

        drop(sub);
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The loop has exited, so its receiver is gone.
        assert!(signal.send(()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
