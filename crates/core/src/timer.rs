//! Session-Owned Background Tasks
//!
//! Periodic timers, one-shot delays and stream forwarders all post their
//! events into the owning session's input channel. Each is represented by a
//! [`TaskHandle`] the session holds; cancelling or dropping the handle stops
//! the task, so nothing outlives the session that started it.

use futures::{Stream, StreamExt};
use std::{future::Future, time::Duration};
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Owning handle for a spawned background task. Aborts the task on drop.
#[derive(Debug)]
pub struct TaskHandle {
    task: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawns an arbitrary task.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    /// Posts `event` every `period`, first one `period` from now.
    pub fn every<T>(period: Duration, tx: UnboundedSender<T>, event: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        Self::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(event.clone()).is_err() {
                    break;
                }
            }
        })
    }

    /// Posts `event` once after `delay`.
    pub fn after<T>(delay: Duration, tx: UnboundedSender<T>, event: T) -> Self
    where
        T: Send + 'static,
    {
        Self::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(event);
        })
    }

    /// Forwards every item of `stream`, mapped through `wrap`, until the
    /// stream ends or the receiver goes away.
    pub fn forward<S, I, T, F>(stream: S, tx: UnboundedSender<T>, wrap: F) -> Self
    where
        S: Stream<Item = I> + Send + 'static,
        I: Send,
        T: Send + 'static,
        F: Fn(I) -> T + Send + 'static,
    {
        Self::spawn(async move {
            let mut stream = Box::pin(stream);
            while let Some(item) = stream.next().await {
                if tx.send(wrap(item)).is_err() {
                    break;
                }
            }
        })
    }

    /// Stops the task. Consumes the handle so it cannot be cancelled twice.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
