//! Teardown scope for listener and helper tasks owned by a view.

use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, warn};

#[derive(Default)]
pub struct SubscriptionScope {
    tasks: Mutex<ScopeTasks>,
}

#[derive(Default)]
struct ScopeTasks {
    handles: Vec<JoinHandle<()>>,
    released: bool,
}

impl SubscriptionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` inside the scope. Ignored once the scope has been released.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock();
        if tasks.released {
            debug!("subscription scope already released; task not started");
            return;
        }
        tasks.handles.retain(|handle| !handle.is_finished());
        tasks.handles.push(tokio::spawn(task));
    }

    /// Delivers every event from `rx` to `on_event` until the sender closes or the scope is released.
    pub fn listen<T, F>(&self, mut rx: broadcast::Receiver<T>, mut on_event: F)
    where
        T: Clone + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        self.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => on_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "subscriber lagged behind event stream");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    pub fn active_tasks(&self) -> usize {
        self.lock()
            .handles
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    pub fn release(&self) {
        let mut tasks = self.lock();
        if tasks.released {
            return;
        }
        tasks.released = true;
        for handle in tasks.handles.drain(..) {
            handle.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScopeTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SubscriptionScope {
    fn drop(&mut self) {
        self.release();
    }
}
