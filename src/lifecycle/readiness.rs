//! Readiness notification.
//!
//! Callbacks registered before the host is ready run once, when it becomes
//! ready. Callbacks registered afterwards run immediately on the caller's
//! thread. The flag and the waiting list share one lock, so a registration
//! racing the transition lands on exactly one side of it.

use parking_lot::Mutex;
use tokio::sync::watch;

type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct ReadinessInner {
    ready: bool,
    waiting: Vec<ReadyCallback>,
}

pub struct Readiness {
    inner: Mutex<ReadinessInner>,
    signal: watch::Sender<bool>,
}

impl Readiness {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Mutex::new(ReadinessInner::default()),
            signal,
        }
    }

    /// Run `callback` once the host is ready (now, if it already is).
    pub fn ready<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut inner = self.inner.lock();
        if inner.ready {
            drop(inner);
            callback();
        } else {
            inner.waiting.push(Box::new(callback));
        }
    }

    /// Flip to ready and run every waiting callback. Returns false if already ready.
    pub fn mark_ready(&self) -> bool {
        let waiting = {
            let mut inner = self.inner.lock();
            if inner.ready {
                return false;
            }
            inner.ready = true;
            std::mem::take(&mut inner.waiting)
        };

        self.signal.send_replace(true);
        tracing::debug!(callbacks = waiting.len(), "Running ready callbacks");
        for callback in waiting {
            callback();
        }
        true
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock().ready
    }

    /// Resolve once ready.
    pub async fn wait(&self) {
        let mut rx = self.signal.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Readiness")
            .field("ready", &inner.ready)
            .field("waiting", &inner.waiting.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn callback_before_ready_runs_at_transition() {
        let readiness = Readiness::new();
        let (count, callback) = counter();
        readiness.ready(callback);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert!(readiness.mark_ready());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(!readiness.mark_ready());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_after_ready_runs_immediately() {
        let readiness = Readiness::new();
        readiness.mark_ready();
        let (count, callback) = counter();
        readiness.ready(callback);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn racing_registrations_each_run_exactly_once() {
        for _ in 0..50 {
            let readiness = Arc::new(Readiness::new());
            let count = Arc::new(AtomicUsize::new(0));
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let readiness = readiness.clone();
                    let count = count.clone();
                    std::thread::spawn(move || {
                        for _ in 0..25 {
                            let count = count.clone();
                            readiness.ready(move || {
                                count.fetch_add(1, Ordering::SeqCst);
                            });
                        }
                    })
                })
                .collect();
            readiness.mark_ready();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(count.load(Ordering::SeqCst), 100);
        }
    }

    #[tokio::test]
    async fn wait_resolves_after_mark() {
        let readiness = Arc::new(Readiness::new());
        let waiter = {
            let readiness = readiness.clone();
            tokio::spawn(async move { readiness.wait().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        readiness.mark_ready();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        // Already ready: returns at once.
        readiness.wait().await;
    }
}
