//! Outstanding-work counter: an atomic count paired with a wake-up for waiters.

use crate::error::ShopError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts units of work that have been accepted but not yet finished.
///
/// Cloning shares the same count.
#[derive(Clone, Default)]
pub struct Outstanding {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    count: AtomicUsize,
    idle: Notify,
}

impl Outstanding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: usize) {
        self.inner.count.fetch_add(n, Ordering::SeqCst);
    }

    /// Marks one unit finished. Fails instead of wrapping below zero.
    pub fn done(&self) -> Result<usize, ShopError> {
        let previous = self
            .inner
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map_err(|_| ShopError::CounterUnderflow)?;
        if previous == 1 {
            self.inner.idle.notify_waiters();
        }
        Ok(previous - 1)
    }

    pub fn get(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Waits until the count reaches zero.
    pub async fn wait_idle(&self) {
        loop {
            let idle = self.inner.idle.notified();
            if self.get() == 0 {
                return;
            }
            idle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_idle_returns_after_last_done() {
        let outstanding = Outstanding::new();
        outstanding.add(2);

        let waiter = {
            let outstanding = outstanding.clone();
            tokio::spawn(async move { outstanding.wait_idle().await })
        };

        assert_eq!(outstanding.done(), Ok(1));
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        assert_eq!(outstanding.done(), Ok(0));
        waiter.await.unwrap();
    }

    #[test]
    fn test_done_below_zero_is_rejected() {
        let outstanding = Outstanding::new();
        assert_eq!(outstanding.done(), Err(ShopError::CounterUnderflow));
        assert_eq!(outstanding.get(), 0);
    }
}
