//! # One-shot Readiness Signal
//!
//! A single-use rendezvous between a producer (a machine finishing its work) and a
//! consumer (the barista waiting for it). It wraps a Tokio `oneshot` pair so that:
//!
//! - waiting before the producer fires suspends until it does,
//! - firing twice fails with [`SignalError::AlreadyFired`],
//! - waiting twice fails with [`SignalError::AlreadyConsumed`] instead of returning
//!   stale data.

use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;

/// Misuse of a [`ReadySignal`].
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("{0} signal already fired")]
    AlreadyFired(&'static str),
    #[error("{0} signal already consumed")]
    AlreadyConsumed(&'static str),
    #[error("{0} signal dropped before firing")]
    Abandoned(&'static str),
}

/// Single-use readiness signal carrying a value of type `T`.
#[derive(Debug)]
pub struct ReadySignal<T = ()> {
    name: &'static str,
    sender: Mutex<Option<oneshot::Sender<T>>>,
    receiver: Mutex<Option<oneshot::Receiver<T>>>,
}

impl<T> ReadySignal<T> {
    pub fn new(name: &'static str) -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            name,
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
        }
    }

    /// Fires the signal. Only the first call succeeds.
    pub fn fire(&self, value: T) -> Result<(), SignalError> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SignalError::AlreadyFired(self.name))?;
        // A dropped receiver means the waiter is gone; the write still counts as done.
        let _ = sender.send(value);
        Ok(())
    }

    /// Waits for the signal. Only the first call may wait.
    pub async fn wait(&self) -> Result<T, SignalError> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SignalError::AlreadyConsumed(self.name))?;
        receiver.await.map_err(|_| SignalError::Abandoned(self.name))
    }

    pub fn has_fired(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_wait_blocks_until_fired() {
        let signal = Arc::new(ReadySignal::<u32>::new("beans"));
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        signal.fire(7).unwrap();
        assert_eq!(waiter.await.unwrap(), Ok(7));
    }

    #[test]
    fn test_second_fire_fails() {
        let signal = ReadySignal::<()>::new("water");
        signal.fire(()).unwrap();
        assert!(signal.has_fired());
        assert_eq!(signal.fire(()), Err(SignalError::AlreadyFired("water")));
    }

    #[tokio::test]
    async fn test_second_wait_fails_instead_of_returning_stale_value() {
        let signal = ReadySignal::<()>::new("beans");
        signal.fire(()).unwrap();
        assert_eq!(signal.wait().await, Ok(()));
        assert_eq!(signal.wait().await, Err(SignalError::AlreadyConsumed("beans")));
    }
}
