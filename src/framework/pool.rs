//! # Exclusive Resource Pool
//!
//! A fixed set of interchangeable resources handed out one lease at a time.
//! Capacity equals the number of resources, so the pool can never oversubscribe:
//! a caller asking for a lease while every resource is out waits (with no timeout)
//! until one is released.
//!
//! The pool is a counting semaphore paired with the free list it guards. A permit is
//! only ever added back together with the resource it stands for.

use crate::error::ShopError;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::Semaphore;
use tracing::debug;

/// Pool of `K` exclusive resources of one kind.
pub struct ResourcePool<R> {
    kind: &'static str,
    capacity: usize,
    free: Mutex<VecDeque<R>>,
    permits: Semaphore,
}

impl<R: Send> ResourcePool<R> {
    pub fn new(kind: &'static str, resources: Vec<R>) -> Self {
        let capacity = resources.len();
        Self {
            kind,
            capacity,
            free: Mutex::new(resources.into()),
            permits: Semaphore::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resources currently not leased. Racy, for reporting only.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits for a free resource and takes exclusive ownership of it.
    pub async fn lease(&self) -> Result<R, ShopError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ShopError::PoolClosed { kind: self.kind })?;
        // Holding a permit guarantees the free list has an entry for us.
        let resource = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or(ShopError::PoolClosed { kind: self.kind })?;
        permit.forget();
        debug!(kind = self.kind, available = self.available(), "Leased");
        Ok(resource)
    }

    /// Returns a leased resource to the pool.
    pub fn release(&self, resource: R) {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(resource);
        self.permits.add_permits(1);
        debug!(kind = self.kind, available = self.available(), "Released");
    }

    /// Fails every pending and future lease. Used during teardown.
    pub fn close(&self) {
        self.permits.close();
    }
}
