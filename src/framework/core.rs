//! # Core Machine Framework
//!
//! Generic building blocks for the exclusive physical units in the shop (grinders,
//! brewers).
//!
//! ## Key Types
//!
//! - [`Machine`]: what a kind of unit does to an order (how much work, where the result goes).
//! - [`MachineActor`]: the processing loop that owns one physical unit.
//! - [`MachineHandle`]: the cloneable front of a unit, handed out by a
//!   [`ResourcePool`](crate::framework::ResourcePool).
//!
//! A unit is either idle or processing exactly one order. The handoff channel holds a
//! single slot and the handle carries an explicit busy flag, so a second order can never
//! queue behind the first: submitting to a busy unit fails with
//! [`ShopError::MachineBusy`].

use crate::error::ShopError;
use crate::model::Order;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A kind of exclusive processing unit.
///
/// The loop in [`MachineActor`] is written once; each kind only says which quantity of
/// the order it consumes, how fast, and how the finished work is handed back.
pub trait Machine: Send + Sync + 'static {
    /// Kind name used in logs and errors, e.g. `"grinder"`.
    const KIND: &'static str;

    fn tag(&self) -> &str;

    /// Throughput in quantity units per time unit.
    fn rate(&self) -> NonZeroU32;

    /// The quantity of the order this unit works through.
    fn quantity<'a>(&self, order: &'a Order) -> &'a BigDecimal;

    /// Records the elapsed time on the order and fires its readiness signal.
    fn deliver(&self, order: &Order, elapsed: Duration) -> Result<(), ShopError>;

    /// Whole time units needed for `order`: quantity ÷ rate, truncated.
    fn units_for(&self, order: &Order) -> u64 {
        let rate = BigDecimal::from(i64::from(self.rate().get()));
        (self.quantity(order) / &rate)
            .with_scale_round(0, RoundingMode::Down)
            .to_u64()
            .unwrap_or(0)
    }
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// Processing loop for one physical unit.
pub struct MachineActor<M: Machine> {
    machine: Arc<M>,
    receiver: mpsc::Receiver<Arc<Order>>,
    busy: Arc<AtomicBool>,
    time_unit: Duration,
}

impl<M: Machine> MachineActor<M> {
    pub fn new(machine: M, time_unit: Duration) -> (Self, MachineHandle<M>) {
        let (sender, receiver) = mpsc::channel(1);
        let machine = Arc::new(machine);
        let busy = Arc::new(AtomicBool::new(false));
        let actor = Self {
            machine: machine.clone(),
            receiver,
            busy: busy.clone(),
            time_unit,
        };
        let handle = MachineHandle {
            machine,
            sender,
            busy,
        };
        (actor, handle)
    }

    /// Runs until every handle to this unit is dropped.
    pub async fn run(mut self) {
        let kind = M::KIND;
        let tag = self.machine.tag().to_string();
        info!(kind, %tag, "Machine started");

        while let Some(order) = self.receiver.recv().await {
            let units = self.machine.units_for(&order);
            let elapsed = self
                .time_unit
                .saturating_mul(u32::try_from(units).unwrap_or(u32::MAX));
            info!(
                kind,
                %tag,
                order = %order.id(),
                coffee = %order.coffee().spec().name,
                size = %order.coffee().size(),
                quantity = %self.machine.quantity(&order),
                units,
                "Processing"
            );

            tokio::time::sleep(elapsed).await;

            // Idle before delivering: the waiter releases its lease as soon as the
            // signal fires and the next leaseholder must find the unit free.
            self.busy.store(false, Ordering::Release);
            match self.machine.deliver(&order, elapsed) {
                Ok(()) => debug!(kind, %tag, order = %order.id(), ?elapsed, "Delivered"),
                Err(e) => error!(kind, %tag, order = %order.id(), error = %e, "Delivery failed"),
            }
        }

        info!(kind, %tag, "Machine stopped");
    }
}

// =============================================================================
// 3. THE HANDLE
// =============================================================================

/// Cloneable handle to a running unit. This is what pools lease out.
pub struct MachineHandle<M: Machine> {
    machine: Arc<M>,
    sender: mpsc::Sender<Arc<Order>>,
    busy: Arc<AtomicBool>,
}

impl<M: Machine> Clone for MachineHandle<M> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine.clone(),
            sender: self.sender.clone(),
            busy: self.busy.clone(),
        }
    }
}

impl<M: Machine> MachineHandle<M> {
    pub fn tag(&self) -> &str {
        self.machine.tag()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Hands `order` to the unit. Fails fast if the unit is already processing.
    pub async fn submit(&self, order: Arc<Order>) -> Result<(), ShopError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ShopError::MachineBusy {
                kind: M::KIND,
                tag: self.tag().to_string(),
                order: order.id(),
            });
        }
        debug!(kind = M::KIND, tag = self.tag(), order = %order.id(), "Submit");
        self.sender.send(order).await.map_err(|_| {
            self.busy.store(false, Ordering::Release);
            ShopError::MachineStopped {
                kind: M::KIND,
                tag: self.tag().to_string(),
            }
        })
    }
}
