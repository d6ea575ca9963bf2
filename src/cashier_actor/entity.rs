//! Cashier: turns customers from its personal queue into published orders.

use crate::clients::{EventSink, OrderQueue};
use crate::error::ShopError;
use crate::framework::Outstanding;
use crate::model::{Customer, Order, OrderId};
use crate::monitor::Event;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// Everything a cashier's loop needs from the rest of the shop, injected at `run`.
#[derive(Clone)]
pub struct CashierContext {
    pub orders: OrderQueue,
    pub events: Arc<dyn EventSink>,
    pub outstanding: Outstanding,
    /// Shared across cashiers so order ids stay unique in the process.
    pub next_order_id: Arc<AtomicU64>,
    pub time_unit: Duration,
    pub max_delay_units: u32,
}

/// The processing side of a cashier. Owns the customer queue receiver.
pub struct CashierActor {
    id: usize,
    customers: mpsc::Receiver<Arc<Customer>>,
    rng: StdRng,
}

/// Cloneable front of a cashier, used by greeters to enqueue customers.
#[derive(Clone)]
pub struct Cashier {
    id: usize,
    customers: mpsc::Sender<Arc<Customer>>,
}

impl CashierActor {
    pub fn new(id: usize, queue_size: usize) -> (Self, Cashier) {
        let (sender, receiver) = mpsc::channel(queue_size.max(1));
        let actor = Self {
            id,
            customers: receiver,
            rng: StdRng::from_entropy(),
        };
        (actor, Cashier { id, customers: sender })
    }

    /// Serves customers until every [`Cashier`] handle is dropped.
    pub async fn run(mut self, ctx: CashierContext) {
        info!(cashier = self.id, "Cashier started");

        while let Some(customer) = self.customers.recv().await {
            let order = match self.place(&customer, &ctx).await {
                Ok(order) => order,
                Err(e) => {
                    error!(
                        cashier = self.id,
                        customer = customer.name(),
                        error = %e,
                        "Order intake failed"
                    );
                    abandon(&ctx.outstanding);
                    continue;
                }
            };

            if let Err(e) = ctx.orders.publish(order.clone()).await {
                error!(cashier = self.id, order = %order.id(), error = %e, "Publish failed");
                abandon(&ctx.outstanding);
                continue;
            }
            if let Err(e) = ctx.events.send_event(Event::OrderReceived(order.clone())).await {
                error!(cashier = self.id, order = %order.id(), error = %e, "Event dropped");
            }
            info!(
                cashier = self.id,
                customer = customer.name(),
                order = %order.id(),
                queue_size = ctx.orders.size(),
                "Customer is done placing order"
            );
        }

        info!(cashier = self.id, "Cashier stopped");
    }

    async fn place(
        &mut self,
        customer: &Arc<Customer>,
        ctx: &CashierContext,
    ) -> Result<Arc<Order>, ShopError> {
        info!(cashier = self.id, customer = customer.name(), "Customer is placing order");
        let id = OrderId(ctx.next_order_id.fetch_add(1, Ordering::SeqCst));
        let order = customer.place_order(id, &mut self.rng)?;
        debug!(
            order = %id,
            coffee = %order.coffee().spec().name,
            size = %order.coffee().size(),
            price = %order.price(),
            "Order taken"
        );

        let units = self.rng.gen_range(0..=ctx.max_delay_units);
        tokio::time::sleep(ctx.time_unit.saturating_mul(units)).await;
        Ok(order)
    }
}

/// The customer will never be served; stop waiting for them.
fn abandon(outstanding: &Outstanding) {
    if let Err(e) = outstanding.done() {
        error!(error = %e, "Outstanding orders out of sync");
    }
}

impl Cashier {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Customers waiting in this cashier's queue. Racy, for balancing and reporting.
    pub fn queue_len(&self) -> usize {
        self.customers.max_capacity() - self.customers.capacity()
    }

    /// Appends `customer` to this cashier's queue, waiting while it is full.
    #[instrument(skip(self, customer), fields(cashier = self.id, customer = customer.name()))]
    pub async fn serve_customer(&self, customer: Arc<Customer>) -> Result<(), ShopError> {
        self.customers
            .send(customer)
            .await
            .map_err(|_| ShopError::CashierClosed { cashier: self.id })
    }
}
