use crate::barista_actor::{Barista, BaristaPool};
use crate::brewer_actor::{self, Brewer, BrewerPool};
use crate::cashier_actor::{self, CashierActor, CashierContext, CashierPool};
use crate::clients::{EventSink, OrderQueue};
use crate::config::ShopConfig;
use crate::error::ShopError;
use crate::framework::{MachineActor, Outstanding, Worker};
use crate::greeter::GreeterPool;
use crate::grinder_actor::{self, Grinder, GrinderPool};
use crate::model::{Catalog, Customer};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// The pipeline orchestrator.
///
/// `CoffeeShop` is responsible for:
/// - **Wiring**: sizing every pool from configuration and connecting the stages
///   (greeters → cashiers → order queue → baristas → grinders/brewers)
/// - **Lifecycle**: spawning every loop on `open` and joining them on `close`
/// - **Accounting**: owning the outstanding-orders counter `wait_for_orders` waits on
///
/// # Example
///
/// ```ignore
/// let events = EventSystem::start(64);
/// let mut shop = CoffeeShop::new(&config, Arc::new(events.client()))?;
/// shop.open();
///
/// shop.serve_customer(Arc::new(Customer::new("Alice", shop.catalog()))).await?;
/// shop.wait_for_orders().await;
///
/// events.stop().await?;
/// shop.close().await?;
/// ```
pub struct CoffeeShop {
    catalog: Arc<Catalog>,
    greeters: GreeterPool,
    cashiers: Arc<CashierPool>,
    orders: OrderQueue,
    grinders: Arc<GrinderPool>,
    brewers: Arc<BrewerPool>,
    baristas: BaristaPool,
    outstanding: Outstanding,

    /// Loops waiting for `open`.
    idle: Option<Idle>,

    /// Task handles for every running loop (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

struct Idle {
    cashiers: Vec<CashierActor>,
    cashier_ctx: CashierContext,
    grinders: Vec<MachineActor<Grinder>>,
    brewers: Vec<MachineActor<Brewer>>,
}

impl CoffeeShop {
    /// Builds every pool from `config`. Nothing runs until [`open`](Self::open).
    pub fn new(config: &ShopConfig, events: Arc<dyn EventSink>) -> Result<Self, ShopError> {
        let settings = &config.coffee_shop;
        let simulation = &config.simulation;
        let time_unit = simulation.time_unit();

        let catalog = Arc::new(Catalog::new(settings.coffee_types().to_vec())?);
        let orders = OrderQueue::new(settings.order_queue_size);
        let outstanding = Outstanding::new();

        // 1. Machines
        let (grinder_actors, grinders) =
            grinder_actor::pool(settings.grinder_settings(), time_unit);
        let (brewer_actors, brewers) = brewer_actor::pool(settings.brewer_settings(), time_unit);
        let grinders = Arc::new(grinders);
        let brewers = Arc::new(brewers);

        // 2. Front desk
        let (cashier_actors, cashiers) =
            cashier_actor::new(settings.number_of_cashiers, settings.cashier_queue_size);
        let cashiers = Arc::new(cashiers);
        let greeters = GreeterPool::new(settings.number_of_greeters, cashiers.clone());
        let cashier_ctx = CashierContext {
            orders: orders.clone(),
            events: events.clone(),
            outstanding: outstanding.clone(),
            next_order_id: Arc::new(AtomicU64::new(1)),
            time_unit,
            max_delay_units: simulation.max_cashier_delay_units,
        };

        // 3. Back of house
        let workers: Vec<Arc<dyn Worker>> = (1..=settings.number_of_baristas)
            .map(|id| {
                Arc::new(Barista::new(
                    id,
                    grinders.clone(),
                    brewers.clone(),
                    events.clone(),
                    outstanding.clone(),
                )) as Arc<dyn Worker>
            })
            .collect();

        info!(
            baristas = workers.len(),
            cashiers = settings.number_of_cashiers,
            greeters = settings.number_of_greeters,
            grinders = grinders.capacity(),
            brewers = brewers.capacity(),
            "Coffee shop built"
        );

        Ok(Self {
            catalog,
            greeters,
            cashiers,
            orders,
            grinders,
            brewers,
            baristas: BaristaPool::new(workers),
            outstanding,
            idle: Some(Idle {
                cashiers: cashier_actors,
                cashier_ctx,
                grinders: grinder_actors,
                brewers: brewer_actors,
            }),
            handles: Vec::new(),
        })
    }

    /// Starts every loop. Calling it again is a no-op.
    pub fn open(&mut self) {
        let Some(idle) = self.idle.take() else {
            return;
        };

        self.handles.extend(idle.grinders.into_iter().map(|a| tokio::spawn(a.run())));
        self.handles.extend(idle.brewers.into_iter().map(|a| tokio::spawn(a.run())));
        self.handles.extend(self.baristas.start(self.orders.subscribe()));
        self.handles.extend(
            idle.cashiers
                .into_iter()
                .map(|a| tokio::spawn(a.run(idle.cashier_ctx.clone()))),
        );
        info!(tasks = self.handles.len(), "Coffee shop open");
    }

    /// The catalog customers order from.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    /// Orders accepted but not yet handed over.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Counts the customer's order as outstanding and sends them to a greeter.
    #[instrument(skip(self, customer), fields(customer = customer.name()))]
    pub async fn serve_customer(&self, customer: Arc<Customer>) -> Result<(), ShopError> {
        self.outstanding.add(1);
        if let Err(e) = self.greeters.assign_customer(customer).await {
            self.outstanding.done()?;
            return Err(e);
        }
        Ok(())
    }

    /// Waits until every served customer's order is completed (or given up on).
    pub async fn wait_for_orders(&self) {
        self.outstanding.wait_idle().await;
        info!("All orders served");
    }

    /// Drains and stops the whole pipeline.
    ///
    /// Closing order follows the data flow: once the front desk is gone the cashiers
    /// finish their queues and drop the order queue, the baristas drain it and drop
    /// their machine leases, and the machines stop last.
    pub async fn close(self) -> Result<(), String> {
        info!("Closing coffee shop...");

        // =====================================================================
        // Step 1: Close every channel by dropping its senders
        // =====================================================================
        self.greeters.close();
        self.cashiers.close().await;
        drop(self.greeters);
        drop(self.cashiers);
        drop(self.orders);
        drop(self.baristas);
        drop(self.grinders);
        drop(self.brewers);
        drop(self.idle);

        // =====================================================================
        // Step 2: Wait for every loop to finish
        // =====================================================================
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Shop task failed: {:?}", e);
                return Err(format!("Shop task failed: {:?}", e));
            }
        }

        info!("Coffee shop closed");
        Ok(())
    }
}
