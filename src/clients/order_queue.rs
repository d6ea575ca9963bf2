use crate::error::ShopError;
use crate::model::Order;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Bounded FIFO carrying placed orders from cashiers to baristas.
///
/// Every clone publishes into the same queue. The queue closes once every
/// `OrderQueue` clone is dropped; subscriptions then drain what is left and end.
#[derive(Clone)]
pub struct OrderQueue {
    sender: mpsc::Sender<Arc<Order>>,
    receiver: Arc<Mutex<mpsc::Receiver<Arc<Order>>>>,
}

/// Competing-consumer view of an [`OrderQueue`]: each order goes to exactly one
/// subscriber.
#[derive(Clone)]
pub struct OrderSubscription {
    receiver: Arc<Mutex<mpsc::Receiver<Arc<Order>>>>,
}

impl OrderQueue {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Appends `order`, waiting while the queue is full.
    pub async fn publish(&self, order: Arc<Order>) -> Result<(), ShopError> {
        let id = order.id();
        self.sender
            .send(order)
            .await
            .map_err(|_| ShopError::OrderQueueClosed { order: id })?;
        debug!(order = %id, queue_size = self.size(), "Published");
        Ok(())
    }

    pub fn subscribe(&self) -> OrderSubscription {
        OrderSubscription {
            receiver: self.receiver.clone(),
        }
    }

    /// Orders waiting to be picked up. Racy, for reporting only.
    pub fn size(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

impl OrderSubscription {
    /// Next order, or `None` once the queue is closed and empty.
    pub async fn next(&self) -> Option<Arc<Order>> {
        self.receiver.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock;
    use std::collections::HashSet;
    use std::time::Duration;

    #[tokio::test]
    async fn test_orders_come_out_in_publish_order() {
        let queue = OrderQueue::new(4);
        for id in 1..=3 {
            queue.publish(mock::order(id)).await.unwrap();
        }
        assert_eq!(queue.size(), 3);

        let subscription = queue.subscribe();
        for id in 1..=3 {
            assert_eq!(subscription.next().await.unwrap().id().0, id);
        }
        assert_eq!(queue.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_waits_while_full() {
        let queue = OrderQueue::new(1);
        queue.publish(mock::order(1)).await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_secs(5), queue.publish(mock::order(2))).await;
        assert!(blocked.is_err(), "second publish should wait for room");

        let subscription = queue.subscribe();
        assert_eq!(subscription.next().await.unwrap().id().0, 1);
        queue.publish(mock::order(3)).await.unwrap();
        assert_eq!(subscription.next().await.unwrap().id().0, 3);
    }

    #[tokio::test]
    async fn test_each_order_reaches_one_subscriber() {
        let queue = OrderQueue::new(16);
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let subscription = queue.subscribe();
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    while let Some(order) = subscription.next().await {
                        seen.push(order.id().0);
                    }
                    seen
                })
            })
            .collect();

        for id in 0..50 {
            queue.publish(mock::order(id)).await.unwrap();
        }
        drop(queue);

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.await.unwrap());
        }
        assert_eq!(all.len(), 50);
        assert_eq!(all.into_iter().collect::<HashSet<_>>().len(), 50);
    }
}
