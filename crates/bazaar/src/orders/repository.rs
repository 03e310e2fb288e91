use std::sync::Mutex;

use super::{Order, OrderId};
use crate::accounts::UserId;
use crate::listings::ListingRef;
use crate::store::{lock, RepositoryError, Sequence};

pub trait OrderRepository: Send + Sync {
    fn insert(&self, order: Order) -> Result<Order, RepositoryError>;
    fn by_buyer(&self, buyer: UserId) -> Result<Vec<Order>, RepositoryError>;
    fn purge_listing(&self, listing: ListingRef) -> Result<usize, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    sequence: Sequence,
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, mut order: Order) -> Result<Order, RepositoryError> {
        order.id = OrderId(self.sequence.next());
        lock(&self.orders, "orders")?.push(order.clone());
        Ok(order)
    }

    fn by_buyer(&self, buyer: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(lock(&self.orders, "orders")?
            .iter()
            .filter(|order| order.buyer == buyer)
            .cloned()
            .collect())
    }

    fn purge_listing(&self, listing: ListingRef) -> Result<usize, RepositoryError> {
        let mut orders = lock(&self.orders, "orders")?;
        let before = orders.len();
        orders.retain(|order| order.listing != listing);
        Ok(before - orders.len())
    }
}
