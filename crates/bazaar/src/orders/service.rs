use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::repository::OrderRepository;
use super::{Order, OrderDraft, OrderError, OrderId, OrderStatus, PAYMENT_METHOD_MAX_LEN};
use crate::accounts::User;
use crate::listings::{ListingRef, ListingRepository};
use crate::store::RepositoryError;

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { orders, listings }
    }

    /// Place a pending order at the listing's current price, withdrawing stock where tracked.
    pub fn place(&self, buyer: &User, draft: OrderDraft) -> Result<Order, OrderError> {
        if draft.quantity == 0 {
            return Err(OrderError::Invalid("quantity must be at least 1".to_string()));
        }
        let shipping_address = draft.shipping_address.trim().to_string();
        if shipping_address.is_empty() {
            return Err(OrderError::Invalid("shipping address is required".to_string()));
        }
        let payment_method = draft.payment_method.trim().to_string();
        if payment_method.is_empty() || payment_method.chars().count() > PAYMENT_METHOD_MAX_LEN {
            return Err(OrderError::Invalid(format!(
                "payment method must be 1-{PAYMENT_METHOD_MAX_LEN} characters"
            )));
        }

        let listing = self
            .listings
            .fetch(draft.listing)?
            .ok_or(OrderError::ListingNotFound)?;
        if listing.owner == buyer.id {
            return Err(OrderError::OwnListing);
        }
        let unit_price = listing.current_price();
        let total_price = unit_price
            .times(draft.quantity)
            .ok_or_else(|| OrderError::Invalid("order total overflows".to_string()))?;

        match self.listings.take_stock(draft.listing, draft.quantity) {
            Ok(_) => {}
            Err(RepositoryError::Conflict) => {
                return Err(OrderError::InsufficientStock {
                    available: listing.stock().unwrap_or(0),
                })
            }
            Err(RepositoryError::NotFound) => return Err(OrderError::ListingNotFound),
            Err(other) => return Err(OrderError::Repository(other)),
        }

        let order = self.orders.insert(Order {
            id: OrderId(0),
            buyer: buyer.id,
            listing: draft.listing,
            listing_title: listing.title,
            quantity: draft.quantity,
            unit_price,
            total_price,
            shipping_address,
            payment_method,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })?;
        info!(order_id = %order.id, listing = %order.listing, buyer = %buyer.id, "order placed");
        Ok(order)
    }

    /// The buyer's orders, newest first.
    pub fn mine(&self, buyer: &User) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.by_buyer(buyer.id)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(orders)
    }

    pub fn purge_listing(&self, listing: ListingRef) -> Result<usize, OrderError> {
        Ok(self.orders.purge_listing(listing)?)
    }
}
