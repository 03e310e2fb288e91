use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{CartDetail, CartItem, CartItemId, CartLine, CartOwner, CartSessionKey};
use super::repository::CartRepository;
use super::CartError;
use crate::accounts::UserId;
use crate::listings::{ListingId, ListingKind, ListingRef, ListingRepository, Price};
use crate::store::RepositoryError;

pub struct CartService {
    carts: Arc<dyn CartRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { carts, listings }
    }

    /// Put one more unit of a listing in the cart.
    pub fn add(&self, owner: &CartOwner, listing: ListingRef) -> Result<CartItem, CartError> {
        if self.listings.fetch(listing)?.is_none() {
            return Err(CartError::ListingNotFound);
        }
        let item = self.carts.increment(owner, listing, 1)?;
        debug!(%owner, %listing, quantity = item.quantity, "cart line added");
        Ok(item)
    }

    pub fn remove(&self, owner: &CartOwner, item: CartItemId) -> Result<CartItem, CartError> {
        self.carts.remove(owner, item).map_err(item_error)
    }

    /// Set a line's quantity; zero removes the line and yields `None`.
    pub fn set_quantity(
        &self,
        owner: &CartOwner,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Option<CartItem>, CartError> {
        self.carts
            .set_quantity(owner, item, quantity)
            .map_err(item_error)
    }

    /// Resolve every line against its listing, pruning lines whose listing is gone.
    pub fn detail(&self, owner: &CartOwner) -> Result<CartDetail, CartError> {
        let mut lines = Vec::new();
        let mut total = Price::default();

        for item in self.carts.items(owner)? {
            let Some(listing) = self.listings.fetch(item.listing)? else {
                self.carts.remove(owner, item.id)?;
                debug!(%owner, listing = %item.listing, "pruned stale cart line");
                continue;
            };
            let unit_price = listing.current_price();
            let line_total = unit_price.times(item.quantity).unwrap_or(Price(u64::MAX));
            total = total.checked_add(line_total).unwrap_or(Price(u64::MAX));
            lines.push(CartLine {
                id: item.id,
                listing: listing.summary(),
                quantity: item.quantity,
                unit_price,
                line_total,
                added_at: item.added_at,
            });
        }

        Ok(CartDetail {
            item_count: lines.len(),
            items: lines,
            total,
            display_total: total.to_string(),
        })
    }

    pub fn item_count(&self, owner: &CartOwner) -> Result<usize, CartError> {
        Ok(self.carts.items(owner)?.len())
    }

    /// Ids of the listings of one section currently in the cart.
    pub fn carted(
        &self,
        owner: &CartOwner,
        kind: ListingKind,
    ) -> Result<HashSet<ListingId>, CartError> {
        Ok(self
            .carts
            .items(owner)?
            .into_iter()
            .filter(|item| item.listing.kind == kind)
            .map(|item| item.listing.id)
            .collect())
    }

    /// Fold a guest cart into the account's cart after sign-in.
    pub fn merge(&self, session: &CartSessionKey, user: UserId) -> Result<usize, CartError> {
        let guest = self.carts.take(&CartOwner::Session(session.clone()))?;
        let target = CartOwner::User(user);
        let merged = guest.len();
        for item in guest {
            self.carts.increment(&target, item.listing, item.quantity)?;
        }
        if merged > 0 {
            info!(user_id = %user, lines = merged, "guest cart merged");
        }
        Ok(merged)
    }

    pub fn purge_listing(&self, listing: ListingRef) -> Result<usize, CartError> {
        Ok(self.carts.purge(listing)?)
    }
}

fn item_error(err: RepositoryError) -> CartError {
    match err {
        RepositoryError::NotFound => CartError::ItemNotFound,
        other => CartError::Repository(other),
    }
}
