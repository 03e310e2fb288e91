use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;

use super::domain::{CartItem, CartItemId, CartOwner, CartSessionKey};
use crate::accounts::UserId;
use crate::config::MAX_TTL_SECS;
use crate::listings::ListingRef;
use crate::store::{lock, RepositoryError, Sequence};

pub trait CartRepository: Send + Sync {
    /// Add `quantity` units of a listing, creating the line when absent.
    fn increment(
        &self,
        owner: &CartOwner,
        listing: ListingRef,
        quantity: u32,
    ) -> Result<CartItem, RepositoryError>;
    fn items(&self, owner: &CartOwner) -> Result<Vec<CartItem>, RepositoryError>;
    /// `Ok(None)` when a zero quantity removed the line.
    fn set_quantity(
        &self,
        owner: &CartOwner,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Option<CartItem>, RepositoryError>;
    fn remove(&self, owner: &CartOwner, item: CartItemId) -> Result<CartItem, RepositoryError>;
    /// Remove and return a whole cart.
    fn take(&self, owner: &CartOwner) -> Result<Vec<CartItem>, RepositoryError>;
    /// Drop every line referencing a listing; returns how many were dropped.
    fn purge(&self, listing: ListingRef) -> Result<usize, RepositoryError>;
}

/// Member carts live until checkout; guest carts expire after `guest_idle` without use.
pub struct InMemoryCartRepository {
    carts: Mutex<Carts>,
    sequence: Sequence,
}

struct Carts {
    members: HashMap<UserId, Vec<CartItem>>,
    guests: Cache<CartSessionKey, Vec<CartItem>>,
}

impl Carts {
    fn lines(&self, owner: &CartOwner) -> Option<Vec<CartItem>> {
        match owner {
            CartOwner::User(id) => self.members.get(id).cloned(),
            CartOwner::Session(key) => self.guests.get(key),
        }
    }

    /// Store `lines` for `owner`, dropping the cart once it is empty.
    fn store(&mut self, owner: &CartOwner, lines: Vec<CartItem>) {
        match (owner, lines.is_empty()) {
            (CartOwner::User(id), true) => {
                self.members.remove(id);
            }
            (CartOwner::User(id), false) => {
                self.members.insert(*id, lines);
            }
            (CartOwner::Session(key), true) => self.guests.invalidate(key),
            (CartOwner::Session(key), false) => self.guests.insert(key.clone(), lines),
        }
    }
}

impl InMemoryCartRepository {
    pub fn new(guest_idle: Duration) -> Self {
        Self {
            carts: Mutex::new(Carts {
                members: HashMap::new(),
                guests: Cache::builder()
                    .time_to_idle(guest_idle.min(Duration::from_secs(MAX_TTL_SECS)))
                    .build(),
            }),
            sequence: Sequence::default(),
        }
    }

    /// Carts currently holding at least one line.
    pub fn cart_count(&self) -> Result<usize, RepositoryError> {
        let carts = lock(&self.carts, "carts")?;
        Ok(carts.members.len() + carts.guests.iter().count())
    }
}

impl CartRepository for InMemoryCartRepository {
    fn increment(
        &self,
        owner: &CartOwner,
        listing: ListingRef,
        quantity: u32,
    ) -> Result<CartItem, RepositoryError> {
        let mut carts = lock(&self.carts, "carts")?;
        let mut lines = carts.lines(owner).unwrap_or_default();
        let line = match lines.iter_mut().find(|line| line.listing == listing) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                line.clone()
            }
            None => {
                let line = CartItem {
                    id: CartItemId(self.sequence.next()),
                    listing,
                    quantity,
                    added_at: Utc::now(),
                };
                lines.push(line.clone());
                line
            }
        };
        carts.store(owner, lines);
        Ok(line)
    }

    fn items(&self, owner: &CartOwner) -> Result<Vec<CartItem>, RepositoryError> {
        Ok(lock(&self.carts, "carts")?
            .lines(owner)
            .unwrap_or_default())
    }

    fn set_quantity(
        &self,
        owner: &CartOwner,
        item: CartItemId,
        quantity: u32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut carts = lock(&self.carts, "carts")?;
        let mut lines = carts.lines(owner).ok_or(RepositoryError::NotFound)?;
        let index = lines
            .iter()
            .position(|line| line.id == item)
            .ok_or(RepositoryError::NotFound)?;

        let updated = if quantity == 0 {
            lines.remove(index);
            None
        } else {
            lines[index].quantity = quantity;
            Some(lines[index].clone())
        };
        carts.store(owner, lines);
        Ok(updated)
    }

    fn remove(&self, owner: &CartOwner, item: CartItemId) -> Result<CartItem, RepositoryError> {
        let mut carts = lock(&self.carts, "carts")?;
        let mut lines = carts.lines(owner).ok_or(RepositoryError::NotFound)?;
        let index = lines
            .iter()
            .position(|line| line.id == item)
            .ok_or(RepositoryError::NotFound)?;
        let removed = lines.remove(index);
        carts.store(owner, lines);
        Ok(removed)
    }

    fn take(&self, owner: &CartOwner) -> Result<Vec<CartItem>, RepositoryError> {
        let mut carts = lock(&self.carts, "carts")?;
        let lines = carts.lines(owner).unwrap_or_default();
        carts.store(owner, Vec::new());
        Ok(lines)
    }

    fn purge(&self, listing: ListingRef) -> Result<usize, RepositoryError> {
        let mut carts = lock(&self.carts, "carts")?;
        let mut dropped = 0;
        carts.members.retain(|_, lines| {
            let before = lines.len();
            lines.retain(|line| line.listing != listing);
            dropped += before - lines.len();
            !lines.is_empty()
        });

        let guests: Vec<(CartSessionKey, Vec<CartItem>)> = carts
            .guests
            .iter()
            .filter(|(_, lines)| lines.iter().any(|line| line.listing == listing))
            .map(|(key, lines)| ((*key).clone(), lines))
            .collect();
        for (key, mut lines) in guests {
            let before = lines.len();
            lines.retain(|line| line.listing != listing);
            dropped += before - lines.len();
            carts.store(&CartOwner::Session(key), lines);
        }
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::{ListingId, ListingKind};

    fn listing(id: u64) -> ListingRef {
        ListingRef {
            kind: ListingKind::Electronics,
            id: ListingId(id),
        }
    }

    #[test]
    fn emptied_carts_are_dropped() {
        let repository = InMemoryCartRepository::new(Duration::from_secs(60));
        let member = CartOwner::User(UserId(1));
        let guest = CartOwner::Session(CartSessionKey::generate());

        let kept = repository.increment(&member, listing(1), 1).expect("member line");
        let removed = repository.increment(&guest, listing(2), 2).expect("guest line");
        assert_eq!(repository.cart_count().expect("count"), 2);

        repository.remove(&member, kept.id).expect("remove member line");
        repository
            .set_quantity(&guest, removed.id, 0)
            .expect("zero guest line");

        assert_eq!(repository.cart_count().expect("count"), 0);
        assert!(matches!(
            repository.remove(&member, kept.id),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn purge_drops_carts_left_empty() {
        let repository = InMemoryCartRepository::new(Duration::from_secs(60));
        let member = CartOwner::User(UserId(1));
        let guest = CartOwner::Session(CartSessionKey::generate());
        repository.increment(&member, listing(1), 1).expect("member line");
        repository.increment(&member, listing(2), 1).expect("member line");
        repository.increment(&guest, listing(1), 3).expect("guest line");

        assert_eq!(repository.purge(listing(1)).expect("purge"), 2);

        assert_eq!(repository.cart_count().expect("count"), 1);
        assert_eq!(repository.items(&member).expect("items").len(), 1);
        assert!(repository.items(&guest).expect("items").is_empty());
    }

    #[test]
    fn idle_guest_carts_expire() {
        let repository = InMemoryCartRepository::new(Duration::from_millis(50));
        let guest = CartOwner::Session(CartSessionKey::generate());
        let member = CartOwner::User(UserId(9));
        repository.increment(&guest, listing(1), 1).expect("guest line");
        repository.increment(&member, listing(1), 1).expect("member line");

        std::thread::sleep(Duration::from_millis(120));

        assert!(repository.items(&guest).expect("items").is_empty());
        assert_eq!(repository.items(&member).expect("items").len(), 1);
    }
}
