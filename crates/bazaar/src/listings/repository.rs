use std::collections::BTreeMap;
use std::sync::Mutex;

use super::catalog::default_categories;
use super::domain::{
    Category, Counter, Listing, ListingId, ListingKind, ListingRef, RESERVED_SLUGS,
};
use crate::accounts::UserId;
use crate::slug::unique_slug;
use crate::store::{lock, RepositoryError, Sequence};

/// Storage abstraction for listings and their section categories.
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing, assigning its id. `listing.slug` is the slug base; the stored
    /// slug is the first one free within the section and not reserved by a route.
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn update(&self, listing: Listing) -> Result<(), RepositoryError>;
    fn remove(&self, reference: ListingRef) -> Result<Listing, RepositoryError>;
    fn fetch(&self, reference: ListingRef) -> Result<Option<Listing>, RepositoryError>;
    fn find_by_slug(&self, kind: ListingKind, slug: &str)
        -> Result<Option<Listing>, RepositoryError>;
    fn of_kind(&self, kind: ListingKind) -> Result<Vec<Listing>, RepositoryError>;
    fn by_owner(&self, owner: UserId) -> Result<Vec<Listing>, RepositoryError>;
    fn count(&self) -> Result<usize, RepositoryError>;
    /// Increment a counter in place and return the new value.
    fn bump(&self, reference: ListingRef, counter: Counter) -> Result<u32, RepositoryError>;
    /// Withdraw units from stock. `Ok(None)` for sections without stock; `Conflict` when short.
    fn take_stock(&self, reference: ListingRef, quantity: u32)
        -> Result<Option<u32>, RepositoryError>;
    fn categories(&self, kind: ListingKind) -> Result<Vec<Category>, RepositoryError>;
    fn insert_category(&self, category: Category) -> Result<Category, RepositoryError>;
}

pub struct InMemoryListingRepository {
    listings: Mutex<BTreeMap<ListingRef, Listing>>,
    categories: Mutex<Vec<Category>>,
    sequence: Sequence,
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self {
            listings: Mutex::new(BTreeMap::new()),
            categories: Mutex::new(default_categories()),
            sequence: Sequence::default(),
        }
    }
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, mut listing: Listing) -> Result<Listing, RepositoryError> {
        let mut listings = lock(&self.listings, "listings")?;
        let kind = listing.kind();
        listing.slug = unique_slug(&listing.slug, |candidate| {
            RESERVED_SLUGS.contains(&candidate)
                || listings
                    .values()
                    .any(|existing| existing.kind() == kind && existing.slug == candidate)
        });

        listing.id = ListingId(self.sequence.next());
        listings.insert(listing.reference(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: Listing) -> Result<(), RepositoryError> {
        let mut listings = lock(&self.listings, "listings")?;
        match listings.get_mut(&listing.reference()) {
            Some(slot) => {
                *slot = listing;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, reference: ListingRef) -> Result<Listing, RepositoryError> {
        lock(&self.listings, "listings")?
            .remove(&reference)
            .ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, reference: ListingRef) -> Result<Option<Listing>, RepositoryError> {
        Ok(lock(&self.listings, "listings")?.get(&reference).cloned())
    }

    fn find_by_slug(
        &self,
        kind: ListingKind,
        slug: &str,
    ) -> Result<Option<Listing>, RepositoryError> {
        Ok(lock(&self.listings, "listings")?
            .values()
            .find(|listing| listing.kind() == kind && listing.slug == slug)
            .cloned())
    }

    fn of_kind(&self, kind: ListingKind) -> Result<Vec<Listing>, RepositoryError> {
        Ok(lock(&self.listings, "listings")?
            .values()
            .filter(|listing| listing.kind() == kind)
            .cloned()
            .collect())
    }

    fn by_owner(&self, owner: UserId) -> Result<Vec<Listing>, RepositoryError> {
        Ok(lock(&self.listings, "listings")?
            .values()
            .filter(|listing| listing.owner == owner)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.listings, "listings")?.len())
    }

    fn bump(&self, reference: ListingRef, counter: Counter) -> Result<u32, RepositoryError> {
        let mut listings = lock(&self.listings, "listings")?;
        let listing = listings
            .get_mut(&reference)
            .ok_or(RepositoryError::NotFound)?;
        let slot = match counter {
            Counter::Likes => &mut listing.like_count,
            Counter::Shares => &mut listing.share_count,
        };
        *slot = slot.saturating_add(1);
        Ok(*slot)
    }

    fn take_stock(
        &self,
        reference: ListingRef,
        quantity: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let mut listings = lock(&self.listings, "listings")?;
        let listing = listings
            .get_mut(&reference)
            .ok_or(RepositoryError::NotFound)?;
        match listing.stock_mut() {
            Some(stock) if *stock >= quantity => {
                *stock -= quantity;
                Ok(Some(*stock))
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Ok(None),
        }
    }

    fn categories(&self, kind: ListingKind) -> Result<Vec<Category>, RepositoryError> {
        Ok(lock(&self.categories, "categories")?
            .iter()
            .filter(|category| category.kind == kind)
            .cloned()
            .collect())
    }

    fn insert_category(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut categories = lock(&self.categories, "categories")?;
        if categories
            .iter()
            .any(|existing| existing.kind == category.kind && existing.slug == category.slug)
        {
            return Err(RepositoryError::Conflict);
        }
        categories.push(category.clone());
        Ok(category)
    }
}
