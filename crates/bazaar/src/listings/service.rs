use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    Category, CategoryDraft, Counter, Listing, ListingDetails, ListingDraft, ListingId,
    ListingImage, ListingKind, ListingQuery, ListingRef, ListingSummary,
};
use super::repository::ListingRepository;
use super::ListingError;
use crate::accounts::{User, UserId};
use crate::pagination::Page;
use crate::slug::slugify;
use crate::store::RepositoryError;

const RELATED_LIMIT: usize = 4;

/// Listing CRUD, browsing and engagement counters across every section.
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    page_size: usize,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingRepository>, page_size: usize) -> Self {
        Self {
            listings,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn create(
        &self,
        owner: &User,
        kind: ListingKind,
        draft: ListingDraft,
    ) -> Result<Listing, ListingError> {
        let title = self.validate(kind, &draft)?;
        let slug = draft.slug_base();
        let now = Utc::now();

        let listing = Listing {
            id: ListingId(0),
            title,
            slug,
            description: draft.description.trim().to_string(),
            price: draft.price,
            owner: owner.id,
            category: draft.category,
            is_featured: draft.is_featured.unwrap_or_else(|| kind.default_featured()),
            like_count: 0,
            share_count: 0,
            images: draft.images,
            details: draft.details,
            created_at: now,
            updated_at: now,
        };

        let stored = self.listings.insert(listing)?;
        info!(listing = %stored.reference(), slug = %stored.slug, owner = %owner.id, "listing created");
        Ok(stored)
    }

    /// Replace a listing's content. The slug stays stable across edits.
    pub fn update(
        &self,
        requester: &User,
        kind: ListingKind,
        slug: &str,
        draft: ListingDraft,
    ) -> Result<Listing, ListingError> {
        let mut listing = self.get(kind, slug)?;
        ensure_can_manage(requester, &listing)?;
        let title = self.validate(kind, &draft)?;

        listing.title = title;
        listing.description = draft.description.trim().to_string();
        listing.price = draft.price;
        listing.category = draft.category;
        if let Some(featured) = draft.is_featured {
            listing.is_featured = featured;
        }
        if !draft.images.is_empty() {
            listing.images = draft.images;
        }
        listing.details = draft.details;
        listing.updated_at = Utc::now();

        self.listings.update(listing.clone())?;
        info!(listing = %listing.reference(), "listing updated");
        Ok(listing)
    }

    /// Remove a listing. Dependent carts and conversations are cleaned up by the caller.
    pub fn delete(
        &self,
        requester: &User,
        kind: ListingKind,
        slug: &str,
    ) -> Result<Listing, ListingError> {
        let listing = self.get(kind, slug)?;
        ensure_can_manage(requester, &listing)?;
        let removed = self.listings.remove(listing.reference())?;
        info!(listing = %removed.reference(), "listing deleted");
        Ok(removed)
    }

    pub fn get(&self, kind: ListingKind, slug: &str) -> Result<Listing, ListingError> {
        self.listings
            .find_by_slug(kind, slug)?
            .ok_or(ListingError::NotFound)
    }

    pub fn get_by_ref(&self, reference: ListingRef) -> Result<Listing, ListingError> {
        self.listings
            .fetch(reference)?
            .ok_or(ListingError::NotFound)
    }

    /// Like `get_by_ref` but a vanished listing is `None` rather than an error.
    pub fn lookup(&self, reference: ListingRef) -> Result<Option<Listing>, ListingError> {
        Ok(self.listings.fetch(reference)?)
    }

    /// Newest-first page of a section after applying the query filters.
    pub fn list(&self, kind: ListingKind, query: &ListingQuery) -> Result<Page<Listing>, ListingError> {
        let gender_slugs: Option<Vec<String>> = match query.gender {
            Some(gender) => Some(
                self.listings
                    .categories(kind)?
                    .into_iter()
                    .filter(|category| category.gender == Some(gender))
                    .map(|category| category.slug)
                    .collect(),
            ),
            None => None,
        };
        let needle = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let mut listings: Vec<Listing> = self
            .listings
            .of_kind(kind)?
            .into_iter()
            .filter(|listing| kind != ListingKind::Clothing || listing.stock() != Some(0))
            .filter(|listing| !query.featured_only.unwrap_or(false) || listing.is_featured)
            .filter(|listing| match &query.category {
                Some(category) => listing.category.as_deref() == Some(category.as_str()),
                None => true,
            })
            .filter(|listing| match (&gender_slugs, &listing.category) {
                (Some(slugs), Some(category)) => slugs.contains(category),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .filter(|listing| needle.map_or(true, |q| listing.matches_text(q)))
            .collect();

        sort_newest_first(&mut listings);
        Ok(Page::paginate(
            listings,
            query.page.unwrap_or(1),
            self.page_size,
        ))
    }

    /// Up to four other listings from the same section and category.
    pub fn related(&self, listing: &Listing) -> Result<Vec<ListingSummary>, ListingError> {
        let Some(category) = listing.category.as_deref() else {
            return Ok(Vec::new());
        };
        let mut related: Vec<Listing> = self
            .listings
            .of_kind(listing.kind())?
            .into_iter()
            .filter(|other| other.id != listing.id && other.category.as_deref() == Some(category))
            .collect();
        sort_newest_first(&mut related);
        Ok(related
            .iter()
            .take(RELATED_LIMIT)
            .map(Listing::summary)
            .collect())
    }

    pub fn like(&self, kind: ListingKind, slug: &str) -> Result<u32, ListingError> {
        self.bump(kind, slug, Counter::Likes)
    }

    pub fn share(&self, kind: ListingKind, slug: &str) -> Result<u32, ListingError> {
        self.bump(kind, slug, Counter::Shares)
    }

    pub fn add_image(
        &self,
        requester: &User,
        kind: ListingKind,
        slug: &str,
        image: ListingImage,
    ) -> Result<Listing, ListingError> {
        let mut listing = self.get(kind, slug)?;
        ensure_can_manage(requester, &listing)?;
        if image.url.trim().is_empty() {
            return Err(ListingError::InvalidDraft("image url is required".to_string()));
        }
        listing.images.push(image);
        listing.updated_at = Utc::now();
        self.listings.update(listing.clone())?;
        Ok(listing)
    }

    /// Up to `limit` featured listings per section, in landing-page order.
    pub fn featured(&self, limit: usize) -> Result<Vec<ListingSummary>, ListingError> {
        let mut featured = Vec::new();
        for kind in ListingKind::FEATURED_ORDER {
            let mut listings: Vec<Listing> = self
                .listings
                .of_kind(kind)?
                .into_iter()
                .filter(|listing| listing.is_featured)
                .collect();
            sort_newest_first(&mut listings);
            featured.extend(listings.iter().take(limit).map(Listing::summary));
        }
        Ok(featured)
    }

    pub fn by_owner(&self, owner: UserId) -> Result<Vec<ListingSummary>, ListingError> {
        let mut listings = self.listings.by_owner(owner)?;
        sort_newest_first(&mut listings);
        Ok(listings.iter().map(Listing::summary).collect())
    }

    pub fn categories(&self, kind: ListingKind) -> Result<Vec<Category>, ListingError> {
        Ok(self.listings.categories(kind)?)
    }

    pub fn add_category(
        &self,
        kind: ListingKind,
        draft: CategoryDraft,
    ) -> Result<Category, ListingError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ListingError::InvalidDraft("category name is required".to_string()));
        }
        let category = Category {
            kind,
            slug: slugify(name),
            name: name.to_string(),
            icon: draft.icon,
            gender: draft.gender,
        };
        self.listings
            .insert_category(category)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    ListingError::InvalidDraft(format!("category '{name}' already exists"))
                }
                other => ListingError::Repository(other),
            })
    }

    pub fn count(&self) -> Result<usize, ListingError> {
        Ok(self.listings.count()?)
    }

    /// Withdraw ordered units; sections without stock accept any quantity.
    pub fn take_stock(&self, reference: ListingRef, quantity: u32) -> Result<(), ListingError> {
        match self.listings.take_stock(reference, quantity) {
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ListingError::NotFound),
            Err(RepositoryError::Conflict) => Err(ListingError::OutOfStock),
            Err(other) => Err(ListingError::Repository(other)),
        }
    }

    fn bump(&self, kind: ListingKind, slug: &str, counter: Counter) -> Result<u32, ListingError> {
        let listing = self.get(kind, slug)?;
        match self.listings.bump(listing.reference(), counter) {
            Ok(count) => Ok(count),
            Err(RepositoryError::NotFound) => Err(ListingError::NotFound),
            Err(other) => Err(ListingError::Repository(other)),
        }
    }

    fn validate(&self, kind: ListingKind, draft: &ListingDraft) -> Result<String, ListingError> {
        if draft.details.kind() != kind {
            return Err(ListingError::KindMismatch {
                expected: kind,
                found: draft.details.kind(),
            });
        }

        let title = draft.resolved_title();
        if title.is_empty() {
            return Err(ListingError::InvalidDraft("title is required".to_string()));
        }
        if draft.description.trim().is_empty() {
            return Err(ListingError::InvalidDraft("description is required".to_string()));
        }

        match &draft.details {
            ListingDetails::Vehicle(vehicle)
                if vehicle.make.trim().is_empty() || vehicle.model.trim().is_empty() =>
            {
                return Err(ListingError::InvalidDraft(
                    "vehicle make and model are required".to_string(),
                ));
            }
            ListingDetails::House(house)
                if house.city.trim().is_empty() || house.address.trim().is_empty() =>
            {
                return Err(ListingError::InvalidDraft(
                    "house address and city are required".to_string(),
                ));
            }
            ListingDetails::Clothing(clothing) => {
                if clothing
                    .discount_price
                    .is_some_and(|discount| discount > draft.price)
                {
                    return Err(ListingError::InvalidDraft(
                        "discount price cannot exceed the price".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if let Some(category) = &draft.category {
            let known = self
                .listings
                .categories(kind)?
                .iter()
                .any(|candidate| &candidate.slug == category);
            if !known {
                return Err(ListingError::UnknownCategory(category.clone()));
            }
        }

        Ok(title)
    }
}

fn ensure_can_manage(requester: &User, listing: &Listing) -> Result<(), ListingError> {
    if requester.is_staff || requester.id == listing.owner {
        Ok(())
    } else {
        Err(ListingError::NotOwner)
    }
}

fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
