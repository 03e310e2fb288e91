use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::accounts::{account_router, AccountService, InMemoryUserRepository, SessionStore, User};
use crate::cart::{cart_router, CartService, InMemoryCartRepository};
use crate::config::{AdminBootstrap, MarketConfig};
use crate::contact::{contact_router, ContactService, InMemoryContactRepository};
use crate::conversations::{
    conversation_router, ConversationService, InMemoryConversationRepository, UnreadCache,
};
use crate::error::AppError;
use crate::farms::{farm_router, FarmService, InMemoryFarmRepository};
use crate::home::home_router;
use crate::listings::{listing_router, InMemoryListingRepository, Listing, ListingKind, ListingService};
use crate::orders::{order_router, InMemoryOrderRepository, OrderService};
use crate::realtime::{realtime_router, ChannelLayer};

/// Shared handle to every marketplace service; this is the router state.
#[derive(Clone)]
pub struct Marketplace {
    pub accounts: Arc<AccountService>,
    pub listings: Arc<ListingService>,
    pub cart: Arc<CartService>,
    pub conversations: Arc<ConversationService>,
    pub contact: Arc<ContactService>,
    pub farms: Arc<FarmService>,
    pub orders: Arc<OrderService>,
    pub channels: Arc<ChannelLayer>,
}

impl Marketplace {
    /// Wire every service against in-process repositories.
    pub fn in_memory(config: &MarketConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let listings = Arc::new(InMemoryListingRepository::default());
        let channels = Arc::new(ChannelLayer::new(config.channel_capacity));

        Self {
            accounts: Arc::new(AccountService::new(
                users.clone(),
                SessionStore::new(config.session_ttl),
            )),
            listings: Arc::new(ListingService::new(listings.clone(), config.page_size)),
            cart: Arc::new(CartService::new(
                Arc::new(InMemoryCartRepository::new(config.session_ttl)),
                listings.clone(),
            )),
            conversations: Arc::new(ConversationService::new(
                Arc::new(InMemoryConversationRepository::default()),
                listings.clone(),
                users,
                channels.clone(),
                UnreadCache::new(config.unread_cache_ttl),
            )),
            contact: Arc::new(ContactService::new(Arc::new(
                InMemoryContactRepository::default(),
            ))),
            farms: Arc::new(FarmService::new(Arc::new(InMemoryFarmRepository::default()))),
            orders: Arc::new(OrderService::new(
                Arc::new(InMemoryOrderRepository::default()),
                listings,
            )),
            channels,
        }
    }

    /// Every HTTP and websocket route, bound to this marketplace.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(account_router())
            .merge(listing_router())
            .merge(cart_router())
            .merge(conversation_router())
            .merge(contact_router())
            .merge(farm_router())
            .merge(order_router())
            .merge(home_router())
            .merge(realtime_router())
            .with_state(self.clone())
    }

    /// Delete a listing along with the cart lines, conversations and orders that point at it.
    pub fn remove_listing(
        &self,
        requester: &User,
        kind: ListingKind,
        slug: &str,
    ) -> Result<Listing, AppError> {
        let listing = self.listings.delete(requester, kind, slug)?;
        let reference = listing.reference();
        let cart_lines = self.cart.purge_listing(reference)?;
        let conversations = self.conversations.purge_listing(reference)?;
        let orders = self.orders.purge_listing(reference)?;
        info!(
            listing = %reference,
            cart_lines,
            conversations,
            orders,
            "listing removed with dependents"
        );
        Ok(listing)
    }

    /// Make sure the configured staff account exists.
    pub fn bootstrap_admin(&self, admin: &AdminBootstrap) -> Result<User, AppError> {
        let (user, created) = self
            .accounts
            .ensure_superuser(&admin.username, &admin.phone_number)?;
        if created {
            info!(user_id = %user.id, username = %user.username, "admin account created");
        }
        Ok(user)
    }
}
