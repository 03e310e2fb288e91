pub(super) use crate::testing::{electronics_draft, market, member, read_json_body, request};

use crate::accounts::{SessionToken, User};
use crate::listings::{Listing, ListingKind};
use crate::state::Marketplace;

/// Listing owner, interested buyer and the listing they talk about.
pub(super) struct Parties {
    pub owner: User,
    pub owner_token: SessionToken,
    pub buyer: User,
    pub buyer_token: SessionToken,
    pub listing: Listing,
}

pub(super) fn parties(market: &Marketplace) -> Parties {
    let (owner, owner_token) = member(market, "owner", "+254777000111");
    let (buyer, buyer_token) = member(market, "buyer", "+254777000222");
    let listing = market
        .listings
        .create(&owner, ListingKind::Electronics, electronics_draft("MacBook Air", 110_000, 1))
        .expect("listing");
    Parties {
        owner,
        owner_token,
        buyer,
        buyer_token,
        listing,
    }
}
