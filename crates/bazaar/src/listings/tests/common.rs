pub(super) use crate::testing::{
    clothing_draft, electronics_draft, house_draft, market, member, read_json_body, request,
    staff, vehicle_draft,
};

use crate::accounts::User;
use crate::listings::{Listing, ListingKind};
use crate::state::Marketplace;

pub(super) fn seller(market: &Marketplace) -> User {
    member(market, "seller", "+254700000001").0
}

pub(super) fn phone(market: &Marketplace, owner: &User, title: &str, stock: u32) -> Listing {
    market
        .listings
        .create(owner, ListingKind::Electronics, electronics_draft(title, 30_000, stock))
        .expect("electronics listing")
}
