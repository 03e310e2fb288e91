use super::common::*;
use crate::cart::{CartError, CartItemId, CartOwner, CartSessionKey};
use crate::listings::{ListingId, ListingKind, ListingRef, Price};

#[test]
fn adding_twice_increments_the_same_line() {
    let market = market();
    let (_, phone, _) = stocked_listings(&market);
    let (buyer, _) = member(&market, "buyer", "+254766000222");
    let owner = CartOwner::User(buyer.id);

    let first = market.cart.add(&owner, phone.reference()).expect("first add");
    let second = market.cart.add(&owner, phone.reference()).expect("second add");

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 2);
    assert_eq!(market.cart.item_count(&owner).expect("count"), 1);
}

#[test]
fn adding_missing_listing_fails() {
    let market = market();
    let owner = CartOwner::Session(CartSessionKey::generate());
    let missing = ListingRef {
        kind: ListingKind::House,
        id: ListingId(99),
    };

    assert!(matches!(
        market.cart.add(&owner, missing),
        Err(CartError::ListingNotFound)
    ));
}

#[test]
fn detail_totals_use_current_prices() {
    let market = market();
    let (_, phone, shirt) = stocked_listings(&market);
    let owner = CartOwner::Session(CartSessionKey::generate());

    market.cart.add(&owner, phone.reference()).expect("phone");
    let shirt_line = market.cart.add(&owner, shirt.reference()).expect("shirt");
    market
        .cart
        .set_quantity(&owner, shirt_line.id, 3)
        .expect("quantity");

    let detail = market.cart.detail(&owner).expect("detail");
    assert_eq!(detail.item_count, 2);
    let shirt = detail
        .items
        .iter()
        .find(|line| line.listing.kind == ListingKind::Clothing)
        .expect("shirt line");
    assert_eq!(shirt.unit_price, Price(2_400));
    assert_eq!(shirt.line_total, Price(7_200));
    assert_eq!(detail.total, Price(19_700));
    assert_eq!(detail.display_total, "$197.00");
}

#[test]
fn zero_quantity_removes_line() {
    let market = market();
    let (_, phone, _) = stocked_listings(&market);
    let owner = CartOwner::Session(CartSessionKey::generate());
    let line = market.cart.add(&owner, phone.reference()).expect("add");

    assert_eq!(market.cart.set_quantity(&owner, line.id, 0).expect("zero"), None);
    assert_eq!(market.cart.item_count(&owner).expect("count"), 0);
    assert!(matches!(
        market.cart.remove(&owner, line.id),
        Err(CartError::ItemNotFound)
    ));
    assert!(matches!(
        market.cart.set_quantity(&owner, CartItemId(404), 2),
        Err(CartError::ItemNotFound)
    ));
}

#[test]
fn lines_are_private_to_their_owner() {
    let market = market();
    let (_, phone, _) = stocked_listings(&market);
    let alice = CartOwner::Session(CartSessionKey::generate());
    let bob = CartOwner::Session(CartSessionKey::generate());
    let line = market.cart.add(&alice, phone.reference()).expect("add");

    assert!(matches!(
        market.cart.remove(&bob, line.id),
        Err(CartError::ItemNotFound)
    ));
    assert_eq!(market.cart.item_count(&alice).expect("count"), 1);
}

#[test]
fn detail_prunes_lines_for_deleted_listings() {
    let market = market();
    let (vendor, phone, shirt) = stocked_listings(&market);
    let owner = CartOwner::Session(CartSessionKey::generate());
    market.cart.add(&owner, phone.reference()).expect("phone");
    market.cart.add(&owner, shirt.reference()).expect("shirt");

    market
        .listings
        .delete(&vendor, ListingKind::Electronics, &phone.slug)
        .expect("delete without cascade");

    let detail = market.cart.detail(&owner).expect("detail");
    assert_eq!(detail.item_count, 1);
    assert_eq!(market.cart.item_count(&owner).expect("count"), 1);
}

#[test]
fn merge_folds_guest_lines_into_account() {
    let market = market();
    let (_, phone, shirt) = stocked_listings(&market);
    let (buyer, _) = member(&market, "buyer", "+254766000333");
    let session = CartSessionKey::generate();
    let guest = CartOwner::Session(session.clone());
    let account = CartOwner::User(buyer.id);

    market.cart.add(&account, phone.reference()).expect("account phone");
    market.cart.add(&guest, phone.reference()).expect("guest phone");
    market.cart.add(&guest, shirt.reference()).expect("guest shirt");

    assert_eq!(market.cart.merge(&session, buyer.id).expect("merge"), 2);
    assert_eq!(market.cart.item_count(&guest).expect("guest count"), 0);

    let detail = market.cart.detail(&account).expect("detail");
    assert_eq!(detail.item_count, 2);
    let phone_line = detail
        .items
        .iter()
        .find(|line| line.listing.id == phone.id && line.listing.kind == ListingKind::Electronics)
        .expect("phone line");
    assert_eq!(phone_line.quantity, 2);

    let carted = market
        .cart
        .carted(&account, ListingKind::Clothing)
        .expect("carted");
    assert!(carted.contains(&shirt.id));
    assert_eq!(carted.len(), 1);
}
