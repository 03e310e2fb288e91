use bazaar::accounts::{Registration, User};
use bazaar::cart::{CartOwner, CartSessionKey};
use bazaar::config::MarketConfig;
use bazaar::error::AppError;
use bazaar::farms::domain::{Certification, EggSellerDraft, EggType};
use bazaar::listings::{
    ClothingDetails, Condition, ElectronicsDetails, FuelType, HouseDetails, ListingDetails,
    ListingDraft, ListingKind, Price, VehicleDetails, VehicleType,
};
use bazaar::Marketplace;
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the landing page overview as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

/// What `seed_demo` created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DemoSeed {
    pub(crate) seller: User,
    pub(crate) shopper: User,
    pub(crate) listings: usize,
    pub(crate) conversations: usize,
    pub(crate) cart_lines: usize,
}

/// Populate a marketplace with one seller per section, a shopper and a conversation.
pub(crate) fn seed_demo(market: &Marketplace) -> Result<DemoSeed, AppError> {
    let (seller, _) = market.accounts.register(Registration {
        username: "mama_mboga".to_string(),
        phone_number: "+254700100200".to_string(),
    })?;
    let (shopper, _) = market.accounts.register(Registration {
        username: "curious_shopper".to_string(),
        phone_number: "+254700100300".to_string(),
    })?;

    let drafts = [
        (
            ListingKind::House,
            draft(
                "Two bedroom apartment",
                9_500_000,
                "apartment",
                ListingDetails::House(HouseDetails {
                    address: "14 Riverside Drive".to_string(),
                    city: "Nairobi".to_string(),
                    state: "Nairobi".to_string(),
                    bedrooms: 2,
                    bathrooms: 2,
                    area_sqm: 96,
                }),
            ),
        ),
        (
            ListingKind::Vehicle,
            draft(
                "",
                1_450_000,
                "car",
                ListingDetails::Vehicle(VehicleDetails {
                    vehicle_type: VehicleType::Car,
                    make: "Toyota".to_string(),
                    model: "Axio".to_string(),
                    year: 2016,
                    mileage_km: 96_000,
                    fuel_type: FuelType::Petrol,
                    engine_size: "1.5L".to_string(),
                    color: "Pearl White".to_string(),
                }),
            ),
        ),
        (
            ListingKind::Electronics,
            draft(
                "Samsung Galaxy A54",
                42_000,
                "phones",
                ListingDetails::Electronics(ElectronicsDetails {
                    condition: Condition::New,
                    stock: 6,
                }),
            ),
        ),
        (
            ListingKind::Clothing,
            draft(
                "Kitenge shirt",
                3_200,
                "men-shirts",
                ListingDetails::Clothing(ClothingDetails {
                    brand: "Mtumba Select".to_string(),
                    discount_price: Some(Price(2_700)),
                    stock_quantity: 12,
                }),
            ),
        ),
        (
            ListingKind::Poultry,
            draft("Kienyeji layers", 1_200, "live-chickens", ListingDetails::Poultry),
        ),
    ];

    let mut created = Vec::with_capacity(drafts.len());
    for (kind, draft) in drafts {
        created.push(market.listings.create(&seller, kind, draft)?);
    }

    let session = CartSessionKey::generate();
    let guest = CartOwner::Session(session.clone());
    for listing in created.iter().filter(|listing| listing.kind().tracks_stock()) {
        market.cart.add(&guest, listing.reference())?;
    }
    let cart_lines = market.cart.merge(&session, shopper.id)?;

    if let Some(phone) = created
        .iter()
        .find(|listing| listing.kind() == ListingKind::Electronics)
    {
        market
            .conversations
            .start(&shopper, phone.reference(), "Is the A54 still available?")?;
    }

    market.farms.create_seller(EggSellerDraft {
        farm_name: "Sunrise Layers".to_string(),
        owner_name: "Wanjiru".to_string(),
        description: "Free range eggs collected every morning".to_string(),
        city: "Nakuru".to_string(),
        state: "Nakuru".to_string(),
        country: "Kenya".to_string(),
        address: String::new(),
        egg_type: EggType::FreeRange,
        certification: Certification::None,
        quantity_available: 900,
        price_per_dozen: Price(420),
        min_order_quantity: 2,
        phone: "+254700100400".to_string(),
        email: String::new(),
        website: String::new(),
        is_verified: true,
        is_active: true,
        rating: 4.6,
        review_count: 18,
    })?;

    Ok(DemoSeed {
        seller,
        shopper,
        listings: created.len(),
        conversations: market.conversations.count()?,
        cart_lines,
    })
}

fn draft(title: &str, cents: u64, category: &str, details: ListingDetails) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: format!("{} in excellent condition", details.kind().label()),
        price: Price(cents),
        category: Some(category.to_string()),
        is_featured: None,
        images: Vec::new(),
        details,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let market = Marketplace::in_memory(&MarketConfig::default());
    let seed = seed_demo(&market)?;
    let overview = market.overview()?;

    if args.json {
        match serde_json::to_string_pretty(&overview) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("overview unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Marketplace demo");
    println!(
        "- {} users ({} active) | {} listings | {} conversations",
        overview.users, overview.active_users, overview.listings, overview.conversations
    );

    println!("\nInbox for {}:", seed.seller.username);
    for row in market.conversations.inbox(&seed.seller)? {
        let preview = row
            .last_message
            .as_ref()
            .map(|message| message.content.as_str())
            .unwrap_or("");
        println!(
            "  - {} about {} | {} unread | \"{}\"",
            row.counterpart.username,
            row.listing_title.as_deref().unwrap_or("a removed listing"),
            row.unread_count,
            preview
        );
    }

    let cart = market.cart.detail(&CartOwner::User(seed.shopper.id))?;
    println!(
        "\nCart for {} ({} lines merged from a guest session):",
        seed.shopper.username, seed.cart_lines
    );
    for line in &cart.items {
        println!(
            "  - {} x{} = {}",
            line.listing.title, line.quantity, line.line_total
        );
    }
    println!("  Total: {}", cart.display_total);

    println!("\nFeatured:");
    for listing in &overview.featured {
        println!(
            "  - [{}] {} at {}",
            listing.kind.label(),
            listing.title,
            listing.display_price
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_covers_every_section() {
        let market = Marketplace::in_memory(&MarketConfig::default());
        let seed = seed_demo(&market).expect("seed succeeds");

        assert_eq!(seed.listings, 5);
        assert_eq!(seed.conversations, 1);
        assert_eq!(seed.cart_lines, 2);
        assert_eq!(
            market
                .conversations
                .inbox(&seed.seller)
                .expect("inbox")[0]
                .unread_count,
            1
        );
        let overview = market.overview().expect("overview");
        assert_eq!(overview.users, 2);
        assert!(overview
            .featured
            .iter()
            .any(|listing| listing.kind == ListingKind::Clothing));
    }
}
