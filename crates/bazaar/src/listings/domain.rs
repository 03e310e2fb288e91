use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::UserId;
use crate::slug::slugify;

/// Slugs that collide with static routes under `/listings/{kind}/`.
pub const RESERVED_SLUGS: [&str; 1] = ["categories"];

/// The five marketplace sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Vehicle,
    House,
    Electronics,
    Clothing,
    Poultry,
}

impl ListingKind {
    /// Order in which sections are featured on the landing page.
    pub const FEATURED_ORDER: [ListingKind; 5] = [
        ListingKind::House,
        ListingKind::Vehicle,
        ListingKind::Electronics,
        ListingKind::Clothing,
        ListingKind::Poultry,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            ListingKind::Vehicle => "vehicles",
            ListingKind::House => "houses",
            ListingKind::Electronics => "electronics",
            ListingKind::Clothing => "clothing",
            ListingKind::Poultry => "poultry",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment.trim().to_ascii_lowercase().as_str() {
            "vehicles" | "vehicle" => Some(ListingKind::Vehicle),
            "houses" | "house" => Some(ListingKind::House),
            "electronics" => Some(ListingKind::Electronics),
            "clothing" | "clothings" => Some(ListingKind::Clothing),
            "poultry" | "poultryitems" => Some(ListingKind::Poultry),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingKind::Vehicle => "Vehicle",
            ListingKind::House => "House",
            ListingKind::Electronics => "Electronics",
            ListingKind::Clothing => "Clothing",
            ListingKind::Poultry => "Poultry",
        }
    }

    pub fn default_featured(self) -> bool {
        !matches!(self, ListingKind::Vehicle | ListingKind::Poultry)
    }

    pub fn tracks_stock(self) -> bool {
        matches!(self, ListingKind::Electronics | ListingKind::Clothing)
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Heterogeneous pointer to any listing, used by carts, conversations and orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingRef {
    pub kind: ListingKind,
    pub id: ListingId,
}

impl fmt::Display for ListingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Money amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub u64);

impl Price {
    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn times(self, quantity: u32) -> Option<Price> {
        self.0.checked_mul(u64::from(quantity)).map(Price)
    }

    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Men,
    Women,
    Kids,
    Unisex,
}

/// Browsable category inside one marketplace section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub kind: ListingKind,
    pub slug: String,
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// Staff-submitted category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Car,
    Truck,
    Motorcycle,
    Bicycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub vehicle_type: VehicleType,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub mileage_km: u32,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub engine_size: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDetails {
    pub address: String,
    pub city: String,
    pub state: String,
    pub bedrooms: u16,
    pub bathrooms: u16,
    pub area_sqm: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicsDetails {
    pub condition: Condition,
    #[serde(default = "one")]
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingDetails {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub discount_price: Option<Price>,
    #[serde(default = "one")]
    pub stock_quantity: u32,
}

fn one() -> u32 {
    1
}

/// Section-specific attributes; the variant determines the listing's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingDetails {
    Vehicle(VehicleDetails),
    House(HouseDetails),
    Electronics(ElectronicsDetails),
    Clothing(ClothingDetails),
    Poultry,
}

impl ListingDetails {
    pub fn kind(&self) -> ListingKind {
        match self {
            ListingDetails::Vehicle(_) => ListingKind::Vehicle,
            ListingDetails::House(_) => ListingKind::House,
            ListingDetails::Electronics(_) => ListingKind::Electronics,
            ListingDetails::Clothing(_) => ListingKind::Clothing,
            ListingDetails::Poultry => ListingKind::Poultry,
        }
    }
}

/// Create/update payload for any section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    #[serde(default)]
    pub title: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub images: Vec<ListingImage>,
    pub details: ListingDetails,
}

impl ListingDraft {
    /// Vehicles are always titled "{year} {make} {model}".
    pub(crate) fn resolved_title(&self) -> String {
        match &self.details {
            ListingDetails::Vehicle(vehicle) => {
                format!("{} {} {}", vehicle.year, vehicle.make.trim(), vehicle.model.trim())
            }
            _ => self.title.trim().to_string(),
        }
    }

    pub(crate) fn slug_base(&self) -> String {
        match &self.details {
            ListingDetails::Vehicle(vehicle) => {
                slugify(&format!("{}-{}-{}", vehicle.year, vehicle.make, vehicle.model))
            }
            ListingDetails::House(house) => {
                slugify(&format!("{}-{}-{}", self.title, house.city, house.state))
            }
            _ => slugify(&self.title),
        }
    }
}

/// A sellable item in one of the marketplace sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub owner: UserId,
    pub category: Option<String>,
    pub is_featured: bool,
    pub like_count: u32,
    pub share_count: u32,
    pub images: Vec<ListingImage>,
    pub details: ListingDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        self.details.kind()
    }

    pub fn reference(&self) -> ListingRef {
        ListingRef {
            kind: self.kind(),
            id: self.id,
        }
    }

    /// Discounted clothing sells at its discount price.
    pub fn current_price(&self) -> Price {
        match &self.details {
            ListingDetails::Clothing(ClothingDetails {
                discount_price: Some(discount),
                ..
            }) => *discount,
            _ => self.price,
        }
    }

    pub fn is_on_sale(&self) -> bool {
        matches!(
            &self.details,
            ListingDetails::Clothing(ClothingDetails {
                discount_price: Some(_),
                ..
            })
        )
    }

    /// Units on hand for sections that track stock.
    pub fn stock(&self) -> Option<u32> {
        match &self.details {
            ListingDetails::Electronics(details) => Some(details.stock),
            ListingDetails::Clothing(details) => Some(details.stock_quantity),
            _ => None,
        }
    }

    pub(crate) fn stock_mut(&mut self) -> Option<&mut u32> {
        match &mut self.details {
            ListingDetails::Electronics(details) => Some(&mut details.stock),
            ListingDetails::Clothing(details) => Some(&mut details.stock_quantity),
            _ => None,
        }
    }

    pub fn featured_image(&self) -> Option<&ListingImage> {
        self.images
            .iter()
            .find(|image| image.is_featured)
            .or_else(|| self.images.first())
    }

    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let brand = match &self.details {
            ListingDetails::Clothing(details) => details.brand.as_str(),
            _ => "",
        };
        [self.title.as_str(), self.description.as_str(), brand]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            kind: self.kind(),
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            price: self.price,
            current_price: self.current_price(),
            display_price: self.current_price().to_string(),
            image: self.featured_image().map(|image| image.url.clone()),
            owner: self.owner,
            is_featured: self.is_featured,
            like_count: self.like_count,
            share_count: self.share_count,
            is_carted: false,
        }
    }
}

/// Card used in list pages, the landing page and carts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    pub kind: ListingKind,
    pub id: ListingId,
    pub slug: String,
    pub title: String,
    pub price: Price,
    pub current_price: Price,
    pub display_price: String,
    pub image: Option<String>,
    pub owner: UserId,
    pub is_featured: bool,
    pub like_count: u32,
    pub share_count: u32,
    pub is_carted: bool,
}

/// List page filters (`?page=&category=&gender=&q=&featured_only=`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub featured_only: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Shares,
}
