use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::UserId;
use crate::listings::Price;

macro_rules! farm_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

farm_id!(EggSellerId);
farm_id!(EggOrderId);
farm_id!(ConsultantId);
farm_id!(OfferingId);
farm_id!(BookingId);
farm_id!(ChickenSellerId);
farm_id!(EnrollmentId);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EggType {
    Organic,
    FreeRange,
    CageFree,
    #[default]
    Conventional,
    PastureRaised,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certification {
    #[default]
    None,
    UsdaOrganic,
    NonGmo,
    AnimalWelfare,
    Local,
}

/// Farm selling eggs by the dozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggSeller {
    pub id: EggSellerId,
    pub farm_name: String,
    pub owner_name: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub address: String,
    pub egg_type: EggType,
    pub certification: Certification,
    pub quantity_available: u32,
    pub price_per_dozen: Price,
    pub min_order_quantity: u32,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub rating: f32,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_country() -> String {
    "USA".to_string()
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggSellerDraft {
    pub farm_name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub description: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub egg_type: EggType,
    #[serde(default)]
    pub certification: Certification,
    #[serde(default)]
    pub quantity_available: u32,
    pub price_per_dozen: Price,
    #[serde(default = "one")]
    pub min_order_quantity: u32,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
}

/// Egg seller search (`?egg_type=&city=&min_price=&max_price=&certified_only=`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EggSellerFilter {
    #[serde(default)]
    pub egg_type: Option<EggType>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub min_price: Option<Price>,
    #[serde(default)]
    pub max_price: Option<Price>,
    #[serde(default)]
    pub certified_only: Option<bool>,
}

impl EggSellerFilter {
    pub fn matches(&self, seller: &EggSeller) -> bool {
        let city = self
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_lowercase);

        seller.is_active
            && self.egg_type.map_or(true, |egg_type| seller.egg_type == egg_type)
            && city.map_or(true, |city| seller.city.to_lowercase().contains(&city))
            && self.min_price.map_or(true, |min| seller.price_per_dozen >= min)
            && self.max_price.map_or(true, |max| seller.price_per_dozen <= max)
            && (!self.certified_only.unwrap_or(false)
                || seller.certification != Certification::None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggOrder {
    pub id: EggOrderId,
    pub seller: EggSellerId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    /// Dozens ordered.
    pub quantity: u32,
    pub total_price: Price,
    pub special_instructions: String,
    pub status: RequestStatus,
    pub ordered_at: DateTime<Utc>,
    pub preferred_delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggOrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub quantity: u32,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub preferred_delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Disease,
    Nutrition,
    Prevention,
    Breeding,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Weekdays,
    Weekends,
    AllWeek,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Video,
    Phone,
    Visit,
    Analysis,
    Assessment,
}

/// Poultry veterinary consultant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultant {
    pub id: ConsultantId,
    pub name: String,
    pub experience_years: u32,
    pub specialty: Specialty,
    pub languages: Vec<String>,
    pub rating: f32,
    pub rating_count: u32,
    pub description: String,
    pub availability: Availability,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub is_available: bool,
    pub consultation_fee: Price,
}

/// A bookable service a consultant offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: OfferingId,
    pub consultant: ConsultantId,
    pub service_type: ServiceType,
    pub price: Price,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingDraft {
    pub service_type: ServiceType,
    pub price: Price,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantDraft {
    pub name: String,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub specialty: Specialty,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default = "yes")]
    pub is_available: bool,
    #[serde(default)]
    pub consultation_fee: Price,
    #[serde(default)]
    pub services: Vec<OfferingDraft>,
}

/// Consultant card with the services it offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultantView {
    #[serde(flatten)]
    pub consultant: Consultant,
    pub services: Vec<Offering>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub consultant: ConsultantId,
    pub service: OfferingId,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub service: OfferingId,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    #[serde(default)]
    pub message: String,
}

/// Optional social handles shown on a chicken seller's card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook_url: Option<String>,
    pub telegram_handle: Option<String>,
    pub whatsapp_number: Option<String>,
    pub instagram_handle: Option<String>,
    pub youtube_channel: Option<String>,
}

/// Member-run profile advertising live chickens. One per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChickenSeller {
    pub id: ChickenSellerId,
    pub owner: UserId,
    pub farm_name: String,
    pub location: String,
    pub available_quantity: u32,
    pub min_price: Price,
    pub max_price: Price,
    /// Comma separated breed names.
    pub breeds: String,
    pub description: String,
    pub delivery_available: bool,
    pub vaccinated: bool,
    pub contact_number: String,
    pub email: String,
    #[serde(flatten)]
    pub socials: SocialLinks,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChickenSeller {
    /// Per-bird price band, e.g. `$4.50-$6.00 each`.
    pub fn price_range(&self) -> String {
        format!("{}-{} each", self.min_price, self.max_price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChickenSellerDraft {
    pub farm_name: String,
    pub location: String,
    #[serde(default)]
    pub available_quantity: u32,
    pub min_price: Price,
    pub max_price: Price,
    #[serde(default)]
    pub breeds: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub delivery_available: bool,
    #[serde(default)]
    pub vaccinated: bool,
    pub contact_number: String,
    pub email: String,
    #[serde(flatten)]
    pub socials: SocialLinks,
}

/// Chicken seller directory search (`?location=&search=`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChickenSellerFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ChickenSellerFilter {
    pub fn matches(&self, seller: &ChickenSeller) -> bool {
        let needle = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase)
        };
        let location = needle(&self.location);
        let search = needle(&self.search);

        seller.is_active
            && location.map_or(true, |location| {
                seller.location.to_lowercase().contains(&location)
            })
            && search.map_or(true, |search| {
                [&seller.farm_name, &seller.description, &seller.breeds]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&search))
            })
    }
}

/// Active chicken sellers plus the distinct locations to filter by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChickenDirectory {
    pub sellers: Vec<ChickenSellerCard>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChickenSellerCard {
    #[serde(flatten)]
    pub seller: ChickenSeller,
    pub price_range: String,
}

impl From<ChickenSeller> for ChickenSellerCard {
    fn from(seller: ChickenSeller) -> Self {
        Self {
            price_range: seller.price_range(),
            seller,
        }
    }
}

/// Sign-up for a poultry farming training course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEnrollment {
    pub id: EnrollmentId,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub course: String,
    pub location: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentDraft {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    pub course: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub message: String,
}
