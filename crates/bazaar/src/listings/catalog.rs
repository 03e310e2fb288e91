//! Categories every section starts with.

use super::domain::{Category, Gender, ListingKind};

fn category(kind: ListingKind, slug: &str, name: &str, icon: &str, gender: Option<Gender>) -> Category {
    Category {
        kind,
        slug: slug.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        gender,
    }
}

pub fn default_categories() -> Vec<Category> {
    use ListingKind::*;

    vec![
        category(Vehicle, "car", "Car", "fa-car", None),
        category(Vehicle, "truck", "Truck", "fa-truck", None),
        category(Vehicle, "motorcycle", "Motorcycle", "fa-motorcycle", None),
        category(Vehicle, "bicycle", "Bicycle", "fa-bicycle", None),
        category(Vehicle, "suv", "SUV", "fa-car-side", None),
        category(Vehicle, "van", "Van", "fa-shuttle-van", None),
        category(Vehicle, "bus", "Bus", "fa-bus", None),
        category(Vehicle, "commercial", "Commercial Vehicles", "fa-truck-moving", None),
        category(House, "apartment", "Apartment", "fa-building", None),
        category(House, "detached", "Detached House", "fa-home", None),
        category(House, "semi-detached", "Semi-Detached House", "fa-home", None),
        category(House, "terraced", "Terraced House", "fa-city", None),
        category(House, "bungalow", "Bungalow", "fa-house-user", None),
        category(House, "duplex", "Duplex", "fa-hotel", None),
        category(House, "villa", "Villa", "fa-umbrella-beach", None),
        category(House, "studio", "Studio", "fa-door-open", None),
        category(House, "other", "Other", "fa-warehouse", None),
        category(Electronics, "phones", "Phones & Tablets", "fa-mobile-alt", None),
        category(Electronics, "computers", "Computers", "fa-laptop", None),
        category(Electronics, "tv-audio", "TV & Audio", "fa-tv", None),
        category(Electronics, "cameras", "Cameras", "fa-camera", None),
        category(Electronics, "accessories", "Accessories", "fa-headphones", None),
        category(Clothing, "men-shirts", "Shirts", "fa-tshirt", Some(Gender::Men)),
        category(Clothing, "men-shoes", "Shoes", "fa-shoe-prints", Some(Gender::Men)),
        category(Clothing, "women-dresses", "Dresses", "fa-female", Some(Gender::Women)),
        category(Clothing, "women-shoes", "Shoes", "fa-shoe-prints", Some(Gender::Women)),
        category(Clothing, "kids-wear", "Kids Wear", "fa-child", Some(Gender::Kids)),
        category(Clothing, "accessories", "Accessories", "fa-glasses", Some(Gender::Unisex)),
        category(Poultry, "live-chickens", "Live Chickens", "fa-kiwi-bird", None),
        category(Poultry, "eggs", "Eggs", "fa-egg", None),
        category(Poultry, "feed", "Feed", "fa-seedling", None),
        category(Poultry, "equipment", "Equipment", "fa-tools", None),
    ]
}
