use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::domain::{
    Booking, BookingDraft, BookingId, ChickenDirectory, ChickenSeller, ChickenSellerDraft,
    ChickenSellerFilter, ChickenSellerId, Consultant, ConsultantDraft, ConsultantId,
    ConsultantView, EggOrder, EggOrderDraft, EggOrderId, EggSeller, EggSellerDraft,
    EggSellerFilter, EggSellerId, EnrollmentDraft, EnrollmentId, Offering, OfferingId,
    RequestStatus, TrainingEnrollment,
};
use super::repository::FarmRepository;
use super::FarmError;
use crate::accounts::{User, UserId};
use crate::store::RepositoryError;

/// Egg and chicken sellers, veterinary consultancy and trainings for the poultry section.
pub struct FarmService {
    farms: Arc<dyn FarmRepository>,
}

impl FarmService {
    pub fn new(farms: Arc<dyn FarmRepository>) -> Self {
        Self { farms }
    }

    pub fn create_seller(&self, draft: EggSellerDraft) -> Result<EggSeller, FarmError> {
        validate_seller(&draft)?;
        let now = Utc::now();
        let seller = self.farms.insert_seller(seller_from(EggSellerId(0), draft, now, now))?;
        info!(seller_id = %seller.id, farm = %seller.farm_name, "egg seller created");
        Ok(seller)
    }

    pub fn update_seller(
        &self,
        id: EggSellerId,
        draft: EggSellerDraft,
    ) -> Result<EggSeller, FarmError> {
        validate_seller(&draft)?;
        let existing = self.seller(id)?;
        let seller = seller_from(id, draft, existing.created_at, Utc::now());
        self.farms.update_seller(seller.clone()).map_err(seller_missing)?;
        Ok(seller)
    }

    pub fn delete_seller(&self, id: EggSellerId) -> Result<(), FarmError> {
        self.farms.remove_seller(id).map_err(seller_missing)?;
        info!(seller_id = %id, "egg seller deleted");
        Ok(())
    }

    pub fn seller(&self, id: EggSellerId) -> Result<EggSeller, FarmError> {
        self.farms.seller(id)?.ok_or(FarmError::SellerNotFound)
    }

    /// Active sellers matching the filter, verified first then best rated.
    pub fn search(&self, filter: &EggSellerFilter) -> Result<Vec<EggSeller>, FarmError> {
        let mut sellers: Vec<EggSeller> = self
            .farms
            .sellers()?
            .into_iter()
            .filter(|seller| filter.matches(seller))
            .collect();
        sellers.sort_by(|a, b| {
            b.is_verified
                .cmp(&a.is_verified)
                .then_with(|| b.rating.total_cmp(&a.rating))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sellers)
    }

    pub fn place_order(
        &self,
        seller_id: EggSellerId,
        draft: EggOrderDraft,
    ) -> Result<EggOrder, FarmError> {
        let seller = self.seller(seller_id)?;
        if !seller.is_active {
            return Err(FarmError::SellerInactive);
        }
        if draft.quantity == 0 || draft.quantity < seller.min_order_quantity {
            return Err(FarmError::BelowMinimumOrder {
                minimum: seller.min_order_quantity.max(1),
            });
        }
        for (field, value) in [
            ("customer_name", &draft.customer_name),
            ("customer_email", &draft.customer_email),
            ("customer_phone", &draft.customer_phone),
            ("customer_address", &draft.customer_address),
        ] {
            require(field, value)?;
        }
        let total_price = seller
            .price_per_dozen
            .times(draft.quantity)
            .ok_or_else(|| FarmError::Invalid("order total overflows".to_string()))?;

        let order = self.farms.insert_order(EggOrder {
            id: EggOrderId(0),
            seller: seller.id,
            customer_name: draft.customer_name.trim().to_string(),
            customer_email: draft.customer_email.trim().to_string(),
            customer_phone: draft.customer_phone.trim().to_string(),
            customer_address: draft.customer_address.trim().to_string(),
            quantity: draft.quantity,
            total_price,
            special_instructions: draft.special_instructions,
            status: RequestStatus::Pending,
            ordered_at: Utc::now(),
            preferred_delivery_date: draft.preferred_delivery_date,
        })?;
        info!(order_id = %order.id, seller_id = %seller.id, dozens = order.quantity, "egg order placed");
        Ok(order)
    }

    /// Orders for one seller, newest first.
    pub fn orders_for(&self, seller_id: EggSellerId) -> Result<Vec<EggOrder>, FarmError> {
        self.seller(seller_id)?;
        let mut orders = self.farms.orders_for(seller_id)?;
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at).then_with(|| b.id.cmp(&a.id)));
        Ok(orders)
    }

    pub fn add_consultant(&self, draft: ConsultantDraft) -> Result<ConsultantView, FarmError> {
        require("name", &draft.name)?;
        if !(0.0..=5.0).contains(&draft.rating) {
            return Err(FarmError::Invalid("rating must be between 0 and 5".to_string()));
        }
        let offerings = draft
            .services
            .into_iter()
            .map(|service| Offering {
                id: OfferingId(0),
                consultant: ConsultantId(0),
                service_type: service.service_type,
                price: service.price,
                duration: service.duration,
            })
            .collect();
        let consultant = Consultant {
            id: ConsultantId(0),
            name: draft.name.trim().to_string(),
            experience_years: draft.experience_years,
            specialty: draft.specialty,
            languages: draft.languages,
            rating: draft.rating,
            rating_count: draft.rating_count,
            description: draft.description,
            availability: draft.availability,
            email: draft.email,
            phone: draft.phone,
            whatsapp: draft.whatsapp,
            is_available: draft.is_available,
            consultation_fee: draft.consultation_fee,
        };

        let (consultant, services) = self.farms.insert_consultant(consultant, offerings)?;
        info!(consultant_id = %consultant.id, services = services.len(), "consultant added");
        Ok(ConsultantView {
            consultant,
            services,
        })
    }

    /// Available consultants, best rated first.
    pub fn available_consultants(&self) -> Result<Vec<ConsultantView>, FarmError> {
        let mut consultants: Vec<Consultant> = self
            .farms
            .consultants()?
            .into_iter()
            .filter(|consultant| consultant.is_available)
            .collect();
        consultants.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));

        consultants
            .into_iter()
            .map(|consultant| -> Result<ConsultantView, FarmError> {
                let services = self.farms.offerings_for(consultant.id)?;
                Ok(ConsultantView {
                    consultant,
                    services,
                })
            })
            .collect()
    }

    /// Book one of a consultant's services for `today` or later.
    pub fn book(
        &self,
        consultant_id: ConsultantId,
        draft: BookingDraft,
        today: NaiveDate,
    ) -> Result<Booking, FarmError> {
        let consultant = self
            .farms
            .consultant(consultant_id)?
            .ok_or(FarmError::ConsultantNotFound)?;
        if !consultant.is_available {
            return Err(FarmError::ConsultantUnavailable);
        }
        match self.farms.offering(draft.service)? {
            Some(offering) if offering.consultant == consultant.id => {}
            _ => return Err(FarmError::ServiceMismatch),
        }
        if draft.preferred_date < today {
            return Err(FarmError::DateInPast);
        }
        require("user_name", &draft.user_name)?;
        require("user_email", &draft.user_email)?;
        require("user_phone", &draft.user_phone)?;

        let booking = self.farms.insert_booking(Booking {
            id: BookingId(0),
            consultant: consultant.id,
            service: draft.service,
            user_name: draft.user_name.trim().to_string(),
            user_email: draft.user_email.trim().to_string(),
            user_phone: draft.user_phone.trim().to_string(),
            preferred_date: draft.preferred_date,
            preferred_time: draft.preferred_time,
            message: draft.message,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        })?;
        info!(booking_id = %booking.id, consultant_id = %consultant.id, "consultation booked");
        Ok(booking)
    }

    /// Open the caller's chicken seller profile, replacing a deactivated one.
    pub fn register_chicken_seller(
        &self,
        owner: &User,
        draft: ChickenSellerDraft,
    ) -> Result<ChickenSeller, FarmError> {
        validate_chicken_seller(&draft)?;
        let now = Utc::now();
        let seller = chicken_seller_from(ChickenSellerId(0), owner.id, draft, now, now);
        let seller = self
            .farms
            .insert_chicken_seller(seller)
            .map_err(|err| match err {
                RepositoryError::Conflict => FarmError::AlreadyRegistered,
                other => FarmError::Repository(other),
            })?;
        info!(seller_id = %seller.id, owner = %owner.id, farm = %seller.farm_name, "chicken seller registered");
        Ok(seller)
    }

    /// Active profile by id; deactivated profiles read as missing.
    pub fn chicken_seller(&self, id: ChickenSellerId) -> Result<ChickenSeller, FarmError> {
        self.farms
            .chicken_seller(id)?
            .filter(|seller| seller.is_active)
            .ok_or(FarmError::ChickenSellerNotFound)
    }

    /// Active sellers matching the filter, newest first, with every active location.
    pub fn chicken_directory(
        &self,
        filter: &ChickenSellerFilter,
    ) -> Result<ChickenDirectory, FarmError> {
        let mut active: Vec<ChickenSeller> = self
            .farms
            .chicken_sellers()?
            .into_iter()
            .filter(|seller| seller.is_active)
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        let mut locations: Vec<String> = active.iter().map(|seller| seller.location.clone()).collect();
        locations.sort();
        locations.dedup();

        let sellers = active
            .into_iter()
            .filter(|seller| filter.matches(seller))
            .map(Into::into)
            .collect();
        Ok(ChickenDirectory { sellers, locations })
    }

    pub fn update_chicken_seller(
        &self,
        requester: &User,
        id: ChickenSellerId,
        draft: ChickenSellerDraft,
    ) -> Result<ChickenSeller, FarmError> {
        validate_chicken_seller(&draft)?;
        let existing = self.managed_chicken_seller(requester, id)?;
        let seller = chicken_seller_from(id, existing.owner, draft, existing.created_at, Utc::now());
        self.farms
            .update_chicken_seller(seller.clone())
            .map_err(chicken_seller_missing)?;
        Ok(seller)
    }

    /// Soft delete: the profile leaves the directory and can be registered again.
    pub fn deactivate_chicken_seller(
        &self,
        requester: &User,
        id: ChickenSellerId,
    ) -> Result<(), FarmError> {
        let mut seller = self.managed_chicken_seller(requester, id)?;
        seller.is_active = false;
        seller.updated_at = Utc::now();
        self.farms
            .update_chicken_seller(seller)
            .map_err(chicken_seller_missing)?;
        info!(seller_id = %id, requester = %requester.id, "chicken seller deactivated");
        Ok(())
    }

    pub fn enroll(&self, draft: EnrollmentDraft) -> Result<TrainingEnrollment, FarmError> {
        require("full_name", &draft.full_name)?;
        require("phone_number", &draft.phone_number)?;
        require("course", &draft.course)?;

        let enrollment = self.farms.insert_enrollment(TrainingEnrollment {
            id: EnrollmentId(0),
            full_name: draft.full_name.trim().to_string(),
            phone_number: draft.phone_number.trim().to_string(),
            email: draft.email.trim().to_string(),
            course: draft.course.trim().to_string(),
            location: draft.location.trim().to_string(),
            message: draft.message,
            created_at: Utc::now(),
        })?;
        info!(enrollment_id = %enrollment.id, course = %enrollment.course, "training enrollment received");
        Ok(enrollment)
    }

    /// Every enrollment, newest first.
    pub fn trainees(&self) -> Result<Vec<TrainingEnrollment>, FarmError> {
        let mut trainees = self.farms.enrollments()?;
        trainees.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(trainees)
    }

    fn managed_chicken_seller(
        &self,
        requester: &User,
        id: ChickenSellerId,
    ) -> Result<ChickenSeller, FarmError> {
        let seller = self.chicken_seller(id)?;
        if requester.is_staff || requester.id == seller.owner {
            Ok(seller)
        } else {
            Err(FarmError::NotOwner)
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), FarmError> {
    if value.trim().is_empty() {
        Err(FarmError::Invalid(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn validate_seller(draft: &EggSellerDraft) -> Result<(), FarmError> {
    require("farm_name", &draft.farm_name)?;
    require("city", &draft.city)?;
    require("phone", &draft.phone)?;
    if !(0.0..=5.0).contains(&draft.rating) {
        return Err(FarmError::Invalid("rating must be between 0 and 5".to_string()));
    }
    Ok(())
}

fn seller_from(
    id: EggSellerId,
    draft: EggSellerDraft,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> EggSeller {
    EggSeller {
        id,
        farm_name: draft.farm_name.trim().to_string(),
        owner_name: draft.owner_name,
        description: draft.description,
        city: draft.city.trim().to_string(),
        state: draft.state,
        country: draft.country,
        address: draft.address,
        egg_type: draft.egg_type,
        certification: draft.certification,
        quantity_available: draft.quantity_available,
        price_per_dozen: draft.price_per_dozen,
        min_order_quantity: draft.min_order_quantity,
        phone: draft.phone.trim().to_string(),
        email: draft.email,
        website: draft.website,
        is_verified: draft.is_verified,
        is_active: draft.is_active,
        rating: draft.rating,
        review_count: draft.review_count,
        created_at,
        updated_at,
    }
}

fn validate_chicken_seller(draft: &ChickenSellerDraft) -> Result<(), FarmError> {
    require("farm_name", &draft.farm_name)?;
    require("location", &draft.location)?;
    require("contact_number", &draft.contact_number)?;
    require("email", &draft.email)?;
    if draft.min_price > draft.max_price {
        return Err(FarmError::Invalid(
            "minimum price cannot be greater than maximum price".to_string(),
        ));
    }
    Ok(())
}

fn chicken_seller_from(
    id: ChickenSellerId,
    owner: UserId,
    draft: ChickenSellerDraft,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> ChickenSeller {
    ChickenSeller {
        id,
        owner,
        farm_name: draft.farm_name.trim().to_string(),
        location: draft.location.trim().to_string(),
        available_quantity: draft.available_quantity,
        min_price: draft.min_price,
        max_price: draft.max_price,
        breeds: draft.breeds.trim().to_string(),
        description: draft.description,
        delivery_available: draft.delivery_available,
        vaccinated: draft.vaccinated,
        contact_number: draft.contact_number.trim().to_string(),
        email: draft.email.trim().to_string(),
        socials: draft.socials,
        is_active: true,
        created_at,
        updated_at,
    }
}

fn chicken_seller_missing(err: RepositoryError) -> FarmError {
    match err {
        RepositoryError::NotFound => FarmError::ChickenSellerNotFound,
        other => FarmError::Repository(other),
    }
}

fn seller_missing(err: RepositoryError) -> FarmError {
    match err {
        RepositoryError::NotFound => FarmError::SellerNotFound,
        other => FarmError::Repository(other),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::farms::domain::{Certification, EggType, OfferingDraft, ServiceType};
    use crate::farms::InMemoryFarmRepository;
    use crate::listings::Price;
    use crate::testing::{market, member, staff};

    fn service() -> FarmService {
        FarmService::new(Arc::new(InMemoryFarmRepository::default()))
    }

    fn seller(name: &str, city: &str, verified: bool, rating: f32) -> EggSellerDraft {
        EggSellerDraft {
            farm_name: name.to_string(),
            owner_name: String::new(),
            description: "Fresh eggs daily".to_string(),
            city: city.to_string(),
            state: String::new(),
            country: "USA".to_string(),
            address: String::new(),
            egg_type: EggType::FreeRange,
            certification: Certification::None,
            quantity_available: 600,
            price_per_dozen: Price(450),
            min_order_quantity: 2,
            phone: "+15550100".to_string(),
            email: String::new(),
            website: String::new(),
            is_verified: verified,
            is_active: true,
            rating,
            review_count: 0,
        }
    }

    fn chickens(farm_name: &str, location: &str, breeds: &str) -> ChickenSellerDraft {
        ChickenSellerDraft {
            farm_name: farm_name.to_string(),
            location: location.to_string(),
            available_quantity: 40,
            min_price: Price(450),
            max_price: Price(600),
            breeds: breeds.to_string(),
            description: "Hardy birds raised on open pasture".to_string(),
            delivery_available: true,
            vaccinated: true,
            contact_number: "+254711000222".to_string(),
            email: "farm@example.com".to_string(),
            socials: Default::default(),
        }
    }

    fn order(quantity: u32) -> EggOrderDraft {
        EggOrderDraft {
            customer_name: "Grace".to_string(),
            customer_email: "grace@example.com".to_string(),
            customer_phone: "+15550111".to_string(),
            customer_address: "12 Mill Road".to_string(),
            quantity,
            special_instructions: String::new(),
            preferred_delivery_date: None,
        }
    }

    #[test]
    fn search_orders_verified_sellers_first_then_rating() {
        let service = service();
        service.create_seller(seller("Low", "Des Moines", false, 4.9)).expect("seller");
        service.create_seller(seller("Verified", "Ames", true, 3.1)).expect("seller");
        service.create_seller(seller("High", "des moines", false, 4.95)).expect("seller");
        let mut hidden = seller("Closed", "Des Moines", true, 5.0);
        hidden.is_active = false;
        service.create_seller(hidden).expect("seller");

        let all = service.search(&EggSellerFilter::default()).expect("search");
        let names: Vec<&str> = all.iter().map(|s| s.farm_name.as_str()).collect();
        assert_eq!(names, vec!["Verified", "High", "Low"]);

        let filter = EggSellerFilter {
            city: Some("MOINES".to_string()),
            ..EggSellerFilter::default()
        };
        assert_eq!(service.search(&filter).expect("search").len(), 2);

        let certified = EggSellerFilter {
            certified_only: Some(true),
            ..EggSellerFilter::default()
        };
        assert!(service.search(&certified).expect("search").is_empty());
    }

    #[test]
    fn egg_orders_enforce_minimum_and_compute_total() {
        let service = service();
        let farm = service.create_seller(seller("Hens", "Ames", true, 4.0)).expect("seller");

        match service.place_order(farm.id, order(1)) {
            Err(FarmError::BelowMinimumOrder { minimum }) => assert_eq!(minimum, 2),
            other => panic!("expected minimum order error, got {other:?}"),
        }

        let placed = service.place_order(farm.id, order(3)).expect("order");
        assert_eq!(placed.total_price, Price(1350));
        assert_eq!(placed.status, RequestStatus::Pending);
        assert_eq!(service.orders_for(farm.id).expect("orders").len(), 1);
    }

    #[test]
    fn bookings_require_matching_service_and_future_date() {
        let service = service();
        let vet = service
            .add_consultant(ConsultantDraft {
                name: "Dr. Wanjiru".to_string(),
                experience_years: 8,
                specialty: Default::default(),
                languages: vec!["English".to_string()],
                rating: 4.7,
                rating_count: 10,
                description: String::new(),
                availability: Default::default(),
                email: String::new(),
                phone: String::new(),
                whatsapp: String::new(),
                is_available: true,
                consultation_fee: Price(2000),
                services: vec![OfferingDraft {
                    service_type: ServiceType::Visit,
                    price: Price(5000),
                    duration: "per visit".to_string(),
                }],
            })
            .expect("consultant");
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let draft = BookingDraft {
            service: vet.services[0].id,
            user_name: "Otieno".to_string(),
            user_email: "otieno@example.com".to_string(),
            user_phone: "+254700000001".to_string(),
            preferred_date: today,
            preferred_time: NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"),
            message: String::new(),
        };

        let mut wrong_service = draft.clone();
        wrong_service.service = OfferingId(999);
        assert!(matches!(
            service.book(vet.consultant.id, wrong_service, today),
            Err(FarmError::ServiceMismatch)
        ));

        let mut past = draft.clone();
        past.preferred_date = NaiveDate::from_ymd_opt(2025, 3, 9).expect("valid date");
        assert!(matches!(
            service.book(vet.consultant.id, past, today),
            Err(FarmError::DateInPast)
        ));

        let booking = service.book(vet.consultant.id, draft, today).expect("booking");
        assert_eq!(booking.status, RequestStatus::Pending);
        assert_eq!(service.available_consultants().expect("list").len(), 1);
    }

    #[test]
    fn one_active_chicken_profile_per_member() {
        let market = market();
        let (farmer, _) = member(&market, "farmer", "+254711000001");

        let seller = market
            .farms
            .register_chicken_seller(&farmer, chickens("Kienyeji Hub", "Nakuru", "Kienyeji, Sussex"))
            .expect("register");
        assert!(seller.is_active);
        assert_eq!(seller.price_range(), "$4.50-$6.00 each");
        assert!(matches!(
            market
                .farms
                .register_chicken_seller(&farmer, chickens("Second Farm", "Nakuru", "Leghorn")),
            Err(FarmError::AlreadyRegistered)
        ));

        market
            .farms
            .deactivate_chicken_seller(&farmer, seller.id)
            .expect("deactivate");
        assert!(matches!(
            market.farms.chicken_seller(seller.id),
            Err(FarmError::ChickenSellerNotFound)
        ));

        let replacement = market
            .farms
            .register_chicken_seller(&farmer, chickens("Second Farm", "Eldoret", "Leghorn"))
            .expect("register again");
        let directory = market
            .farms
            .chicken_directory(&ChickenSellerFilter::default())
            .expect("directory");
        assert_eq!(directory.sellers.len(), 1);
        assert_eq!(directory.sellers[0].seller.id, replacement.id);
        assert_eq!(directory.locations, vec!["Eldoret".to_string()]);
    }

    #[test]
    fn chicken_profiles_change_only_by_owner_or_staff() {
        let market = market();
        let (farmer, _) = member(&market, "farmer", "+254711000001");
        let (neighbour, _) = member(&market, "neighbour", "+254711000002");
        let (admin, _) = staff(&market);
        let seller = market
            .farms
            .register_chicken_seller(&farmer, chickens("Kienyeji Hub", "Nakuru", "Kienyeji"))
            .expect("register");

        let mut edit = chickens("Kienyeji Hub", "Naivasha", "Kienyeji");
        assert!(matches!(
            market
                .farms
                .update_chicken_seller(&neighbour, seller.id, edit.clone()),
            Err(FarmError::NotOwner)
        ));
        assert!(matches!(
            market.farms.deactivate_chicken_seller(&neighbour, seller.id),
            Err(FarmError::NotOwner)
        ));

        edit.min_price = Price(900);
        assert!(matches!(
            market.farms.update_chicken_seller(&farmer, seller.id, edit.clone()),
            Err(FarmError::Invalid(_))
        ));

        edit.min_price = Price(500);
        let updated = market
            .farms
            .update_chicken_seller(&admin, seller.id, edit)
            .expect("staff edit");
        assert_eq!(updated.location, "Naivasha");
        assert_eq!(updated.owner, farmer.id);
        assert_eq!(updated.created_at, seller.created_at);
    }

    #[test]
    fn chicken_directory_filters_location_and_text() {
        let market = market();
        let (first, _) = member(&market, "first", "+254711000001");
        let (second, _) = member(&market, "second", "+254711000002");
        market
            .farms
            .register_chicken_seller(&first, chickens("Rift Layers", "Nakuru Town", "Leghorn"))
            .expect("register");
        market
            .farms
            .register_chicken_seller(&second, chickens("Coast Birds", "Mombasa", "Rhode Island Red"))
            .expect("register");

        let by_location = ChickenSellerFilter {
            location: Some("nakuru".to_string()),
            ..ChickenSellerFilter::default()
        };
        let found = market.farms.chicken_directory(&by_location).expect("directory");
        assert_eq!(found.sellers.len(), 1);
        assert_eq!(found.sellers[0].seller.farm_name, "Rift Layers");
        assert_eq!(found.locations.len(), 2);

        let by_breed = ChickenSellerFilter {
            search: Some("RHODE".to_string()),
            ..ChickenSellerFilter::default()
        };
        let found = market.farms.chicken_directory(&by_breed).expect("directory");
        assert_eq!(found.sellers.len(), 1);
        assert_eq!(found.sellers[0].seller.farm_name, "Coast Birds");
    }

    #[test]
    fn trainees_are_listed_newest_first() {
        let service = service();
        let draft = |name: &str| EnrollmentDraft {
            full_name: name.to_string(),
            phone_number: "+254722000333".to_string(),
            email: String::new(),
            course: "Layer management".to_string(),
            location: "Thika".to_string(),
            message: String::new(),
        };

        let mut missing_course = draft("Akinyi");
        missing_course.course = "  ".to_string();
        assert!(matches!(service.enroll(missing_course), Err(FarmError::Invalid(_))));

        service.enroll(draft("Akinyi")).expect("enroll");
        service.enroll(draft("Baraka")).expect("enroll");
        let names: Vec<String> = service
            .trainees()
            .expect("trainees")
            .into_iter()
            .map(|trainee| trainee.full_name)
            .collect();
        assert_eq!(names, vec!["Baraka".to_string(), "Akinyi".to_string()]);
    }
}
