use std::collections::BTreeMap;
use std::sync::Mutex;

use super::domain::{
    Booking, BookingId, ChickenSeller, ChickenSellerId, Consultant, ConsultantId, EggOrder,
    EggOrderId, EggSeller, EggSellerId, EnrollmentId, Offering, OfferingId, TrainingEnrollment,
};
use crate::store::{lock, RepositoryError, Sequence};

/// Storage for egg and chicken sellers, egg orders, consultants, bookings and trainees.
pub trait FarmRepository: Send + Sync {
    fn insert_seller(&self, seller: EggSeller) -> Result<EggSeller, RepositoryError>;
    fn update_seller(&self, seller: EggSeller) -> Result<(), RepositoryError>;
    /// Removes the seller and its orders.
    fn remove_seller(&self, id: EggSellerId) -> Result<EggSeller, RepositoryError>;
    fn seller(&self, id: EggSellerId) -> Result<Option<EggSeller>, RepositoryError>;
    fn sellers(&self) -> Result<Vec<EggSeller>, RepositoryError>;

    fn insert_order(&self, order: EggOrder) -> Result<EggOrder, RepositoryError>;
    fn orders_for(&self, seller: EggSellerId) -> Result<Vec<EggOrder>, RepositoryError>;

    fn insert_consultant(
        &self,
        consultant: Consultant,
        offerings: Vec<Offering>,
    ) -> Result<(Consultant, Vec<Offering>), RepositoryError>;
    fn consultant(&self, id: ConsultantId) -> Result<Option<Consultant>, RepositoryError>;
    fn consultants(&self) -> Result<Vec<Consultant>, RepositoryError>;
    fn offerings_for(&self, consultant: ConsultantId) -> Result<Vec<Offering>, RepositoryError>;
    fn offering(&self, id: OfferingId) -> Result<Option<Offering>, RepositoryError>;

    fn insert_booking(&self, booking: Booking) -> Result<Booking, RepositoryError>;

    /// Store a chicken seller profile. `Conflict` when the owner already has an active one;
    /// an inactive profile of the same owner is replaced.
    fn insert_chicken_seller(&self, seller: ChickenSeller)
        -> Result<ChickenSeller, RepositoryError>;
    fn update_chicken_seller(&self, seller: ChickenSeller) -> Result<(), RepositoryError>;
    fn chicken_seller(&self, id: ChickenSellerId)
        -> Result<Option<ChickenSeller>, RepositoryError>;
    fn chicken_sellers(&self) -> Result<Vec<ChickenSeller>, RepositoryError>;

    fn insert_enrollment(
        &self,
        enrollment: TrainingEnrollment,
    ) -> Result<TrainingEnrollment, RepositoryError>;
    fn enrollments(&self) -> Result<Vec<TrainingEnrollment>, RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryFarmRepository {
    sellers: Mutex<BTreeMap<EggSellerId, EggSeller>>,
    orders: Mutex<Vec<EggOrder>>,
    consultants: Mutex<BTreeMap<ConsultantId, Consultant>>,
    offerings: Mutex<BTreeMap<OfferingId, Offering>>,
    bookings: Mutex<Vec<Booking>>,
    chicken_sellers: Mutex<BTreeMap<ChickenSellerId, ChickenSeller>>,
    enrollments: Mutex<Vec<TrainingEnrollment>>,
    seller_ids: Sequence,
    order_ids: Sequence,
    consultant_ids: Sequence,
    offering_ids: Sequence,
    booking_ids: Sequence,
    chicken_seller_ids: Sequence,
    enrollment_ids: Sequence,
}

impl FarmRepository for InMemoryFarmRepository {
    fn insert_seller(&self, mut seller: EggSeller) -> Result<EggSeller, RepositoryError> {
        seller.id = EggSellerId(self.seller_ids.next());
        lock(&self.sellers, "egg_sellers")?.insert(seller.id, seller.clone());
        Ok(seller)
    }

    fn update_seller(&self, seller: EggSeller) -> Result<(), RepositoryError> {
        let mut sellers = lock(&self.sellers, "egg_sellers")?;
        let slot = sellers.get_mut(&seller.id).ok_or(RepositoryError::NotFound)?;
        *slot = seller;
        Ok(())
    }

    fn remove_seller(&self, id: EggSellerId) -> Result<EggSeller, RepositoryError> {
        let removed = lock(&self.sellers, "egg_sellers")?
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        lock(&self.orders, "egg_orders")?.retain(|order| order.seller != id);
        Ok(removed)
    }

    fn seller(&self, id: EggSellerId) -> Result<Option<EggSeller>, RepositoryError> {
        Ok(lock(&self.sellers, "egg_sellers")?.get(&id).cloned())
    }

    fn sellers(&self) -> Result<Vec<EggSeller>, RepositoryError> {
        Ok(lock(&self.sellers, "egg_sellers")?.values().cloned().collect())
    }

    fn insert_order(&self, mut order: EggOrder) -> Result<EggOrder, RepositoryError> {
        order.id = EggOrderId(self.order_ids.next());
        lock(&self.orders, "egg_orders")?.push(order.clone());
        Ok(order)
    }

    fn orders_for(&self, seller: EggSellerId) -> Result<Vec<EggOrder>, RepositoryError> {
        Ok(lock(&self.orders, "egg_orders")?
            .iter()
            .filter(|order| order.seller == seller)
            .cloned()
            .collect())
    }

    fn insert_consultant(
        &self,
        mut consultant: Consultant,
        offerings: Vec<Offering>,
    ) -> Result<(Consultant, Vec<Offering>), RepositoryError> {
        consultant.id = ConsultantId(self.consultant_ids.next());
        let mut stored_offerings = lock(&self.offerings, "consultation_services")?;
        let offerings: Vec<Offering> = offerings
            .into_iter()
            .map(|mut offering| {
                offering.id = OfferingId(self.offering_ids.next());
                offering.consultant = consultant.id;
                stored_offerings.insert(offering.id, offering.clone());
                offering
            })
            .collect();
        lock(&self.consultants, "consultants")?.insert(consultant.id, consultant.clone());
        Ok((consultant, offerings))
    }

    fn consultant(&self, id: ConsultantId) -> Result<Option<Consultant>, RepositoryError> {
        Ok(lock(&self.consultants, "consultants")?.get(&id).cloned())
    }

    fn consultants(&self) -> Result<Vec<Consultant>, RepositoryError> {
        Ok(lock(&self.consultants, "consultants")?
            .values()
            .cloned()
            .collect())
    }

    fn offerings_for(&self, consultant: ConsultantId) -> Result<Vec<Offering>, RepositoryError> {
        Ok(lock(&self.offerings, "consultation_services")?
            .values()
            .filter(|offering| offering.consultant == consultant)
            .cloned()
            .collect())
    }

    fn offering(&self, id: OfferingId) -> Result<Option<Offering>, RepositoryError> {
        Ok(lock(&self.offerings, "consultation_services")?
            .get(&id)
            .cloned())
    }

    fn insert_booking(&self, mut booking: Booking) -> Result<Booking, RepositoryError> {
        booking.id = BookingId(self.booking_ids.next());
        lock(&self.bookings, "consultation_bookings")?.push(booking.clone());
        Ok(booking)
    }

    fn insert_chicken_seller(
        &self,
        mut seller: ChickenSeller,
    ) -> Result<ChickenSeller, RepositoryError> {
        let mut sellers = lock(&self.chicken_sellers, "chicken_sellers")?;
        if sellers
            .values()
            .any(|existing| existing.owner == seller.owner && existing.is_active)
        {
            return Err(RepositoryError::Conflict);
        }
        sellers.retain(|_, existing| existing.owner != seller.owner);

        seller.id = ChickenSellerId(self.chicken_seller_ids.next());
        sellers.insert(seller.id, seller.clone());
        Ok(seller)
    }

    fn update_chicken_seller(&self, seller: ChickenSeller) -> Result<(), RepositoryError> {
        let mut sellers = lock(&self.chicken_sellers, "chicken_sellers")?;
        let slot = sellers.get_mut(&seller.id).ok_or(RepositoryError::NotFound)?;
        *slot = seller;
        Ok(())
    }

    fn chicken_seller(
        &self,
        id: ChickenSellerId,
    ) -> Result<Option<ChickenSeller>, RepositoryError> {
        Ok(lock(&self.chicken_sellers, "chicken_sellers")?
            .get(&id)
            .cloned())
    }

    fn chicken_sellers(&self) -> Result<Vec<ChickenSeller>, RepositoryError> {
        Ok(lock(&self.chicken_sellers, "chicken_sellers")?
            .values()
            .cloned()
            .collect())
    }

    fn insert_enrollment(
        &self,
        mut enrollment: TrainingEnrollment,
    ) -> Result<TrainingEnrollment, RepositoryError> {
        enrollment.id = EnrollmentId(self.enrollment_ids.next());
        lock(&self.enrollments, "training_enrollments")?.push(enrollment.clone());
        Ok(enrollment)
    }

    fn enrollments(&self) -> Result<Vec<TrainingEnrollment>, RepositoryError> {
        Ok(lock(&self.enrollments, "training_enrollments")?.clone())
    }
}
