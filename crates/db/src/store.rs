use async_trait::async_trait;

use roomdesk_core::domain::price_rule::RoomPriceRule;
use roomdesk_core::domain::reservation::{Reservation, StaySpan};
use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};
use roomdesk_core::errors::ApplicationError;
use roomdesk_core::store::{InventoryStore, PriceRuleStore};

use crate::repositories::{
    InMemoryPriceRuleRepository, InMemoryReservationRepository, InMemoryRoomTypeRepository,
    PriceRuleRepository, ReservationRepository, RoomTypeRepository, SqlPriceRuleRepository,
    SqlReservationRepository, SqlRoomTypeRepository,
};
use crate::DbPool;

/// Serves the resolvers' read interfaces from a set of repositories.
pub struct RepositoryInventoryStore<T, R, P> {
    room_types: T,
    reservations: R,
    price_rules: P,
}

pub type SqlInventoryStore = RepositoryInventoryStore<
    SqlRoomTypeRepository,
    SqlReservationRepository,
    SqlPriceRuleRepository,
>;

pub type InMemoryInventoryStore = RepositoryInventoryStore<
    InMemoryRoomTypeRepository,
    InMemoryReservationRepository,
    InMemoryPriceRuleRepository,
>;

impl<T, R, P> RepositoryInventoryStore<T, R, P> {
    pub fn new(room_types: T, reservations: R, price_rules: P) -> Self {
        Self { room_types, reservations, price_rules }
    }

    pub fn room_types(&self) -> &T {
        &self.room_types
    }

    pub fn reservations(&self) -> &R {
        &self.reservations
    }

    pub fn price_rules(&self) -> &P {
        &self.price_rules
    }
}

impl SqlInventoryStore {
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            SqlRoomTypeRepository::new(pool.clone()),
            SqlReservationRepository::new(pool.clone()),
            SqlPriceRuleRepository::new(pool),
        )
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new(
            InMemoryRoomTypeRepository::default(),
            InMemoryReservationRepository::default(),
            InMemoryPriceRuleRepository::default(),
        )
    }
}

#[async_trait]
impl<T, R, P> InventoryStore for RepositoryInventoryStore<T, R, P>
where
    T: RoomTypeRepository,
    R: ReservationRepository,
    P: PriceRuleRepository,
{
    async fn find_room_type(&self, id: &RoomTypeId) -> Result<Option<RoomType>, ApplicationError> {
        Ok(self.room_types.find_by_id(id).await?)
    }

    async fn list_active_room_types(
        &self,
        customer_id: &CustomerId,
        min_guests: u32,
    ) -> Result<Vec<RoomType>, ApplicationError> {
        Ok(self.room_types.list_active_for_customer(customer_id, min_guests).await?)
    }

    async fn find_blocking_reservations(
        &self,
        room_type_id: &RoomTypeId,
        window: &StaySpan,
    ) -> Result<Vec<Reservation>, ApplicationError> {
        Ok(self.reservations.list_blocking_overlapping(room_type_id, window).await?)
    }
}

#[async_trait]
impl<T, R, P> PriceRuleStore for RepositoryInventoryStore<T, R, P>
where
    T: RoomTypeRepository,
    R: ReservationRepository,
    P: PriceRuleRepository,
{
    async fn list_price_rules(
        &self,
        room_type_id: &RoomTypeId,
    ) -> Result<Vec<RoomPriceRule>, ApplicationError> {
        Ok(self.price_rules.list_for_room_type(room_type_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use roomdesk_core::availability::AvailabilityResolver;
    use roomdesk_core::domain::reservation::{
        Reservation, ReservationId, ReservationStatus, StaySpan,
    };
    use roomdesk_core::domain::room_type::{CustomerId, RoomTypeId};
    use roomdesk_core::errors::ApplicationError;
    use roomdesk_core::store::PriceRuleStore;

    use super::{InMemoryInventoryStore, SqlInventoryStore};
    use crate::fixtures::{seed_demo_hotel, DEMO_CUSTOMER_ID};
    use crate::repositories::ReservationRepository;
    use crate::{connect_in_memory, migrations};

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).single().expect("valid date")
    }

    async fn sql_store() -> SqlInventoryStore {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let store = SqlInventoryStore::from_pool(pool);
        seed_demo_hotel(&store).await.expect("seed");
        store
    }

    #[tokio::test]
    async fn sql_and_in_memory_stores_answer_the_same() {
        let memory = InMemoryInventoryStore::default();
        seed_demo_hotel(&memory).await.expect("seed");
        let sql_resolver = AvailabilityResolver::new(sql_store().await);
        let memory_resolver = AvailabilityResolver::new(memory);

        let stay = StaySpan::new(june(3), june(7)).expect("stay");
        for id in ["aurora-standard", "aurora-deluxe", "aurora-suite", "aurora-retired"] {
            let room_type_id = RoomTypeId(id.to_string());
            let from_sql =
                sql_resolver.check_availability(&room_type_id, &stay, 1).await.expect("sql check");
            let from_memory = memory_resolver
                .check_availability(&room_type_id, &stay, 1)
                .await
                .expect("memory check");
            assert_eq!(from_sql, from_memory, "room type {id}");
        }
    }

    #[tokio::test]
    async fn sub_second_overlap_is_seen_by_both_stores() {
        let memory = InMemoryInventoryStore::default();
        seed_demo_hotel(&memory).await.expect("seed");
        let sql = sql_store().await;

        let september = |day, hour, millis| {
            Utc.with_ymd_and_hms(2024, 9, day, hour, 0, 0).single().expect("valid date")
                + Duration::milliseconds(millis)
        };
        let booking = Reservation {
            id: ReservationId("res-late".to_string()),
            room_type_id: RoomTypeId("aurora-suite".to_string()),
            check_in: september(5, 0, 0),
            check_out: september(7, 0, 0),
            number_of_rooms: 1,
            status: ReservationStatus::Confirmed,
        };
        sql.reservations().save(booking.clone()).await.expect("sql save");
        memory.reservations().save(booking).await.expect("memory save");

        let stay = StaySpan::new(september(4, 12, 0), september(5, 0, 500)).expect("stay");
        let suite = RoomTypeId("aurora-suite".to_string());
        let from_sql =
            AvailabilityResolver::new(sql).check_availability(&suite, &stay, 1).await.expect("sql");
        let from_memory = AvailabilityResolver::new(memory)
            .check_availability(&suite, &stay, 1)
            .await
            .expect("memory");

        assert_eq!(from_sql, from_memory);
        assert_eq!(from_sql.booked_rooms, 1);
        assert!(!from_sql.available);
    }

    #[tokio::test]
    async fn sql_store_keeps_sub_second_instants() {
        let store = sql_store().await;
        let check_in = june(20) + Duration::nanoseconds(123_456_789);
        let booking = Reservation {
            id: ReservationId("res-precise".to_string()),
            room_type_id: RoomTypeId("aurora-standard".to_string()),
            check_in,
            check_out: june(22),
            number_of_rooms: 1,
            status: ReservationStatus::Pending,
        };
        store.reservations().save(booking.clone()).await.expect("save");

        let loaded = store
            .reservations()
            .find_by_id(&booking.id)
            .await
            .expect("find")
            .expect("stored reservation");
        assert_eq!(loaded, booking);
    }

    #[tokio::test]
    async fn sql_store_backs_demo_availability() {
        let resolver = AvailabilityResolver::new(sql_store().await);
        let stay = StaySpan::new(june(3), june(7)).expect("stay");

        let standard = resolver
            .check_availability(&RoomTypeId("aurora-standard".to_string()), &stay, 1)
            .await
            .expect("check");
        assert_eq!(standard.total_rooms, 5);
        assert_eq!(standard.booked_rooms, 3);
        assert_eq!(standard.available_rooms, 2);

        let listed = resolver
            .list_available_room_types(&CustomerId(DEMO_CUSTOMER_ID.to_string()), &stay, 3)
            .await
            .expect("list");
        assert!(listed.iter().all(|entry| entry.room_type.max_guests >= 3));
        assert!(listed.iter().all(|entry| entry.room_type.is_active));
    }

    #[tokio::test]
    async fn price_rules_are_served_through_the_store() {
        let store = sql_store().await;
        let standard = RoomTypeId("aurora-standard".to_string());
        let rules = store.list_price_rules(&standard).await.expect("rules");
        assert!(!rules.is_empty());
    }

    #[tokio::test]
    async fn closed_pool_surfaces_as_persistence_failure() {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool.close().await;
        let resolver = AvailabilityResolver::new(SqlInventoryStore::from_pool(pool));

        let stay = StaySpan::new(june(3), june(7)).expect("stay");
        let result =
            resolver.check_availability(&RoomTypeId("aurora-standard".to_string()), &stay, 1).await;
        assert!(matches!(result, Err(ApplicationError::Persistence(_))));
    }
}
