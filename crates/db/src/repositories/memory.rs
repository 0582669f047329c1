use std::collections::HashMap;

use tokio::sync::RwLock;

use roomdesk_core::domain::price_rule::RoomPriceRule;
use roomdesk_core::domain::reservation::{Reservation, ReservationId, StaySpan};
use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};

use super::{PriceRuleRepository, RepositoryError, ReservationRepository, RoomTypeRepository};

/// Keeps insertion order so listings are stable across calls.
#[derive(Default)]
pub struct InMemoryRoomTypeRepository {
    room_types: RwLock<Vec<RoomType>>,
}

#[async_trait::async_trait]
impl RoomTypeRepository for InMemoryRoomTypeRepository {
    async fn find_by_id(&self, id: &RoomTypeId) -> Result<Option<RoomType>, RepositoryError> {
        let room_types = self.room_types.read().await;
        Ok(room_types.iter().find(|room_type| &room_type.id == id).cloned())
    }

    async fn list_active_for_customer(
        &self,
        customer_id: &CustomerId,
        min_guests: u32,
    ) -> Result<Vec<RoomType>, RepositoryError> {
        let room_types = self.room_types.read().await;
        Ok(room_types
            .iter()
            .filter(|room_type| {
                &room_type.customer_id == customer_id
                    && room_type.is_active
                    && room_type.max_guests >= min_guests
            })
            .cloned()
            .collect())
    }

    async fn save(&self, room_type: RoomType) -> Result<(), RepositoryError> {
        let mut room_types = self.room_types.write().await;
        match room_types.iter_mut().find(|existing| existing.id == room_type.id) {
            Some(existing) => *existing = room_type,
            None => room_types.push(room_type),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: RwLock<HashMap<String, Reservation>>,
}

#[async_trait::async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let reservations = self.reservations.read().await;
        Ok(reservations.get(&id.0).cloned())
    }

    async fn list_blocking_overlapping(
        &self,
        room_type_id: &RoomTypeId,
        window: &StaySpan,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let reservations = self.reservations.read().await;
        let mut found: Vec<Reservation> = reservations
            .values()
            .filter(|reservation| {
                &reservation.room_type_id == room_type_id && reservation.blocks(window)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.check_in.cmp(&b.check_in).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(found)
    }

    async fn save(&self, reservation: Reservation) -> Result<(), RepositoryError> {
        let mut reservations = self.reservations.write().await;
        reservations.insert(reservation.id.0.clone(), reservation);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPriceRuleRepository {
    rules: RwLock<HashMap<String, RoomPriceRule>>,
}

#[async_trait::async_trait]
impl PriceRuleRepository for InMemoryPriceRuleRepository {
    async fn list_for_room_type(
        &self,
        room_type_id: &RoomTypeId,
    ) -> Result<Vec<RoomPriceRule>, RepositoryError> {
        let rules = self.rules.read().await;
        let mut found: Vec<RoomPriceRule> =
            rules.values().filter(|rule| &rule.room_type_id == room_type_id).cloned().collect();
        found.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(found)
    }

    async fn save(&self, rule: RoomPriceRule) -> Result<(), RepositoryError> {
        let mut rules = self.rules.write().await;
        rules.insert(rule.id.0.clone(), rule);
        Ok(())
    }
}
