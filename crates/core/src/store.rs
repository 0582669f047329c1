//! Read access the resolvers need from the persistence layer.
//!
//! Implementations live in `roomdesk-db`; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::domain::price_rule::RoomPriceRule;
use crate::domain::reservation::{Reservation, StaySpan};
use crate::domain::room_type::{CustomerId, RoomType, RoomTypeId};
use crate::errors::ApplicationError;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_room_type(&self, id: &RoomTypeId) -> Result<Option<RoomType>, ApplicationError>;

    /// Active room types owned by `customer_id` that sleep at least `min_guests`.
    async fn list_active_room_types(
        &self,
        customer_id: &CustomerId,
        min_guests: u32,
    ) -> Result<Vec<RoomType>, ApplicationError>;

    /// Reservations in a blocking status whose stay overlaps `window`.
    async fn find_blocking_reservations(
        &self,
        room_type_id: &RoomTypeId,
        window: &StaySpan,
    ) -> Result<Vec<Reservation>, ApplicationError>;
}

#[async_trait]
pub trait PriceRuleStore: Send + Sync {
    async fn list_price_rules(
        &self,
        room_type_id: &RoomTypeId,
    ) -> Result<Vec<RoomPriceRule>, ApplicationError>;
}
