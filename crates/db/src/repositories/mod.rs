use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use roomdesk_core::domain::price_rule::RoomPriceRule;
use roomdesk_core::domain::reservation::{Reservation, ReservationId, StaySpan};
use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};
use roomdesk_core::errors::ApplicationError;

pub mod memory;
pub mod price_rule;
pub mod reservation;
pub mod room_type;

pub use memory::{
    InMemoryPriceRuleRepository, InMemoryReservationRepository, InMemoryRoomTypeRepository,
};
pub use price_rule::SqlPriceRuleRepository;
pub use reservation::SqlReservationRepository;
pub use room_type::SqlRoomTypeRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

#[async_trait]
pub trait RoomTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: &RoomTypeId) -> Result<Option<RoomType>, RepositoryError>;

    async fn list_active_for_customer(
        &self,
        customer_id: &CustomerId,
        min_guests: u32,
    ) -> Result<Vec<RoomType>, RepositoryError>;

    async fn save(&self, room_type: RoomType) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError>;

    /// Blocking-status reservations of `room_type_id` overlapping `window`.
    async fn list_blocking_overlapping(
        &self,
        room_type_id: &RoomTypeId,
        window: &StaySpan,
    ) -> Result<Vec<Reservation>, RepositoryError>;

    async fn save(&self, reservation: Reservation) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PriceRuleRepository: Send + Sync {
    async fn list_for_room_type(
        &self,
        room_type_id: &RoomTypeId,
    ) -> Result<Vec<RoomPriceRule>, RepositoryError>;

    async fn save(&self, rule: RoomPriceRule) -> Result<(), RepositoryError>;
}

/// Fixed-width UTC form with nanoseconds, so stored timestamps compare
/// correctly as text and sub-second boundaries survive.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("invalid {field} `{raw}`: {error}")))
}

pub(crate) fn decode_u32(field: &str, raw: i64) -> Result<u32, RepositoryError> {
    u32::try_from(raw)
        .map_err(|_| RepositoryError::Decode(format!("{field} `{raw}` does not fit in u32")))
}
