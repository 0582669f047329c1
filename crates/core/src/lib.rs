pub mod availability;
pub mod config;
pub mod domain;
pub mod errors;
pub mod price_rules;
pub mod rates;
pub mod store;

pub use availability::{
    AlternativeStay, Availability, AvailabilityResolver, RoomTypeAvailability, SearchSettings,
};
pub use domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
pub use domain::rate::{DailyRate, PricingPayload, RateGroup, LEGACY_RATE_KEY};
pub use domain::reservation::{
    parse_stay_date, Reservation, ReservationId, ReservationStatus, StaySpan, BLOCKING_STATUSES,
};
pub use domain::room_type::{CustomerId, RoomType, RoomTypeId, RoomTypeRef};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use price_rules::{nightly_prices, NightlyPrice, StayPricing};
pub use rates::{resolve_daily_rates, resolve_room_type, RateQuery};
pub use store::{InventoryStore, PriceRuleStore};
