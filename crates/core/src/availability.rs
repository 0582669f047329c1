//! Room availability queries over an [`InventoryStore`].
//!
//! Booked rooms are summed once over the whole query window: a reservation
//! that overlaps any part of the window counts with its full room count.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::reservation::StaySpan;
use crate::domain::room_type::{CustomerId, RoomType, RoomTypeId};
use crate::errors::{ApplicationError, DomainError};
use crate::store::InventoryStore;

pub const DEFAULT_DAYS_TO_SEARCH: u32 = 14;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Upper bound for the alternative-date search radius, in days.
pub const MAX_DAYS_TO_SEARCH: u32 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub available_rooms: u32,
    pub total_rooms: u32,
    pub booked_rooms: u32,
}

impl Availability {
    pub fn unavailable() -> Self {
        Self { available: false, available_rooms: 0, total_rooms: 0, booked_rooms: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeAvailability {
    pub room_type: RoomType,
    pub availability: Availability,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeStay {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub available_rooms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    pub default_days_to_search: u32,
    pub max_suggestions: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_days_to_search: DEFAULT_DAYS_TO_SEARCH,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

pub struct AvailabilityResolver<S> {
    store: S,
    settings: SearchSettings,
}

impl<S> AvailabilityResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store, settings: SearchSettings::default() }
    }

    pub fn with_settings(store: S, settings: SearchSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> SearchSettings {
        self.settings
    }
}

impl<S: InventoryStore> AvailabilityResolver<S> {
    /// Unknown and inactive room types report zero availability instead of
    /// failing.
    pub async fn check_availability(
        &self,
        room_type_id: &RoomTypeId,
        stay: &StaySpan,
        rooms_needed: u32,
    ) -> Result<Availability, ApplicationError> {
        ensure_rooms_needed(rooms_needed)?;

        let room_type = match self.store.find_room_type(room_type_id).await? {
            Some(room_type) if room_type.is_active => room_type,
            _ => {
                debug!(
                    event_name = "availability.check.unknown_room_type",
                    room_type_id = %room_type_id.0,
                    "room type missing or inactive"
                );
                return Ok(Availability::unavailable());
            }
        };

        self.availability_for(&room_type, stay, rooms_needed).await
    }

    /// Ordering follows the store; callers must not rely on it.
    pub async fn list_available_room_types(
        &self,
        customer_id: &CustomerId,
        stay: &StaySpan,
        guests_needed: u32,
    ) -> Result<Vec<RoomTypeAvailability>, ApplicationError> {
        let candidates = self.store.list_active_room_types(customer_id, guests_needed).await?;
        let candidates: Vec<RoomType> = candidates
            .into_iter()
            .filter(|room_type| room_type.is_active && room_type.max_guests >= guests_needed)
            .collect();

        let checks = candidates.iter().map(|room_type| self.availability_for(room_type, stay, 1));
        let results = try_join_all(checks).await?;

        let available: Vec<RoomTypeAvailability> = candidates
            .into_iter()
            .zip(results)
            .filter(|(_, availability)| availability.available)
            .map(|(room_type, availability)| RoomTypeAvailability { room_type, availability })
            .collect();

        debug!(
            event_name = "availability.list",
            customer_id = %customer_id.0,
            guests_needed,
            available_count = available.len(),
            "listed available room types"
        );
        Ok(available)
    }

    /// Shifts the preferred stay day by day up to `days_to_search` days in
    /// each direction, keeping its length, and returns the closest windows
    /// that can take `rooms_needed` rooms. The preferred window itself is
    /// never returned.
    pub async fn suggest_alternative_dates(
        &self,
        room_type_id: &RoomTypeId,
        preferred: &StaySpan,
        rooms_needed: u32,
        days_to_search: Option<u32>,
    ) -> Result<Vec<AlternativeStay>, ApplicationError> {
        ensure_rooms_needed(rooms_needed)?;
        let radius = search_radius(days_to_search.unwrap_or(self.settings.default_days_to_search))?;
        let stay_days = preferred.duration_days();
        let mut candidates = Vec::new();

        for offset in (-radius..=radius).filter(|offset| *offset != 0) {
            let window = preferred.shifted_by_days(offset, stay_days)?;
            let availability = self.check_availability(room_type_id, &window, rooms_needed).await?;
            if availability.available {
                candidates.push(AlternativeStay {
                    check_in: window.check_in,
                    check_out: window.check_out,
                    available_rooms: availability.available_rooms,
                });
            }
        }

        candidates.sort_by_key(|candidate| {
            (candidate.check_in - preferred.check_in).num_milliseconds().abs()
        });
        candidates.truncate(self.settings.max_suggestions);

        debug!(
            event_name = "availability.suggest",
            room_type_id = %room_type_id.0,
            radius_days = radius,
            suggestion_count = candidates.len(),
            "alternative dates computed"
        );
        Ok(candidates)
    }

    async fn availability_for(
        &self,
        room_type: &RoomType,
        stay: &StaySpan,
        rooms_needed: u32,
    ) -> Result<Availability, ApplicationError> {
        let reservations = self.store.find_blocking_reservations(&room_type.id, stay).await?;
        let booked_rooms = reservations
            .iter()
            .filter(|reservation| reservation.blocks(stay))
            .fold(0u32, |booked, reservation| booked.saturating_add(reservation.number_of_rooms));
        let available_rooms = room_type.total_rooms.saturating_sub(booked_rooms);

        Ok(Availability {
            available: available_rooms >= rooms_needed,
            available_rooms,
            total_rooms: room_type.total_rooms,
            booked_rooms,
        })
    }
}

fn ensure_rooms_needed(rooms_needed: u32) -> Result<(), DomainError> {
    if rooms_needed == 0 {
        return Err(DomainError::InvalidRoomCount(rooms_needed));
    }
    Ok(())
}

fn search_radius(days: u32) -> Result<i64, DomainError> {
    if !(1..=MAX_DAYS_TO_SEARCH).contains(&days) {
        return Err(DomainError::InvalidSearchRadius { days, max: MAX_DAYS_TO_SEARCH });
    }
    Ok(i64::from(days))
}
