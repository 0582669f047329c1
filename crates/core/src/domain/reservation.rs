use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::room_type::RoomTypeId;
use crate::errors::DomainError;

const DAY_MS: i64 = 86_400_000;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Cancelled,
    CheckedOut,
    NoShow,
}

/// Statuses that consume inventory for the nights they overlap.
pub const BLOCKING_STATUSES: [ReservationStatus; 3] =
    [ReservationStatus::Pending, ReservationStatus::Confirmed, ReservationStatus::CheckedIn];

impl ReservationStatus {
    pub fn is_blocking(self) -> bool {
        BLOCKING_STATUSES.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::Cancelled => "CANCELLED",
            Self::CheckedOut => "CHECKED_OUT",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CHECKED_IN" => Ok(Self::CheckedIn),
            "CANCELLED" => Ok(Self::Cancelled),
            "CHECKED_OUT" => Ok(Self::CheckedOut),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown reservation status `{other}`"
            ))),
        }
    }
}

/// Half-open stay window: `check_in` inclusive, `check_out` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaySpan {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl StaySpan {
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<Self, DomainError> {
        if check_in >= check_out {
            return Err(DomainError::InvalidStay { check_in, check_out });
        }
        Ok(Self { check_in, check_out })
    }

    /// Back-to-back stays (one ending the day the other begins) do not overlap.
    pub fn overlaps(&self, other: &StaySpan) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// Length in whole days, rounding a partial day up.
    pub fn duration_days(&self) -> i64 {
        let millis = (self.check_out - self.check_in).num_milliseconds();
        (millis + DAY_MS - 1) / DAY_MS
    }

    pub fn shifted_by_days(&self, offset: i64, stay_days: i64) -> Result<StaySpan, DomainError> {
        let shift = |from: DateTime<Utc>, days: i64| {
            Duration::try_days(days).and_then(|delta| from.checked_add_signed(delta))
        };
        let out_of_range = DomainError::StayOutOfRange { offset };

        let check_in = shift(self.check_in, offset).ok_or_else(|| out_of_range.clone())?;
        let check_out = shift(check_in, stay_days).ok_or(out_of_range)?;
        Ok(StaySpan { check_in, check_out })
    }

    /// Nights covered by the stay, starting at the check-in date.
    pub fn nights(&self) -> Vec<NaiveDate> {
        let first = self.check_in.date_naive();
        (0..self.duration_days())
            .map_while(|offset| {
                Duration::try_days(offset).and_then(|delta| first.checked_add_signed(delta))
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub room_type_id: RoomTypeId,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub number_of_rooms: u32,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn span(&self) -> StaySpan {
        StaySpan { check_in: self.check_in, check_out: self.check_out }
    }

    pub fn blocks(&self, window: &StaySpan) -> bool {
        self.status.is_blocking() && self.span().overlaps(window)
    }
}

/// Parses either a calendar date (`2024-06-01`, taken as midnight UTC) or a
/// full RFC 3339 timestamp.
pub fn parse_stay_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidDate(raw.to_string()))
}
