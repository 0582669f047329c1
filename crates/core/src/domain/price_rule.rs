use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::room_type::RoomTypeId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRuleId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRuleType {
    Percentage,
    FixedAmount,
    FixedPrice,
}

impl PriceRuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::FixedAmount => "FIXED_AMOUNT",
            Self::FixedPrice => "FIXED_PRICE",
        }
    }
}

impl std::str::FromStr for PriceRuleType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PERCENTAGE" => Ok(Self::Percentage),
            "FIXED_AMOUNT" => Ok(Self::FixedAmount),
            "FIXED_PRICE" => Ok(Self::FixedPrice),
            other => {
                Err(DomainError::InvariantViolation(format!("unknown price rule type `{other}`")))
            }
        }
    }
}

/// Price adjustment for a room type.
///
/// `days_of_week` uses 0 = Sunday through 6 = Saturday; an empty set means
/// every day. The date range is inclusive on both ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPriceRule {
    pub id: PriceRuleId,
    pub room_type_id: RoomTypeId,
    pub name: String,
    pub rule_type: PriceRuleType,
    pub adjustment: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    pub priority: i32,
    pub is_active: bool,
}

impl RoomPriceRule {
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.days_of_week.is_empty() || self.days_of_week.contains(&weekday)
    }
}
