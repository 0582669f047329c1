//! Deterministic demo hotel used by `roomdesk seed`, the server smoke tests
//! and store parity tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use roomdesk_core::domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
use roomdesk_core::domain::reservation::{Reservation, ReservationId, ReservationStatus};
use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};

use crate::repositories::{
    PriceRuleRepository, RepositoryError, ReservationRepository, RoomTypeRepository,
};
use crate::store::RepositoryInventoryStore;

pub const DEMO_CUSTOMER_ID: &str = "hotel-aurora";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub customer_id: String,
    pub room_types: usize,
    pub reservations: usize,
    pub price_rules: usize,
}

pub async fn seed_demo_hotel<T, R, P>(
    store: &RepositoryInventoryStore<T, R, P>,
) -> Result<SeedResult, RepositoryError>
where
    T: RoomTypeRepository,
    R: ReservationRepository,
    P: PriceRuleRepository,
{
    let room_types = demo_room_types();
    let reservations = demo_reservations();
    let price_rules = demo_price_rules();
    let result = SeedResult {
        customer_id: DEMO_CUSTOMER_ID.to_string(),
        room_types: room_types.len(),
        reservations: reservations.len(),
        price_rules: price_rules.len(),
    };

    for room_type in room_types {
        store.room_types().save(room_type).await?;
    }
    for reservation in reservations {
        store.reservations().save(reservation).await?;
    }
    for rule in price_rules {
        store.price_rules().save(rule).await?;
    }

    Ok(result)
}

fn demo_room_types() -> Vec<RoomType> {
    let room_type = |id: &str, name: &str, total_rooms, max_guests, base_price, is_active| {
        RoomType {
            id: RoomTypeId(id.to_string()),
            customer_id: CustomerId(DEMO_CUSTOMER_ID.to_string()),
            name: name.to_string(),
            total_rooms,
            max_guests,
            base_price,
            is_active,
        }
    };

    vec![
        room_type("aurora-standard", "Standard Double", 5, 2, Decimal::new(12_000, 2), true),
        room_type("aurora-deluxe", "Deluxe Triple", 3, 3, Decimal::new(18_000, 2), true),
        room_type("aurora-suite", "Family Suite", 1, 4, Decimal::new(32_000, 2), true),
        room_type("aurora-retired", "Garden Twin", 4, 2, Decimal::new(9_500, 2), false),
    ]
}

fn demo_reservations() -> Vec<Reservation> {
    let reservation = |id: &str, room_type_id: &str, check_in, check_out, rooms, status| {
        Reservation {
            id: ReservationId(id.to_string()),
            room_type_id: RoomTypeId(room_type_id.to_string()),
            check_in: at_midnight(check_in),
            check_out: at_midnight(check_out),
            number_of_rooms: rooms,
            status,
        }
    };

    vec![
        reservation("res-1001", "aurora-standard", (6, 1), (6, 5), 3, ReservationStatus::Confirmed),
        reservation("res-1002", "aurora-standard", (6, 3), (6, 6), 2, ReservationStatus::Cancelled),
        reservation(
            "res-1003",
            "aurora-standard",
            (5, 28),
            (6, 1),
            1,
            ReservationStatus::CheckedOut,
        ),
        reservation("res-2001", "aurora-deluxe", (6, 4), (6, 8), 1, ReservationStatus::Pending),
        reservation("res-2002", "aurora-deluxe", (6, 6), (6, 9), 2, ReservationStatus::CheckedIn),
        reservation("res-3001", "aurora-suite", (6, 7), (6, 10), 1, ReservationStatus::Confirmed),
    ]
}

fn demo_price_rules() -> Vec<RoomPriceRule> {
    vec![
        RoomPriceRule {
            id: PriceRuleId("rule-standard-weekend".to_string()),
            room_type_id: RoomTypeId("aurora-standard".to_string()),
            name: "Weekend uplift".to_string(),
            rule_type: PriceRuleType::Percentage,
            adjustment: Decimal::from(20),
            start_date: None,
            end_date: None,
            days_of_week: vec![5, 6],
            priority: 5,
            is_active: true,
        },
        RoomPriceRule {
            id: PriceRuleId("rule-standard-summer".to_string()),
            room_type_id: RoomTypeId("aurora-standard".to_string()),
            name: "Summer season".to_string(),
            rule_type: PriceRuleType::FixedAmount,
            adjustment: Decimal::from(15),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31),
            days_of_week: Vec::new(),
            priority: 1,
            is_active: true,
        },
        RoomPriceRule {
            id: PriceRuleId("rule-suite-holidays".to_string()),
            room_type_id: RoomTypeId("aurora-suite".to_string()),
            name: "Holiday package".to_string(),
            rule_type: PriceRuleType::FixedPrice,
            adjustment: Decimal::from(299),
            start_date: NaiveDate::from_ymd_opt(2024, 12, 20),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            days_of_week: Vec::new(),
            priority: 10,
            is_active: true,
        },
    ]
}

fn at_midnight((month, day): (u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).single().unwrap_or_default()
}
