//! Normalizes pricing payloads into one flat list of daily rate rows.

use tracing::debug;

use crate::domain::rate::{DailyRate, PricingPayload, RateGroup};
use crate::domain::room_type::RoomTypeRef;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateQuery {
    /// Known room types, used to resolve `room_type` and to name output rows.
    pub room_types: Vec<RoomTypeRef>,
    /// Case-insensitive room-type name typed by a person.
    pub room_type: Option<String>,
    /// Exact string match against each row's `date`.
    pub date: Option<String>,
}

/// Resolves a typed name to a known room type: exact case-insensitive match
/// first, then the first name containing the filter.
pub fn resolve_room_type<'a>(
    filter: &str,
    room_types: &'a [RoomTypeRef],
) -> Option<&'a RoomTypeRef> {
    let needle = filter.to_lowercase();
    let name_of = |room_type: &RoomTypeRef| room_type.name.to_lowercase();
    room_types
        .iter()
        .find(|room_type| name_of(room_type) == needle)
        .or_else(|| room_types.iter().find(|room_type| name_of(room_type).contains(&needle)))
}

/// An unresolved room-type filter does not empty the result: rows from every
/// room type are returned instead. The filter has no effect on legacy payloads.
pub fn resolve_daily_rates(payload: &PricingPayload, query: &RateQuery) -> Vec<DailyRate> {
    let filter = query.room_type.as_deref().filter(|value| !value.is_empty());

    let rows = match payload {
        PricingPayload::ByRoomType(groups) => {
            match filter.and_then(|name| resolve_room_type(name, &query.room_types)) {
                Some(resolved) => rows_for_room_type(groups, resolved),
                None => merge_all_room_types(groups, &query.room_types),
            }
        }
        PricingPayload::Legacy(rows) => rows.clone(),
        PricingPayload::Empty => Vec::new(),
    };

    let rows: Vec<DailyRate> = match query.date.as_deref() {
        Some(date) => rows.into_iter().filter(|row| row.date() == Some(date)).collect(),
        None => rows,
    };

    debug!(
        event_name = "rates.resolve",
        room_type_filter = filter.unwrap_or(""),
        date_filter = query.date.as_deref().unwrap_or(""),
        row_count = rows.len(),
        "daily rates resolved"
    );
    rows
}

fn rows_for_room_type(groups: &[RateGroup], resolved: &RoomTypeRef) -> Vec<DailyRate> {
    groups
        .iter()
        .filter(|group| group.key == resolved.id)
        .flat_map(|group| group.rows.iter())
        .map(|row| row.stamped(&resolved.id, Some(&resolved.name)))
        .collect()
}

fn merge_all_room_types(groups: &[RateGroup], room_types: &[RoomTypeRef]) -> Vec<DailyRate> {
    groups
        .iter()
        .flat_map(|group| {
            let name = room_types
                .iter()
                .find(|room_type| room_type.id == group.key)
                .map(|room_type| room_type.name.as_str());
            group.rows.iter().map(move |row| {
                if group.is_legacy() {
                    row.clone()
                } else {
                    row.stamped(&group.key, name)
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::{resolve_daily_rates, resolve_room_type, RateQuery};
    use crate::domain::rate::{DailyRate, PricingPayload};
    use crate::domain::room_type::RoomTypeRef;

    fn by_room_type_payload() -> PricingPayload {
        PricingPayload::from_json(json!({
            "dailyRatesByRoomType": {
                "rt1": [{
                    "date": "2024-07-01", "availableRooms": 3,
                    "ppPrice": 55, "single": 90, "dbl": 110, "triple": 150
                }],
                "rt2": [{
                    "date": "2024-07-01", "availableRooms": 1,
                    "ppPrice": 80, "single": 140, "dbl": 160, "triple": 210
                }]
            }
        }))
    }

    fn dated_row(date: &str) -> DailyRate {
        let mut fields = Map::new();
        fields.insert("date".to_string(), Value::String(date.to_string()));
        DailyRate::from_fields(fields)
    }

    fn known_room_types() -> Vec<RoomTypeRef> {
        vec![
            RoomTypeRef { id: "rt1".to_string(), name: "Standard Double".to_string() },
            RoomTypeRef { id: "rt2".to_string(), name: "Junior Suite".to_string() },
        ]
    }

    #[test]
    fn unfiltered_map_merges_and_stamps_every_room_type() {
        let rows = resolve_daily_rates(&by_room_type_payload(), &RateQuery::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].room_type_id(), Some("rt1"));
        assert_eq!(rows[1].room_type_id(), Some("rt2"));
        assert_eq!(rows[0].room_type_name(), None);
    }

    #[test]
    fn unfiltered_map_names_rows_from_known_room_types() {
        let query = RateQuery { room_types: known_room_types(), ..RateQuery::default() };
        let rows = resolve_daily_rates(&by_room_type_payload(), &query);

        assert_eq!(rows[0].room_type_name(), Some("Standard Double"));
        assert_eq!(rows[1].room_type_name(), Some("Junior Suite"));
    }

    #[test]
    fn unresolved_filter_falls_back_to_all_room_types() {
        let query = RateQuery {
            room_types: known_room_types(),
            room_type: Some("Deluxe".to_string()),
            ..RateQuery::default()
        };
        let rows = resolve_daily_rates(&by_room_type_payload(), &query);

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn exact_name_match_selects_one_room_type() {
        let query = RateQuery {
            room_types: known_room_types(),
            room_type: Some("junior SUITE".to_string()),
            ..RateQuery::default()
        };
        let rows = resolve_daily_rates(&by_room_type_payload(), &query);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].room_type_id(), Some("rt2"));
        assert_eq!(rows[0].room_type_name(), Some("Junior Suite"));
        assert_eq!(rows[0].get("single"), Some(&json!(140)));
    }

    #[test]
    fn exact_match_beats_earlier_substring_match() {
        let room_types = vec![
            RoomTypeRef { id: "a".to_string(), name: "Suite Deluxe".to_string() },
            RoomTypeRef { id: "b".to_string(), name: "Suite".to_string() },
        ];

        let resolved_id = |filter| resolve_room_type(filter, &room_types).map(|found| &found.id);
        assert_eq!(resolved_id("suite").map(String::as_str), Some("b"));
        assert_eq!(resolved_id("deluxe").map(String::as_str), Some("a"));
        assert!(resolve_room_type("penthouse", &room_types).is_none());
    }

    #[test]
    fn substring_match_selects_first_containing_room_type() {
        let query = RateQuery {
            room_types: known_room_types(),
            room_type: Some("double".to_string()),
            ..RateQuery::default()
        };
        let rows = resolve_daily_rates(&by_room_type_payload(), &query);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].room_type_id(), Some("rt1"));
    }

    #[test]
    fn legacy_rows_pass_through_unstamped() {
        let payload = PricingPayload::from_json(json!({
            "dailyRatesByRoomType": {
                "_legacy": [{ "date": "2024-07-01", "roomTypeName": "Legacy Twin" }],
                "rt1": [{ "date": "2024-07-01" }]
            }
        }));

        let rows = resolve_daily_rates(&payload, &RateQuery::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].room_type_id(), None);
        assert_eq!(rows[0].room_type_name(), Some("Legacy Twin"));
        assert_eq!(rows[1].room_type_id(), Some("rt1"));
    }

    #[test]
    fn flat_list_ignores_room_type_filter() {
        let payload = PricingPayload::Legacy(vec![
            dated_row("2024-07-01"),
            dated_row("2024-07-02"),
        ]);
        let query = RateQuery {
            room_types: known_room_types(),
            room_type: Some("Junior Suite".to_string()),
            ..RateQuery::default()
        };

        let rows = resolve_daily_rates(&payload, &query);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.room_type_id().is_none()));
    }

    #[test]
    fn date_filter_uses_exact_string_equality() {
        let query = RateQuery { date: Some("2024-07-02".to_string()), ..RateQuery::default() };
        assert!(resolve_daily_rates(&by_room_type_payload(), &query).is_empty());

        let query = RateQuery { date: Some("2024-07-01".to_string()), ..RateQuery::default() };
        assert_eq!(resolve_daily_rates(&by_room_type_payload(), &query).len(), 2);

        let query = RateQuery { date: Some("2024-7-1".to_string()), ..RateQuery::default() };
        assert!(resolve_daily_rates(&by_room_type_payload(), &query).is_empty());
    }

    #[test]
    fn empty_payload_resolves_to_no_rows() {
        let rows = resolve_daily_rates(&PricingPayload::Empty, &RateQuery::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn resolution_is_repeatable_and_leaves_input_untouched() {
        let payload = by_room_type_payload();
        let snapshot = payload.clone();
        let query = RateQuery {
            room_types: known_room_types(),
            room_type: Some("suite".to_string()),
            date: Some("2024-07-01".to_string()),
        };

        let first = resolve_daily_rates(&payload, &query);
        let second = resolve_daily_rates(&payload, &query);

        assert_eq!(first, second);
        assert_eq!(payload, snapshot);
    }

    #[test]
    fn legacy_rows_round_trip_unchanged() {
        let legacy_rows = json!([
            { "date": "2024-07-01", "single": 90, "ppPrice": 55.5, "note": "sea view" },
            { "date": "2024-07-02", "availableRooms": -1, "dbl": "n/a" }
        ]);

        let flat = PricingPayload::from_json(json!({ "dailyRates": legacy_rows.clone() }));
        let rows = resolve_daily_rates(&flat, &RateQuery::default());
        assert_eq!(serde_json::to_value(&rows).expect("serialize"), legacy_rows);

        let keyed = PricingPayload::from_json(json!({
            "dailyRatesByRoomType": { "_legacy": legacy_rows.clone() }
        }));
        let rows = resolve_daily_rates(&keyed, &RateQuery::default());
        assert_eq!(serde_json::to_value(&rows).expect("serialize"), legacy_rows);
    }

    #[test]
    fn stamped_rows_keep_numeric_prices() {
        let query = RateQuery { room_types: known_room_types(), ..RateQuery::default() };
        let rows = resolve_daily_rates(&by_room_type_payload(), &query);

        assert_eq!(
            serde_json::to_value(&rows[0]).expect("serialize"),
            json!({
                "date": "2024-07-01", "availableRooms": 3,
                "ppPrice": 55, "single": 90, "dbl": 110, "triple": 150,
                "roomTypeId": "rt1", "roomTypeName": "Standard Double"
            })
        );
    }

    #[test]
    fn rows_without_a_string_date_never_match_a_date_filter() {
        let payload = PricingPayload::from_json(json!({
            "dailyRates": [{ "single": 90 }, { "date": 20240701 }, { "date": "2024-07-01" }]
        }));
        let query = RateQuery { date: Some("2024-07-01".to_string()), ..RateQuery::default() };

        assert_eq!(resolve_daily_rates(&payload, &query).len(), 1);
        assert_eq!(resolve_daily_rates(&payload, &RateQuery::default()).len(), 3);
    }
}
