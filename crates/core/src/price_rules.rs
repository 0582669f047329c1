//! Applies stored price rules to a room type's base price, night by night.
//!
//! Rules do not stack: on each night the applicable rule with the highest
//! priority is the only one applied.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
use crate::domain::reservation::StaySpan;
use crate::domain::room_type::RoomType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightlyPrice {
    pub date: NaiveDate,
    pub base_price: Decimal,
    pub applied_rule: Option<PriceRuleId>,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPricing {
    pub nights: Vec<NightlyPrice>,
    pub total: Decimal,
}

/// Highest priority wins; on a tie the rule listed first is kept.
pub fn select_rule(rules: &[RoomPriceRule], date: NaiveDate) -> Option<&RoomPriceRule> {
    rules.iter().filter(|rule| rule.applies_on(date)).fold(None, |best, rule| match best {
        Some(current) if current.priority >= rule.priority => Some(current),
        _ => Some(rule),
    })
}

pub fn apply_rule(base: Decimal, rule: &RoomPriceRule) -> Decimal {
    let adjusted = match rule.rule_type {
        PriceRuleType::Percentage => base + base * rule.adjustment / Decimal::ONE_HUNDRED,
        PriceRuleType::FixedAmount => base + rule.adjustment,
        PriceRuleType::FixedPrice => rule.adjustment,
    };
    adjusted.max(Decimal::ZERO).round_dp(2)
}

pub fn price_for_date(base: Decimal, rules: &[RoomPriceRule], date: NaiveDate) -> NightlyPrice {
    let rule = select_rule(rules, date);
    NightlyPrice {
        date,
        base_price: base,
        applied_rule: rule.map(|rule| rule.id.clone()),
        price: rule.map_or(base, |rule| apply_rule(base, rule)),
    }
}

/// Rules belonging to other room types are ignored.
pub fn nightly_prices(
    room_type: &RoomType,
    rules: &[RoomPriceRule],
    stay: &StaySpan,
) -> StayPricing {
    let own_rules: Vec<RoomPriceRule> =
        rules.iter().filter(|rule| rule.room_type_id == room_type.id).cloned().collect();
    let nights: Vec<NightlyPrice> = stay
        .nights()
        .into_iter()
        .map(|date| price_for_date(room_type.base_price, &own_rules, date))
        .collect();
    let total = nights.iter().map(|night| night.price).sum();

    StayPricing { nights, total }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{apply_rule, nightly_prices, select_rule};
    use crate::domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
    use crate::domain::reservation::StaySpan;
    use crate::domain::room_type::{CustomerId, RoomType, RoomTypeId};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
    }

    fn rule(
        id: &str,
        rule_type: PriceRuleType,
        adjustment: Decimal,
        priority: i32,
    ) -> RoomPriceRule {
        RoomPriceRule {
            id: PriceRuleId(id.to_string()),
            room_type_id: RoomTypeId("rt1".to_string()),
            name: id.to_string(),
            rule_type,
            adjustment,
            start_date: None,
            end_date: None,
            days_of_week: Vec::new(),
            priority,
            is_active: true,
        }
    }

    #[test]
    fn adjustments_follow_rule_type() {
        let base = Decimal::new(10_000, 2);

        assert_eq!(
            apply_rule(base, &rule("p", PriceRuleType::Percentage, Decimal::from(15), 0)),
            Decimal::new(11_500, 2)
        );
        assert_eq!(
            apply_rule(base, &rule("a", PriceRuleType::FixedAmount, Decimal::from(-20), 0)),
            Decimal::new(8_000, 2)
        );
        assert_eq!(
            apply_rule(base, &rule("f", PriceRuleType::FixedPrice, Decimal::from(75), 0)),
            Decimal::from(75)
        );
        assert_eq!(
            apply_rule(base, &rule("n", PriceRuleType::FixedAmount, Decimal::from(-500), 0)),
            Decimal::ZERO
        );
    }

    #[test]
    fn highest_priority_applicable_rule_wins() {
        let mut weekend = rule("weekend", PriceRuleType::Percentage, Decimal::from(20), 5);
        weekend.days_of_week = vec![5, 6];
        let mut summer = rule("summer", PriceRuleType::FixedAmount, Decimal::from(10), 1);
        summer.start_date = Some(date(6, 1));
        summer.end_date = Some(date(8, 31));
        let rules = vec![summer, weekend];

        // 2024-07-05 is a Friday, 2024-07-03 a Wednesday.
        assert_eq!(select_rule(&rules, date(7, 5)).map(|r| r.id.0.as_str()), Some("weekend"));
        assert_eq!(select_rule(&rules, date(7, 3)).map(|r| r.id.0.as_str()), Some("summer"));
        assert!(select_rule(&rules, date(9, 4)).is_none());
    }

    #[test]
    fn equal_priority_keeps_first_rule_and_inactive_rules_are_skipped() {
        let mut disabled = rule("disabled", PriceRuleType::FixedPrice, Decimal::from(1), 9);
        disabled.is_active = false;
        let rules = vec![
            disabled,
            rule("first", PriceRuleType::FixedPrice, Decimal::from(50), 2),
            rule("second", PriceRuleType::FixedPrice, Decimal::from(60), 2),
        ];

        assert_eq!(select_rule(&rules, date(7, 1)).map(|r| r.id.0.as_str()), Some("first"));
    }

    #[test]
    fn stay_is_priced_per_night() {
        let room_type = RoomType {
            id: RoomTypeId("rt1".to_string()),
            customer_id: CustomerId("hotel-1".to_string()),
            name: "Standard".to_string(),
            total_rooms: 4,
            max_guests: 2,
            base_price: Decimal::from(100),
            is_active: true,
        };
        let mut friday = rule("friday", PriceRuleType::Percentage, Decimal::from(50), 1);
        friday.days_of_week = vec![5];
        let mut foreign = rule("foreign", PriceRuleType::FixedPrice, Decimal::from(1), 10);
        foreign.room_type_id = RoomTypeId("rt9".to_string());

        let stay = StaySpan::new(
            Utc.with_ymd_and_hms(2024, 7, 4, 14, 0, 0).single().expect("check-in"),
            Utc.with_ymd_and_hms(2024, 7, 7, 11, 0, 0).single().expect("check-out"),
        )
        .expect("stay");

        let pricing = nightly_prices(&room_type, &[friday, foreign], &stay);

        let prices: Vec<Decimal> = pricing.nights.iter().map(|night| night.price).collect();
        assert_eq!(prices, vec![Decimal::from(100), Decimal::from(150), Decimal::from(100)]);
        assert_eq!(pricing.nights[1].applied_rule, Some(PriceRuleId("friday".to_string())));
        assert_eq!(pricing.total, Decimal::from(350));
    }
}
