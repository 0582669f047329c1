use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use roomdesk_core::domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
use roomdesk_core::domain::room_type::RoomTypeId;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use super::{format_timestamp, PriceRuleRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPriceRuleRepository {
    pool: DbPool,
}

impl SqlPriceRuleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn rule_from_row(row: &SqliteRow) -> Result<RoomPriceRule, RepositoryError> {
        let rule_type: String = row.try_get("rule_type")?;
        let adjustment: String = row.try_get("adjustment")?;
        let days_of_week_json: String = row.try_get("days_of_week_json")?;
        let start_date: Option<String> = row.try_get("start_date")?;
        let end_date: Option<String> = row.try_get("end_date")?;

        Ok(RoomPriceRule {
            id: PriceRuleId(row.try_get("id")?),
            room_type_id: RoomTypeId(row.try_get("room_type_id")?),
            name: row.try_get("name")?,
            rule_type: PriceRuleType::from_str(&rule_type)
                .map_err(|error| RepositoryError::Decode(error.to_string()))?,
            adjustment: Decimal::from_str(&adjustment).map_err(|error| {
                RepositoryError::Decode(format!("invalid adjustment `{adjustment}`: {error}"))
            })?,
            start_date: start_date.as_deref().map(|raw| parse_date("start_date", raw)).transpose()?,
            end_date: end_date.as_deref().map(|raw| parse_date("end_date", raw)).transpose()?,
            days_of_week: serde_json::from_str(&days_of_week_json).map_err(|error| {
                RepositoryError::Decode(format!("failed to decode days_of_week_json: {error}"))
            })?,
            priority: row.try_get("priority")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| RepositoryError::Decode(format!("invalid {field} `{raw}`: {error}")))
}

#[async_trait::async_trait]
impl PriceRuleRepository for SqlPriceRuleRepository {
    async fn list_for_room_type(
        &self,
        room_type_id: &RoomTypeId,
    ) -> Result<Vec<RoomPriceRule>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, room_type_id, name, rule_type, adjustment, start_date, end_date,
                   days_of_week_json, priority, is_active
            FROM room_price_rule
            WHERE room_type_id = ?
            ORDER BY priority DESC, created_at, id
            "#,
        )
        .bind(&room_type_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::rule_from_row).collect()
    }

    async fn save(&self, rule: RoomPriceRule) -> Result<(), RepositoryError> {
        let days_of_week_json = serde_json::to_string(&rule.days_of_week).map_err(|error| {
            RepositoryError::Decode(format!("failed to encode days_of_week: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO room_price_rule
                (id, room_type_id, name, rule_type, adjustment, start_date, end_date,
                 days_of_week_json, priority, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                rule_type = excluded.rule_type,
                adjustment = excluded.adjustment,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                days_of_week_json = excluded.days_of_week_json,
                priority = excluded.priority,
                is_active = excluded.is_active
            "#,
        )
        .bind(&rule.id.0)
        .bind(&rule.room_type_id.0)
        .bind(&rule.name)
        .bind(rule.rule_type.as_str())
        .bind(rule.adjustment.to_string())
        .bind(rule.start_date.map(|date| date.format("%Y-%m-%d").to_string()))
        .bind(rule.end_date.map(|date| date.format("%Y-%m-%d").to_string()))
        .bind(days_of_week_json)
        .bind(rule.priority)
        .bind(rule.is_active)
        .bind(format_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use roomdesk_core::domain::price_rule::{PriceRuleId, PriceRuleType, RoomPriceRule};
    use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};
    use rust_decimal::Decimal;

    use super::SqlPriceRuleRepository;
    use crate::repositories::{PriceRuleRepository, RoomTypeRepository, SqlRoomTypeRepository};
    use crate::{connect_in_memory, migrations};

    #[tokio::test]
    async fn rules_round_trip_ordered_by_priority() {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlRoomTypeRepository::new(pool.clone())
            .save(RoomType {
                id: RoomTypeId("rt1".to_string()),
                customer_id: CustomerId("hotel-1".to_string()),
                name: "Standard".to_string(),
                total_rooms: 5,
                max_guests: 2,
                base_price: Decimal::from(100),
                is_active: true,
            })
            .await
            .expect("seed room type");
        let repo = SqlPriceRuleRepository::new(pool);

        let weekend = RoomPriceRule {
            id: PriceRuleId("weekend".to_string()),
            room_type_id: RoomTypeId("rt1".to_string()),
            name: "Weekend uplift".to_string(),
            rule_type: PriceRuleType::Percentage,
            adjustment: Decimal::new(125, 1),
            start_date: None,
            end_date: None,
            days_of_week: vec![5, 6],
            priority: 2,
            is_active: true,
        };
        let summer = RoomPriceRule {
            id: PriceRuleId("summer".to_string()),
            name: "Summer flat rate".to_string(),
            rule_type: PriceRuleType::FixedPrice,
            adjustment: Decimal::from(140),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 31),
            days_of_week: Vec::new(),
            priority: 7,
            ..weekend.clone()
        };

        repo.save(weekend.clone()).await.expect("save weekend");
        repo.save(summer.clone()).await.expect("save summer");

        let rules = repo.list_for_room_type(&RoomTypeId("rt1".to_string())).await.expect("list");
        assert_eq!(rules, vec![summer, weekend]);
    }
}
