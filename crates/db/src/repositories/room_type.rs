use std::str::FromStr;

use chrono::Utc;
use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decode_u32, format_timestamp, RepositoryError, RoomTypeRepository};
use crate::DbPool;

pub struct SqlRoomTypeRepository {
    pool: DbPool,
}

impl SqlRoomTypeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn room_type_from_row(row: &SqliteRow) -> Result<RoomType, RepositoryError> {
        let base_price: String = row.try_get("base_price")?;
        let base_price = Decimal::from_str(&base_price).map_err(|error| {
            RepositoryError::Decode(format!("invalid base_price `{base_price}`: {error}"))
        })?;

        Ok(RoomType {
            id: RoomTypeId(row.try_get("id")?),
            customer_id: CustomerId(row.try_get("customer_id")?),
            name: row.try_get("name")?,
            total_rooms: decode_u32("total_rooms", row.try_get("total_rooms")?)?,
            max_guests: decode_u32("max_guests", row.try_get("max_guests")?)?,
            base_price,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[async_trait::async_trait]
impl RoomTypeRepository for SqlRoomTypeRepository {
    async fn find_by_id(&self, id: &RoomTypeId) -> Result<Option<RoomType>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, name, total_rooms, max_guests, base_price, is_active
            FROM room_type
            WHERE id = ?
            "#,
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::room_type_from_row).transpose()
    }

    async fn list_active_for_customer(
        &self,
        customer_id: &CustomerId,
        min_guests: u32,
    ) -> Result<Vec<RoomType>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, name, total_rooms, max_guests, base_price, is_active
            FROM room_type
            WHERE customer_id = ? AND is_active = 1 AND max_guests >= ?
            ORDER BY name, id
            "#,
        )
        .bind(&customer_id.0)
        .bind(i64::from(min_guests))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::room_type_from_row).collect()
    }

    async fn save(&self, room_type: RoomType) -> Result<(), RepositoryError> {
        let now = format_timestamp(&Utc::now());
        sqlx::query(
            r#"
            INSERT INTO room_type
                (id, customer_id, name, total_rooms, max_guests, base_price, is_active,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                customer_id = excluded.customer_id,
                name = excluded.name,
                total_rooms = excluded.total_rooms,
                max_guests = excluded.max_guests,
                base_price = excluded.base_price,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&room_type.id.0)
        .bind(&room_type.customer_id.0)
        .bind(&room_type.name)
        .bind(i64::from(room_type.total_rooms))
        .bind(i64::from(room_type.max_guests))
        .bind(room_type.base_price.to_string())
        .bind(room_type.is_active)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roomdesk_core::domain::room_type::{CustomerId, RoomType, RoomTypeId};
    use rust_decimal::Decimal;

    use super::SqlRoomTypeRepository;
    use crate::repositories::RoomTypeRepository;
    use crate::{connect_in_memory, migrations};

    async fn repository() -> SqlRoomTypeRepository {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlRoomTypeRepository::new(pool)
    }

    fn room_type(id: &str, customer: &str, max_guests: u32, is_active: bool) -> RoomType {
        RoomType {
            id: RoomTypeId(id.to_string()),
            customer_id: CustomerId(customer.to_string()),
            name: format!("Room {id}"),
            total_rooms: 6,
            max_guests,
            base_price: Decimal::new(12_950, 2),
            is_active,
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trip_keeps_decimal_price() {
        let repo = repository().await;
        let saved = room_type("rt1", "hotel-1", 2, true);

        repo.save(saved.clone()).await.expect("save");
        let found = repo.find_by_id(&saved.id).await.expect("find");

        assert_eq!(found, Some(saved));
        assert_eq!(repo.find_by_id(&RoomTypeId("nope".to_string())).await.expect("find"), None);
    }

    #[tokio::test]
    async fn save_updates_existing_room_type() {
        let repo = repository().await;
        let mut room = room_type("rt1", "hotel-1", 2, true);
        repo.save(room.clone()).await.expect("save");

        room.total_rooms = 9;
        room.is_active = false;
        repo.save(room.clone()).await.expect("update");

        assert_eq!(repo.find_by_id(&room.id).await.expect("find"), Some(room));
    }

    #[tokio::test]
    async fn customer_listing_hides_inactive_foreign_and_small_room_types() {
        let repo = repository().await;
        for room in [
            room_type("rt1", "hotel-1", 2, true),
            room_type("rt2", "hotel-1", 4, true),
            room_type("rt3", "hotel-1", 4, false),
            room_type("rt4", "hotel-2", 4, true),
        ] {
            repo.save(room).await.expect("save");
        }

        let listed = repo
            .list_active_for_customer(&CustomerId("hotel-1".to_string()), 3)
            .await
            .expect("list");

        let ids: Vec<&str> = listed.iter().map(|room| room.id.0.as_str()).collect();
        assert_eq!(ids, vec!["rt2"]);
    }
}
