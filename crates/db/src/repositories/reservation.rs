use chrono::Utc;
use roomdesk_core::domain::reservation::{
    Reservation, ReservationId, ReservationStatus, StaySpan, BLOCKING_STATUSES,
};
use roomdesk_core::domain::room_type::RoomTypeId;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};

use super::{decode_u32, format_timestamp, parse_timestamp, RepositoryError, ReservationRepository};
use crate::DbPool;

const RESERVATION_COLUMNS: &str =
    "SELECT id, room_type_id, check_in, check_out, number_of_rooms, status FROM reservation";

pub struct SqlReservationRepository {
    pool: DbPool,
}

impl SqlReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn reservation_from_row(row: &SqliteRow) -> Result<Reservation, RepositoryError> {
        let check_in: String = row.try_get("check_in")?;
        let check_out: String = row.try_get("check_out")?;
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<ReservationStatus>()
            .map_err(|error| RepositoryError::Decode(error.to_string()))?;

        Ok(Reservation {
            id: ReservationId(row.try_get("id")?),
            room_type_id: RoomTypeId(row.try_get("room_type_id")?),
            check_in: parse_timestamp("check_in", &check_in)?,
            check_out: parse_timestamp("check_out", &check_out)?,
            number_of_rooms: decode_u32("number_of_rooms", row.try_get("number_of_rooms")?)?,
            status,
        })
    }
}

#[async_trait::async_trait]
impl ReservationRepository for SqlReservationRepository {
    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError> {
        let row = sqlx::query(&format!("{RESERVATION_COLUMNS} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::reservation_from_row).transpose()
    }

    async fn list_blocking_overlapping(
        &self,
        room_type_id: &RoomTypeId,
        window: &StaySpan,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(RESERVATION_COLUMNS);
        builder.push(" WHERE room_type_id = ").push_bind(room_type_id.0.clone());
        builder.push(" AND check_in < ").push_bind(format_timestamp(&window.check_out));
        builder.push(" AND check_out > ").push_bind(format_timestamp(&window.check_in));
        builder.push(" AND status IN (");
        let mut statuses = builder.separated(", ");
        for status in BLOCKING_STATUSES {
            statuses.push_bind(status.as_str());
        }
        builder.push(") ORDER BY check_in, id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::reservation_from_row).collect()
    }

    async fn save(&self, reservation: Reservation) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO reservation
                (id, room_type_id, check_in, check_out, number_of_rooms, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                room_type_id = excluded.room_type_id,
                check_in = excluded.check_in,
                check_out = excluded.check_out,
                number_of_rooms = excluded.number_of_rooms,
                status = excluded.status
            "#,
        )
        .bind(&reservation.id.0)
        .bind(&reservation.room_type_id.0)
        .bind(format_timestamp(&reservation.check_in))
        .bind(format_timestamp(&reservation.check_out))
        .bind(i64::from(reservation.number_of_rooms))
        .bind(reservation.status.as_str())
        .bind(format_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
