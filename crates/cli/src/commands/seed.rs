use roomdesk_db::{seed_demo_hotel, SeedResult, SqlInventoryStore};

use crate::commands::{open_pool, prepare, to_data, CommandResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let store = SqlInventoryStore::from_pool(pool.clone());

        let seeded = seed_demo_hotel(&store)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8));

        pool.close().await;
        seeded
    });

    match result.and_then(|seeded| Ok((summary_message(&seeded), to_data(&seeded)?))) {
        Ok((message, data)) => CommandResult::success_with_data("seed", message, Some(data)),
        Err(failure) => CommandResult::from_failure("seed", failure),
    }
}

fn summary_message(seeded: &SeedResult) -> String {
    format!(
        "demo hotel `{}` seeded: {} room types, {} reservations, {} price rules",
        seeded.customer_id, seeded.room_types, seeded.reservations, seeded.price_rules
    )
}

#[cfg(test)]
mod tests {
    use roomdesk_db::SeedResult;

    use super::summary_message;

    #[test]
    fn summary_lists_every_seeded_collection() {
        let seeded = SeedResult {
            customer_id: "hotel-aurora".to_string(),
            room_types: 4,
            reservations: 6,
            price_rules: 3,
        };

        assert_eq!(
            summary_message(&seeded),
            "demo hotel `hotel-aurora` seeded: 4 room types, 6 reservations, 3 price rules"
        );
    }
}
