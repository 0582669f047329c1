use roomdesk_core::domain::reservation::{parse_stay_date, StaySpan};
use roomdesk_core::domain::room_type::{CustomerId, RoomTypeId};
use roomdesk_core::errors::{ApplicationError, DomainError};
use roomdesk_core::AvailabilityResolver;
use roomdesk_db::SqlInventoryStore;
use serde_json::Value;

use crate::commands::{open_pool, prepare, to_data, CommandFailure, CommandResult};

#[derive(Clone, Debug)]
pub struct CheckArgs {
    pub room_type_id: String,
    pub check_in: String,
    pub check_out: String,
    pub rooms: u32,
}

#[derive(Clone, Debug)]
pub struct ListArgs {
    pub customer_id: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
}

#[derive(Clone, Debug)]
pub struct SuggestArgs {
    pub room_type_id: String,
    pub check_in: String,
    pub check_out: String,
    pub rooms: u32,
    pub days: Option<u32>,
}

pub fn check(args: CheckArgs) -> CommandResult {
    const COMMAND: &str = "availability.check";
    let stay = match parse_stay(&args.check_in, &args.check_out) {
        Ok(stay) => stay,
        Err(failure) => return CommandResult::from_failure(COMMAND, failure),
    };
    let room_type_id = RoomTypeId(args.room_type_id);

    run_query(COMMAND, move |resolver| async move {
        let availability = resolver
            .check_availability(&room_type_id, &stay, args.rooms)
            .await
            .map_err(query_failure)?;
        let message = format!(
            "{} of {} rooms free for `{}`",
            availability.available_rooms, availability.total_rooms, room_type_id.0
        );
        Ok((message, to_data(&availability)?))
    })
}

pub fn list(args: ListArgs) -> CommandResult {
    const COMMAND: &str = "availability.list";
    let stay = match parse_stay(&args.check_in, &args.check_out) {
        Ok(stay) => stay,
        Err(failure) => return CommandResult::from_failure(COMMAND, failure),
    };
    let customer_id = CustomerId(args.customer_id);

    run_query(COMMAND, move |resolver| async move {
        let available = resolver
            .list_available_room_types(&customer_id, &stay, args.guests)
            .await
            .map_err(query_failure)?;
        let message = format!("{} room types available for `{}`", available.len(), customer_id.0);
        Ok((message, to_data(&available)?))
    })
}

pub fn suggest(args: SuggestArgs) -> CommandResult {
    const COMMAND: &str = "availability.suggest";
    let stay = match parse_stay(&args.check_in, &args.check_out) {
        Ok(stay) => stay,
        Err(failure) => return CommandResult::from_failure(COMMAND, failure),
    };
    let room_type_id = RoomTypeId(args.room_type_id);

    run_query(COMMAND, move |resolver| async move {
        let suggestions = resolver
            .suggest_alternative_dates(&room_type_id, &stay, args.rooms, args.days)
            .await
            .map_err(query_failure)?;
        let message = format!("{} alternative stays found", suggestions.len());
        Ok((message, to_data(&suggestions)?))
    })
}

fn run_query<F, Fut>(command: &str, query: F) -> CommandResult
where
    F: FnOnce(AvailabilityResolver<SqlInventoryStore>) -> Fut,
    Fut: std::future::Future<Output = Result<(String, Value), CommandFailure>>,
{
    let (config, runtime) = match prepare(command) {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let resolver = AvailabilityResolver::with_settings(
            SqlInventoryStore::from_pool(pool.clone()),
            config.availability.search_settings(),
        );

        let outcome = query(resolver).await;
        pool.close().await;
        outcome
    });

    match result {
        Ok((message, data)) => CommandResult::success_with_data(command, message, Some(data)),
        Err(failure) => CommandResult::from_failure(command, failure),
    }
}

pub(crate) fn parse_stay(check_in: &str, check_out: &str) -> Result<StaySpan, CommandFailure> {
    let check_in = parse_stay_date(check_in).map_err(invalid_input)?;
    let check_out = parse_stay_date(check_out).map_err(invalid_input)?;
    StaySpan::new(check_in, check_out).map_err(invalid_input)
}

fn invalid_input(error: DomainError) -> CommandFailure {
    ("invalid_input", error.to_string(), 6u8)
}

fn query_failure(error: ApplicationError) -> CommandFailure {
    match error {
        ApplicationError::Domain(error) => invalid_input(error),
        other => ("query", other.to_string(), 7u8),
    }
}
