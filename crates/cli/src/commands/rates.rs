use std::fs;
use std::path::{Path, PathBuf};

use roomdesk_core::domain::rate::PricingPayload;
use roomdesk_core::domain::room_type::RoomTypeRef;
use roomdesk_core::rates::{resolve_daily_rates, RateQuery};
use serde_json::Value;

use crate::commands::{to_data, CommandFailure, CommandResult};

#[derive(Clone, Debug)]
pub struct ResolveArgs {
    pub payload: PathBuf,
    pub room_types: Option<PathBuf>,
    pub room_type: Option<String>,
    pub date: Option<String>,
}

/// Pure transformation; no config or database is touched.
pub fn resolve(args: ResolveArgs) -> CommandResult {
    const COMMAND: &str = "rates.resolve";

    match resolve_inner(args) {
        Ok((message, data)) => CommandResult::success_with_data(COMMAND, message, Some(data)),
        Err(failure) => CommandResult::from_failure(COMMAND, failure),
    }
}

fn resolve_inner(args: ResolveArgs) -> Result<(String, Value), CommandFailure> {
    let payload = PricingPayload::from_json(read_json(&args.payload)?);
    let room_types: Vec<RoomTypeRef> = match args.room_types.as_deref() {
        Some(path) => serde_json::from_value(read_json(path)?)
            .map_err(|error| ("invalid_room_types", error.to_string(), 6u8))?,
        None => Vec::new(),
    };

    let query = RateQuery { room_types, room_type: args.room_type, date: args.date };
    let rows = resolve_daily_rates(&payload, &query);

    Ok((format!("{} daily rate rows resolved", rows.len()), to_data(&rows)?))
}

fn read_json(path: &Path) -> Result<Value, CommandFailure> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ("read_file", format!("could not read `{}`: {error}", path.display()), 6u8)
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        ("invalid_json", format!("could not parse `{}`: {error}", path.display()), 6u8)
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{json, Value};

    use super::{resolve, ResolveArgs};

    fn write_json(dir: &tempfile::TempDir, name: &str, value: &Value) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).expect("write fixture");
        path
    }

    #[test]
    fn resolve_filters_by_room_type_and_date() {
        let dir = tempfile::tempdir().expect("tempdir");
        let payload = write_json(
            &dir,
            "pricing.json",
            &json!({
                "dailyRatesByRoomType": {
                    "rt-std": [{ "date": "2024-06-01", "dbl": 100 }],
                    "rt-dlx": [
                        { "date": "2024-06-01", "dbl": 180 },
                        { "date": "2024-06-02", "dbl": 190 }
                    ]
                }
            }),
        );
        let room_types = write_json(
            &dir,
            "room_types.json",
            &json!([{ "id": "rt-std", "name": "Standard" }, { "id": "rt-dlx", "name": "Deluxe" }]),
        );

        let result = resolve(ResolveArgs {
            payload,
            room_types: Some(room_types),
            room_type: Some("deluxe".to_string()),
            date: Some("2024-06-02".to_string()),
        });

        assert_eq!(result.exit_code, 0);
        let output: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(output["command"], "rates.resolve");
        assert_eq!(output["status"], "ok");
        let rows = output["data"].as_array().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["roomTypeId"], "rt-dlx");
        assert_eq!(rows[0]["roomTypeName"], "Deluxe");
    }

    #[test]
    fn resolve_echoes_legacy_rows_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rows = json!([
            { "date": "2024-06-01", "availableRooms": -2, "ppPrice": 49.95, "dbl": 100 },
            { "availableRooms": "3", "single": 80 }
        ]);
        let payload = write_json(&dir, "pricing.json", &json!({ "dailyRates": rows.clone() }));

        let result =
            resolve(ResolveArgs { payload, room_types: None, room_type: None, date: None });

        assert_eq!(result.exit_code, 0);
        let output: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(output["data"], rows);
    }

    #[test]
    fn resolve_reports_missing_payload_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = resolve(ResolveArgs {
            payload: dir.path().join("absent.json"),
            room_types: None,
            room_type: None,
            date: None,
        });

        assert_eq!(result.exit_code, 6);
        let output: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(output["status"], "error");
        assert_eq!(output["error_class"], "read_file");
    }
}
