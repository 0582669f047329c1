use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which pre-segmentation rows are stored in a per-room-type map.
pub const LEGACY_RATE_KEY: &str = "_legacy";

const DAILY_RATES: &str = "dailyRates";
const DAILY_RATES_BY_ROOM_TYPE: &str = "dailyRatesByRoomType";
const DATE: &str = "date";
const ROOM_TYPE_ID: &str = "roomTypeId";
const ROOM_TYPE_NAME: &str = "roomTypeName";

/// One date's pricing snapshot for a room type.
///
/// The row is kept exactly as the payload sent it (`date`, `availableRooms`,
/// `ppPrice`, `single`, `dbl`, `triple` and anything else); only the
/// room-type stamp is ever written into it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRate(Map<String, Value>);

impl DailyRate {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// `None` when the row has no date or carries a non-string one.
    pub fn date(&self) -> Option<&str> {
        self.0.get(DATE).and_then(Value::as_str)
    }

    pub fn room_type_id(&self) -> Option<&str> {
        self.0.get(ROOM_TYPE_ID).and_then(Value::as_str)
    }

    pub fn room_type_name(&self) -> Option<&str> {
        self.0.get(ROOM_TYPE_NAME).and_then(Value::as_str)
    }

    /// Copy of the row stamped with `id`; without a `name` the row keeps the
    /// name it already carried.
    pub fn stamped(&self, id: &str, name: Option<&str>) -> Self {
        let mut fields = self.0.clone();
        fields.insert(ROOM_TYPE_ID.to_string(), Value::String(id.to_string()));
        if let Some(name) = name {
            fields.insert(ROOM_TYPE_NAME.to_string(), Value::String(name.to_string()));
        }
        Self(fields)
    }
}

/// Rows stored under one key of a per-room-type rate map.
#[derive(Clone, Debug, PartialEq)]
pub struct RateGroup {
    pub key: String,
    pub rows: Vec<DailyRate>,
}

impl RateGroup {
    pub fn is_legacy(&self) -> bool {
        self.key == LEGACY_RATE_KEY
    }
}

/// Pricing payload normalized at the boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PricingPayload {
    /// Flat list predating room-type segmentation.
    Legacy(Vec<DailyRate>),
    /// Rows keyed by room-type id, in payload order.
    ByRoomType(Vec<RateGroup>),
    #[default]
    Empty,
}

impl PricingPayload {
    /// Never fails: a non-empty `dailyRatesByRoomType` object wins over a
    /// non-empty `dailyRates` array, anything else is `Empty`. List entries
    /// that are not JSON objects are skipped.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut root) = value else {
            return Self::Empty;
        };

        if let Some(Value::Object(map)) = root.remove(DAILY_RATES_BY_ROOM_TYPE) {
            if !map.is_empty() {
                let groups = map
                    .into_iter()
                    .map(|(key, rows)| RateGroup { key, rows: rate_rows(rows) })
                    .collect();
                return Self::ByRoomType(groups);
            }
        }

        match root.remove(DAILY_RATES).map(rate_rows) {
            Some(rows) if !rows.is_empty() => Self::Legacy(rows),
            _ => Self::Empty,
        }
    }
}

fn rate_rows(value: Value) -> Vec<DailyRate> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(DailyRate(fields)),
            _ => None,
        })
        .collect()
}
