//! JSON query endpoints over the availability and rate resolvers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use roomdesk_core::domain::rate::{DailyRate, PricingPayload};
use roomdesk_core::domain::reservation::{parse_stay_date, StaySpan};
use roomdesk_core::domain::room_type::{CustomerId, RoomTypeId, RoomTypeRef};
use roomdesk_core::errors::{ApplicationError, InterfaceError};
use roomdesk_core::price_rules::{nightly_prices, StayPricing};
use roomdesk_core::rates::{resolve_daily_rates, RateQuery};
use roomdesk_core::{
    AlternativeStay, Availability, AvailabilityResolver, InventoryStore, PriceRuleStore,
    RoomTypeAvailability,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ApiState<S> {
    resolver: Arc<AvailabilityResolver<S>>,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self { resolver: Arc::clone(&self.resolver) }
    }
}

pub fn router<S>(resolver: Arc<AvailabilityResolver<S>>) -> Router
where
    S: InventoryStore + PriceRuleStore + 'static,
{
    Router::new()
        .route("/api/v1/room-types/{id}/availability", get(check_availability::<S>))
        .route("/api/v1/room-types/{id}/alternatives", get(suggest_alternatives::<S>))
        .route("/api/v1/room-types/{id}/nightly-prices", get(room_type_nightly_prices::<S>))
        .route("/api/v1/customers/{id}/available-room-types", get(available_room_types::<S>))
        .route("/api/v1/rates/resolve", post(resolve_rates))
        .with_state(ApiState { resolver })
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StayQuery {
    pub check_in: String,
    pub check_out: String,
    #[serde(default = "default_count")]
    pub rooms: u32,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    pub check_in: String,
    pub check_out: String,
    #[serde(default = "default_count")]
    pub rooms: u32,
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GuestStayQuery {
    pub check_in: String,
    pub check_out: String,
    #[serde(default = "default_count")]
    pub guests: u32,
}

#[derive(Debug, Deserialize)]
pub struct NightlyPricesQuery {
    pub check_in: String,
    pub check_out: String,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub room_type_id: String,
    pub stay: StaySpan,
    #[serde(flatten)]
    pub availability: Availability,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub room_type_id: String,
    pub preferred: StaySpan,
    pub alternatives: Vec<AlternativeStay>,
}

#[derive(Debug, Serialize)]
pub struct AvailableRoomTypesResponse {
    pub customer_id: String,
    pub stay: StaySpan,
    pub room_types: Vec<RoomTypeAvailability>,
}

#[derive(Debug, Serialize)]
pub struct NightlyPricesResponse {
    pub room_type_id: String,
    #[serde(flatten)]
    pub pricing: StayPricing,
}

/// Body of `POST /api/v1/rates/resolve`. A missing or null `pricingData`
/// resolves to no rows.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRatesRequest {
    #[serde(default)]
    pub pricing_data: Value,
    #[serde(default)]
    pub room_types: Vec<RoomTypeRef>,
    pub room_type: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveRatesResponse {
    pub rates: Vec<DailyRate>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub detail: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    fn not_found(detail: impl Into<String>, correlation_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ApiErrorBody {
                error: "The requested resource was not found.".to_string(),
                detail: detail.into(),
                correlation_id: correlation_id.to_string(),
            },
        }
    }

    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        error.into_interface(correlation_id).into()
    }
}

impl From<InterfaceError> for ApiError {
    fn from(error: InterfaceError) -> Self {
        let (status, detail) = match &error {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage is unavailable".to_string())
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "unexpected failure".to_string())
            }
        };

        if status != StatusCode::BAD_REQUEST {
            warn!(
                event_name = "api.request.failed",
                correlation_id = %error.correlation_id(),
                error = %error,
                "query request failed"
            );
        }

        Self {
            status,
            body: ApiErrorBody {
                error: error.user_message().to_string(),
                detail,
                correlation_id: error.correlation_id().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn check_availability<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    Query(query): Query<StayQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError>
where
    S: InventoryStore + PriceRuleStore + 'static,
{
    let correlation_id = new_correlation_id();
    let fail = |error| ApiError::from_application(error, &correlation_id);

    let stay = parse_stay(&query.check_in, &query.check_out).map_err(fail)?;
    let room_type_id = RoomTypeId(id);
    let availability = state
        .resolver
        .check_availability(&room_type_id, &stay, query.rooms)
        .await
        .map_err(fail)?;

    info!(
        event_name = "availability.check",
        correlation_id = %correlation_id,
        room_type_id = %room_type_id.0,
        rooms_needed = query.rooms,
        available = availability.available,
        available_rooms = availability.available_rooms,
        "availability checked"
    );

    Ok(Json(AvailabilityResponse { room_type_id: room_type_id.0, stay, availability }))
}

async fn suggest_alternatives<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    Query(query): Query<AlternativesQuery>,
) -> Result<Json<AlternativesResponse>, ApiError>
where
    S: InventoryStore + PriceRuleStore + 'static,
{
    let correlation_id = new_correlation_id();
    let fail = |error| ApiError::from_application(error, &correlation_id);

    let preferred = parse_stay(&query.check_in, &query.check_out).map_err(fail)?;
    let room_type_id = RoomTypeId(id);
    let alternatives = state
        .resolver
        .suggest_alternative_dates(&room_type_id, &preferred, query.rooms, query.days)
        .await
        .map_err(fail)?;

    info!(
        event_name = "availability.suggest",
        correlation_id = %correlation_id,
        room_type_id = %room_type_id.0,
        suggestion_count = alternatives.len(),
        "alternative stays suggested"
    );

    Ok(Json(AlternativesResponse { room_type_id: room_type_id.0, preferred, alternatives }))
}

async fn available_room_types<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    Query(query): Query<GuestStayQuery>,
) -> Result<Json<AvailableRoomTypesResponse>, ApiError>
where
    S: InventoryStore + PriceRuleStore + 'static,
{
    let correlation_id = new_correlation_id();
    let fail = |error| ApiError::from_application(error, &correlation_id);

    let stay = parse_stay(&query.check_in, &query.check_out).map_err(fail)?;
    let customer_id = CustomerId(id);
    let room_types = state
        .resolver
        .list_available_room_types(&customer_id, &stay, query.guests)
        .await
        .map_err(fail)?;

    info!(
        event_name = "availability.list",
        correlation_id = %correlation_id,
        customer_id = %customer_id.0,
        guests_needed = query.guests,
        available_count = room_types.len(),
        "available room types listed"
    );

    Ok(Json(AvailableRoomTypesResponse { customer_id: customer_id.0, stay, room_types }))
}

async fn room_type_nightly_prices<S>(
    State(state): State<ApiState<S>>,
    Path(id): Path<String>,
    Query(query): Query<NightlyPricesQuery>,
) -> Result<Json<NightlyPricesResponse>, ApiError>
where
    S: InventoryStore + PriceRuleStore + 'static,
{
    let correlation_id = new_correlation_id();
    let fail = |error| ApiError::from_application(error, &correlation_id);

    let stay = parse_stay(&query.check_in, &query.check_out).map_err(fail)?;
    let room_type_id = RoomTypeId(id);
    let store = state.resolver.store();

    let room_type = match store.find_room_type(&room_type_id).await.map_err(fail)? {
        Some(room_type) if room_type.is_active => room_type,
        _ => {
            return Err(ApiError::not_found(
                format!("room type `{}` does not exist or is inactive", room_type_id.0),
                &correlation_id,
            ));
        }
    };
    let rules = store.list_price_rules(&room_type_id).await.map_err(fail)?;
    let pricing = nightly_prices(&room_type, &rules, &stay);

    info!(
        event_name = "pricing.nightly",
        correlation_id = %correlation_id,
        room_type_id = %room_type_id.0,
        nights = pricing.nights.len(),
        total = %pricing.total,
        "nightly prices computed"
    );

    Ok(Json(NightlyPricesResponse { room_type_id: room_type_id.0, pricing }))
}

async fn resolve_rates(
    Json(request): Json<ResolveRatesRequest>,
) -> Result<Json<ResolveRatesResponse>, ApiError> {
    let correlation_id = new_correlation_id();

    let payload = PricingPayload::from_json(request.pricing_data);

    let query = RateQuery {
        room_types: request.room_types,
        room_type: request.room_type,
        date: request.date,
    };
    let rates = resolve_daily_rates(&payload, &query);

    info!(
        event_name = "rates.resolve",
        correlation_id = %correlation_id,
        row_count = rates.len(),
        "daily rates resolved"
    );

    Ok(Json(ResolveRatesResponse { rates }))
}

fn parse_stay(check_in: &str, check_out: &str) -> Result<StaySpan, ApplicationError> {
    let check_in = parse_stay_date(check_in)?;
    let check_out = parse_stay_date(check_out)?;
    Ok(StaySpan::new(check_in, check_out)?)
}

fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
