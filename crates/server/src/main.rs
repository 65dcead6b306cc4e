// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use lodge_api::{
    ApiError, CancelRequest, CreateCabinBookingRequest, CreateCabinRequest,
    CreateDiningItemRequest, CreateDiningReservationRequest, CreateExperienceBookingRequest,
    CreateExperienceRequest, CreateResourceResponse, NoopNotifier, Notifier, PaymentSignalRequest,
    ReservationKind, UpdateCabinBookingRequest, UpdateDiningReservationRequest,
    UpdateExperienceBookingRequest,
};
use lodge_domain::{CustomerId, ExtrasSelection, Settings};
use lodge_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use tokio::sync::Mutex;
use tracing::info;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Lodge Server - HTTP server for the Lodge Reservation System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Path to a JSON settings file. If not provided, uses the built-in defaults.
    #[arg(short, long)]
    settings: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer wrapped in a Mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The lodge settings active for this process.
    settings: Arc<Settings>,
    /// The customer notification channel.
    notifier: Arc<dyn Notifier>,
}

/// API request for booking a cabin. Dates are ISO 8601 strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateCabinBookingApiRequest {
    /// The booking customer.
    customer_id: String,
    /// Arrival date (inclusive), `YYYY-MM-DD`.
    check_in: String,
    /// Departure date (exclusive), `YYYY-MM-DD`.
    check_out: String,
    /// Party size.
    num_guests: u32,
    /// Optional extras priced into the quote.
    #[serde(default)]
    extras: ExtrasSelection,
    /// Free-form requests stored with the booking.
    #[serde(default)]
    special_requests: Vec<String>,
}

/// API request for reserving dining seats.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateDiningReservationApiRequest {
    /// The reserving customer.
    customer_id: String,
    /// Reservation date, `YYYY-MM-DD`.
    date: String,
    /// Seating time, `HH:MM:SS`.
    time: String,
    /// Party size.
    num_guests: u32,
    /// Free-form requests stored with the reservation.
    #[serde(default)]
    special_requests: Vec<String>,
}

/// API request for booking experience spots.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateExperienceBookingApiRequest {
    /// The booking customer.
    customer_id: String,
    /// Booking date, `YYYY-MM-DD`.
    date: String,
    /// Party size.
    num_participants: u32,
    /// Free-form requests stored with the booking.
    #[serde(default)]
    special_requests: Vec<String>,
}

/// API request for modifying a cabin booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateCabinBookingApiRequest {
    /// The caller; must own the booking.
    customer_id: String,
    /// New arrival date, `YYYY-MM-DD`.
    check_in: Option<String>,
    /// New departure date, `YYYY-MM-DD`.
    check_out: Option<String>,
    /// New party size.
    num_guests: Option<u32>,
    /// Replacement for the stored special requests.
    special_requests: Option<Vec<String>>,
}

/// API request for modifying a dining reservation.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateDiningReservationApiRequest {
    /// The caller; must own the reservation.
    customer_id: String,
    /// New reservation date, `YYYY-MM-DD`.
    date: Option<String>,
    /// New seating time, `HH:MM:SS`.
    time: Option<String>,
    /// New party size.
    num_guests: Option<u32>,
    /// Replacement for the stored special requests.
    special_requests: Option<Vec<String>>,
}

/// API request for modifying an experience booking.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateExperienceBookingApiRequest {
    /// The caller; must own the booking.
    customer_id: String,
    /// New booking date, `YYYY-MM-DD`.
    date: Option<String>,
    /// New party size.
    num_participants: Option<u32>,
    /// Replacement for the stored special requests.
    special_requests: Option<Vec<String>>,
}

/// API request for cancelling a reservation.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelApiRequest {
    /// The caller; must own the reservation.
    customer_id: String,
}

/// API request for an operator status transition.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TransitionApiRequest {
    /// The transition to apply, e.g. `confirm` or `check_in`.
    action: String,
}

/// Query parameters for the cabin availability endpoint.
#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    /// Arrival date, `YYYY-MM-DD`.
    check_in: String,
    /// Departure date, `YYYY-MM-DD`.
    check_out: String,
}

/// Query parameters for the unavailable ranges endpoint.
#[derive(Debug, Deserialize)]
struct UnavailableRangesQuery {
    /// Window start, `YYYY-MM-DD`.
    from: String,
    /// Window end, `YYYY-MM-DD`.
    to: String,
}

/// Query parameters for the dining capacity endpoint.
#[derive(Debug, Deserialize)]
struct DiningCapacityQuery {
    /// Slot date, `YYYY-MM-DD`.
    date: String,
    /// Slot time, `HH:MM:SS`.
    time: String,
}

/// Query parameters for the experience capacity endpoint.
#[derive(Debug, Deserialize)]
struct ExperienceCapacityQuery {
    /// Day, `YYYY-MM-DD`.
    date: String,
}

/// Query parameters for the reservation history endpoint.
#[derive(Debug, Deserialize)]
struct ReservationsQuery {
    /// The customer whose history to list.
    customer_id: String,
    /// Optional status filter.
    status: Option<String>,
}

/// Query parameters for the refund preview endpoint.
#[derive(Debug, Deserialize)]
struct RefundPreviewQuery {
    /// The caller; must own the reservation.
    customer_id: String,
}

/// Query parameters for the policy endpoint.
#[derive(Debug, Deserialize)]
struct PolicyQuery {
    /// Optional check-in date for concrete deadlines, `YYYY-MM-DD`.
    check_in: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Booking IDs holding a contested cabin range.
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicting_ids: Option<Vec<i64>>,
    /// Seats or spots still available in a contested capacity pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<u32>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Conflict detail: booking IDs holding a contested range.
    conflicting_ids: Option<Vec<i64>>,
    /// Conflict detail: remaining capacity in a contested pool.
    remaining: Option<u32>,
}

impl HttpError {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            conflicting_ids: None,
            remaining: None,
        }
    }

    fn bad_request(message: String) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            conflicting_ids: self.conflicting_ids,
            remaining: self.remaining,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::NotOwner { .. } => Self::new(StatusCode::FORBIDDEN, err.to_string()),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ApiError::Conflict {
                ref conflicting_ids,
                remaining,
                ..
            } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
                conflicting_ids: Some(conflicting_ids.clone()),
                remaining,
            },
            ApiError::Internal { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Parses an ISO 8601 date from a request field.
fn parse_date(field: &str, value: &str) -> Result<Date, HttpError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|_| HttpError::bad_request(format!("Invalid date for '{field}': '{value}'")))
}

/// Parses an `HH:MM:SS` time from a request field.
fn parse_time(field: &str, value: &str) -> Result<Time, HttpError> {
    Time::parse(value, TIME_FORMAT)
        .map_err(|_| HttpError::bad_request(format!("Invalid time for '{field}': '{value}'")))
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, HttpError> {
    value.map(|v| parse_date(field, v)).transpose()
}

fn parse_optional_time(field: &str, value: Option<&str>) -> Result<Option<Time>, HttpError> {
    value.map(|v| parse_time(field, v)).transpose()
}

fn parse_kind(kind: &str) -> Result<ReservationKind, HttpError> {
    kind.parse::<ReservationKind>().map_err(HttpError::from)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, HttpError> {
    serde_json::from_value(body)
        .map_err(|e| HttpError::bad_request(format!("Invalid request body: {e}")))
}

/// The cancellation clock: calendar date in UTC.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Handler for POST /cabins endpoint.
async fn handle_create_cabin(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCabinRequest>,
) -> Result<(StatusCode, Json<CreateResourceResponse>), HttpError> {
    info!(name = %req.name, "Handling create_cabin request");
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateResourceResponse = lodge_api::create_cabin(&mut persistence, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /dining_items endpoint.
async fn handle_create_dining_item(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateDiningItemRequest>,
) -> Result<(StatusCode, Json<CreateResourceResponse>), HttpError> {
    info!(name = %req.name, "Handling create_dining_item request");
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateResourceResponse = lodge_api::create_dining_item(&mut persistence, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /experiences endpoint.
async fn handle_create_experience(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateExperienceRequest>,
) -> Result<(StatusCode, Json<CreateResourceResponse>), HttpError> {
    info!(name = %req.name, "Handling create_experience request");
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateResourceResponse = lodge_api::create_experience(&mut persistence, req)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /cabins endpoint.
async fn handle_list_cabins(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let cabins = lodge_api::list_cabins(&mut persistence)?;
    Ok(Json(cabins).into_response())
}

/// Handler for GET /dining_items endpoint.
async fn handle_list_dining_items(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let items = lodge_api::list_dining_items(&mut persistence)?;
    Ok(Json(items).into_response())
}

/// Handler for GET /experiences endpoint.
async fn handle_list_experiences(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let experiences = lodge_api::list_experiences(&mut persistence)?;
    Ok(Json(experiences).into_response())
}

/// Handler for GET `/cabins/{id}` endpoint.
async fn handle_get_cabin(
    AxumState(app_state): AxumState<AppState>,
    Path(cabin_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let cabin = lodge_api::get_cabin(&mut persistence, cabin_id)?;
    Ok(Json(cabin).into_response())
}

/// Handler for GET `/dining_items/{id}` endpoint.
async fn handle_get_dining_item(
    AxumState(app_state): AxumState<AppState>,
    Path(dining_item_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let item = lodge_api::get_dining_item(&mut persistence, dining_item_id)?;
    Ok(Json(item).into_response())
}

/// Handler for GET `/experiences/{id}` endpoint.
async fn handle_get_experience(
    AxumState(app_state): AxumState<AppState>,
    Path(experience_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let experience = lodge_api::get_experience(&mut persistence, experience_id)?;
    Ok(Json(experience).into_response())
}

/// Handler for POST `/cabins/{id}/bookings` endpoint.
async fn handle_create_cabin_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(cabin_id): Path<i64>,
    Json(req): Json<CreateCabinBookingApiRequest>,
) -> Result<(StatusCode, Response), HttpError> {
    info!(
        cabin_id = cabin_id,
        customer_id = %req.customer_id,
        check_in = %req.check_in,
        check_out = %req.check_out,
        "Handling create_cabin_booking request"
    );

    let request: CreateCabinBookingRequest = CreateCabinBookingRequest {
        customer_id: CustomerId::new(&req.customer_id),
        check_in: parse_date("check_in", &req.check_in)?,
        check_out: parse_date("check_out", &req.check_out)?,
        num_guests: req.num_guests,
        extras: req.extras,
        special_requests: req.special_requests,
    };

    let mut persistence = app_state.persistence.lock().await;
    let booking = lodge_api::create_cabin_booking(
        &mut persistence,
        &app_state.settings,
        app_state.notifier.as_ref(),
        cabin_id,
        request,
    )?;
    Ok((StatusCode::CREATED, Json(booking).into_response()))
}

/// Handler for POST `/dining_items/{id}/reservations` endpoint.
async fn handle_create_dining_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path(dining_item_id): Path<i64>,
    Json(req): Json<CreateDiningReservationApiRequest>,
) -> Result<(StatusCode, Response), HttpError> {
    info!(
        dining_item_id = dining_item_id,
        customer_id = %req.customer_id,
        date = %req.date,
        time = %req.time,
        "Handling create_dining_reservation request"
    );

    let request: CreateDiningReservationRequest = CreateDiningReservationRequest {
        customer_id: CustomerId::new(&req.customer_id),
        date: parse_date("date", &req.date)?,
        time: parse_time("time", &req.time)?,
        num_guests: req.num_guests,
        special_requests: req.special_requests,
    };

    let mut persistence = app_state.persistence.lock().await;
    let reservation = lodge_api::create_dining_reservation(
        &mut persistence,
        app_state.notifier.as_ref(),
        dining_item_id,
        request,
    )?;
    Ok((StatusCode::CREATED, Json(reservation).into_response()))
}

/// Handler for POST `/experiences/{id}/bookings` endpoint.
async fn handle_create_experience_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(experience_id): Path<i64>,
    Json(req): Json<CreateExperienceBookingApiRequest>,
) -> Result<(StatusCode, Response), HttpError> {
    info!(
        experience_id = experience_id,
        customer_id = %req.customer_id,
        date = %req.date,
        "Handling create_experience_booking request"
    );

    let request: CreateExperienceBookingRequest = CreateExperienceBookingRequest {
        customer_id: CustomerId::new(&req.customer_id),
        date: parse_date("date", &req.date)?,
        num_participants: req.num_participants,
        special_requests: req.special_requests,
    };

    let mut persistence = app_state.persistence.lock().await;
    let booking = lodge_api::create_experience_booking(
        &mut persistence,
        app_state.notifier.as_ref(),
        experience_id,
        request,
    )?;
    Ok((StatusCode::CREATED, Json(booking).into_response()))
}

/// Handler for GET `/cabins/{id}/availability` endpoint.
async fn handle_cabin_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(cabin_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Response, HttpError> {
    let check_in: Date = parse_date("check_in", &query.check_in)?;
    let check_out: Date = parse_date("check_out", &query.check_out)?;

    let mut persistence = app_state.persistence.lock().await;
    let response =
        lodge_api::check_cabin_availability(&mut persistence, cabin_id, check_in, check_out)?;
    Ok(Json(response).into_response())
}

/// Handler for GET `/cabins/{id}/unavailable_ranges` endpoint.
async fn handle_cabin_unavailable_ranges(
    AxumState(app_state): AxumState<AppState>,
    Path(cabin_id): Path<i64>,
    Query(query): Query<UnavailableRangesQuery>,
) -> Result<Response, HttpError> {
    let window_start: Date = parse_date("from", &query.from)?;
    let window_end: Date = parse_date("to", &query.to)?;

    let mut persistence = app_state.persistence.lock().await;
    let response = lodge_api::list_cabin_unavailable_ranges(
        &mut persistence,
        cabin_id,
        window_start,
        window_end,
    )?;
    Ok(Json(response).into_response())
}

/// Handler for GET `/dining_items/{id}/capacity` endpoint.
async fn handle_dining_capacity(
    AxumState(app_state): AxumState<AppState>,
    Path(dining_item_id): Path<i64>,
    Query(query): Query<DiningCapacityQuery>,
) -> Result<Response, HttpError> {
    let date: Date = parse_date("date", &query.date)?;
    let time: Time = parse_time("time", &query.time)?;

    let mut persistence = app_state.persistence.lock().await;
    let response = lodge_api::get_dining_capacity(&mut persistence, dining_item_id, date, time)?;
    Ok(Json(response).into_response())
}

/// Handler for GET `/experiences/{id}/capacity` endpoint.
async fn handle_experience_capacity(
    AxumState(app_state): AxumState<AppState>,
    Path(experience_id): Path<i64>,
    Query(query): Query<ExperienceCapacityQuery>,
) -> Result<Response, HttpError> {
    let date: Date = parse_date("date", &query.date)?;

    let mut persistence = app_state.persistence.lock().await;
    let response = lodge_api::get_experience_capacity(&mut persistence, experience_id, date)?;
    Ok(Json(response).into_response())
}

/// Handler for GET /reservations endpoint.
async fn handle_list_reservations(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ReservationsQuery>,
) -> Result<Response, HttpError> {
    info!(customer_id = %query.customer_id, "Handling list_reservations request");

    let customer: CustomerId = CustomerId::new(&query.customer_id);
    let mut persistence = app_state.persistence.lock().await;
    let response =
        lodge_api::list_reservations(&mut persistence, &customer, query.status.as_deref())?;
    Ok(Json(response).into_response())
}

/// Handler for GET `/{kind}/{id}` endpoint.
async fn handle_get_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Response, HttpError> {
    let kind: ReservationKind = parse_kind(&kind)?;
    let mut persistence = app_state.persistence.lock().await;
    match kind {
        ReservationKind::Cabin => {
            let booking = lodge_api::get_cabin_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        ReservationKind::Dining => {
            let reservation = lodge_api::get_dining_reservation(&mut persistence, id)?;
            Ok(Json(reservation).into_response())
        }
        ReservationKind::Experience => {
            let booking = lodge_api::get_experience_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
    }
}

/// Handler for PATCH `/{kind}/{id}` endpoint.
async fn handle_update_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, HttpError> {
    let kind: ReservationKind = parse_kind(&kind)?;
    info!(kind = %kind, reservation_id = id, "Handling update_reservation request");

    let mut persistence = app_state.persistence.lock().await;
    match kind {
        ReservationKind::Cabin => {
            let req: UpdateCabinBookingApiRequest = parse_body(body)?;
            let request: UpdateCabinBookingRequest = UpdateCabinBookingRequest {
                customer_id: CustomerId::new(&req.customer_id),
                check_in: parse_optional_date("check_in", req.check_in.as_deref())?,
                check_out: parse_optional_date("check_out", req.check_out.as_deref())?,
                num_guests: req.num_guests,
                special_requests: req.special_requests,
            };
            let booking = lodge_api::update_cabin_booking(
                &mut persistence,
                &app_state.settings,
                id,
                request,
            )?;
            Ok(Json(booking).into_response())
        }
        ReservationKind::Dining => {
            let req: UpdateDiningReservationApiRequest = parse_body(body)?;
            let request: UpdateDiningReservationRequest = UpdateDiningReservationRequest {
                customer_id: CustomerId::new(&req.customer_id),
                date: parse_optional_date("date", req.date.as_deref())?,
                time: parse_optional_time("time", req.time.as_deref())?,
                num_guests: req.num_guests,
                special_requests: req.special_requests,
            };
            let reservation =
                lodge_api::update_dining_reservation(&mut persistence, id, request)?;
            Ok(Json(reservation).into_response())
        }
        ReservationKind::Experience => {
            let req: UpdateExperienceBookingApiRequest = parse_body(body)?;
            let request: UpdateExperienceBookingRequest = UpdateExperienceBookingRequest {
                customer_id: CustomerId::new(&req.customer_id),
                date: parse_optional_date("date", req.date.as_deref())?,
                num_participants: req.num_participants,
                special_requests: req.special_requests,
            };
            let booking = lodge_api::update_experience_booking(&mut persistence, id, request)?;
            Ok(Json(booking).into_response())
        }
    }
}

/// Handler for POST `/{kind}/{id}/cancel` endpoint.
async fn handle_cancel_reservation(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(req): Json<CancelApiRequest>,
) -> Result<Response, HttpError> {
    let kind: ReservationKind = parse_kind(&kind)?;
    info!(
        kind = %kind,
        reservation_id = id,
        customer_id = %req.customer_id,
        "Handling cancel_reservation request"
    );

    let request: CancelRequest = CancelRequest {
        customer_id: CustomerId::new(&req.customer_id),
    };
    let mut persistence = app_state.persistence.lock().await;
    match kind {
        ReservationKind::Cabin => {
            let response = lodge_api::cancel_cabin_booking(
                &mut persistence,
                &app_state.settings,
                app_state.notifier.as_ref(),
                id,
                &request,
                today(),
            )?;
            Ok(Json(response).into_response())
        }
        ReservationKind::Dining => {
            let response = lodge_api::cancel_dining_reservation(
                &mut persistence,
                &app_state.settings,
                app_state.notifier.as_ref(),
                id,
                &request,
                today(),
            )?;
            Ok(Json(response).into_response())
        }
        ReservationKind::Experience => {
            let response = lodge_api::cancel_experience_booking(
                &mut persistence,
                &app_state.settings,
                app_state.notifier.as_ref(),
                id,
                &request,
                today(),
            )?;
            Ok(Json(response).into_response())
        }
    }
}

/// Handler for GET `/{kind}/{id}/refund_preview` endpoint.
async fn handle_refund_preview(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Query(query): Query<RefundPreviewQuery>,
) -> Result<Response, HttpError> {
    let kind: ReservationKind = parse_kind(&kind)?;

    let request: CancelRequest = CancelRequest {
        customer_id: CustomerId::new(&query.customer_id),
    };
    let mut persistence = app_state.persistence.lock().await;
    let estimate = lodge_api::refund_preview(
        &mut persistence,
        &app_state.settings,
        kind,
        id,
        &request,
        today(),
    )?;
    Ok(Json(estimate).into_response())
}

/// Handler for POST `/{kind}/{id}/transition` endpoint.
///
/// Operator-side status transitions, guarded by each kind's status machine.
async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Response, HttpError> {
    let kind: ReservationKind = parse_kind(&kind)?;
    info!(
        kind = %kind,
        reservation_id = id,
        action = %req.action,
        "Handling transition request"
    );

    let mut persistence = app_state.persistence.lock().await;
    match (kind, req.action.as_str()) {
        (ReservationKind::Cabin, "confirm") => {
            let booking = lodge_api::confirm_cabin_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        (ReservationKind::Cabin, "check_in") => {
            let booking = lodge_api::check_in_cabin_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        (ReservationKind::Cabin, "check_out") => {
            let booking = lodge_api::check_out_cabin_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        (ReservationKind::Dining, "confirm") => {
            let reservation = lodge_api::confirm_dining_reservation(&mut persistence, id)?;
            Ok(Json(reservation).into_response())
        }
        (ReservationKind::Dining, "complete") => {
            let reservation = lodge_api::complete_dining_reservation(&mut persistence, id)?;
            Ok(Json(reservation).into_response())
        }
        (ReservationKind::Dining, "no_show") => {
            let reservation = lodge_api::mark_dining_no_show(&mut persistence, id)?;
            Ok(Json(reservation).into_response())
        }
        (ReservationKind::Experience, "confirm") => {
            let booking = lodge_api::confirm_experience_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        (ReservationKind::Experience, "complete") => {
            let booking = lodge_api::complete_experience_booking(&mut persistence, id)?;
            Ok(Json(booking).into_response())
        }
        (_, action) => Err(HttpError::bad_request(format!(
            "Unknown transition '{action}' for {kind} reservations"
        ))),
    }
}

/// Handler for POST /payments/signal endpoint.
///
/// Webhook-shaped consumption of external payment gateway events.
async fn handle_payment_signal(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PaymentSignalRequest>,
) -> Result<Response, HttpError> {
    info!(
        kind = %req.kind,
        reservation_id = req.reservation_id,
        "Handling payment_signal request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = lodge_api::apply_payment_signal(&mut persistence, &req)?;
    Ok(Json(response).into_response())
}

/// Handler for GET /policy endpoint.
async fn handle_get_policy(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PolicyQuery>,
) -> Result<Response, HttpError> {
    let check_in: Option<Date> = parse_optional_date("check_in", query.check_in.as_deref())?;
    let response = lodge_api::get_policy(&app_state.settings, check_in);
    Ok(Json(response).into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/cabins", post(handle_create_cabin))
        .route("/cabins", get(handle_list_cabins))
        .route("/cabins/{id}", get(handle_get_cabin))
        .route("/cabins/{id}/bookings", post(handle_create_cabin_booking))
        .route("/cabins/{id}/availability", get(handle_cabin_availability))
        .route(
            "/cabins/{id}/unavailable_ranges",
            get(handle_cabin_unavailable_ranges),
        )
        .route("/dining_items", post(handle_create_dining_item))
        .route("/dining_items", get(handle_list_dining_items))
        .route("/dining_items/{id}", get(handle_get_dining_item))
        .route(
            "/dining_items/{id}/reservations",
            post(handle_create_dining_reservation),
        )
        .route("/dining_items/{id}/capacity", get(handle_dining_capacity))
        .route("/experiences", post(handle_create_experience))
        .route("/experiences", get(handle_list_experiences))
        .route("/experiences/{id}", get(handle_get_experience))
        .route(
            "/experiences/{id}/bookings",
            post(handle_create_experience_booking),
        )
        .route("/experiences/{id}/capacity", get(handle_experience_capacity))
        .route("/reservations", get(handle_list_reservations))
        .route("/policy", get(handle_get_policy))
        .route("/payments/signal", post(handle_payment_signal))
        .route("/{kind}/{id}", get(handle_get_reservation))
        .route("/{kind}/{id}", patch(handle_update_reservation))
        .route("/{kind}/{id}/cancel", post(handle_cancel_reservation))
        .route("/{kind}/{id}/refund_preview", get(handle_refund_preview))
        .route("/{kind}/{id}/transition", post(handle_transition))
        .with_state(app_state)
}

/// Loads settings from a JSON file, or the defaults when no file is given.
fn load_settings(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let contents: String = std::fs::read_to_string(path)?;
            let settings: Settings = serde_json::from_str(&contents)?;
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Lodge Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let settings: Settings = load_settings(args.settings.as_deref())?;
    info!(policy = %settings.cancellation_policy, "Loaded lodge settings");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
        notifier: Arc::new(NoopNotifier),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use lodge_domain::{CabinBooking, CabinBookingStatus, DiningReservation, Money, RefundEstimate};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            settings: Arc::new(Settings::default()),
            notifier: Arc::new(NoopNotifier),
        }
    }

    fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    /// Registers a $120/night cabin sleeping four and returns its ID.
    async fn register_cabin(app: &Router) -> i64 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/cabins",
                &serde_json::json!({
                    "name": "Birch",
                    "price_per_night": 12000,
                    "discount": null,
                    "max_capacity": 4,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let created: CreateResourceResponse = response_json(response).await;
        created.id
    }

    /// Books the cabin for cust-1, 2030-02-10 to 2030-02-14, and returns the
    /// booking ID.
    async fn book_cabin(app: &Router, cabin_id: i64) -> i64 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/cabins/{cabin_id}/bookings"),
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "check_in": "2030-02-10",
                    "check_out": "2030-02-14",
                    "num_guests": 2,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let booking: CabinBooking = response_json(response).await;
        booking.booking_id.unwrap()
    }

    #[tokio::test]
    async fn test_cabin_booking_over_http() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/cabins/{cabin_id}/bookings"),
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "check_in": "2030-02-10",
                    "check_out": "2030-02-14",
                    "num_guests": 2,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);

        let booking: CabinBooking = response_json(response).await;
        assert_eq!(booking.total_price, Money::from_units(480));
        assert_eq!(booking.deposit_amount, Money::from_units(144));
        assert_eq!(booking.status, CabinBookingStatus::Unconfirmed);
    }

    #[tokio::test]
    async fn test_double_booking_is_a_conflict() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        let booking_id: i64 = book_cabin(&app, cabin_id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/cabins/{cabin_id}/bookings"),
                &serde_json::json!({
                    "customer_id": "cust-2",
                    "check_in": "2030-02-12",
                    "check_out": "2030-02-16",
                    "num_guests": 2,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);

        let error: ErrorResponse = response_json(response).await;
        assert_eq!(error.conflicting_ids, Some(vec![booking_id]));
    }

    #[tokio::test]
    async fn test_booking_an_unknown_cabin_is_404() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/cabins/999/bookings",
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "check_in": "2030-02-10",
                    "check_out": "2030-02-14",
                    "num_guests": 2,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_date_is_400() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/cabins/{cabin_id}/bookings"),
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "check_in": "February 10th",
                    "check_out": "2030-02-14",
                    "num_guests": 2,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_requires_the_owner() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        let booking_id: i64 = book_cabin(&app, cabin_id).await;

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/cabin/{booking_id}"),
                &serde_json::json!({
                    "customer_id": "cust-2",
                    "num_guests": 3,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_reschedules_the_booking() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        let booking_id: i64 = book_cabin(&app, cabin_id).await;

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/cabin/{booking_id}"),
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "check_in": "2030-02-11",
                    "check_out": "2030-02-15",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let booking: CabinBooking = response_json(response).await;
        assert_eq!(booking.nights(), 4);
    }

    #[tokio::test]
    async fn test_paid_signal_then_cancel_returns_a_refund() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        let booking_id: i64 = book_cabin(&app, cabin_id).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/payments/signal",
                &serde_json::json!({
                    "kind": "cabin",
                    "reservation_id": booking_id,
                    "signal": "paid",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        // Far-future check-in: full refund under the default moderate policy
        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/cabin/{booking_id}/cancel"),
                &serde_json::json!({ "customer_id": "cust-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: serde_json::Value = response_json(response).await;
        let refund: RefundEstimate =
            serde_json::from_value(body.get("refund").unwrap().clone()).unwrap();
        assert_eq!(refund.refund_amount, Money::from_units(480));
        assert_eq!(body["booking"]["status"], "cancelled");
    }

    #[tokio::test]
    async fn test_transition_endpoint_enforces_the_status_machine() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        let booking_id: i64 = book_cabin(&app, cabin_id).await;

        // Check-in straight from unconfirmed is rejected
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/cabin/{booking_id}/transition"),
                &serde_json::json!({ "action": "check_in" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/cabin/{booking_id}/transition"),
                &serde_json::json!({ "action": "confirm" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let booking: CabinBooking = response_json(response).await;
        assert_eq!(booking.status, CabinBookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_availability_endpoint() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        book_cabin(&app, cabin_id).await;

        let response = app
            .oneshot(get_request(&format!(
                "/cabins/{cabin_id}/availability?check_in=2030-02-12&check_out=2030-02-16"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: serde_json::Value = response_json(response).await;
        assert_eq!(body["available"], false);
    }

    #[tokio::test]
    async fn test_dining_flow_over_http() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/dining_items",
                &serde_json::json!({
                    "name": "Chef's Table",
                    "price_per_person": 4500,
                    "min_people": 1,
                    "max_people": 10,
                    "serving_start": "17:00:00.0",
                    "serving_end": "21:00:00.0",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let created: CreateResourceResponse = response_json(response).await;
        let item_id: i64 = created.id;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/dining_items/{item_id}/reservations"),
                &serde_json::json!({
                    "customer_id": "cust-1",
                    "date": "2030-03-01",
                    "time": "18:00:00",
                    "num_guests": 3,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        let reservation: DiningReservation = response_json(response).await;
        assert_eq!(reservation.total_price, Money::from_units(135));

        let response = app
            .oneshot(get_request(&format!(
                "/dining_items/{item_id}/capacity?date=2030-03-01&time=18:00:00"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: serde_json::Value = response_json(response).await;
        assert_eq!(body["remaining"], 7);
    }

    #[tokio::test]
    async fn test_reservation_history_endpoint() {
        let app: Router = build_router(create_test_app_state());
        let cabin_id: i64 = register_cabin(&app).await;
        book_cabin(&app, cabin_id).await;

        let response = app
            .oneshot(get_request("/reservations?customer_id=cust-1"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: serde_json::Value = response_json(response).await;
        assert_eq!(body["cabin_bookings"].as_array().unwrap().len(), 1);
        assert!(body["dining_reservations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_policy_endpoint_with_deadlines() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get_request("/policy?check_in=2030-03-20"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: serde_json::Value = response_json(response).await;
        assert_eq!(body["policy"], "moderate");
        assert_eq!(body["deadlines"]["full_refund_deadline"], "2030-03-15");
    }

    #[tokio::test]
    async fn test_unknown_reservation_kind_is_400() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/boats/1/cancel",
                &serde_json::json!({ "customer_id": "cust-1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }
}
