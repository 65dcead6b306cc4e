// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lifecycle handlers.
//!
//! Each handler validates its input against the domain rules, derives
//! prices from the catalog (client-supplied prices are never trusted),
//! and delegates the guarded write to the persistence layer. Notifications
//! are best-effort: delivery failures are logged, never surfaced.

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::notify::Notifier;
use crate::request_response::{
    AvailabilityResponse, CancelCabinBookingResponse, CancelDiningReservationResponse,
    CancelExperienceBookingResponse, CancelRequest, CapacityResponse, CreateCabinBookingRequest,
    CreateCabinRequest, CreateDiningItemRequest, CreateDiningReservationRequest,
    CreateExperienceBookingRequest, CreateExperienceRequest, CreateResourceResponse, DateRange,
    PaymentSignal, PaymentSignalRequest, PaymentSignalResponse, PolicyResponse,
    ReservationHistoryResponse, ReservationKind, UnavailableRangesResponse,
    UpdateCabinBookingRequest, UpdateDiningReservationRequest, UpdateExperienceBookingRequest,
};
use lodge_domain::{
    Cabin, CabinBooking, CabinBookingStatus, CabinQuote, CustomerId, DiningItem, DiningReservation,
    DiningReservationStatus, DomainError, Experience, ExperienceBooking, ExperienceBookingStatus,
    Money, RefundEstimate, Settings, calculate_refund, cancellation_deadlines, describe_policy,
    price_by_headcount, price_cabin_stay, validate_cabin_dates, validate_dining_party_size,
    validate_experience_party_size, validate_serving_time,
};
use lodge_persistence::Persistence;
use time::{Date, Time};
use tracing::warn;

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Name must not be empty"),
        });
    }
    Ok(())
}

fn ensure_owner(owner: &CustomerId, caller: &CustomerId, what: &str, id: i64) -> Result<(), ApiError> {
    if owner == caller {
        Ok(())
    } else {
        Err(ApiError::NotOwner {
            message: format!("{what} {id} belongs to a different customer"),
        })
    }
}

fn notify_created(notifier: &dyn Notifier, kind: ReservationKind, id: i64, customer: &CustomerId) {
    if let Err(err) = notifier.reservation_created(kind, id, customer) {
        warn!(kind = %kind, reservation_id = id, error = %err, "Creation notification failed");
    }
}

fn notify_cancelled(
    notifier: &dyn Notifier,
    kind: ReservationKind,
    id: i64,
    customer: &CustomerId,
    refund: &RefundEstimate,
) {
    if let Err(err) = notifier.reservation_cancelled(kind, id, customer, refund) {
        warn!(kind = %kind, reservation_id = id, error = %err, "Cancellation notification failed");
    }
}

/// Registers a new cabin in the catalog.
///
/// # Errors
///
/// Returns an error if the name is empty, the capacity is zero, or the
/// insert fails.
pub fn create_cabin(
    persistence: &mut Persistence,
    request: CreateCabinRequest,
) -> Result<CreateResourceResponse, ApiError> {
    validate_name(&request.name)?;
    if request.max_capacity == 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("max_capacity"),
            message: String::from("A cabin must sleep at least one guest"),
        });
    }

    let cabin: Cabin = Cabin::new(
        request.name.clone(),
        request.price_per_night,
        request.discount,
        request.max_capacity,
    );
    let id: i64 = persistence
        .create_cabin(&cabin)
        .map_err(translate_persistence_error)?;
    Ok(CreateResourceResponse {
        id,
        message: format!("Cabin '{}' registered", request.name),
    })
}

/// Registers a new dining item in the catalog.
///
/// # Errors
///
/// Returns an error if the name is empty, the party bounds are inverted,
/// the serving window is empty, or the insert fails.
pub fn create_dining_item(
    persistence: &mut Persistence,
    request: CreateDiningItemRequest,
) -> Result<CreateResourceResponse, ApiError> {
    validate_name(&request.name)?;
    if request.min_people == 0 || request.min_people > request.max_people {
        return Err(ApiError::InvalidInput {
            field: String::from("min_people"),
            message: format!(
                "Party bounds {}-{} are not a valid range",
                request.min_people, request.max_people
            ),
        });
    }
    if request.serving_start >= request.serving_end {
        return Err(ApiError::InvalidInput {
            field: String::from("serving_start"),
            message: String::from("Serving window must start before it ends"),
        });
    }

    let item: DiningItem = DiningItem::new(
        request.name.clone(),
        request.price_per_person,
        request.min_people,
        request.max_people,
        request.serving_start,
        request.serving_end,
    );
    let id: i64 = persistence
        .create_dining_item(&item)
        .map_err(translate_persistence_error)?;
    Ok(CreateResourceResponse {
        id,
        message: format!("Dining item '{}' registered", request.name),
    })
}

/// Registers a new experience in the catalog.
///
/// # Errors
///
/// Returns an error if the name is empty, a zero participant cap is
/// given, or the insert fails.
pub fn create_experience(
    persistence: &mut Persistence,
    request: CreateExperienceRequest,
) -> Result<CreateResourceResponse, ApiError> {
    validate_name(&request.name)?;
    if request.max_participants == Some(0) {
        return Err(ApiError::InvalidInput {
            field: String::from("max_participants"),
            message: String::from("A capped experience must allow at least one participant"),
        });
    }

    let experience: Experience = Experience::new(
        request.name.clone(),
        request.price_per_person,
        request.max_participants,
    );
    let id: i64 = persistence
        .create_experience(&experience)
        .map_err(translate_persistence_error)?;
    Ok(CreateResourceResponse {
        id,
        message: format!("Experience '{}' registered", request.name),
    })
}

/// Fetches a cabin by ID.
///
/// # Errors
///
/// Returns an error if the cabin does not exist.
pub fn get_cabin(persistence: &mut Persistence, cabin_id: i64) -> Result<Cabin, ApiError> {
    persistence
        .get_cabin(cabin_id)
        .map_err(translate_persistence_error)
}

/// Lists all cabins in the catalog.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_cabins(persistence: &mut Persistence) -> Result<Vec<Cabin>, ApiError> {
    persistence.list_cabins().map_err(translate_persistence_error)
}

/// Fetches a dining item by ID.
///
/// # Errors
///
/// Returns an error if the item does not exist.
pub fn get_dining_item(
    persistence: &mut Persistence,
    dining_item_id: i64,
) -> Result<DiningItem, ApiError> {
    persistence
        .get_dining_item(dining_item_id)
        .map_err(translate_persistence_error)
}

/// Lists all dining items in the catalog.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_dining_items(persistence: &mut Persistence) -> Result<Vec<DiningItem>, ApiError> {
    persistence
        .list_dining_items()
        .map_err(translate_persistence_error)
}

/// Fetches an experience by ID.
///
/// # Errors
///
/// Returns an error if the experience does not exist.
pub fn get_experience(
    persistence: &mut Persistence,
    experience_id: i64,
) -> Result<Experience, ApiError> {
    persistence
        .get_experience(experience_id)
        .map_err(translate_persistence_error)
}

/// Lists all experiences in the catalog.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_experiences(persistence: &mut Persistence) -> Result<Vec<Experience>, ApiError> {
    persistence
        .list_experiences()
        .map_err(translate_persistence_error)
}

/// Books a cabin for a date range.
///
/// The price breakdown is derived from the catalog rate, the selected
/// extras, and the lodge settings; the booking starts `Unconfirmed` and
/// unpaid. The range guard runs inside the write transaction, so two
/// racing requests for overlapping dates cannot both succeed.
///
/// # Errors
///
/// Returns an error if the cabin does not exist, the dates or party size
/// are invalid, or the range is already taken.
pub fn create_cabin_booking(
    persistence: &mut Persistence,
    settings: &Settings,
    notifier: &dyn Notifier,
    cabin_id: i64,
    request: CreateCabinBookingRequest,
) -> Result<CabinBooking, ApiError> {
    let cabin: Cabin = persistence
        .get_cabin(cabin_id)
        .map_err(translate_persistence_error)?;

    validate_cabin_dates(request.check_in, request.check_out)
        .map_err(|e| translate_domain_error(&e))?;
    let nights: i64 = (request.check_out - request.check_in).whole_days();
    let quote: CabinQuote =
        price_cabin_stay(&cabin, nights, request.num_guests, request.extras, settings)
            .map_err(|e| translate_domain_error(&e))?;

    let booking: CabinBooking = CabinBooking {
        booking_id: None,
        cabin_id,
        customer_id: request.customer_id.clone(),
        check_in: request.check_in,
        check_out: request.check_out,
        num_guests: request.num_guests,
        base_price: quote.base_price,
        extras_price: quote.extras_price,
        total_price: quote.total_price,
        deposit_amount: quote.deposit_amount,
        is_paid: false,
        deposit_paid: false,
        status: CabinBookingStatus::Unconfirmed,
        special_requests: request.special_requests,
    };
    let id: i64 = persistence
        .reserve_cabin_range(&booking)
        .map_err(translate_persistence_error)?;

    notify_created(notifier, ReservationKind::Cabin, id, &request.customer_id);
    persistence
        .get_cabin_booking(id)
        .map_err(translate_persistence_error)
}

/// Reserves dining seats in a date/time slot.
///
/// The total is derived from the item's per-person price. The capacity
/// guard runs inside the write transaction.
///
/// # Errors
///
/// Returns an error if the item does not exist, the party size or time
/// is invalid, or the slot lacks capacity.
pub fn create_dining_reservation(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    dining_item_id: i64,
    request: CreateDiningReservationRequest,
) -> Result<DiningReservation, ApiError> {
    let item: DiningItem = persistence
        .get_dining_item(dining_item_id)
        .map_err(translate_persistence_error)?;

    validate_dining_party_size(&item, request.num_guests)
        .map_err(|e| translate_domain_error(&e))?;
    validate_serving_time(&item, request.time).map_err(|e| translate_domain_error(&e))?;
    let total_price: Money = price_by_headcount(
        item.price_per_person,
        request.num_guests,
        item.min_people,
        item.max_people,
    )
    .map_err(|e| translate_domain_error(&e))?;

    let reservation: DiningReservation = DiningReservation {
        reservation_id: None,
        dining_item_id,
        customer_id: request.customer_id.clone(),
        date: request.date,
        time: request.time,
        num_guests: request.num_guests,
        total_price,
        is_paid: false,
        status: DiningReservationStatus::Pending,
        special_requests: request.special_requests,
    };
    let id: i64 = persistence
        .reserve_dining_seats(&reservation, item.max_people)
        .map_err(translate_persistence_error)?;

    notify_created(notifier, ReservationKind::Dining, id, &request.customer_id);
    persistence
        .get_dining_reservation(id)
        .map_err(translate_persistence_error)
}

/// Books experience spots for a day.
///
/// Uncapped experiences never reject on capacity; capped ones run the
/// day-occupancy guard inside the write transaction.
///
/// # Errors
///
/// Returns an error if the experience does not exist, the party size is
/// invalid, or the day lacks capacity.
pub fn create_experience_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    experience_id: i64,
    request: CreateExperienceBookingRequest,
) -> Result<ExperienceBooking, ApiError> {
    let experience: Experience = persistence
        .get_experience(experience_id)
        .map_err(translate_persistence_error)?;

    validate_experience_party_size(&experience, request.num_participants)
        .map_err(|e| translate_domain_error(&e))?;
    let total_price: Money = experience.price_per_person.times(request.num_participants);

    let booking: ExperienceBooking = ExperienceBooking {
        booking_id: None,
        experience_id,
        customer_id: request.customer_id.clone(),
        date: request.date,
        num_participants: request.num_participants,
        total_price,
        is_paid: false,
        status: ExperienceBookingStatus::Pending,
        special_requests: request.special_requests,
    };
    let id: i64 = persistence
        .reserve_experience_participants(&booking, experience.max_participants)
        .map_err(translate_persistence_error)?;

    notify_created(notifier, ReservationKind::Experience, id, &request.customer_id);
    persistence
        .get_experience_booking(id)
        .map_err(translate_persistence_error)
}

/// Reports whether a cabin is free over a half-open date range.
///
/// # Errors
///
/// Returns an error if the cabin does not exist or the range is invalid.
pub fn check_cabin_availability(
    persistence: &mut Persistence,
    cabin_id: i64,
    check_in: Date,
    check_out: Date,
) -> Result<AvailabilityResponse, ApiError> {
    persistence
        .get_cabin(cabin_id)
        .map_err(translate_persistence_error)?;
    validate_cabin_dates(check_in, check_out).map_err(|e| translate_domain_error(&e))?;

    let availability = persistence
        .is_range_available(cabin_id, check_in, check_out)
        .map_err(translate_persistence_error)?;
    Ok(AvailabilityResponse {
        available: availability.available,
        conflicting: availability.conflicting,
    })
}

/// Lists a cabin's blocked date spans within a window, merged and clipped.
///
/// # Errors
///
/// Returns an error if the cabin does not exist or the window is invalid.
pub fn list_cabin_unavailable_ranges(
    persistence: &mut Persistence,
    cabin_id: i64,
    window_start: Date,
    window_end: Date,
) -> Result<UnavailableRangesResponse, ApiError> {
    persistence
        .get_cabin(cabin_id)
        .map_err(translate_persistence_error)?;
    if window_start >= window_end {
        return Err(ApiError::InvalidInput {
            field: String::from("window_end"),
            message: String::from("Query window must start before it ends"),
        });
    }

    let ranges: Vec<(Date, Date)> = persistence
        .list_unavailable_ranges(cabin_id, window_start, window_end)
        .map_err(translate_persistence_error)?;
    Ok(UnavailableRangesResponse {
        ranges: ranges
            .into_iter()
            .map(|(start, end)| DateRange { start, end })
            .collect(),
    })
}

/// Reports the remaining seats in a dining date/time slot.
///
/// # Errors
///
/// Returns an error if the item does not exist.
pub fn get_dining_capacity(
    persistence: &mut Persistence,
    dining_item_id: i64,
    date: Date,
    time: Time,
) -> Result<CapacityResponse, ApiError> {
    let item: DiningItem = persistence
        .get_dining_item(dining_item_id)
        .map_err(translate_persistence_error)?;
    let remaining: u32 = persistence
        .remaining_dining_capacity(dining_item_id, item.max_people, date, time)
        .map_err(translate_persistence_error)?;
    Ok(CapacityResponse {
        remaining: Some(remaining),
    })
}

/// Reports the remaining spots in an experience day.
///
/// `remaining: None` means the experience is uncapped.
///
/// # Errors
///
/// Returns an error if the experience does not exist.
pub fn get_experience_capacity(
    persistence: &mut Persistence,
    experience_id: i64,
    date: Date,
) -> Result<CapacityResponse, ApiError> {
    let experience: Experience = persistence
        .get_experience(experience_id)
        .map_err(translate_persistence_error)?;
    let remaining: Option<u32> = persistence
        .remaining_experience_capacity(experience_id, experience.max_participants, date)
        .map_err(translate_persistence_error)?;
    Ok(CapacityResponse { remaining })
}

/// Lists a customer's reservations across all three kinds, newest first.
///
/// An optional status filter restricts each kind to reservations in that
/// status; kinds whose status machine has no such state come back empty.
///
/// # Errors
///
/// Returns an error if the status filter is not a known status of any
/// kind, or a query fails.
pub fn list_reservations(
    persistence: &mut Persistence,
    customer_id: &CustomerId,
    status: Option<&str>,
) -> Result<ReservationHistoryResponse, ApiError> {
    let cabin_filter: Option<&str> = match status {
        Some(s) => {
            let known: bool = s.parse::<CabinBookingStatus>().is_ok()
                || s.parse::<DiningReservationStatus>().is_ok()
                || s.parse::<ExperienceBookingStatus>().is_ok();
            if !known {
                return Err(ApiError::InvalidInput {
                    field: String::from("status"),
                    message: format!("Unknown reservation status '{s}'"),
                });
            }
            s.parse::<CabinBookingStatus>().ok().map(|_| s)
        }
        None => None,
    };
    let dining_filter: Option<&str> =
        status.filter(|s| s.parse::<DiningReservationStatus>().is_ok());
    let experience_filter: Option<&str> =
        status.filter(|s| s.parse::<ExperienceBookingStatus>().is_ok());

    let cabin_bookings: Vec<CabinBooking> = match (status, cabin_filter) {
        (Some(_), None) => vec![],
        (_, filter) => persistence
            .list_cabin_bookings_for_customer(customer_id.value(), filter)
            .map_err(translate_persistence_error)?,
    };
    let dining_reservations: Vec<DiningReservation> = match (status, dining_filter) {
        (Some(_), None) => vec![],
        (_, filter) => persistence
            .list_dining_reservations_for_customer(customer_id.value(), filter)
            .map_err(translate_persistence_error)?,
    };
    let experience_bookings: Vec<ExperienceBooking> = match (status, experience_filter) {
        (Some(_), None) => vec![],
        (_, filter) => persistence
            .list_experience_bookings_for_customer(customer_id.value(), filter)
            .map_err(translate_persistence_error)?,
    };

    Ok(ReservationHistoryResponse {
        cabin_bookings,
        dining_reservations,
        experience_bookings,
    })
}

/// Fetches a cabin booking by ID.
///
/// # Errors
///
/// Returns an error if the booking does not exist.
pub fn get_cabin_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<CabinBooking, ApiError> {
    persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)
}

/// Fetches a dining reservation by ID.
///
/// # Errors
///
/// Returns an error if the reservation does not exist.
pub fn get_dining_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<DiningReservation, ApiError> {
    persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)
}

/// Fetches an experience booking by ID.
///
/// # Errors
///
/// Returns an error if the booking does not exist.
pub fn get_experience_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<ExperienceBooking, ApiError> {
    persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)
}

/// Modifies a cabin booking's dates, party size, or special requests.
///
/// Only the owning customer may modify, and only while the booking is
/// `Unconfirmed` or `Confirmed`. Rescheduled dates re-run the range guard
/// (excluding the booking itself) inside the write transaction. Prices
/// are not re-derived; the quote struck at booking time stands.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the caller is not the
/// owner, the booking is not modifiable, the new values are invalid, or
/// the new range is taken.
pub fn update_cabin_booking(
    persistence: &mut Persistence,
    settings: &Settings,
    booking_id: i64,
    request: UpdateCabinBookingRequest,
) -> Result<CabinBooking, ApiError> {
    let mut booking: CabinBooking = persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(&booking.customer_id, &request.customer_id, "Cabin booking", booking_id)?;
    if !booking.status.is_modifiable() {
        return Err(ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Cabin booking in status '{}' cannot be modified",
                booking.status
            ),
        });
    }

    if let Some(check_in) = request.check_in {
        booking.check_in = check_in;
    }
    if let Some(check_out) = request.check_out {
        booking.check_out = check_out;
    }
    if let Some(num_guests) = request.num_guests {
        booking.num_guests = num_guests;
    }
    if let Some(special_requests) = request.special_requests {
        booking.special_requests = special_requests;
    }

    validate_cabin_dates(booking.check_in, booking.check_out)
        .map_err(|e| translate_domain_error(&e))?;
    let nights: i64 = booking.nights();
    if nights < i64::from(settings.min_nights) || nights > i64::from(settings.max_nights) {
        return Err(translate_domain_error(&DomainError::InvalidStayLength {
            nights,
            min_nights: settings.min_nights,
            max_nights: settings.max_nights,
        }));
    }
    let cabin: Cabin = persistence
        .get_cabin(booking.cabin_id)
        .map_err(translate_persistence_error)?;
    if booking.num_guests == 0 || booking.num_guests > cabin.max_capacity {
        return Err(translate_domain_error(&DomainError::PartySizeOutOfBounds {
            party_size: booking.num_guests,
            min: 1,
            max: cabin.max_capacity,
        }));
    }

    persistence
        .update_cabin_booking(&booking)
        .map_err(translate_persistence_error)?;
    persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)
}

/// Modifies a dining reservation's slot, party size, or special requests.
///
/// Only the owning customer may modify, and only while `Pending` or
/// `Confirmed`. The total is re-derived for the new party size, and the
/// capacity guard re-runs inside the write transaction.
///
/// # Errors
///
/// Returns an error if the reservation does not exist, the caller is not
/// the owner, the reservation is not modifiable, the new values are
/// invalid, or the new slot lacks capacity.
pub fn update_dining_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
    request: UpdateDiningReservationRequest,
) -> Result<DiningReservation, ApiError> {
    let mut reservation: DiningReservation = persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(
        &reservation.customer_id,
        &request.customer_id,
        "Dining reservation",
        reservation_id,
    )?;
    if !reservation.status.is_modifiable() {
        return Err(ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Dining reservation in status '{}' cannot be modified",
                reservation.status
            ),
        });
    }

    if let Some(date) = request.date {
        reservation.date = date;
    }
    if let Some(time) = request.time {
        reservation.time = time;
    }
    if let Some(num_guests) = request.num_guests {
        reservation.num_guests = num_guests;
    }
    if let Some(special_requests) = request.special_requests {
        reservation.special_requests = special_requests;
    }

    let item: DiningItem = persistence
        .get_dining_item(reservation.dining_item_id)
        .map_err(translate_persistence_error)?;
    validate_dining_party_size(&item, reservation.num_guests)
        .map_err(|e| translate_domain_error(&e))?;
    validate_serving_time(&item, reservation.time).map_err(|e| translate_domain_error(&e))?;
    reservation.total_price = price_by_headcount(
        item.price_per_person,
        reservation.num_guests,
        item.min_people,
        item.max_people,
    )
    .map_err(|e| translate_domain_error(&e))?;

    persistence
        .update_dining_reservation(&reservation, item.max_people)
        .map_err(translate_persistence_error)?;
    persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)
}

/// Modifies an experience booking's date, party size, or special requests.
///
/// Only the owning customer may modify, and only while `Pending` or
/// `Confirmed`. The total is re-derived for the new party size, and the
/// day-occupancy guard re-runs inside the write transaction.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the caller is not the
/// owner, the booking is not modifiable, the new values are invalid, or
/// the new day lacks capacity.
pub fn update_experience_booking(
    persistence: &mut Persistence,
    booking_id: i64,
    request: UpdateExperienceBookingRequest,
) -> Result<ExperienceBooking, ApiError> {
    let mut booking: ExperienceBooking = persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(
        &booking.customer_id,
        &request.customer_id,
        "Experience booking",
        booking_id,
    )?;
    if !booking.status.is_modifiable() {
        return Err(ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Experience booking in status '{}' cannot be modified",
                booking.status
            ),
        });
    }

    if let Some(date) = request.date {
        booking.date = date;
    }
    if let Some(num_participants) = request.num_participants {
        booking.num_participants = num_participants;
    }
    if let Some(special_requests) = request.special_requests {
        booking.special_requests = special_requests;
    }

    let experience: Experience = persistence
        .get_experience(booking.experience_id)
        .map_err(translate_persistence_error)?;
    validate_experience_party_size(&experience, booking.num_participants)
        .map_err(|e| translate_domain_error(&e))?;
    booking.total_price = experience.price_per_person.times(booking.num_participants);

    persistence
        .update_experience_booking(&booking, experience.max_participants)
        .map_err(translate_persistence_error)?;
    persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)
}

/// Cancels a cabin booking and computes the refund owed.
///
/// Only the owning customer may cancel, and only while the booking is
/// `Unconfirmed` or `Confirmed`. The refund estimate is computed from the
/// payment state and the active policy as of `today`; cancellation
/// releases the cabin's date range.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the caller is not the
/// owner, or the booking is not cancellable.
pub fn cancel_cabin_booking(
    persistence: &mut Persistence,
    settings: &Settings,
    notifier: &dyn Notifier,
    booking_id: i64,
    request: &CancelRequest,
    today: Date,
) -> Result<CancelCabinBookingResponse, ApiError> {
    let booking: CabinBooking = persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(&booking.customer_id, &request.customer_id, "Cabin booking", booking_id)?;
    if !booking.status.is_cancellable() {
        return Err(translate_domain_error(
            &DomainError::CabinBookingNotCancellable(booking.status),
        ));
    }

    let refund: RefundEstimate = calculate_refund(
        booking.total_price,
        booking.deposit_amount,
        booking.is_paid,
        booking.deposit_paid,
        booking.check_in,
        settings.cancellation_policy,
        today,
    );
    persistence
        .set_cabin_booking_status(booking_id, CabinBookingStatus::Cancelled.as_str())
        .map_err(translate_persistence_error)?;

    notify_cancelled(
        notifier,
        ReservationKind::Cabin,
        booking_id,
        &request.customer_id,
        &refund,
    );
    let cancelled: CabinBooking = persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)?;
    Ok(CancelCabinBookingResponse {
        booking: cancelled,
        refund,
    })
}

/// Cancels a dining reservation and computes the refund owed.
///
/// The reservation date stands in for check-in when resolving the refund
/// tier; dining has no deposit, so the refund base is the full amount
/// when paid.
///
/// # Errors
///
/// Returns an error if the reservation does not exist, the caller is not
/// the owner, or the reservation is not cancellable.
pub fn cancel_dining_reservation(
    persistence: &mut Persistence,
    settings: &Settings,
    notifier: &dyn Notifier,
    reservation_id: i64,
    request: &CancelRequest,
    today: Date,
) -> Result<CancelDiningReservationResponse, ApiError> {
    let reservation: DiningReservation = persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(
        &reservation.customer_id,
        &request.customer_id,
        "Dining reservation",
        reservation_id,
    )?;
    if !reservation.status.is_cancellable() {
        return Err(translate_domain_error(
            &DomainError::DiningReservationNotCancellable(reservation.status),
        ));
    }

    let refund: RefundEstimate = calculate_refund(
        reservation.total_price,
        Money::ZERO,
        reservation.is_paid,
        false,
        reservation.date,
        settings.cancellation_policy,
        today,
    );
    persistence
        .set_dining_reservation_status(reservation_id, DiningReservationStatus::Cancelled.as_str())
        .map_err(translate_persistence_error)?;

    notify_cancelled(
        notifier,
        ReservationKind::Dining,
        reservation_id,
        &request.customer_id,
        &refund,
    );
    let cancelled: DiningReservation = persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)?;
    Ok(CancelDiningReservationResponse {
        reservation: cancelled,
        refund,
    })
}

/// Cancels an experience booking and computes the refund owed.
///
/// The booking date stands in for check-in when resolving the refund
/// tier; experiences have no deposit.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the caller is not the
/// owner, or the booking is not cancellable.
pub fn cancel_experience_booking(
    persistence: &mut Persistence,
    settings: &Settings,
    notifier: &dyn Notifier,
    booking_id: i64,
    request: &CancelRequest,
    today: Date,
) -> Result<CancelExperienceBookingResponse, ApiError> {
    let booking: ExperienceBooking = persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)?;
    ensure_owner(
        &booking.customer_id,
        &request.customer_id,
        "Experience booking",
        booking_id,
    )?;
    if !booking.status.is_cancellable() {
        return Err(translate_domain_error(
            &DomainError::ExperienceBookingNotCancellable(booking.status),
        ));
    }

    let refund: RefundEstimate = calculate_refund(
        booking.total_price,
        Money::ZERO,
        booking.is_paid,
        false,
        booking.date,
        settings.cancellation_policy,
        today,
    );
    persistence
        .set_experience_booking_status(booking_id, ExperienceBookingStatus::Cancelled.as_str())
        .map_err(translate_persistence_error)?;

    notify_cancelled(
        notifier,
        ReservationKind::Experience,
        booking_id,
        &request.customer_id,
        &refund,
    );
    let cancelled: ExperienceBooking = persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)?;
    Ok(CancelExperienceBookingResponse {
        booking: cancelled,
        refund,
    })
}

/// Previews the refund a cancellation would earn today, without changing
/// anything.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or the caller is
/// not the owner.
pub fn refund_preview(
    persistence: &mut Persistence,
    settings: &Settings,
    kind: ReservationKind,
    reservation_id: i64,
    request: &CancelRequest,
    today: Date,
) -> Result<RefundEstimate, ApiError> {
    match kind {
        ReservationKind::Cabin => {
            let booking: CabinBooking = persistence
                .get_cabin_booking(reservation_id)
                .map_err(translate_persistence_error)?;
            ensure_owner(
                &booking.customer_id,
                &request.customer_id,
                "Cabin booking",
                reservation_id,
            )?;
            Ok(calculate_refund(
                booking.total_price,
                booking.deposit_amount,
                booking.is_paid,
                booking.deposit_paid,
                booking.check_in,
                settings.cancellation_policy,
                today,
            ))
        }
        ReservationKind::Dining => {
            let reservation: DiningReservation = persistence
                .get_dining_reservation(reservation_id)
                .map_err(translate_persistence_error)?;
            ensure_owner(
                &reservation.customer_id,
                &request.customer_id,
                "Dining reservation",
                reservation_id,
            )?;
            Ok(calculate_refund(
                reservation.total_price,
                Money::ZERO,
                reservation.is_paid,
                false,
                reservation.date,
                settings.cancellation_policy,
                today,
            ))
        }
        ReservationKind::Experience => {
            let booking: ExperienceBooking = persistence
                .get_experience_booking(reservation_id)
                .map_err(translate_persistence_error)?;
            ensure_owner(
                &booking.customer_id,
                &request.customer_id,
                "Experience booking",
                reservation_id,
            )?;
            Ok(calculate_refund(
                booking.total_price,
                Money::ZERO,
                booking.is_paid,
                false,
                booking.date,
                settings.cancellation_policy,
                today,
            ))
        }
    }
}

fn transition_cabin(
    persistence: &mut Persistence,
    booking_id: i64,
    target: CabinBookingStatus,
) -> Result<CabinBooking, ApiError> {
    let booking: CabinBooking = persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)?;
    if !booking.status.can_transition_to(target) {
        return Err(translate_domain_error(&DomainError::InvalidStatusTransition {
            from: booking.status.to_string(),
            to: target.to_string(),
        }));
    }
    persistence
        .set_cabin_booking_status(booking_id, target.as_str())
        .map_err(translate_persistence_error)?;
    persistence
        .get_cabin_booking(booking_id)
        .map_err(translate_persistence_error)
}

fn transition_dining(
    persistence: &mut Persistence,
    reservation_id: i64,
    target: DiningReservationStatus,
) -> Result<DiningReservation, ApiError> {
    let reservation: DiningReservation = persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)?;
    if !reservation.status.can_transition_to(target) {
        return Err(translate_domain_error(&DomainError::InvalidStatusTransition {
            from: reservation.status.to_string(),
            to: target.to_string(),
        }));
    }
    persistence
        .set_dining_reservation_status(reservation_id, target.as_str())
        .map_err(translate_persistence_error)?;
    persistence
        .get_dining_reservation(reservation_id)
        .map_err(translate_persistence_error)
}

fn transition_experience(
    persistence: &mut Persistence,
    booking_id: i64,
    target: ExperienceBookingStatus,
) -> Result<ExperienceBooking, ApiError> {
    let booking: ExperienceBooking = persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)?;
    if !booking.status.can_transition_to(target) {
        return Err(translate_domain_error(&DomainError::InvalidStatusTransition {
            from: booking.status.to_string(),
            to: target.to_string(),
        }));
    }
    persistence
        .set_experience_booking_status(booking_id, target.as_str())
        .map_err(translate_persistence_error)?;
    persistence
        .get_experience_booking(booking_id)
        .map_err(translate_persistence_error)
}

/// Confirms an unconfirmed cabin booking.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the transition is
/// not legal from its current status.
pub fn confirm_cabin_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<CabinBooking, ApiError> {
    transition_cabin(persistence, booking_id, CabinBookingStatus::Confirmed)
}

/// Checks a confirmed cabin booking's guest in.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the transition is
/// not legal from its current status.
pub fn check_in_cabin_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<CabinBooking, ApiError> {
    transition_cabin(persistence, booking_id, CabinBookingStatus::CheckedIn)
}

/// Checks a cabin booking's guest out, completing the stay.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the transition is
/// not legal from its current status.
pub fn check_out_cabin_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<CabinBooking, ApiError> {
    transition_cabin(persistence, booking_id, CabinBookingStatus::CheckedOut)
}

/// Confirms a pending dining reservation.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or the transition
/// is not legal from its current status.
pub fn confirm_dining_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<DiningReservation, ApiError> {
    transition_dining(persistence, reservation_id, DiningReservationStatus::Confirmed)
}

/// Marks a confirmed dining reservation as served.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or the transition
/// is not legal from its current status.
pub fn complete_dining_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<DiningReservation, ApiError> {
    transition_dining(persistence, reservation_id, DiningReservationStatus::Completed)
}

/// Marks a dining reservation as a no-show, releasing its seats.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or the transition
/// is not legal from its current status.
pub fn mark_dining_no_show(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<DiningReservation, ApiError> {
    transition_dining(persistence, reservation_id, DiningReservationStatus::NoShow)
}

/// Confirms a pending experience booking.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the transition is
/// not legal from its current status.
pub fn confirm_experience_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<ExperienceBooking, ApiError> {
    transition_experience(persistence, booking_id, ExperienceBookingStatus::Confirmed)
}

/// Marks a confirmed experience booking as delivered.
///
/// # Errors
///
/// Returns an error if the booking does not exist or the transition is
/// not legal from its current status.
pub fn complete_experience_booking(
    persistence: &mut Persistence,
    booking_id: i64,
) -> Result<ExperienceBooking, ApiError> {
    transition_experience(persistence, booking_id, ExperienceBookingStatus::Completed)
}

/// Applies an external payment event to a reservation.
///
/// A full payment or deposit on a still-initial reservation also confirms
/// it; a refund clears the payment flags and leaves the status alone.
/// Deposits exist only for cabin bookings.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or the signal does
/// not apply to the reservation kind.
pub fn apply_payment_signal(
    persistence: &mut Persistence,
    request: &PaymentSignalRequest,
) -> Result<PaymentSignalResponse, ApiError> {
    let message: String = match request.kind {
        ReservationKind::Cabin => {
            let booking: CabinBooking = persistence
                .get_cabin_booking(request.reservation_id)
                .map_err(translate_persistence_error)?;
            match request.signal {
                PaymentSignal::Paid => {
                    persistence
                        .set_cabin_booking_payment(
                            request.reservation_id,
                            true,
                            booking.deposit_paid,
                        )
                        .map_err(translate_persistence_error)?;
                    confirm_after_payment_cabin(persistence, request.reservation_id, &booking)?;
                    String::from("Cabin booking marked paid in full")
                }
                PaymentSignal::DepositPaid => {
                    persistence
                        .set_cabin_booking_payment(request.reservation_id, booking.is_paid, true)
                        .map_err(translate_persistence_error)?;
                    confirm_after_payment_cabin(persistence, request.reservation_id, &booking)?;
                    String::from("Cabin booking deposit recorded")
                }
                PaymentSignal::Refunded => {
                    persistence
                        .set_cabin_booking_payment(request.reservation_id, false, false)
                        .map_err(translate_persistence_error)?;
                    String::from("Cabin booking payment refunded")
                }
            }
        }
        ReservationKind::Dining => {
            let reservation: DiningReservation = persistence
                .get_dining_reservation(request.reservation_id)
                .map_err(translate_persistence_error)?;
            match request.signal {
                PaymentSignal::Paid => {
                    persistence
                        .set_dining_reservation_payment(request.reservation_id, true)
                        .map_err(translate_persistence_error)?;
                    if reservation
                        .status
                        .can_transition_to(DiningReservationStatus::Confirmed)
                    {
                        persistence
                            .set_dining_reservation_status(
                                request.reservation_id,
                                DiningReservationStatus::Confirmed.as_str(),
                            )
                            .map_err(translate_persistence_error)?;
                    }
                    String::from("Dining reservation marked paid")
                }
                PaymentSignal::DepositPaid => {
                    return Err(deposit_not_supported(request.kind));
                }
                PaymentSignal::Refunded => {
                    persistence
                        .set_dining_reservation_payment(request.reservation_id, false)
                        .map_err(translate_persistence_error)?;
                    String::from("Dining reservation payment refunded")
                }
            }
        }
        ReservationKind::Experience => {
            let booking: ExperienceBooking = persistence
                .get_experience_booking(request.reservation_id)
                .map_err(translate_persistence_error)?;
            match request.signal {
                PaymentSignal::Paid => {
                    persistence
                        .set_experience_booking_payment(request.reservation_id, true)
                        .map_err(translate_persistence_error)?;
                    if booking
                        .status
                        .can_transition_to(ExperienceBookingStatus::Confirmed)
                    {
                        persistence
                            .set_experience_booking_status(
                                request.reservation_id,
                                ExperienceBookingStatus::Confirmed.as_str(),
                            )
                            .map_err(translate_persistence_error)?;
                    }
                    String::from("Experience booking marked paid")
                }
                PaymentSignal::DepositPaid => {
                    return Err(deposit_not_supported(request.kind));
                }
                PaymentSignal::Refunded => {
                    persistence
                        .set_experience_booking_payment(request.reservation_id, false)
                        .map_err(translate_persistence_error)?;
                    String::from("Experience booking payment refunded")
                }
            }
        }
    };

    Ok(PaymentSignalResponse {
        kind: request.kind,
        reservation_id: request.reservation_id,
        message,
    })
}

fn confirm_after_payment_cabin(
    persistence: &mut Persistence,
    booking_id: i64,
    booking: &CabinBooking,
) -> Result<(), ApiError> {
    if booking
        .status
        .can_transition_to(CabinBookingStatus::Confirmed)
    {
        persistence
            .set_cabin_booking_status(booking_id, CabinBookingStatus::Confirmed.as_str())
            .map_err(translate_persistence_error)?;
    }
    Ok(())
}

fn deposit_not_supported(kind: ReservationKind) -> ApiError {
    ApiError::InvalidInput {
        field: String::from("signal"),
        message: format!("Deposit signals do not apply to {kind} reservations"),
    }
}

/// Describes the active cancellation policy, with concrete deadlines when
/// a check-in date is supplied.
#[must_use]
pub fn get_policy(settings: &Settings, check_in: Option<Date>) -> PolicyResponse {
    PolicyResponse {
        policy: settings.cancellation_policy,
        description: describe_policy(settings.cancellation_policy).to_string(),
        deadlines: check_in.map(|date| cancellation_deadlines(date, settings.cancellation_policy)),
    }
}
