// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Lodge Reservation System.
//!
//! Handlers tie the pure domain rules to the guarded persistence writes:
//! every reservation request is validated, priced from the catalog, and
//! committed through the write-then-verify transactions in the
//! persistence layer. Errors crossing this boundary are [`ApiError`]s.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod notify;
mod request_response;

pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    apply_payment_signal, cancel_cabin_booking, cancel_dining_reservation,
    cancel_experience_booking, check_cabin_availability, check_in_cabin_booking,
    check_out_cabin_booking, complete_dining_reservation, complete_experience_booking,
    confirm_cabin_booking, confirm_dining_reservation, confirm_experience_booking,
    create_cabin, create_cabin_booking, create_dining_item, create_dining_reservation,
    create_experience, create_experience_booking, get_cabin, get_cabin_booking,
    get_dining_capacity, get_dining_item, get_dining_reservation, get_experience,
    get_experience_booking, get_experience_capacity, get_policy, list_cabin_unavailable_ranges,
    list_cabins, list_dining_items, list_experiences, list_reservations, mark_dining_no_show,
    refund_preview, update_cabin_booking, update_dining_reservation, update_experience_booking,
};
pub use notify::{NoopNotifier, Notifier, NotifyError};
pub use request_response::{
    AvailabilityResponse, CancelCabinBookingResponse, CancelDiningReservationResponse,
    CancelExperienceBookingResponse, CancelRequest, CapacityResponse, CreateCabinBookingRequest,
    CreateCabinRequest, CreateDiningItemRequest, CreateDiningReservationRequest,
    CreateExperienceBookingRequest, CreateExperienceRequest, CreateResourceResponse, DateRange,
    PaymentSignal, PaymentSignalRequest, PaymentSignalResponse, PolicyResponse,
    ReservationHistoryResponse, ReservationKind, UnavailableRangesResponse,
    UpdateCabinBookingRequest, UpdateDiningReservationRequest, UpdateExperienceBookingRequest,
};

#[cfg(test)]
mod tests;
