// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod lifecycle_tests;
mod modification_tests;
mod payment_tests;

use crate::notify::{Notifier, NotifyError};
use crate::request_response::{
    CreateCabinBookingRequest, CreateCabinRequest, CreateDiningItemRequest,
    CreateDiningReservationRequest, CreateExperienceBookingRequest, CreateExperienceRequest,
    ReservationKind,
};
use lodge_domain::{CustomerId, ExtrasSelection, Money, RefundEstimate};
use lodge_persistence::Persistence;
use std::sync::Mutex;
use time::macros::time;
use time::{Date, Time};

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// A $120/night cabin sleeping four.
pub fn add_cabin(db: &mut Persistence) -> i64 {
    crate::create_cabin(
        db,
        CreateCabinRequest {
            name: String::from("Birch"),
            price_per_night: Money::from_units(120),
            discount: None,
            max_capacity: 4,
        },
    )
    .unwrap()
    .id
}

/// A $45/person dining item seating ten per slot, serving 17:00-21:00.
pub fn add_dining_item(db: &mut Persistence) -> i64 {
    crate::create_dining_item(
        db,
        CreateDiningItemRequest {
            name: String::from("Chef's Table"),
            price_per_person: Money::from_units(45),
            min_people: 1,
            max_people: 10,
            serving_start: time!(17:00:00),
            serving_end: time!(21:00:00),
        },
    )
    .unwrap()
    .id
}

/// A $60/person experience with the given daily cap.
pub fn add_experience(db: &mut Persistence, max_participants: Option<u32>) -> i64 {
    crate::create_experience(
        db,
        CreateExperienceRequest {
            name: String::from("Moose Safari"),
            price_per_person: Money::from_units(60),
            max_participants,
        },
    )
    .unwrap()
    .id
}

pub fn cabin_request(
    customer: &str,
    check_in: Date,
    check_out: Date,
    num_guests: u32,
    extras: ExtrasSelection,
) -> CreateCabinBookingRequest {
    CreateCabinBookingRequest {
        customer_id: CustomerId::new(customer),
        check_in,
        check_out,
        num_guests,
        extras,
        special_requests: vec![],
    }
}

pub fn dining_request(
    customer: &str,
    date: Date,
    time: Time,
    num_guests: u32,
) -> CreateDiningReservationRequest {
    CreateDiningReservationRequest {
        customer_id: CustomerId::new(customer),
        date,
        time,
        num_guests,
        special_requests: vec![],
    }
}

pub fn experience_request(
    customer: &str,
    date: Date,
    num_participants: u32,
) -> CreateExperienceBookingRequest {
    CreateExperienceBookingRequest {
        customer_id: CustomerId::new(customer),
        date,
        num_participants,
        special_requests: vec![],
    }
}

/// A notifier that records every delivery for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub created: Mutex<Vec<(ReservationKind, i64)>>,
    pub cancelled: Mutex<Vec<(ReservationKind, i64)>>,
}

impl Notifier for RecordingNotifier {
    fn reservation_created(
        &self,
        kind: ReservationKind,
        reservation_id: i64,
        _customer_id: &CustomerId,
    ) -> Result<(), NotifyError> {
        self.created.lock().unwrap().push((kind, reservation_id));
        Ok(())
    }

    fn reservation_cancelled(
        &self,
        kind: ReservationKind,
        reservation_id: i64,
        _customer_id: &CustomerId,
        _refund: &RefundEstimate,
    ) -> Result<(), NotifyError> {
        self.cancelled.lock().unwrap().push((kind, reservation_id));
        Ok(())
    }
}

/// A notifier whose deliveries always fail.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn reservation_created(
        &self,
        _kind: ReservationKind,
        _reservation_id: i64,
        customer_id: &CustomerId,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::NoRoute(customer_id.value().to_string()))
    }

    fn reservation_cancelled(
        &self,
        _kind: ReservationKind,
        _reservation_id: i64,
        customer_id: &CustomerId,
        _refund: &RefundEstimate,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::NoRoute(customer_id.value().to_string()))
    }
}
