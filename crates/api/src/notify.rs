// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer notification seam.
//!
//! Reservation creation and cancellation emit notifications through the
//! [`Notifier`] trait. Delivery is best-effort: a failed notification is
//! logged and never fails the reservation operation that triggered it.

use crate::request_response::ReservationKind;
use lodge_domain::{CustomerId, RefundEstimate};
use thiserror::Error;

/// Notification delivery errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The delivery channel rejected the message.
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
    /// The notifier has no route to the customer.
    #[error("No delivery route for customer '{0}'")]
    NoRoute(String),
}

/// Delivery seam for customer-facing reservation notifications.
pub trait Notifier: Send + Sync {
    /// Notifies a customer that a reservation was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    fn reservation_created(
        &self,
        kind: ReservationKind,
        reservation_id: i64,
        customer_id: &CustomerId,
    ) -> Result<(), NotifyError>;

    /// Notifies a customer that a reservation was cancelled, including the
    /// refund estimate computed at cancellation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    fn reservation_cancelled(
        &self,
        kind: ReservationKind,
        reservation_id: i64,
        customer_id: &CustomerId,
        refund: &RefundEstimate,
    ) -> Result<(), NotifyError>;
}

/// A notifier that silently accepts every message.
///
/// The default for deployments without a configured delivery channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn reservation_created(
        &self,
        _kind: ReservationKind,
        _reservation_id: i64,
        _customer_id: &CustomerId,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    fn reservation_cancelled(
        &self,
        _kind: ReservationKind,
        _reservation_id: i64,
        _customer_id: &CustomerId,
        _refund: &RefundEstimate,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
