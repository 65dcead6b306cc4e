// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cancellation refund policy engine.
//!
//! Computes refund estimates from the active policy's day-granular tier
//! table. Tiers compare calendar-day differences (midnight to midnight),
//! not elapsed hours; the "24 hours" wording in the flexible policy
//! description is display text only. All functions here are pure.

use crate::money::Money;
use crate::settings::CancellationPolicy;
use serde::{Deserialize, Serialize};
use time::Date;

/// Classification of a refund estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundType {
    /// 100% of the amount paid.
    Full,
    /// Strictly between 0% and 100%.
    Partial,
    /// Nothing is refunded.
    None,
}

/// A refund estimate, computed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundEstimate {
    /// Refund percentage (0-100).
    pub refund_percentage: u8,
    /// Refund amount, half-up rounded at cent precision.
    pub refund_amount: Money,
    /// Full, partial, or none.
    pub refund_type: RefundType,
    /// Human-readable explanation of the tier applied.
    pub reason: String,
    /// Calendar days from "now" to check-in; negative after check-in.
    pub days_until_check_in: i64,
    /// The policy the estimate was computed under.
    pub policy: CancellationPolicy,
}

/// Published cancellation deadlines for a check-in date under a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationDeadlines {
    /// Last day a cancellation still earns a full refund, if the policy
    /// has a full-refund tier.
    pub full_refund_deadline: Option<Date>,
    /// Last day a cancellation still earns a partial refund, if the policy
    /// has a partial tier.
    pub partial_refund_deadline: Option<Date>,
    /// The partial tier's percentage, if the policy has one.
    pub partial_refund_percentage: Option<u8>,
}

/// Computes the calendar-day difference from `today` to `check_in`.
///
/// Both dates are treated as midnights, so this is
/// `ceil((midnight(check_in) − midnight(today)) / 1 day)` exactly.
/// Negative when `today` is after check-in.
#[must_use]
pub fn days_until_check_in(check_in: Date, today: Date) -> i64 {
    (check_in - today).whole_days()
}

/// Returns the amount a customer has actually paid.
///
/// Full payment trumps the deposit flag; with neither flag set nothing has
/// been paid and nothing is refundable.
#[must_use]
pub fn amount_paid(
    total_price: Money,
    deposit_amount: Money,
    is_paid: bool,
    deposit_paid: bool,
) -> Money {
    if is_paid {
        total_price
    } else if deposit_paid {
        deposit_amount
    } else {
        Money::ZERO
    }
}

/// Resolves the refund percentage and tier description for a policy.
///
/// Negative day counts fall through to each policy's below-threshold
/// branch, so cancellation after check-in always yields 0%.
fn resolve_tier(policy: CancellationPolicy, days: i64) -> (u8, &'static str) {
    match policy {
        CancellationPolicy::Flexible => {
            if days >= 1 {
                (100, "Cancelled at least 1 day before check-in")
            } else {
                (0, "Cancelled less than 1 day before check-in")
            }
        }
        CancellationPolicy::Moderate => {
            if days >= 5 {
                (100, "Cancelled at least 5 days before check-in")
            } else if days >= 2 {
                (50, "Cancelled 2-5 days before check-in")
            } else {
                (0, "Cancelled less than 2 days before check-in")
            }
        }
        CancellationPolicy::Strict => {
            if days >= 7 {
                (50, "Cancelled at least 7 days before check-in")
            } else {
                (0, "Cancelled less than 7 days before check-in")
            }
        }
    }
}

/// Computes a refund estimate for a cancellation happening `today`.
///
/// Pure: the same `(payment state, policy, dates)` inputs always produce
/// the same estimate. When nothing has been paid the estimate is always
/// `{0%, $0, none}` regardless of policy or timing.
#[must_use]
pub fn calculate_refund(
    total_price: Money,
    deposit_amount: Money,
    is_paid: bool,
    deposit_paid: bool,
    check_in: Date,
    policy: CancellationPolicy,
    today: Date,
) -> RefundEstimate {
    let days: i64 = days_until_check_in(check_in, today);
    let paid: Money = amount_paid(total_price, deposit_amount, is_paid, deposit_paid);

    if paid.is_zero() {
        return RefundEstimate {
            refund_percentage: 0,
            refund_amount: Money::ZERO,
            refund_type: RefundType::None,
            reason: String::from("No payment has been made for this booking"),
            days_until_check_in: days,
            policy,
        };
    }

    let (percentage, reason) = resolve_tier(policy, days);
    let refund_amount: Money = paid.percentage(percentage);
    let refund_type: RefundType = match percentage {
        100 => RefundType::Full,
        0 => RefundType::None,
        _ => RefundType::Partial,
    };

    RefundEstimate {
        refund_percentage: percentage,
        refund_amount,
        refund_type,
        reason: reason.to_string(),
        days_until_check_in: days,
        policy,
    }
}

/// Computes the published cancellation deadlines for a check-in date.
///
/// Flexible: full refund through `check_in − 1 day`, no partial tier.
/// Moderate: full through `check_in − 5 days`, 50% through `check_in − 2
/// days`. Strict: no full tier, 50% through `check_in − 7 days`.
#[must_use]
pub fn cancellation_deadlines(
    check_in: Date,
    policy: CancellationPolicy,
) -> CancellationDeadlines {
    let days_before = |days: i64| check_in.checked_sub(time::Duration::days(days));
    match policy {
        CancellationPolicy::Flexible => CancellationDeadlines {
            full_refund_deadline: days_before(1),
            partial_refund_deadline: None,
            partial_refund_percentage: None,
        },
        CancellationPolicy::Moderate => CancellationDeadlines {
            full_refund_deadline: days_before(5),
            partial_refund_deadline: days_before(2),
            partial_refund_percentage: Some(50),
        },
        CancellationPolicy::Strict => CancellationDeadlines {
            full_refund_deadline: None,
            partial_refund_deadline: days_before(7),
            partial_refund_percentage: Some(50),
        },
    }
}

/// Returns the fixed human-readable description of a policy.
///
/// Display only; the tier arithmetic above is authoritative.
#[must_use]
pub const fn describe_policy(policy: CancellationPolicy) -> &'static str {
    match policy {
        CancellationPolicy::Flexible => "Full refund up to 24 hours before check-in",
        CancellationPolicy::Moderate => {
            "Full refund 5+ days before check-in, 50% refund 2-5 days before, no refund within 2 days"
        }
        CancellationPolicy::Strict => {
            "50% refund 7+ days before check-in, no refund within 7 days"
        }
    }
}
