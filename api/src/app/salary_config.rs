//! Salary configuration constants
//!
//! Defaults for the salary projection. Both can be overridden through the
//! environment (see `Config`).

use rust_decimal::Decimal;

use crate::domain::entities::SalaryPolicy;

/// Hours in a full-time period
pub const DEFAULT_FULL_TIME_HOURS: Decimal = Decimal::from_parts(160, 0, 0, false, 0);

/// Multiplier applied to a team leader's hourly rate (1.1)
pub const DEFAULT_LEADER_COEFFICIENT: Decimal = Decimal::from_parts(11, 0, 0, false, 1);

/// Largest accepted full-time period: every hour of a 31-day month
pub const MAX_FULL_TIME_HOURS: Decimal = Decimal::from_parts(744, 0, 0, false, 0);

/// Largest accepted leader coefficient
pub const MAX_LEADER_COEFFICIENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            full_time_hours: DEFAULT_FULL_TIME_HOURS,
            leader_coefficient: DEFAULT_LEADER_COEFFICIENT,
        }
    }
}
