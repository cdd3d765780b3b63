//! Salary projection
//!
//! Salaries are never stored. They are derived on demand from an employee's
//! hourly rate, their leadership status and their work arrangements.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::employee::EmployeeBrief;
use super::work_arrangement::WorkArrangement;

/// Number of fractional digits in a monetary amount
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Computed pay for one employee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Salary {
    pub employee: EmployeeBrief,
    pub payable: Decimal,
}

/// Constants the salary computation is parameterised by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryPolicy {
    /// Hours in a full-time period
    pub full_time_hours: Decimal,
    /// Multiplier applied to a team leader's hourly rate
    pub leader_coefficient: Decimal,
}

impl SalaryPolicy {
    /// Compute the payable amount for one employee.
    ///
    /// `arrangements` must be in store order: the branch between full-time and
    /// part-time pay is decided by the first element only. `None` when the
    /// amount does not fit in a `Decimal`.
    pub fn payable(
        &self,
        hourly_rate: Decimal,
        is_leader: bool,
        arrangements: &[WorkArrangement],
    ) -> Option<Decimal> {
        let rate = if is_leader {
            hourly_rate.checked_mul(self.leader_coefficient)?
        } else {
            hourly_rate
        };

        let amount = match arrangements.first() {
            None => Decimal::ZERO,
            Some(first) if first.is_full_time() => self.full_time_hours.checked_mul(rate)?,
            Some(_) => {
                let percent: Decimal = arrangements
                    .iter()
                    .filter_map(|a| a.percentage)
                    .map(Decimal::from)
                    .sum();
                (percent / Decimal::ONE_HUNDRED)
                    .checked_mul(self.full_time_hours)?
                    .checked_mul(rate)?
            }
        };

        Some(to_money(amount))
    }
}

/// Round to cents and pin the scale so that `2768` renders as `2768.00`
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        MONEY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}
