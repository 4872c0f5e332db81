//! Per-day sales statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Per-calendar-day aggregate of order count and revenue.
///
/// Keyed by the day boundary at the moment of write (UTC), not by the
/// order's own timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: Money,
}

impl DailyStat {
    /// Opens a fresh row for the first order of a day.
    pub fn first_sale(date: NaiveDate, total: Money) -> Self {
        Self {
            date,
            orders: 1,
            revenue: total,
        }
    }

    /// Folds one more order into the day's counters.
    pub fn record_sale(&mut self, total: Money) {
        self.orders += 1;
        self.revenue += total;
    }
}
