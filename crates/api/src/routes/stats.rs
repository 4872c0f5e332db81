//! Dashboard statistics endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use datastore::Datastore;
use domain::Money;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub today_orders: u64,
    pub today_revenue: Money,
    pub yesterday_orders: u64,
    pub yesterday_revenue: Money,
    pub orders_change: String,
    pub revenue_change: String,
    pub month_revenue: Money,
    pub last_month_revenue: Money,
    pub month_revenue_change: String,
    pub out_of_stock_count: u64,
    pub new_customers: u64,
}

fn start_of(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Percent delta of `current` against `previous`, with a leading sign.
fn percent_change(current: i64, previous: i64) -> String {
    if previous == 0 {
        return if current == 0 {
            "0%".to_string()
        } else {
            "+100%".to_string()
        };
    }
    let pct = (current - previous) as f64 / previous as f64 * 100.0;
    if pct >= 0.0 {
        format!("+{pct:.1}%")
    } else {
        format!("{pct:.1}%")
    }
}

/// GET /stats — the storefront dashboard aggregate.
#[tracing::instrument(skip(state))]
pub async fn dashboard<S: Datastore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let now = Utc::now();
    let today = now.date_naive();
    let yesterday = today - Duration::days(1);

    let today_stat = state.store.get_daily_stat(today).await?;
    let yesterday_stat = state.store.get_daily_stat(yesterday).await?;

    let (today_orders, today_revenue) = today_stat
        .map(|s| (s.orders, s.revenue))
        .unwrap_or((0, Money::zero()));
    let (yesterday_orders, yesterday_revenue) = yesterday_stat
        .map(|s| (s.orders, s.revenue))
        .unwrap_or((0, Money::zero()));

    let this_month = month_start(today);
    let last_month = previous_month_start(today);

    let month_revenue: Money = state
        .store
        .list_orders_between(start_of(this_month), now)
        .await?
        .iter()
        .map(|o| o.total)
        .sum();
    let last_month_revenue: Money = state
        .store
        .list_orders_between(start_of(last_month), start_of(this_month))
        .await?
        .iter()
        .map(|o| o.total)
        .sum();

    let out_of_stock_count = state.store.count_out_of_stock().await?;
    let new_customers = state
        .store
        .count_customers_since(now - Duration::days(7))
        .await?;

    Ok(Json(DashboardResponse {
        orders_change: percent_change(today_orders as i64, yesterday_orders as i64),
        revenue_change: percent_change(today_revenue.cents(), yesterday_revenue.cents()),
        month_revenue_change: percent_change(month_revenue.cents(), last_month_revenue.cents()),
        today_orders,
        today_revenue,
        yesterday_orders,
        yesterday_revenue,
        month_revenue,
        last_month_revenue,
        out_of_stock_count,
        new_customers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_formatting() {
        assert_eq!(percent_change(150, 100), "+50.0%");
        assert_eq!(percent_change(50, 100), "-50.0%");
        assert_eq!(percent_change(5, 0), "+100%");
        assert_eq!(percent_change(0, 0), "0%");
    }

    #[test]
    fn month_boundaries() {
        let mid_january = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            month_start(mid_january),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert_eq!(
            previous_month_start(mid_january),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }
}
