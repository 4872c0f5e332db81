//! Daily statistics aggregation.

use chrono::NaiveDate;
use datastore::{Datastore, StoreError};
use domain::{DailyStat, Money};

/// Folds one sale into the day's statistics row.
///
/// The first sale of a day opens the row; later ones bump the order
/// count and add the total to revenue. The read and write are separate
/// table operations, so concurrent sales on the same day can race.
pub async fn record_daily_sale<S: Datastore>(
    store: &S,
    date: NaiveDate,
    total: Money,
) -> Result<DailyStat, StoreError> {
    match store.get_daily_stat(date).await? {
        Some(mut stat) => {
            stat.record_sale(total);
            store.update_daily_stat(stat).await
        }
        None => store.insert_daily_stat(DailyStat::first_sale(date, total)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore::MemoryStore;

    #[tokio::test]
    async fn same_day_sales_accumulate() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        record_daily_sale(&store, date, Money::from_cents(10_000))
            .await
            .unwrap();
        let stat = record_daily_sale(&store, date, Money::from_cents(2_500))
            .await
            .unwrap();

        assert_eq!(stat.orders, 2);
        assert_eq!(stat.revenue.cents(), 12_500);
    }

    #[tokio::test]
    async fn days_are_kept_apart() {
        let store = MemoryStore::new();
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();

        record_daily_sale(&store, monday, Money::from_cents(100))
            .await
            .unwrap();
        record_daily_sale(&store, tuesday, Money::from_cents(200))
            .await
            .unwrap();

        let stat = store.get_daily_stat(monday).await.unwrap().unwrap();
        assert_eq!(stat.orders, 1);
        assert_eq!(stat.revenue.cents(), 100);
    }
}
