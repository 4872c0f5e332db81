//! Customer aggregation.

use chrono::{DateTime, Utc};
use datastore::{Datastore, StoreError};
use domain::{Customer, CustomerInfo, OrderId};

/// What recording an order did to the customers table.
///
/// The distinction matters for compensation: a created record is
/// deleted outright, an updated one has the order removed again.
#[derive(Debug, Clone)]
pub enum CustomerOutcome {
    Created(Customer),
    Updated(Customer),
    /// Submission carried neither phone nor email; nothing written.
    Anonymous,
}

impl CustomerOutcome {
    /// The written record, if any.
    pub fn customer(&self) -> Option<&Customer> {
        match self {
            CustomerOutcome::Created(c) | CustomerOutcome::Updated(c) => Some(c),
            CustomerOutcome::Anonymous => None,
        }
    }
}

/// Folds a placed order into the customer's aggregate record.
///
/// The record is keyed by phone when present, else email. Submissions
/// with neither are anonymous and are skipped. An existing record gets
/// the order appended; otherwise a fresh one is created.
pub async fn record_customer_order<S: Datastore>(
    store: &S,
    info: &CustomerInfo,
    order_id: &OrderId,
    now: DateTime<Utc>,
) -> Result<CustomerOutcome, StoreError> {
    let Some(key) = info.key() else {
        return Ok(CustomerOutcome::Anonymous);
    };

    match store.get_customer(&key).await? {
        Some(mut existing) => {
            existing.record_order(order_id.clone(), now);
            let updated = store.update_customer(existing).await?;
            Ok(CustomerOutcome::Updated(updated))
        }
        None => {
            let fresh = Customer::from_first_order(key, info, order_id.clone(), now);
            let created = store.insert_customer(fresh).await?;
            Ok(CustomerOutcome::Created(created))
        }
    }
}

/// Undoes [`record_customer_order`].
///
/// A created record is deleted; an updated one has the order id pulled
/// back out and the counter resynced. The original last-order timestamp
/// is not recoverable and is left alone.
pub async fn revert_customer_order<S: Datastore>(
    store: &S,
    outcome: &CustomerOutcome,
    order_id: &OrderId,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    match outcome {
        CustomerOutcome::Anonymous => Ok(()),
        CustomerOutcome::Created(customer) => store.delete_customer(&customer.id).await,
        CustomerOutcome::Updated(customer) => {
            let Some(mut current) = store.get_customer(&customer.id).await? else {
                return Ok(());
            };
            current.orders.retain(|id| id != order_id);
            current.total_orders = current.orders.len() as u32;
            current.updated_at = now;
            store.update_customer(current).await?;
            Ok(())
        }
    }
}
