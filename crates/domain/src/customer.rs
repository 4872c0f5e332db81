//! Customer aggregate records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CustomerKey, OrderId};

/// Customer contact block as submitted with an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl CustomerInfo {
    /// Derives the customer identity key: phone first, else email.
    pub fn key(&self) -> Option<CustomerKey> {
        CustomerKey::derive(&self.phone, &self.email)
    }
}

/// Aggregate record of one customer across their orders.
///
/// Created on the first order carrying their phone/email; appended to
/// (never replaced) on every subsequent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerKey,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub orders: Vec<OrderId>,
    pub total_orders: u32,
    pub first_order: Option<DateTime<Utc>>,
    pub last_order: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Seeds a new customer record from their first order.
    pub fn from_first_order(
        key: CustomerKey,
        info: &CustomerInfo,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: key,
            name: info.name.clone(),
            phone: info.phone.clone(),
            email: info.email.clone(),
            address: info.address.clone(),
            orders: vec![order_id],
            total_orders: 1,
            first_order: Some(now),
            last_order: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends an order, keeping the counter equal to the list length.
    pub fn record_order(&mut self, order_id: OrderId, now: DateTime<Utc>) {
        self.orders.push(order_id);
        self.total_orders = self.orders.len() as u32;
        self.last_order = Some(now);
        self.updated_at = now;
    }
}

/// Field-wise update for `PUT /customers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    /// Applies a patch in place, bumping the update timestamp.
    pub fn apply(&mut self, patch: CustomerPatch, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        self.updated_at = now;
    }
}
