//! Typed identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker prepended to every generated order identifier.
pub const ORDER_ID_MARKER: &str = "LG";

/// Unique identifier for an order.
///
/// Generated identifiers are the fixed marker followed by a random
/// UUID, so they stay unique under concurrent requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an order ID from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, collision-resistant order ID.
    pub fn generate() -> Self {
        Self(format!("{ORDER_ID_MARKER}{}", Uuid::new_v4().simple()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Product identifier, chosen by the catalog client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Customer identity key, derived from contact info.
///
/// Business rule: the phone number identifies a customer when present,
/// otherwise the email address does. Two submissions carrying the same
/// phone (or, lacking one, the same email) collapse into one customer
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerKey(String);

impl CustomerKey {
    /// Creates a customer key from an existing string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives the key from contact info: phone first, else email.
    ///
    /// Returns `None` when both are empty; such submissions carry no
    /// usable identity and are never aggregated.
    pub fn derive(phone: &str, email: &str) -> Option<Self> {
        if !phone.is_empty() {
            Some(Self(phone.to_string()))
        } else if !email.is_empty() {
            Some(Self(email.to_string()))
        } else {
            None
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CustomerKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CustomerKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_order_ids_carry_marker_and_are_unique() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert!(a.as_str().starts_with(ORDER_ID_MARKER));
        assert_ne!(a, b);
    }

    #[test]
    fn customer_key_prefers_phone() {
        let key = CustomerKey::derive("0901234567", "a@example.com").unwrap();
        assert_eq!(key.as_str(), "0901234567");
    }

    #[test]
    fn customer_key_falls_back_to_email() {
        let key = CustomerKey::derive("", "a@example.com").unwrap();
        assert_eq!(key.as_str(), "a@example.com");
    }

    #[test]
    fn customer_key_absent_without_contact_info() {
        assert!(CustomerKey::derive("", "").is_none());
    }

    #[test]
    fn order_id_serializes_as_plain_string() {
        let id = OrderId::new("LG123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"LG123\"");
    }
}
