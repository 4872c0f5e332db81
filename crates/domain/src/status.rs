//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order.
///
/// A flat set: any status may be requested from any other. What matters
/// for correctness is the stock side effect of a change, computed by
/// [`OrderStatus::stock_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Freshly placed, stock reserved.
    #[default]
    New,

    /// Being prepared or shipped.
    Processing,

    /// Delivered and settled.
    Completed,

    /// Cancelled; reserved stock has been returned.
    Cancelled,

    /// Refunded; reserved stock has been returned.
    Refunded,
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Reserve stock for an order (placement or reactivation).
    Decrease,
    /// Return stock to the shelf (cancellation or refund).
    Increase,
}

impl OrderStatus {
    /// True for statuses whose orders no longer hold stock.
    pub fn is_inactive(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Stock side effect of changing status from `from` to `to`.
    ///
    /// Entering cancelled/refunded restocks; leaving them for an active
    /// status re-reserves; everything else (including no change) leaves
    /// stock alone.
    pub fn stock_change(from: OrderStatus, to: OrderStatus) -> Option<StockDirection> {
        if from == to {
            return None;
        }
        if to.is_inactive() {
            return Some(StockDirection::Increase);
        }
        if from.is_inactive() {
            return Some(StockDirection::Decrease);
        }
        None
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Parses a stored status string.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "new" => Some(OrderStatus::New),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            "refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn cancelling_restocks() {
        assert_eq!(
            OrderStatus::stock_change(New, Cancelled),
            Some(StockDirection::Increase)
        );
        assert_eq!(
            OrderStatus::stock_change(Processing, Refunded),
            Some(StockDirection::Increase)
        );
        assert_eq!(
            OrderStatus::stock_change(Completed, Cancelled),
            Some(StockDirection::Increase)
        );
    }

    #[test]
    fn reactivating_re_reserves() {
        assert_eq!(
            OrderStatus::stock_change(Cancelled, New),
            Some(StockDirection::Decrease)
        );
        assert_eq!(
            OrderStatus::stock_change(Refunded, Completed),
            Some(StockDirection::Decrease)
        );
    }

    #[test]
    fn active_to_active_leaves_stock_alone() {
        assert_eq!(OrderStatus::stock_change(New, Processing), None);
        assert_eq!(OrderStatus::stock_change(Processing, Completed), None);
    }

    #[test]
    fn unchanged_status_is_a_no_op() {
        assert_eq!(OrderStatus::stock_change(Cancelled, Cancelled), None);
        assert_eq!(OrderStatus::stock_change(New, New), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&New).unwrap(), "\"new\"");
        let s: OrderStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(s, Refunded);
    }

    #[test]
    fn parse_round_trips() {
        for s in [New, Processing, Completed, Cancelled, Refunded] {
            assert_eq!(OrderStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }
}
