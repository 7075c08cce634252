//! Order fulfillment status state machine.

use serde::{Deserialize, Serialize};

/// Fulfillment status of an order as tracked by staff.
///
/// Orders are created as [`OrderStatus::Pending`] and normally move through
/// `preparing` and `ready` to `completed`. `cancelled` is reachable from any
/// live state. The two terminal states (`completed`, `cancelled`) admit no
/// further transitions; between live states the contract is deliberately
/// permissive and does not enforce adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Initial status, set at order creation.
    #[default]
    Pending,
    /// Staff has started preparing the order.
    Preparing,
    /// Order is ready for pickup / delivery to the spot.
    Ready,
    /// Order was handed over. Terminal.
    Completed,
    /// Order was cancelled by staff. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// All recognized status values, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The wire/storage representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().expect("parse own display");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("bogus".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn only_completed_and_cancelled_are_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Preparing).expect("serialize");
        assert_eq!(json, "\"preparing\"");
    }
}
