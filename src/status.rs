//! Order lifecycle statuses, their allowed transitions, and the display
//! mapping consumed by the customer tracking page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The statuses an order may move to from `self`. Delivered and
    /// Cancelled are terminal.
    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Preparing, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Delivered, Cancelled],
            Delivered => &[],
            Cancelled => &[],
        }
    }

    /// Whether an update from `self` to `next` is accepted. Re-asserting the
    /// current status is a no-op and always allowed.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == next || self.allowed_transitions().contains(&next)
    }

    /// Human-facing label for the tracking view.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order received",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready for pickup/delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Progress percentage shown by the tracking view. Cancelled orders
    /// report 0 and the UI hides the bar.
    pub fn progress(self) -> u8 {
        match self {
            OrderStatus::Pending => 25,
            OrderStatus::Preparing => 50,
            OrderStatus::Ready => 75,
            OrderStatus::Delivered => 100,
            OrderStatus::Cancelled => 0,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "READY" => Ok(OrderStatus::Ready),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// Display pair for an arbitrary stored status string. Rows written before
/// enum enforcement may hold anything, so unrecognized values present as
/// Pending.
pub fn display_for(stored: &str) -> (&'static str, u8) {
    let status = OrderStatus::from_str(stored).unwrap_or(OrderStatus::Pending);
    (status.label(), status.progress())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mapping_is_total() {
        for raw in ["PENDING", "PREPARING", "READY", "DELIVERED", "CANCELLED"] {
            let (label, _) = display_for(raw);
            assert!(!label.is_empty());
        }
        assert_eq!(display_for("SHIPPED"), ("Order received", 25));
        assert_eq!(display_for(""), ("Order received", 25));
    }

    #[test]
    fn progress_percentages() {
        assert_eq!(display_for("PENDING"), ("Order received", 25));
        assert_eq!(display_for("PREPARING"), ("Preparing", 50));
        assert_eq!(display_for("READY"), ("Ready for pickup/delivery", 75));
        assert_eq!(display_for("DELIVERED"), ("Delivered", 100));
        assert_eq!(display_for("CANCELLED"), ("Cancelled", 0));
    }

    #[test]
    fn forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn cancel_reachable_from_every_live_state() {
        for s in [OrderStatus::Pending, OrderStatus::Preparing, OrderStatus::Ready] {
            assert!(s.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn terminal_states_reject_transitions() {
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn same_state_is_a_no_op_transition() {
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn skipping_a_step_is_rejected() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn round_trips_through_stored_form() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(s.to_string().parse::<OrderStatus>().unwrap(), s);
        }
    }
}
