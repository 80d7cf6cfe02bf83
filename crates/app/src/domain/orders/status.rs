//! Order status transitions

use thiserror::Error;

use crate::domain::orders::records::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move an order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Statuses reachable in one step. Delivered and cancelled orders are final.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Paid, Self::Processing, Self::Cancelled],
            Self::Paid => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        self.next_statuses().contains(&to)
    }

    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `to` is not reachable from `self`.
    pub fn transition_to(self, to: OrderStatus) -> Result<OrderStatus, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        self.next_statuses().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_paid_processed_or_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn shipped_only_moves_to_delivered() {
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Delivered),
            Ok(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Cancelled),
            Err(InvalidTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Cancelled,
            })
        );
    }

    #[test]
    fn delivered_and_cancelled_are_final() {
        for status in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(status));
            assert!(!OrderStatus::Cancelled.can_transition_to(status));
        }

        assert!(OrderStatus::Delivered.is_final());
        assert!(!OrderStatus::Paid.is_final());
    }

    #[test]
    fn no_status_transitions_to_itself() {
        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(status), "{status} loops");
        }
    }
}
