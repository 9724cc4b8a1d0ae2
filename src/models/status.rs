use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Orders may only be removed once they can no longer be fulfilled
    pub fn is_deletable(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Failed)
    }
}

/// Auction lifecycle. Declared only; transitions are not enforced by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Draft,
    Scheduled,
    Active,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Published,
    Archived,
    Banned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(json!(OrderStatus::Cancelled), json!("cancelled"));
        assert_eq!(json!(AuctionStatus::Active), json!("active"));
        assert_eq!(json!(ApprovalStatus::Rejected), json!("rejected"));
        assert_eq!(OrderStatus::Refunded.as_str(), "refunded");
    }

    #[test]
    fn only_terminal_failures_are_deletable() {
        assert!(OrderStatus::Cancelled.is_deletable());
        assert!(OrderStatus::Failed.is_deletable());
        assert!(!OrderStatus::Delivered.is_deletable());
        assert!(!OrderStatus::Pending.is_deletable());
    }
}
