// Dispatch tables: per resource, the closed set of action names each role may
// invoke and the field mutation every action performs. Adding a variant
// without a recipe or a name is a compile error.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::models::{ApprovalStatus, AuctionStatus, OrderStatus, ProductStatus};
use crate::types::{Resource, Role};

use super::error::BulkError;
use super::guards::Guard;
use super::mutation::Mutation;

const BAN_REASON: &str = "Bulk ban action";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    // seller, own shop only
    Process,
    Ship,
    Deliver,
    // admin
    Confirm,
    Cancel,
    Refund,
    Delete,
}

impl OrderAction {
    pub fn parse(name: &str, role: Role) -> Option<Self> {
        use OrderAction::*;
        match (role, name) {
            (Role::Seller, "process") => Some(Process),
            (Role::Seller, "ship") => Some(Ship),
            (Role::Seller, "deliver") => Some(Deliver),
            (Role::Admin, "confirm") => Some(Confirm),
            (Role::Admin, "cancel") => Some(Cancel),
            (Role::Admin, "refund") => Some(Refund),
            (Role::Admin, "delete") => Some(Delete),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderAction::Process => "process",
            OrderAction::Ship => "ship",
            OrderAction::Deliver => "deliver",
            OrderAction::Confirm => "confirm",
            OrderAction::Cancel => "cancel",
            OrderAction::Refund => "refund",
            OrderAction::Delete => "delete",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            OrderAction::Process => Mutation::update(now, [("status", json!(OrderStatus::Processing))]),
            OrderAction::Ship => Mutation::update(
                now,
                [("status", json!(OrderStatus::Shipped)), ("shipped_at", json!(now))],
            ),
            OrderAction::Deliver => Mutation::update(
                now,
                [("status", json!(OrderStatus::Delivered)), ("delivered_at", json!(now))],
            ),
            OrderAction::Confirm => Mutation::update(
                now,
                [("status", json!(OrderStatus::Confirmed)), ("confirmed_at", json!(now))],
            ),
            OrderAction::Cancel => Mutation::update(
                now,
                [("status", json!(OrderStatus::Cancelled)), ("cancelled_at", json!(now))],
            ),
            OrderAction::Refund => Mutation::update(
                now,
                [
                    ("status", json!(OrderStatus::Refunded)),
                    ("payment_status", json!("refunded")),
                    ("refunded_at", json!(now)),
                ],
            ),
            OrderAction::Delete => Mutation::Delete,
        }
    }

    pub fn guards(&self) -> &'static [Guard] {
        match self {
            OrderAction::Delete => &[Guard::OrderCancelledOrFailed],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    Activate,
    Deactivate,
    Feature,
    Unfeature,
    Approve,
    Reject,
    Delete,
}

impl CategoryAction {
    pub fn parse(name: &str, role: Role) -> Option<Self> {
        use CategoryAction::*;
        if role != Role::Admin {
            return None;
        }
        match name {
            "activate" => Some(Activate),
            "deactivate" => Some(Deactivate),
            "feature" => Some(Feature),
            "unfeature" => Some(Unfeature),
            "approve" => Some(Approve),
            "reject" => Some(Reject),
            "delete" => Some(Delete),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryAction::Activate => "activate",
            CategoryAction::Deactivate => "deactivate",
            CategoryAction::Feature => "feature",
            CategoryAction::Unfeature => "unfeature",
            CategoryAction::Approve => "approve",
            CategoryAction::Reject => "reject",
            CategoryAction::Delete => "delete",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            CategoryAction::Activate => Mutation::update(now, [("is_active", json!(true))]),
            CategoryAction::Deactivate => Mutation::update(now, [("is_active", json!(false))]),
            CategoryAction::Feature => Mutation::update(now, [("is_featured", json!(true))]),
            CategoryAction::Unfeature => Mutation::update(now, [("is_featured", json!(false))]),
            CategoryAction::Approve => Mutation::update(
                now,
                [("approval_status", json!(ApprovalStatus::Approved)), ("is_active", json!(true))],
            ),
            CategoryAction::Reject => Mutation::update(
                now,
                [("approval_status", json!(ApprovalStatus::Rejected)), ("is_active", json!(false))],
            ),
            CategoryAction::Delete => Mutation::Delete,
        }
    }

    pub fn guards(&self) -> &'static [Guard] {
        match self {
            CategoryAction::Delete => &[Guard::CategoryHasNoChildren, Guard::CategoryHasNoProducts],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopAction {
    Verify,
    Unverify,
    Activate,
    Deactivate,
    Ban,
    Unban,
    Delete,
}

impl ShopAction {
    pub fn parse(name: &str, role: Role) -> Option<Self> {
        use ShopAction::*;
        if role != Role::Admin {
            return None;
        }
        match name {
            "verify" => Some(Verify),
            "unverify" => Some(Unverify),
            "activate" => Some(Activate),
            "deactivate" => Some(Deactivate),
            "ban" => Some(Ban),
            "unban" => Some(Unban),
            "delete" => Some(Delete),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShopAction::Verify => "verify",
            ShopAction::Unverify => "unverify",
            ShopAction::Activate => "activate",
            ShopAction::Deactivate => "deactivate",
            ShopAction::Ban => "ban",
            ShopAction::Unban => "unban",
            ShopAction::Delete => "delete",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            ShopAction::Verify => Mutation::update(
                now,
                [("is_verified", json!(true)), ("verified_at", json!(now))],
            ),
            ShopAction::Unverify => Mutation::update(
                now,
                [("is_verified", json!(false)), ("verified_at", json!(null))],
            ),
            ShopAction::Activate => Mutation::update(now, [("is_active", json!(true))]),
            ShopAction::Deactivate => Mutation::update(now, [("is_active", json!(false))]),
            ShopAction::Ban => Mutation::update(
                now,
                [
                    ("is_banned", json!(true)),
                    ("is_active", json!(false)),
                    ("ban_reason", json!(BAN_REASON)),
                ],
            ),
            ShopAction::Unban => Mutation::update(
                now,
                [
                    ("is_banned", json!(false)),
                    ("is_active", json!(true)),
                    ("ban_reason", json!(null)),
                ],
            ),
            ShopAction::Delete => Mutation::Delete,
        }
    }

    pub fn guards(&self) -> &'static [Guard] {
        match self {
            ShopAction::Delete => &[Guard::ShopHasNoProducts, Guard::ShopHasNoAuctions],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    // any authenticated caller
    Flag,
    // admin
    Approve,
    Reject,
    Unflag,
    Delete,
}

impl ReviewAction {
    pub fn parse(name: &str, role: Role) -> Option<Self> {
        use ReviewAction::*;
        match (role, name) {
            (Role::Admin | Role::Seller | Role::User, "flag") => Some(Flag),
            (Role::Admin, "approve") => Some(Approve),
            (Role::Admin, "reject") => Some(Reject),
            (Role::Admin, "unflag") => Some(Unflag),
            (Role::Admin, "delete") => Some(Delete),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReviewAction::Flag => "flag",
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
            ReviewAction::Unflag => "unflag",
            ReviewAction::Delete => "delete",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            ReviewAction::Flag => Mutation::update(
                now,
                [("is_flagged", json!(true)), ("flagged_at", json!(now))],
            ),
            ReviewAction::Unflag => Mutation::update(
                now,
                [("is_flagged", json!(false)), ("flagged_at", json!(null))],
            ),
            ReviewAction::Approve => Mutation::update(
                now,
                [
                    ("approval_status", json!(ApprovalStatus::Approved)),
                    ("is_approved", json!(true)),
                ],
            ),
            ReviewAction::Reject => Mutation::update(
                now,
                [
                    ("approval_status", json!(ApprovalStatus::Rejected)),
                    ("is_approved", json!(false)),
                ],
            ),
            ReviewAction::Delete => Mutation::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionAction {
    // seller, own shop only
    Start,
    End,
    Cancel,
    // seller (own shop) or admin
    Delete,
    // admin
    Feature,
    Unfeature,
    Approve,
    Reject,
}

impl AuctionAction {
    pub fn parse(name: &str, role: Role) -> Option<Self> {
        use AuctionAction::*;
        match (role, name) {
            (Role::Seller, "start") => Some(Start),
            (Role::Seller, "end") => Some(End),
            (Role::Seller, "cancel") => Some(Cancel),
            (Role::Seller | Role::Admin, "delete") => Some(Delete),
            (Role::Admin, "feature") => Some(Feature),
            (Role::Admin, "unfeature") => Some(Unfeature),
            (Role::Admin, "approve") => Some(Approve),
            (Role::Admin, "reject") => Some(Reject),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuctionAction::Start => "start",
            AuctionAction::End => "end",
            AuctionAction::Cancel => "cancel",
            AuctionAction::Delete => "delete",
            AuctionAction::Feature => "feature",
            AuctionAction::Unfeature => "unfeature",
            AuctionAction::Approve => "approve",
            AuctionAction::Reject => "reject",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            AuctionAction::Start => Mutation::update(
                now,
                [("status", json!(AuctionStatus::Active)), ("started_at", json!(now))],
            ),
            AuctionAction::End => Mutation::update(
                now,
                [("status", json!(AuctionStatus::Ended)), ("ended_at", json!(now))],
            ),
            AuctionAction::Cancel => Mutation::update(
                now,
                [("status", json!(AuctionStatus::Cancelled)), ("cancelled_at", json!(now))],
            ),
            AuctionAction::Delete => Mutation::Delete,
            AuctionAction::Feature => Mutation::update(now, [("is_featured", json!(true))]),
            AuctionAction::Unfeature => Mutation::update(now, [("is_featured", json!(false))]),
            AuctionAction::Approve => Mutation::update(
                now,
                [("approval_status", json!(ApprovalStatus::Approved))],
            ),
            AuctionAction::Reject => Mutation::update(
                now,
                [("approval_status", json!(ApprovalStatus::Rejected))],
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    // seller, own shop only
    Publish,
    Unpublish,
    Archive,
    UpdateStock { stock: u64 },
    // seller (own shop) or admin
    Delete,
    // admin
    Feature,
    Unfeature,
    Ban,
    Verify,
}

impl ProductAction {
    pub fn parse(name: &str, role: Role, data: Option<&Value>) -> Result<Option<Self>, BulkError> {
        use ProductAction::*;
        let action = match (role, name) {
            (Role::Seller, "publish") => Publish,
            (Role::Seller, "unpublish") => Unpublish,
            (Role::Seller, "archive") => Archive,
            (Role::Seller, "update-stock") => UpdateStock { stock: stock_from(data)? },
            (Role::Seller | Role::Admin, "delete") => Delete,
            (Role::Admin, "feature") => Feature,
            (Role::Admin, "unfeature") => Unfeature,
            (Role::Admin, "ban") => Ban,
            (Role::Admin, "verify") => Verify,
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProductAction::Publish => "publish",
            ProductAction::Unpublish => "unpublish",
            ProductAction::Archive => "archive",
            ProductAction::UpdateStock { .. } => "update-stock",
            ProductAction::Delete => "delete",
            ProductAction::Feature => "feature",
            ProductAction::Unfeature => "unfeature",
            ProductAction::Ban => "ban",
            ProductAction::Verify => "verify",
        }
    }

    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            ProductAction::Publish => Mutation::update(
                now,
                [
                    ("status", json!(ProductStatus::Published)),
                    ("is_active", json!(true)),
                    ("published_at", json!(now)),
                ],
            ),
            ProductAction::Unpublish => Mutation::update(
                now,
                [("status", json!(ProductStatus::Draft)), ("is_active", json!(false))],
            ),
            ProductAction::Archive => Mutation::update(
                now,
                [
                    ("status", json!(ProductStatus::Archived)),
                    ("is_active", json!(false)),
                    ("archived_at", json!(now)),
                ],
            ),
            ProductAction::UpdateStock { stock } => Mutation::update(now, [("stock_count", json!(stock))]),
            ProductAction::Delete => Mutation::Delete,
            ProductAction::Feature => Mutation::update(now, [("is_featured", json!(true))]),
            ProductAction::Unfeature => Mutation::update(now, [("is_featured", json!(false))]),
            ProductAction::Ban => Mutation::update(
                now,
                [
                    ("status", json!(ProductStatus::Banned)),
                    ("is_active", json!(false)),
                    ("ban_reason", json!(BAN_REASON)),
                ],
            ),
            ProductAction::Verify => Mutation::update(
                now,
                [("is_verified", json!(true)), ("verified_at", json!(now))],
            ),
        }
    }
}

fn stock_from(data: Option<&Value>) -> Result<u64, BulkError> {
    data.and_then(|d| d.get("stock"))
        .and_then(Value::as_u64)
        .ok_or_else(|| BulkError::Validation("update-stock requires data.stock as a non-negative integer".to_string()))
}

/// An action resolved against the caller's dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Order(OrderAction),
    Category(CategoryAction),
    Shop(ShopAction),
    Review(ReviewAction),
    Auction(AuctionAction),
    Product(ProductAction),
}

impl Action {
    /// Look `name` up in the table for `resource` and `role`.
    /// Names outside the table fail with `UnknownAction`.
    pub fn resolve(resource: Resource, role: Role, name: &str, data: Option<&Value>) -> Result<Self, BulkError> {
        let action = match resource {
            Resource::Orders => OrderAction::parse(name, role).map(Action::Order),
            Resource::Categories => CategoryAction::parse(name, role).map(Action::Category),
            Resource::Shops => ShopAction::parse(name, role).map(Action::Shop),
            Resource::Reviews => ReviewAction::parse(name, role).map(Action::Review),
            Resource::Auctions => AuctionAction::parse(name, role).map(Action::Auction),
            Resource::Products => ProductAction::parse(name, role, data)?.map(Action::Product),
        };
        action.ok_or_else(|| BulkError::UnknownAction(name.to_string()))
    }

    pub fn resource(&self) -> Resource {
        match self {
            Action::Order(_) => Resource::Orders,
            Action::Category(_) => Resource::Categories,
            Action::Shop(_) => Resource::Shops,
            Action::Review(_) => Resource::Reviews,
            Action::Auction(_) => Resource::Auctions,
            Action::Product(_) => Resource::Products,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Order(a) => a.name(),
            Action::Category(a) => a.name(),
            Action::Shop(a) => a.name(),
            Action::Review(a) => a.name(),
            Action::Auction(a) => a.name(),
            Action::Product(a) => a.name(),
        }
    }

    /// Field mutation for one target. `now` is shared by every target in the request.
    pub fn recipe(&self, now: DateTime<Utc>) -> Mutation {
        match self {
            Action::Order(a) => a.recipe(now),
            Action::Category(a) => a.recipe(now),
            Action::Shop(a) => a.recipe(now),
            Action::Review(a) => a.recipe(now),
            Action::Auction(a) => a.recipe(now),
            Action::Product(a) => a.recipe(now),
        }
    }

    /// Preconditions every target must meet before the batch may commit
    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Action::Order(a) => a.guards(),
            Action::Category(a) => a.guards(),
            Action::Shop(a) => a.guards(),
            Action::Review(_) | Action::Auction(_) | Action::Product(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn fields(mutation: Mutation) -> serde_json::Map<String, Value> {
        mutation.fields().cloned().expect("expected an update")
    }

    #[test]
    fn ban_recipe_matches_documented_fields() {
        let f = fields(ShopAction::Ban.recipe(now()));
        assert_eq!(f["is_banned"], json!(true));
        assert_eq!(f["is_active"], json!(false));
        assert_eq!(f["ban_reason"], json!("Bulk ban action"));
        assert_eq!(f["updated_at"], json!(now()));
    }

    #[test]
    fn every_update_recipe_stamps_updated_at() {
        let all: Vec<Action> = vec![
            Action::Order(OrderAction::Process),
            Action::Order(OrderAction::Ship),
            Action::Order(OrderAction::Deliver),
            Action::Order(OrderAction::Confirm),
            Action::Order(OrderAction::Cancel),
            Action::Order(OrderAction::Refund),
            Action::Category(CategoryAction::Activate),
            Action::Category(CategoryAction::Deactivate),
            Action::Category(CategoryAction::Feature),
            Action::Category(CategoryAction::Unfeature),
            Action::Category(CategoryAction::Approve),
            Action::Category(CategoryAction::Reject),
            Action::Shop(ShopAction::Verify),
            Action::Shop(ShopAction::Unverify),
            Action::Shop(ShopAction::Activate),
            Action::Shop(ShopAction::Deactivate),
            Action::Shop(ShopAction::Ban),
            Action::Shop(ShopAction::Unban),
            Action::Review(ReviewAction::Flag),
            Action::Review(ReviewAction::Unflag),
            Action::Review(ReviewAction::Approve),
            Action::Review(ReviewAction::Reject),
            Action::Auction(AuctionAction::Start),
            Action::Auction(AuctionAction::End),
            Action::Auction(AuctionAction::Cancel),
            Action::Auction(AuctionAction::Feature),
            Action::Auction(AuctionAction::Unfeature),
            Action::Auction(AuctionAction::Approve),
            Action::Auction(AuctionAction::Reject),
            Action::Product(ProductAction::Publish),
            Action::Product(ProductAction::Unpublish),
            Action::Product(ProductAction::Archive),
            Action::Product(ProductAction::UpdateStock { stock: 4 }),
            Action::Product(ProductAction::Feature),
            Action::Product(ProductAction::Unfeature),
            Action::Product(ProductAction::Ban),
            Action::Product(ProductAction::Verify),
        ];

        for action in all {
            let f = fields(action.recipe(now()));
            assert_eq!(f.get("updated_at"), Some(&json!(now())), "{} lacks updated_at", action.name());
        }
    }

    #[test]
    fn role_tables_are_partitioned() {
        assert_eq!(OrderAction::parse("ship", Role::Seller), Some(OrderAction::Ship));
        assert_eq!(OrderAction::parse("ship", Role::Admin), None);
        assert_eq!(OrderAction::parse("refund", Role::Seller), None);
        assert_eq!(OrderAction::parse("delete", Role::Admin), Some(OrderAction::Delete));

        assert_eq!(CategoryAction::parse("delete", Role::Seller), None);
        assert_eq!(ShopAction::parse("ban", Role::Admin), Some(ShopAction::Ban));

        assert_eq!(ReviewAction::parse("flag", Role::User), Some(ReviewAction::Flag));
        assert_eq!(ReviewAction::parse("flag", Role::Guest), None);
        assert_eq!(ReviewAction::parse("approve", Role::User), None);

        assert_eq!(AuctionAction::parse("delete", Role::Seller), Some(AuctionAction::Delete));
        assert_eq!(AuctionAction::parse("delete", Role::Admin), Some(AuctionAction::Delete));
        assert_eq!(AuctionAction::parse("feature", Role::Seller), None);
    }

    #[test]
    fn resolve_reports_unknown_actions() {
        let err = Action::resolve(Resource::Shops, Role::Admin, "explode", None).unwrap_err();
        assert!(matches!(err, BulkError::UnknownAction(name) if name == "explode"));

        let action = Action::resolve(Resource::Categories, Role::Admin, "delete", None).unwrap();
        assert_eq!(action.resource(), Resource::Categories);
        assert_eq!(action.guards().len(), 2);
    }

    #[test]
    fn update_stock_requires_stock_data() {
        let action = ProductAction::parse("update-stock", Role::Seller, Some(&json!({ "stock": 7 }))).unwrap();
        assert_eq!(action, Some(ProductAction::UpdateStock { stock: 7 }));
        assert_eq!(fields(action.unwrap().recipe(now()))["stock_count"], json!(7));

        assert!(matches!(
            ProductAction::parse("update-stock", Role::Seller, None),
            Err(BulkError::Validation(_))
        ));
        assert!(matches!(
            ProductAction::parse("update-stock", Role::Seller, Some(&json!({ "stock": -1 }))),
            Err(BulkError::Validation(_))
        ));
        // Admins have no update-stock entry; data is never inspected
        assert_eq!(ProductAction::parse("update-stock", Role::Admin, None).unwrap(), None);
    }

    #[test]
    fn order_delete_is_guarded_and_deletes() {
        assert!(OrderAction::Delete.recipe(now()).is_delete());
        assert_eq!(OrderAction::Delete.guards(), &[Guard::OrderCancelledOrFailed]);
        assert!(OrderAction::Cancel.guards().is_empty());
    }
}
