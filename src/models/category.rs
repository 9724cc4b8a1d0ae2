use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ApprovalStatus;

fn default_true() -> bool {
    true
}

/// Category record as stored in the `categories` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Parents in priority order; the first entry places the category in the tree
    #[serde(default, alias = "parentIds")]
    pub parent_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub product_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }
}

/// Payload for creating a category
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Optional caller-chosen id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "parentIds")]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_featured: bool,
}
