use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::database::Fields;

/// What one action does to one target record
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Merge these fields into the record
    Update(Fields),
    /// Remove the record
    Delete,
}

impl Mutation {
    /// Field update stamped with the shared request timestamp
    pub fn update<const N: usize>(now: DateTime<Utc>, fields: [(&str, Value); N]) -> Self {
        let mut map: Fields = fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        map.insert("updated_at".to_string(), json!(now));
        Mutation::Update(map)
    }

    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Mutation::Update(fields) => Some(fields),
            Mutation::Delete => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Mutation::Delete)
    }
}
