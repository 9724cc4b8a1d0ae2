use serde_json::Value;

use super::error::BulkError;

/// Parsed bulk request. Lives for one HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub action: String,
    /// Duplicates are kept; the same mutation simply applies twice
    pub ids: Vec<String>,
    /// Extra action input, e.g. `{ "stock": 12 }` for `update-stock`
    pub data: Option<Value>,
}

/// Parse a raw request body
pub fn parse_bulk_body(body: &[u8], max_ids: usize) -> Result<BulkRequest, BulkError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| BulkError::Validation(format!("Invalid JSON body: {}", e)))?;
    parse_bulk_request(&value, max_ids)
}

/// Extract `{action, ids, data?}` and validate its shape
pub fn parse_bulk_request(body: &Value, max_ids: usize) -> Result<BulkRequest, BulkError> {
    let obj = body
        .as_object()
        .ok_or_else(|| BulkError::Validation("Request body must be a JSON object".to_string()))?;

    let action = obj
        .get("action")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| BulkError::Validation("Action is required".to_string()))?
        .to_string();

    let raw_ids = obj
        .get("ids")
        .and_then(Value::as_array)
        .ok_or_else(|| BulkError::Validation("IDs array is required".to_string()))?;

    if raw_ids.is_empty() {
        return Err(BulkError::Validation("IDs array is required".to_string()));
    }
    if raw_ids.len() > max_ids {
        return Err(BulkError::Validation(format!(
            "Too many ids: {} (maximum {})",
            raw_ids.len(),
            max_ids
        )));
    }

    let ids = raw_ids
        .iter()
        .enumerate()
        .map(|(index, id)| match id.as_str().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(BulkError::Validation(format!("Invalid id at index {}", index))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let data = match obj.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(Value::Object(map.clone())),
        Some(_) => return Err(BulkError::Validation("Data must be an object".to_string())),
    };

    Ok(BulkRequest { action, ids, data })
}
