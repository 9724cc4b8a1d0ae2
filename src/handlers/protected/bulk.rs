use axum::{body::Bytes, extract::State, Extension, Json};

use crate::app::AppState;
use crate::auth::Actor;
use crate::bulk::{parse_bulk_body, policy, BulkOutcome};
use crate::error::ApiError;
use crate::types::Resource;

/// POST /api/orders/bulk
pub async fn orders(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Orders, state, actor, body).await
}

/// POST /api/categories/bulk
pub async fn categories(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Categories, state, actor, body).await
}

/// POST /api/shops/bulk
pub async fn shops(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Shops, state, actor, body).await
}

/// POST /api/reviews/bulk
pub async fn reviews(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Reviews, state, actor, body).await
}

/// POST /api/auctions/bulk
pub async fn auctions(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Auctions, state, actor, body).await
}

/// POST /api/products/bulk
pub async fn products(state: State<AppState>, actor: Extension<Actor>, body: Bytes) -> Result<Json<BulkOutcome>, ApiError> {
    run(Resource::Products, state, actor, body).await
}

async fn run(
    resource: Resource,
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Bytes,
) -> Result<Json<BulkOutcome>, ApiError> {
    // Wrong role for the endpoint fails before the body is looked at
    policy::admit(resource, &actor)?;

    let request = parse_bulk_body(&body, state.config.bulk.max_ids)?;
    tracing::debug!(
        "Bulk {} '{}' requested by {} for {} id(s)",
        resource,
        request.action,
        actor.id,
        request.ids.len()
    );

    let outcome = state.bulk().execute(resource, &actor, request).await?;
    Ok(Json(outcome))
}
