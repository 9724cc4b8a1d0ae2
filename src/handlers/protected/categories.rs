use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::Actor;
use crate::bulk::policy::ADMIN_REQUIRED;
use crate::catalog::CategoryNode;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Category, NewCategory};

#[derive(Debug, Deserialize)]
pub struct ParentsBody {
    #[serde(alias = "parentIds")]
    pub parent_ids: Vec<String>,
}

/// GET /api/categories - every category, ordered by sort_order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.categories().list_all().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/tree - nested category forest
pub async fn tree(State(state): State<AppState>) -> ApiResult<Vec<CategoryNode>> {
    let forest = state.categories().tree().await?;
    Ok(ApiResponse::success(forest))
}

/// POST /api/categories - admin only
pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewCategory>,
) -> ApiResult<Category> {
    require_admin(&actor)?;
    let category = state.categories().create(input, Utc::now()).await?;
    Ok(ApiResponse::created(category))
}

/// PATCH /api/categories/:id/parents - admin only, rejects cycles
pub async fn update_parents(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(body): Json<ParentsBody>,
) -> ApiResult<Category> {
    require_admin(&actor)?;
    let category = state
        .categories()
        .update_parents(&id, body.parent_ids, Utc::now())
        .await?;
    Ok(ApiResponse::success(category))
}

fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden(ADMIN_REQUIRED))
    }
}
