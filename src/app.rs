use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::bulk::BulkExecutor;
use crate::catalog::CategoryService;
use crate::config::AppConfig;
use crate::database::SharedStore;
use crate::handlers::{protected, public};
use crate::middleware::require_actor;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: SharedStore, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn bulk(&self) -> BulkExecutor {
        BulkExecutor::new(self.store.clone())
    }

    pub fn categories(&self) -> CategoryService {
        CategoryService::new(self.store.clone(), self.config.bulk.category_page_size)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);
    let body_limit = state.config.api.max_request_size_bytes;
    let request_logging = state.config.api.enable_request_logging;

    let app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors);

    if request_logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{bulk, categories};

    Router::new()
        // One bulk endpoint per resource
        .route("/api/orders/bulk", post(bulk::orders))
        .route("/api/categories/bulk", post(bulk::categories))
        .route("/api/shops/bulk", post(bulk::shops))
        .route("/api/reviews/bulk", post(bulk::reviews))
        .route("/api/auctions/bulk", post(bulk::auctions))
        .route("/api/products/bulk", post(bulk::products))
        // Category hierarchy
        .route("/api/categories", get(categories::list).post(categories::create))
        .route("/api/categories/tree", get(categories::tree))
        .route("/api/categories/:id/parents", patch(categories::update_parents))
        .route_layer(from_fn_with_state(state, require_actor))
}

/// `*` anywhere in the list allows every origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
