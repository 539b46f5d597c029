//! HTTP API Layer
//!
//! This crate provides the REST API for the tax filing portal using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **Middleware**: Authentication, role extraction, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig, Services};
//!
//! let app = create_router(Services::in_memory(), ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_billing::BillingService;
use domain_filing::FilingService;
use domain_notify::NotifyService;
use domain_requests::RequestService;
use domain_review::ReviewEngine;
use infra_store::{
    DatabasePool, MemoryBillStore, MemoryNotificationStore, MemoryRequestStore, MemoryReturnStore,
    PgBillStore, PgNotificationStore, PgRequestStore, PgReturnStore,
};

use crate::config::ApiConfig;
use crate::handlers::{bills, health, notify, requests, returns, review};
use crate::middleware::{audit_middleware, auth_middleware};

/// The wired domain services behind the handlers
///
/// Construction picks the storage backend; everything above this type is
/// backend-agnostic.
pub struct Services {
    pub filing: FilingService,
    pub requests: RequestService,
    pub billing: BillingService,
    pub review: ReviewEngine,
    pub notify: Arc<NotifyService>,
}

impl Services {
    /// Wires every service against the in-memory store
    pub fn in_memory() -> Self {
        let returns = Arc::new(MemoryReturnStore::new());
        let request_store = Arc::new(MemoryRequestStore::new());
        let bills = Arc::new(MemoryBillStore::new());
        let notify = Arc::new(NotifyService::new(Arc::new(MemoryNotificationStore::new())));

        Self {
            filing: FilingService::new(returns.clone(), notify.clone()),
            requests: RequestService::new(request_store, notify.clone()),
            billing: BillingService::new(bills, notify.clone()),
            review: ReviewEngine::new(returns, notify.clone()),
            notify,
        }
    }

    /// Wires every service against PostgreSQL
    pub fn postgres(pool: DatabasePool) -> Self {
        let returns = Arc::new(PgReturnStore::new(pool.clone()));
        let request_store = Arc::new(PgRequestStore::new(pool.clone()));
        let bills = Arc::new(PgBillStore::new(pool.clone()));
        let notify = Arc::new(NotifyService::new(Arc::new(PgNotificationStore::new(pool))));

        Self {
            filing: FilingService::new(returns.clone(), notify.clone()),
            requests: RequestService::new(request_store, notify.clone()),
            billing: BillingService::new(bills, notify.clone()),
            review: ReviewEngine::new(returns, notify.clone()),
            notify,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(services: Services, config: ApiConfig) -> Router {
    let state = AppState {
        services: Arc::new(services),
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Tax return routes
    let return_routes = Router::new()
        .route("/", post(returns::create_draft))
        .route("/", get(returns::list_returns))
        .route("/:id", get(returns::get_return))
        .route("/:id/documents", post(returns::attach_document))
        .route("/:id/income", put(returns::update_income))
        .route("/:id/declaration", post(returns::acknowledge_declaration))
        .route("/:id/submit", post(returns::submit))
        .route("/:id/review", post(returns::begin_review))
        .route("/:id/verification", post(returns::verify))
        .route("/:id/assessment", post(returns::record_assessment));

    // FBR review routes
    let review_routes = Router::new()
        .route("/queue", get(review::queue))
        .route("/:id/context", get(review::review_context))
        .route("/:id/take-up", post(review::take_up))
        .route("/:id/decision", post(review::decide));

    // Info request routes
    let request_routes = Router::new()
        .route("/", post(requests::open_request))
        .route("/", get(requests::list_requests))
        .route("/:id", get(requests::get_request))
        .route("/:id/replies", post(requests::reply))
        .route("/:id/resolve", post(requests::resolve))
        .route("/:id/close", post(requests::close));

    // Billing routes
    let bill_routes = Router::new()
        .route("/", post(bills::generate_bill))
        .route("/", get(bills::list_bills))
        .route("/:id", get(bills::get_bill))
        .route("/:id/pay", post(bills::pay_bill))
        .route("/:id/cancel", post(bills::cancel_bill));

    // Notification routes
    let notify_routes = Router::new()
        .route("/", get(notify::list_feed))
        .route("/unread-count", get(notify::unread_count))
        .route("/:id/read", post(notify::mark_read));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/returns", return_routes)
        .nest("/review", review_routes)
        .nest("/requests", request_routes)
        .nest("/bills", bill_routes)
        .nest("/notifications", notify_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
