//! # Handbook Web
//!
//! HTTP surface of the handbook tool.
//!
//! Handles:
//! - LTI 1.3 login, launch and JWKS endpoints (`/handbook/...`)
//! - The handbook page rendered after a launch
//! - JSON endpoints with OpenAPI/Swagger documentation
//!
//! The binary in the workspace root builds an [`AppState`] from the environment and serves
//! [`router`].

#![warn(rust_2018_idioms)]

pub mod api;
pub mod lti;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use handbook_core::{Assessment, GraduateCapability, HandbookRecord, HandbookStore, LearningOutcome};
use handbook_keys::JwkSet as ToolJwkSet;
use handbook_lti::LtiTool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: HandbookStore,
    pub lti: Arc<LtiTool>,
    /// The tool's own public keys, served from the JWKS endpoint.
    pub tool_keys: Arc<ToolJwkSet>,
    /// Client used to fetch platform key sets.
    pub http: reqwest::Client,
}

#[derive(OpenApi)]
#[openapi(
    paths(api::health, api::list_handbooks, api::get_handbook),
    components(schemas(
        api::HealthRes,
        api::HandbookListRes,
        HandbookRecord,
        LearningOutcome,
        GraduateCapability,
        Assessment
    ))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/handbook/test/", get(pages::test_page))
        .route(
            "/handbook/login/",
            get(lti::login_get).post(lti::login_post),
        )
        .route("/handbook/launch/", post(lti::launch))
        .route("/handbook/jwks/", get(lti::jwks))
        .route("/api/handbooks", get(api::list_handbooks))
        .route("/api/handbooks/:code", get(api::get_handbook))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
