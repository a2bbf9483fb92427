//! LTI 1.3 endpoints: OIDC login initiation, resource link launch and the tool's JWKS.

use crate::pages::render_handbook;
use crate::AppState;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Json, Redirect},
};
use handbook_keys::JwkSet as ToolJwkSet;
use handbook_lti::{keyset::platform_keys, LaunchClaims, LoginRequest, LtiResult};
use serde::Deserialize;

/// Form fields the platform POSTs to the launch URL.
#[derive(Debug, Default, Deserialize)]
pub struct LaunchForm {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub state: String,
}

fn login(state: &AppState, req: &LoginRequest) -> Result<Redirect, (StatusCode, &'static str)> {
    match state.lti.login_redirect(req) {
        Ok(url) => Ok(Redirect::to(url.as_str())),
        Err(e) => {
            tracing::warn!("LTI login rejected: {}", e);
            Err((StatusCode::BAD_REQUEST, "Invalid LTI login request"))
        }
    }
}

/// OIDC login initiation sent as a query string.
#[axum::debug_handler]
pub async fn login_get(
    State(state): State<AppState>,
    Query(req): Query<LoginRequest>,
) -> Result<Redirect, (StatusCode, &'static str)> {
    login(&state, &req)
}

/// OIDC login initiation sent as a form POST.
#[axum::debug_handler]
pub async fn login_post(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> Result<Redirect, (StatusCode, &'static str)> {
    login(&state, &req)
}

async fn validate(state: &AppState, form: &LaunchForm) -> LtiResult<LaunchClaims> {
    let registration = state.lti.registration_for(&form.id_token)?;
    let keys = platform_keys(registration, &state.http).await?;
    state.lti.validate_launch(&form.id_token, &form.state, &keys)
}

/// Resource link launch from the LMS.
///
/// Validates the launch, then renders the handbook for the course code in the context claim.
///
/// # Errors
///
/// Returns `403 Forbidden` if the launch cannot be validated, and `500 Internal Server Error` if
/// the handbook file cannot be read or the page cannot be rendered.
#[axum::debug_handler]
pub async fn launch(
    State(state): State<AppState>,
    Form(form): Form<LaunchForm>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    let claims = match validate(&state, &form).await {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("LTI launch rejected: {}", e);
            return Err((StatusCode::FORBIDDEN, "LTI launch could not be validated"));
        }
    };

    render_handbook(&state.store, claims.display_name(), claims.course_code())
}

/// The tool's public keys, for the platform's registration of this tool.
#[axum::debug_handler]
pub async fn jwks(State(state): State<AppState>) -> Json<ToolJwkSet> {
    Json(state.tool_keys.as_ref().clone())
}
