//! HTML pages rendered with askama.

use askama::Template;
use axum::{http::StatusCode, response::Html};
use handbook_core::{extract, HandbookRecord, HandbookStore};

/// Handbook page shown inside the LMS iframe after a launch.
#[derive(Template)]
#[template(path = "launch.html")]
pub struct LaunchTemplate<'a> {
    pub user_name: &'a str,
    pub course_code: &'a str,
    /// `None` renders the "no handbook found" message.
    pub handbook: Option<HandbookRecord>,
}

/// Smoke test page for checking the service is reachable.
#[axum::debug_handler]
pub async fn test_page() -> Html<&'static str> {
    Html("<h1>Hello from the handbook tool!</h1><p>Your handbook app is working.</p>")
}

/// Load, extract and render the handbook page for a course.
///
/// A course without a usable handbook document renders the "no handbook found" page.
///
/// # Errors
///
/// Returns `500 Internal Server Error` if:
/// - the handbook file exists but cannot be read,
/// - the template fails to render.
pub fn render_handbook(
    store: &HandbookStore,
    user_name: &str,
    course_code: &str,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    let document = store.load_optional(course_code).map_err(|e| {
        tracing::error!("Load handbook error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })?;

    let handbook = document.as_ref().and_then(extract);
    if handbook.is_none() {
        tracing::info!("no handbook available for {}", course_code);
    }

    let page = LaunchTemplate {
        user_name,
        course_code,
        handbook,
    };

    page.render().map(Html).map_err(|e| {
        tracing::error!("Render handbook error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })
}
