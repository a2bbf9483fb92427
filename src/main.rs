use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handbook_core::{HandbookConfig, HandbookStore, config::data_dir_from_env_value};
use handbook_keys::{DEFAULT_KEY_ID, Jwk, JwkSet};
use handbook_lti::{LaunchDataStorage, LtiSettings, LtiTool, ToolConfig};
use handbook_web::AppState;

/// Main entry point for the handbook tool
///
/// Serves the LTI endpoints, the handbook page and the JSON API on one address.
///
/// # Environment Variables
/// - `HANDBOOK_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `HANDBOOK_DATA_DIR`: Directory of `<COURSE_CODE>.json` handbooks (default: "handbook/data")
/// - `LTI_TOOL_CONFIG`: Platform registrations JSON (default: "handbook/lti_configs/canvas_config.json")
/// - `LTI_LAUNCH_URL`: Redirect URI sent to the platform at login
/// - `LTI_PUBLIC_KEY`: Tool public key served from the JWKS endpoint (optional)
/// - `LTI_KEY_ID`: Key id published with the public key (default: "handbook-lti-key")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist or the tool configuration cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("handbook=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HANDBOOK_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let data_dir = data_dir_from_env_value(std::env::var("HANDBOOK_DATA_DIR").ok());
    if !data_dir.exists() {
        anyhow::bail!("Handbook data directory does not exist: {}", data_dir.display());
    }
    let cfg = Arc::new(HandbookConfig::new(data_dir)?);

    let settings = LtiSettings::from_env_values(
        std::env::var("LTI_TOOL_CONFIG").ok(),
        std::env::var("LTI_LAUNCH_URL").ok(),
        std::env::var("LTI_PUBLIC_KEY").ok(),
        std::env::var("LTI_KEY_ID").ok(),
    );
    let tool_config = ToolConfig::from_json_file(&settings.tool_config)?;
    let key_id = settings.key_id.as_deref().unwrap_or(DEFAULT_KEY_ID);
    let tool_keys = load_tool_keys(&settings.public_key, key_id);

    tracing::info!("++ Handbook data from {}", cfg.data_dir().display());
    tracing::info!("++ LTI launch URL {}", settings.launch_url);

    let state = AppState {
        store: HandbookStore::new(cfg),
        lti: Arc::new(LtiTool::new(
            tool_config,
            LaunchDataStorage::default(),
            settings.launch_url,
        )),
        tool_keys: Arc::new(tool_keys),
        http: reqwest::Client::new(),
    };

    tracing::info!("++ Starting handbook tool on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, handbook_web::router(state)).await?;

    Ok(())
}

/// The tool's JWKS, or an empty set when no usable public key is configured.
fn load_tool_keys(path: &Path, key_id: &str) -> JwkSet {
    let pem_text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("No tool public key at {}: {}", path.display(), e);
            return JwkSet::default();
        }
    };

    match Jwk::from_public_key_pem(&pem_text, key_id) {
        Ok(jwk) => JwkSet::single(jwk),
        Err(e) => {
            tracing::warn!("Ignoring tool public key {}: {}", path.display(), e);
            JwkSet::default()
        }
    }
}
