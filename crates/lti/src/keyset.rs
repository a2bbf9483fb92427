//! Platform signing keys.

use crate::{LtiError, LtiResult, Registration};
use jsonwebtoken::jwk::JwkSet;

/// Resolve the key set used to verify a platform's id_tokens.
///
/// Inline `key_set` wins; otherwise the set is fetched from `key_set_url` on every call.
///
/// # Errors
///
/// Returns [`LtiError::KeyFetch`] if the request fails or the response is not a key set.
pub async fn platform_keys(
    registration: &Registration,
    http: &reqwest::Client,
) -> LtiResult<JwkSet> {
    if let Some(key_set) = &registration.key_set {
        return Ok(key_set.clone());
    }

    let Some(url) = registration.key_set_url.as_deref() else {
        return Err(LtiError::InvalidConfig(format!(
            "registration {} has no platform keys",
            registration.client_id
        )));
    };

    tracing::debug!("fetching platform key set from {}", url);
    let key_set = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await?;

    Ok(key_set)
}
