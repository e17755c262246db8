use super::encode_uri_component;

// Parameter order is part of the contract with each provider; keep it.

pub fn google_authorization_url(
    endpoint: &str,
    client_id: &str,
    scope: &str,
    callback_url: &str,
) -> String {
    format!(
        "{}?response_type=code&client_id={}&scope={}&redirect_uri={}",
        endpoint,
        client_id,
        encode_uri_component(scope),
        encode_uri_component(callback_url)
    )
}

pub fn github_authorization_url(
    endpoint: &str,
    client_id: &str,
    scope: &str,
    callback_url: &str,
) -> String {
    format!(
        "{}?client_id={}&scope={}&redirect_uri={}",
        endpoint,
        client_id,
        encode_uri_component(scope),
        encode_uri_component(callback_url)
    )
}

/// The state token goes in as it was rendered, without encoding. Providers
/// have been receiving it that way, so a token with reserved characters
/// produces the same URL it always has.
pub fn linkedin_authorization_url(
    endpoint: &str,
    client_id: &str,
    scope: &str,
    callback_url: &str,
    state_token: &str,
) -> String {
    format!(
        "{}?client_id={}&response_type=code&scope={}&redirect_uri={}&state={}",
        endpoint,
        client_id,
        encode_uri_component(scope),
        encode_uri_component(callback_url),
        state_token
    )
}
