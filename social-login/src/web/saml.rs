/// Where the SAML button would send the page: a fixed path under the base
/// URL, which has already lost its trailing slash.
pub fn saml_login_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url, path)
}
