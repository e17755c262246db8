use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Options passed to `FB.init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitOptions {
    pub app_id: String,
    pub cookie: bool,
    pub xfbml: bool,
    pub version: String,
}

/// Options passed to `FB.login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOptions {
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LoginStatus {
    Connected,
    NotAuthorized,
    Unknown,
    /// Any status string the SDK reports that is not one of the above.
    #[strum(default)]
    Other(String),
}

impl LoginStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: LoginStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
}
