use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub const BASE_URL_FIELD: &str = "baseUrl";
pub const OAUTH_STATE_TOKEN_FIELD: &str = "oauthStateToken";

/// The identity providers a login page can carry a button for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
    Github,
    Linkedin,
    Saml,
}

impl Provider {
    /// Class of the button(s) that start a login with this provider.
    pub const fn button_class(self) -> &'static str {
        match self {
            Self::Google => "btn-google",
            Self::Facebook => "btn-facebook",
            Self::Github => "btn-github",
            Self::Linkedin => "btn-linkedin",
            Self::Saml => "btn-saml",
        }
    }

    /// Id of the field holding the callback path, `None` for SAML which
    /// redirects to a fixed path under the base URL.
    pub const fn callback_field(self) -> Option<&'static str> {
        match self {
            Self::Google => Some("googleCallbackUri"),
            Self::Facebook => Some("facebookCallbackUri"),
            Self::Github => Some("githubCallbackUri"),
            Self::Linkedin => Some("linkedinCallbackUri"),
            Self::Saml => None,
        }
    }

    pub const fn scope_field(self) -> Option<&'static str> {
        match self {
            Self::Google => Some("googleScope"),
            Self::Facebook => Some("facebookScope"),
            Self::Github => Some("githubScope"),
            Self::Linkedin => Some("linkedinScope"),
            Self::Saml => None,
        }
    }
}
