use std::{env, path::Path};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::{token_expander::expand_tokens, ConfigError};

pub const RUN_MODE_VAR: &str = "RUN_MODE";
pub const ENV_PREFIX: &str = "SOCIAL_LOGIN_";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggerConfig {
    pub verbosity: Verbosity,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            verbosity: Verbosity::Info,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Verbosity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Authorization endpoints of the redirect-style providers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub google: String,
    pub github: String,
    pub linkedin: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            google: "https://accounts.google.com/o/oauth2/auth".to_string(),
            github: "https://github.com/login/oauth/authorize".to_string(),
            linkedin: "https://www.linkedin.com/uas/oauth2/authorization".to_string(),
        }
    }
}

/// How the Facebook client script is injected and initialized.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FacebookSdkSettings {
    pub script_id: String,
    pub script_src: String,
    pub version: String,
    pub cookie: bool,
    pub xfbml: bool,
}

impl Default for FacebookSdkSettings {
    fn default() -> Self {
        FacebookSdkSettings {
            script_id: "facebook-jssdk".to_string(),
            script_src: "//connect.facebook.net/en_US/sdk.js".to_string(),
            version: "v2.4".to_string(),
            cookie: true,
            xfbml: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SamlSettings {
    pub enabled: bool,
    pub path: String,
}

impl Default for SamlSettings {
    fn default() -> Self {
        SamlSettings {
            enabled: false,
            path: "/saml".to_string(),
        }
    }
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DispatcherSettings {
    pub endpoints: Endpoints,
    pub facebook: FacebookSdkSettings,
    pub saml: SamlSettings,
}

/// Values one provider contributes to the rendered login page.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderPage {
    pub callback_path: String,
    pub scope: String,
    pub client_id: Option<String>,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderPages {
    pub google: Option<ProviderPage>,
    pub facebook: Option<ProviderPage>,
    pub github: Option<ProviderPage>,
    pub linkedin: Option<ProviderPage>,
    pub saml: Option<ProviderPage>,
}

/// The server-rendered values of a login page: the hidden fields and the
/// buttons it carries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub location: String,
    pub base_url: String,
    pub oauth_state_token: String,
    pub providers: ProviderPages,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            location: "http://localhost/login".to_string(),
            base_url: "http://localhost/".to_string(),
            oauth_state_token: String::new(),
            providers: ProviderPages::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FacebookPreview {
    pub status: String,
    pub access_token: String,
}

impl Default for FacebookPreview {
    fn default() -> Self {
        FacebookPreview {
            status: "connected".to_string(),
            access_token: "preview-access-token".to_string(),
        }
    }
}

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    pub facebook: FacebookPreview,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub run_mode: String,
    pub logger: LoggerConfig,
    pub dispatcher: DispatcherSettings,
    pub page: PageConfig,
    pub preview: PreviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            run_mode: default_run_mode(),
            logger: LoggerConfig::default(),
            dispatcher: DispatcherSettings::default(),
            page: PageConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

fn default_run_mode() -> String {
    "dev".to_string()
}

impl Config {
    /// Loads the layered configuration found in `config_dir`, which is
    /// resolved against the current directory when relative.
    ///
    /// # Errors
    ///
    /// Returns an error when a layer cannot be parsed or does not match the
    /// configuration shape.
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = env::var(RUN_MODE_VAR).unwrap_or_else(|_| default_run_mode());
        let current_dir = env::current_dir().map_err(ConfigError::CurrentDir)?;
        let figment = Config::figment_with_paths(&current_dir.join(config_dir), &run_mode);

        let mut config: Config = figment.extract().map_err(Box::new)?;
        config.run_mode = run_mode;

        let config_value: Value = serde_json::to_value(&config)?;
        let replaced = expand_tokens(&config_value);
        serde_json::from_value(replaced).map_err(Into::into)
    }

    pub fn figment_with_paths(config_dir: &Path, run_mode: &str) -> Figment {
        let default_path = config_dir.join("default.toml");
        let local_path = config_dir.join("local.toml");
        let run_mode_path = config_dir.join(format!("{}.toml", run_mode));

        let mut figment = Figment::new().merge(Toml::file(default_path));

        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }
        if run_mode_path.exists() {
            figment = figment.merge(Toml::file(run_mode_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_match_the_login_page_contract() {
        let config = Config::default();
        assert_eq!(config.run_mode, "dev");
        assert_eq!(config.logger.verbosity, Verbosity::Info);
        assert_eq!(
            config.dispatcher.endpoints.google,
            "https://accounts.google.com/o/oauth2/auth"
        );
        assert_eq!(config.dispatcher.facebook.script_id, "facebook-jssdk");
        assert_eq!(
            config.dispatcher.facebook.script_src,
            "//connect.facebook.net/en_US/sdk.js"
        );
        assert_eq!(config.dispatcher.facebook.version, "v2.4");
        assert!(config.dispatcher.facebook.cookie);
        assert!(config.dispatcher.facebook.xfbml);
        assert!(!config.dispatcher.saml.enabled);
        assert_eq!(config.dispatcher.saml.path, "/saml");
    }

    #[test]
    fn test_deserialize_partial_page() {
        let json = r#"
        {
            "page": {
                "base_url": "https://example.com/",
                "oauth_state_token": "tok42",
                "providers": {
                    "google": {
                        "callback_path": "/oauth/google",
                        "scope": "email",
                        "client_id": "abc123"
                    }
                }
            }
        }"#;

        let config: Config = serde_json::from_str(json).expect("Failed to deserialize");
        let google = config.page.providers.google.expect("google page");
        assert_eq!(google.callback_path, "/oauth/google");
        assert_eq!(google.client_id.as_deref(), Some("abc123"));
        assert!(config.page.providers.github.is_none());
        assert_eq!(config.page.location, "http://localhost/login");
        assert_eq!(config.dispatcher, DispatcherSettings::default());
    }

    #[test]
    fn test_verbosity_from_str() {
        assert_eq!("Debug".parse::<Verbosity>().ok(), Some(Verbosity::Debug));
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_layers_merge_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [logger]
            verbosity = "Warn"

            [page]
            base_url = "https://default.example.com/"
            "#,
        )
        .expect("write default.toml");
        fs::write(
            dir.path().join("local.toml"),
            r#"
            [page]
            base_url = "https://local.example.com/"
            "#,
        )
        .expect("write local.toml");
        fs::write(
            dir.path().join("test.toml"),
            r#"
            [dispatcher.saml]
            enabled = true
            "#,
        )
        .expect("write test.toml");

        let config: Config = Config::figment_with_paths(dir.path(), "test")
            .extract()
            .expect("extract");
        assert_eq!(config.logger.verbosity, Verbosity::Warn);
        assert_eq!(config.page.base_url, "https://local.example.com/");
        assert!(config.dispatcher.saml.enabled);
        assert_eq!(config.dispatcher.saml.path, "/saml");
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/default.toml",
                r#"
                [page]
                base_url = "https://example.com/"
                oauth_state_token = "from-file"
                "#,
            )?;
            jail.set_env("SOCIAL_LOGIN_PAGE__OAUTH_STATE_TOKEN", "from-env");
            jail.set_env(RUN_MODE_VAR, "ci");

            let config = Config::load("config").expect("load");
            assert_eq!(config.run_mode, "ci");
            assert_eq!(config.page.base_url, "https://example.com/");
            assert_eq!(config.page.oauth_state_token, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_expands_tokens() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/default.toml",
                r#"
                [page]
                base_url = "https://example.com/"
                location = "${page.base_url}login?next=%2Fhome"
                "#,
            )?;

            let config = Config::load("config").expect("load");
            assert_eq!(config.page.location, "https://example.com/login?next=%2Fhome");
            Ok(())
        });
    }
}
