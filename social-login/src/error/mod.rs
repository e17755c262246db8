use social_login_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page field not found: {0}")]
    MissingField(String),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid page location: {0}")]
    InvalidLocation(#[from] url::ParseError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Script error: {0}")]
    Script(String),
}

#[cfg(feature = "browser")]
impl From<wasm_bindgen::JsValue> for AppError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        AppError::Script(format!("{:?}", value))
    }
}
