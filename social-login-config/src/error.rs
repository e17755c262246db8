#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("Failed to expand configuration tokens: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to get current directory: {0}")]
    CurrentDir(std::io::Error),
}
