mod config;
mod error;
mod token_expander;

pub use {
    config::{
        Config, DispatcherSettings, Endpoints, FacebookPreview, FacebookSdkSettings,
        LoggerConfig, PageConfig, PreviewConfig, ProviderPage, ProviderPages, SamlSettings,
        Verbosity, ENV_PREFIX, RUN_MODE_VAR,
    },
    error::ConfigError,
    token_expander::expand_tokens,
};
