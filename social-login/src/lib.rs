mod core;
mod error;
pub mod model;
pub mod page;
pub mod preview;
mod util;
mod web;

pub use crate::core::*;

pub use {
    error::AppError,
    social_login_config as config,
    tracing,
    util::TracingLogger,
    web::{oauth2, saml_login_url, strip_trailing_slash, Dispatcher, PageConfigReader},
};
