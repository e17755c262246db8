use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    model::{Provider, BASE_URL_FIELD, OAUTH_STATE_TOKEN_FIELD},
    page::Page,
    AppError,
};

lazy_static! {
    static ref TRAILING_SLASH: Regex = Regex::new("/$").expect("valid trailing slash regex");
}

/// Reads the configuration the server rendered into the login page. Every
/// accessor goes back to the page, so a field edited after load is seen on
/// the next call.
pub struct PageConfigReader<'a> {
    page: &'a dyn Page,
}

impl<'a> PageConfigReader<'a> {
    pub fn new(page: &'a dyn Page) -> Self {
        Self { page }
    }

    /// # Errors
    ///
    /// Returns [`AppError::MissingField`] when the page has no base URL field.
    pub fn base_url(&self) -> Result<String, AppError> {
        let raw = self.field(BASE_URL_FIELD)?;
        Ok(strip_trailing_slash(&raw))
    }

    /// Base URL followed by the provider's callback path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingField`] when either field is absent, or the
    /// provider has no callback field.
    pub fn callback_url(&self, provider: Provider) -> Result<String, AppError> {
        let field = provider
            .callback_field()
            .ok_or_else(|| AppError::MissingField(format!("{}CallbackUri", provider)))?;
        Ok(format!("{}{}", self.base_url()?, self.field(field)?))
    }

    /// Raw scope value; callers encode it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingField`] when the scope field is absent.
    pub fn scope(&self, provider: Provider) -> Result<String, AppError> {
        let field = provider
            .scope_field()
            .ok_or_else(|| AppError::MissingField(format!("{}Scope", provider)))?;
        self.field(field)
    }

    /// # Errors
    ///
    /// Returns [`AppError::MissingField`] when the state token field is absent.
    pub fn oauth_state_token(&self) -> Result<String, AppError> {
        self.field(OAUTH_STATE_TOKEN_FIELD)
    }

    fn field(&self, id: &str) -> Result<String, AppError> {
        self.page
            .field_value(id)
            .ok_or_else(|| AppError::MissingField(id.to_string()))
    }
}

/// Removes one trailing slash, leaving any others in place.
pub fn strip_trailing_slash(url: &str) -> String {
    TRAILING_SLASH.replace(url, "").into_owned()
}
