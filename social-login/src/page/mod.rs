//! The host surface the dispatcher runs against: the login page and the
//! Facebook client SDK loaded into it.

use crate::{
    core::{ClickHandler, LoginCallback},
    model::{AuthResponse, InitOptions, LoginOptions},
    AppError,
};

mod memory;
pub use memory::{MemoryPage, Navigation, RecordingSdk};

#[cfg(feature = "browser")]
mod browser;
#[cfg(feature = "browser")]
pub use browser::{start, BrowserFacebookSdk, BrowserPage};

/// A button found on the page. The handle is assigned by the page and only
/// means something to the page that returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub class: String,
    pub handle: usize,
}

#[derive(Debug, Default)]
pub struct ClickEvent {
    default_prevented: bool,
}

impl ClickEvent {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub trait Page {
    /// Current value of the input field with the given id.
    fn field_value(&self, id: &str) -> Option<String>;

    /// Every button carrying `class`, in document order. A button keeps the
    /// same handle across calls.
    fn buttons(&self, class: &str) -> Vec<Button>;

    fn attribute(&self, button: &Button, name: &str) -> Option<String>;

    /// # Errors
    ///
    /// Fails when the host cannot register the listener.
    fn on_click(&self, button: &Button, handler: ClickHandler) -> Result<(), AppError>;

    /// Query part of the current location including the leading `?`, or an
    /// empty string.
    fn location_search(&self) -> String;

    /// Navigates to `url` without adding a history entry.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the navigation.
    fn replace_location(&self, url: &str) -> Result<(), AppError>;

    fn has_element(&self, id: &str) -> bool;

    /// Adds an async script element with the given id and source ahead of the
    /// first script of the page.
    ///
    /// # Errors
    ///
    /// Fails when the element cannot be created or inserted.
    fn insert_script(&self, id: &str, src: &str) -> Result<(), AppError>;
}

/// The calls the dispatcher makes on the Facebook client SDK.
pub trait FacebookSdk {
    /// # Errors
    ///
    /// Fails when the SDK is not loaded yet.
    fn init(&self, options: &InitOptions) -> Result<(), AppError>;

    /// Starts an interactive login and returns without waiting for it.
    /// `on_complete` is called once when the user finishes the dialog.
    ///
    /// # Errors
    ///
    /// Fails when the SDK is not loaded yet.
    fn login(&self, on_complete: LoginCallback, options: &LoginOptions) -> Result<(), AppError>;

    fn auth_response(&self) -> Option<AuthResponse>;
}
