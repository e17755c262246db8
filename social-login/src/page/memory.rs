use std::{cell::RefCell, collections::HashMap, rc::Rc};

use derivative::Derivative;
use social_login_config::{PageConfig, ProviderPage};
use strum::IntoEnumIterator;
use tracing::debug;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    core::{ClickHandler, LoginCallback},
    model::{
        AuthResponse, InitOptions, LoginOptions, LoginResponse, LoginStatus, Provider,
        BASE_URL_FIELD, OAUTH_STATE_TOKEN_FIELD,
    },
    AppError,
};

use super::{Button, ClickEvent, FacebookSdk, Page};

/// A navigation the page was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    pub replace: bool,
}

#[derive(Debug, Clone)]
struct ButtonEntry {
    class: String,
    attributes: HashMap<String, String>,
}

/// A login page held in memory. Navigations and injected scripts are
/// recorded instead of performed, and clicks are driven by [`MemoryPage::click`].
#[derive(Derivative)]
#[derivative(Debug)]
pub struct MemoryPage {
    location: Url,
    fields: RefCell<HashMap<String, String>>,
    buttons: RefCell<Vec<ButtonEntry>>,
    elements: RefCell<Vec<String>>,
    scripts: RefCell<Vec<(String, String)>>,
    navigations: RefCell<Vec<Navigation>>,
    #[derivative(Debug = "ignore")]
    handlers: RefCell<Vec<(usize, Rc<dyn Fn(&mut ClickEvent)>)>>,
}

impl MemoryPage {
    /// # Errors
    ///
    /// Fails when `location` is not an absolute URL.
    pub fn new(location: &str) -> Result<Self, AppError> {
        Ok(Self {
            location: Url::parse(location)?,
            fields: RefCell::default(),
            buttons: RefCell::default(),
            elements: RefCell::default(),
            scripts: RefCell::default(),
            navigations: RefCell::default(),
            handlers: RefCell::default(),
        })
    }

    /// Renders the hidden fields and buttons described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the configured location is not an absolute URL.
    pub fn from_page_config(config: &PageConfig) -> Result<Self, AppError> {
        let page = Self::new(&config.location)?
            .with_field(BASE_URL_FIELD, &config.base_url)
            .with_field(OAUTH_STATE_TOKEN_FIELD, &config.oauth_state_token);

        let page = Provider::iter().fold(page, |page, provider| {
            match provider_page(config, provider) {
                Some(values) => page.with_provider(provider, values),
                None => page,
            }
        });

        debug!("Rendered in-memory login page: {:?}", page);
        Ok(page)
    }

    fn with_provider(self, provider: Provider, values: &ProviderPage) -> Self {
        let page = match provider.callback_field() {
            Some(field) => self.with_field(field, &values.callback_path),
            None => self,
        };
        let page = match provider.scope_field() {
            Some(field) => page.with_field(field, &values.scope),
            None => page,
        };
        page.with_button(provider.button_class(), values.client_id.as_deref())
    }

    #[must_use]
    pub fn with_field(self, id: &str, value: &str) -> Self {
        self.set_field(id, value);
        self
    }

    #[must_use]
    pub fn with_button(self, class: &str, id: Option<&str>) -> Self {
        self.add_button(class, id);
        self
    }

    #[must_use]
    pub fn with_element(self, id: &str) -> Self {
        self.elements.borrow_mut().push(id.to_string());
        self
    }

    pub fn set_field(&self, id: &str, value: &str) {
        self.fields
            .borrow_mut()
            .insert(id.to_string(), value.to_string());
    }

    pub fn remove_field(&self, id: &str) {
        self.fields.borrow_mut().remove(id);
    }

    /// Adds a button after the page has been bound; used to check that late
    /// buttons stay unbound.
    pub fn add_button(&self, class: &str, id: Option<&str>) -> Button {
        let mut buttons = self.buttons.borrow_mut();
        let mut attributes = HashMap::new();
        if let Some(id) = id {
            attributes.insert("id".to_string(), id.to_string());
        }
        buttons.push(ButtonEntry {
            class: class.to_string(),
            attributes,
        });
        Button {
            class: class.to_string(),
            handle: buttons.len() - 1,
        }
    }

    /// Runs every handler bound to the button and returns the event they saw.
    pub fn click(&self, button: &Button) -> ClickEvent {
        let bound: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(handle, _)| *handle == button.handle)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        let mut event = ClickEvent::default();
        for handler in bound {
            handler(&mut event);
        }
        event
    }

    pub fn bound_handlers(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        self.navigations.borrow().clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().map(|n| n.url.clone())
    }

    pub fn scripts(&self) -> Vec<(String, String)> {
        self.scripts.borrow().clone()
    }
}

fn provider_page(config: &PageConfig, provider: Provider) -> Option<&ProviderPage> {
    let providers = &config.providers;
    match provider {
        Provider::Google => providers.google.as_ref(),
        Provider::Facebook => providers.facebook.as_ref(),
        Provider::Github => providers.github.as_ref(),
        Provider::Linkedin => providers.linkedin.as_ref(),
        Provider::Saml => providers.saml.as_ref(),
    }
}

impl Page for MemoryPage {
    fn field_value(&self, id: &str) -> Option<String> {
        self.fields.borrow().get(id).cloned()
    }

    fn buttons(&self, class: &str) -> Vec<Button> {
        self.buttons
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.class == class)
            .map(|(handle, entry)| Button {
                class: entry.class.clone(),
                handle,
            })
            .collect()
    }

    fn attribute(&self, button: &Button, name: &str) -> Option<String> {
        self.buttons
            .borrow()
            .get(button.handle)
            .and_then(|entry| entry.attributes.get(name).cloned())
    }

    fn on_click(&self, button: &Button, handler: ClickHandler) -> Result<(), AppError> {
        self.handlers
            .borrow_mut()
            .push((button.handle, Rc::from(handler)));
        Ok(())
    }

    fn location_search(&self) -> String {
        self.location
            .query()
            .map(|query| format!("?{}", query))
            .unwrap_or_default()
    }

    fn replace_location(&self, url: &str) -> Result<(), AppError> {
        self.navigations.borrow_mut().push(Navigation {
            url: url.to_string(),
            replace: true,
        });
        Ok(())
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().iter().any(|element| element == id)
    }

    fn insert_script(&self, id: &str, src: &str) -> Result<(), AppError> {
        self.elements.borrow_mut().push(id.to_string());
        self.scripts
            .borrow_mut()
            .push((id.to_string(), src.to_string()));
        Ok(())
    }
}

/// A stand-in for the Facebook SDK that records every call and holds login
/// completions until [`RecordingSdk::complete_logins`] is called, the way the
/// real SDK answers once the user closes its dialog.
#[derive(Derivative, TypedBuilder)]
#[derivative(Debug)]
pub struct RecordingSdk {
    #[builder(default = LoginStatus::Connected)]
    status: LoginStatus,
    #[builder(default, setter(strip_option, into))]
    access_token: Option<String>,
    #[builder(default = true)]
    loaded: bool,
    #[builder(default)]
    inits: RefCell<Vec<InitOptions>>,
    #[builder(default)]
    logins: RefCell<Vec<LoginOptions>>,
    #[builder(default)]
    #[derivative(Debug = "ignore")]
    pending: RefCell<Vec<LoginCallback>>,
}

impl RecordingSdk {
    /// Answers every login still waiting, each exactly once. Returns how many
    /// were answered.
    pub fn complete_logins(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for on_complete in pending {
            on_complete(LoginResponse {
                status: self.status.clone(),
            });
        }
        count
    }

    pub fn inits(&self) -> Vec<InitOptions> {
        self.inits.borrow().clone()
    }

    pub fn logins(&self) -> Vec<LoginOptions> {
        self.logins.borrow().clone()
    }

    pub fn pending_logins(&self) -> usize {
        self.pending.borrow().len()
    }

    fn ensure_loaded(&self) -> Result<(), AppError> {
        if self.loaded {
            Ok(())
        } else {
            Err(AppError::Script("FB is not defined".to_string()))
        }
    }
}

impl FacebookSdk for RecordingSdk {
    fn init(&self, options: &InitOptions) -> Result<(), AppError> {
        self.ensure_loaded()?;
        self.inits.borrow_mut().push(options.clone());
        Ok(())
    }

    fn login(&self, on_complete: LoginCallback, options: &LoginOptions) -> Result<(), AppError> {
        self.ensure_loaded()?;
        self.logins.borrow_mut().push(options.clone());
        self.pending.borrow_mut().push(on_complete);
        Ok(())
    }

    fn auth_response(&self) -> Option<AuthResponse> {
        self.access_token.clone().map(|access_token| AuthResponse { access_token })
    }
}
