use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use derivative::Derivative;
use social_login_config::DispatcherSettings;
use tracing::{debug, info};

use crate::{
    core::{SharedPage, SharedSdk},
    model::Provider,
    AppError,
};

use super::{
    binder::bind_buttons,
    oauth2::{
        bootstrap_sdk, facebook_login, github_authorization_url, google_authorization_url,
        linkedin_authorization_url,
    },
    reader::PageConfigReader,
    saml::saml_login_url,
};

#[derive(Derivative)]
#[derivative(Debug)]
struct Inner {
    #[derivative(Debug = "ignore")]
    page: SharedPage,
    #[derivative(Debug = "ignore")]
    sdk: SharedSdk,
    settings: DispatcherSettings,
    sdk_injected: Cell<bool>,
    bound: Cell<bool>,
}

/// Sends the login page to the identity provider whose button was clicked.
///
/// One dispatcher lives for one page load. It owns the flag recording that
/// the Facebook SDK has been injected into that page.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    inner: Rc<Inner>,
}

/// A dispatcher reference held by click handlers, so that the page's handler
/// table does not keep the dispatcher alive.
#[derive(Debug, Clone)]
pub(crate) struct WeakDispatcher {
    inner: Weak<Inner>,
}

impl WeakDispatcher {
    pub(crate) fn upgrade(&self) -> Option<Dispatcher> {
        self.inner.upgrade().map(|inner| Dispatcher { inner })
    }
}

impl Dispatcher {
    pub fn new(page: SharedPage, sdk: SharedSdk, settings: DispatcherSettings) -> Self {
        Self {
            inner: Rc::new(Inner {
                page,
                sdk,
                settings,
                sdk_injected: Cell::new(false),
                bound: Cell::new(false),
            }),
        }
    }

    /// Script-load work: injects the Facebook SDK and binds the provider
    /// buttons. Returns the number of buttons bound.
    ///
    /// # Errors
    ///
    /// Fails when the host page rejects the script or a listener.
    pub fn start(&self) -> Result<usize, AppError> {
        self.bootstrap_facebook_sdk()?;
        self.bind()
    }

    /// # Errors
    ///
    /// Fails when the host page rejects the script element.
    pub fn bootstrap_facebook_sdk(&self) -> Result<bool, AppError> {
        bootstrap_sdk(
            self.inner.page.as_ref(),
            &self.inner.settings.facebook,
            &self.inner.sdk_injected,
        )
    }

    pub fn sdk_injected(&self) -> bool {
        self.inner.sdk_injected.get()
    }

    /// Binds every provider button currently on the page. Only the first call
    /// binds anything; buttons added afterwards stay unbound.
    ///
    /// # Errors
    ///
    /// Fails when the host page rejects a listener.
    pub fn bind(&self) -> Result<usize, AppError> {
        if self.inner.bound.replace(true) {
            debug!("Login buttons already bound");
            return Ok(0);
        }
        bind_buttons(self)
    }

    /// Starts a login with `provider`, using `id` as its client or app id.
    ///
    /// # Errors
    ///
    /// Fails when a page field the provider needs is missing or the host
    /// rejects the navigation.
    pub fn login(&self, provider: Provider, id: &str) -> Result<(), AppError> {
        match provider {
            Provider::Google => self.google_login(id),
            Provider::Facebook => self.facebook_login(id),
            Provider::Github => self.github_login(id),
            Provider::Linkedin => self.linkedin_login(id),
            Provider::Saml if self.inner.settings.saml.enabled => self.saml_login(),
            Provider::Saml => {
                debug!("SAML login is disabled");
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Fails when a page field is missing or the navigation is rejected.
    pub fn google_login(&self, client_id: &str) -> Result<(), AppError> {
        let reader = self.reader();
        let url = google_authorization_url(
            &self.inner.settings.endpoints.google,
            client_id,
            &reader.scope(Provider::Google)?,
            &reader.callback_url(Provider::Google)?,
        );
        self.redirect(Provider::Google, &url)
    }

    /// # Errors
    ///
    /// Fails when a page field is missing or the navigation is rejected.
    pub fn github_login(&self, client_id: &str) -> Result<(), AppError> {
        let reader = self.reader();
        let url = github_authorization_url(
            &self.inner.settings.endpoints.github,
            client_id,
            &reader.scope(Provider::Github)?,
            &reader.callback_url(Provider::Github)?,
        );
        self.redirect(Provider::Github, &url)
    }

    /// # Errors
    ///
    /// Fails when a page field is missing or the navigation is rejected.
    pub fn linkedin_login(&self, client_id: &str) -> Result<(), AppError> {
        let reader = self.reader();
        let url = linkedin_authorization_url(
            &self.inner.settings.endpoints.linkedin,
            client_id,
            &reader.scope(Provider::Linkedin)?,
            &reader.callback_url(Provider::Linkedin)?,
            &reader.oauth_state_token()?,
        );
        self.redirect(Provider::Linkedin, &url)
    }

    /// Opens the Facebook login dialog. The page only moves once the SDK
    /// reports a connected login.
    ///
    /// # Errors
    ///
    /// Fails when the scope field is missing or the SDK is not loaded.
    pub fn facebook_login(&self, app_id: &str) -> Result<(), AppError> {
        facebook_login(
            &self.inner.page,
            &self.inner.sdk,
            &self.inner.settings.facebook,
            app_id,
        )
    }

    /// Redirects to the SAML entry point under the base URL, whether or not
    /// SAML buttons are enabled.
    ///
    /// # Errors
    ///
    /// Fails when the base URL field is missing or the navigation is rejected.
    pub fn saml_login(&self) -> Result<(), AppError> {
        let url = saml_login_url(&self.reader().base_url()?, &self.inner.settings.saml.path);
        self.redirect(Provider::Saml, &url)
    }

    pub(crate) fn page(&self) -> &SharedPage {
        &self.inner.page
    }

    pub(crate) fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn reader(&self) -> PageConfigReader<'_> {
        PageConfigReader::new(self.inner.page.as_ref())
    }

    fn redirect(&self, provider: Provider, url: &str) -> Result<(), AppError> {
        info!("Redirecting to {} login", provider);
        debug!("Authorization URL: {}", url);
        self.inner.page.replace_location(url)
    }
}

#[cfg(test)]
mod tests {
    use social_login_config::SamlSettings;

    use crate::page::{MemoryPage, RecordingSdk};

    use super::*;

    fn page() -> Rc<MemoryPage> {
        Rc::new(
            MemoryPage::new("https://example.com/login")
                .unwrap()
                .with_field("baseUrl", "https://example.com/")
                .with_field("oauthStateToken", "tok42")
                .with_field("googleCallbackUri", "/oauth/google")
                .with_field("googleScope", "email")
                .with_field("githubCallbackUri", "/oauth/github")
                .with_field("githubScope", "user")
                .with_field("linkedinCallbackUri", "/oauth/linkedin")
                .with_field("linkedinScope", "r_basicprofile"),
        )
    }

    fn dispatcher(page: &Rc<MemoryPage>, settings: DispatcherSettings) -> Dispatcher {
        Dispatcher::new(page.clone(), Rc::new(RecordingSdk::builder().build()), settings)
    }

    #[test]
    fn test_google_login() {
        let page = page();
        dispatcher(&page, DispatcherSettings::default())
            .google_login("abc123")
            .unwrap();

        let navigations = page.navigations();
        assert_eq!(navigations.len(), 1);
        assert!(navigations[0].replace);
        assert_eq!(
            navigations[0].url,
            "https://accounts.google.com/o/oauth2/auth?response_type=code&client_id=abc123&scope=email&redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fgoogle"
        );
    }

    #[test]
    fn test_github_login() {
        let page = page();
        dispatcher(&page, DispatcherSettings::default())
            .github_login("xyz")
            .unwrap();

        assert_eq!(
            page.last_navigation().as_deref(),
            Some("https://github.com/login/oauth/authorize?client_id=xyz&scope=user&redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fgithub")
        );
    }

    #[test]
    fn test_linkedin_login_appends_raw_state() {
        let page = page();
        dispatcher(&page, DispatcherSettings::default())
            .linkedin_login("li1")
            .unwrap();

        let url = page.last_navigation().unwrap();
        assert!(url.starts_with("https://www.linkedin.com/uas/oauth2/authorization?client_id=li1&response_type=code&scope=r_basicprofile&redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Flinkedin"));
        assert!(url.ends_with("&state=tok42"));
    }

    #[test]
    fn test_login_with_custom_endpoint() {
        let page = page();
        let mut settings = DispatcherSettings::default();
        settings.endpoints.github = "https://github.example.com/login/oauth/authorize".to_string();

        dispatcher(&page, settings).login(Provider::Github, "xyz").unwrap();

        assert!(page
            .last_navigation()
            .unwrap()
            .starts_with("https://github.example.com/login/oauth/authorize?client_id=xyz&"));
    }

    #[test]
    fn test_missing_scope_does_not_navigate() {
        let page = page();
        page.remove_field("googleScope");

        let result = dispatcher(&page, DispatcherSettings::default()).google_login("abc123");

        assert!(matches!(result, Err(AppError::MissingField(id)) if id == "googleScope"));
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_saml_disabled_by_default() {
        let page = page();
        dispatcher(&page, DispatcherSettings::default())
            .login(Provider::Saml, "")
            .unwrap();

        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_saml_enabled() {
        let page = page();
        let settings = DispatcherSettings {
            saml: SamlSettings {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };

        dispatcher(&page, settings).login(Provider::Saml, "").unwrap();

        assert_eq!(
            page.last_navigation().as_deref(),
            Some("https://example.com/saml")
        );
    }

    #[test]
    fn test_bootstrap_twice_inserts_once() {
        let page = page();
        let dispatcher = dispatcher(&page, DispatcherSettings::default());
        assert!(!dispatcher.sdk_injected());

        assert!(dispatcher.bootstrap_facebook_sdk().unwrap());
        assert!(!dispatcher.bootstrap_facebook_sdk().unwrap());

        assert!(dispatcher.sdk_injected());
        assert_eq!(page.scripts().len(), 1);
    }
}
