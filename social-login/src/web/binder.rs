use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::{model::Provider, page::ClickEvent, AppError};

use super::dispatcher::Dispatcher;

/// Registers a click handler on every provider button now on the page.
///
/// Each handler reads the `id` of its own button when clicked, so several
/// buttons of one provider can carry different client ids. Errors raised
/// while handling a click are logged and the page stays where it is.
pub(super) fn bind_buttons(dispatcher: &Dispatcher) -> Result<usize, AppError> {
    let page = dispatcher.page();
    let mut bound = 0;

    for provider in Provider::iter() {
        for button in page.buttons(provider.button_class()) {
            let weak = dispatcher.downgrade();
            let target = button.clone();

            page.on_click(
                &button,
                Box::new(move |event: &mut ClickEvent| {
                    event.prevent_default();

                    let Some(dispatcher) = weak.upgrade() else {
                        return;
                    };
                    let id = dispatcher
                        .page()
                        .attribute(&target, "id")
                        .unwrap_or_default();

                    debug!("{} login button clicked", provider);
                    if let Err(e) = dispatcher.login(provider, &id) {
                        warn!("{} login failed: {}", provider, e);
                    }
                }),
            )?;
            bound += 1;
        }
    }

    debug!("Bound {} login buttons", bound);
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use social_login_config::DispatcherSettings;

    use crate::page::{MemoryPage, Page, RecordingSdk};

    use super::*;

    fn login_page() -> Rc<MemoryPage> {
        Rc::new(
            MemoryPage::new("https://example.com/login?next=%2Fhome")
                .unwrap()
                .with_field("baseUrl", "https://example.com/")
                .with_field("oauthStateToken", "tok42")
                .with_field("googleCallbackUri", "/oauth/google")
                .with_field("googleScope", "email")
                .with_field("githubCallbackUri", "/oauth/github")
                .with_field("githubScope", "user")
                .with_field("facebookCallbackUri", "/oauth/facebook")
                .with_field("facebookScope", "email")
                .with_button("btn-google", Some("abc123"))
                .with_button("btn-github", Some("xyz"))
                .with_button("btn-facebook", Some("fb-app"))
                .with_button("btn-saml", None),
        )
    }

    fn start(page: &Rc<MemoryPage>, sdk: &Rc<RecordingSdk>) -> Dispatcher {
        let dispatcher = Dispatcher::new(page.clone(), sdk.clone(), DispatcherSettings::default());
        dispatcher.start().unwrap();
        dispatcher
    }

    #[test]
    fn test_binds_every_provider_button() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        let _dispatcher = start(&page, &sdk);

        assert_eq!(page.bound_handlers(), 4);
        assert_eq!(page.scripts().len(), 1);
    }

    #[test]
    fn test_click_prevents_default_and_redirects() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        let _dispatcher = start(&page, &sdk);

        let button = &page.buttons("btn-google")[0];
        let event = page.click(button);

        assert!(event.is_default_prevented());
        assert_eq!(
            page.last_navigation().as_deref(),
            Some("https://accounts.google.com/o/oauth2/auth?response_type=code&client_id=abc123&scope=email&redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fgoogle")
        );
    }

    #[test]
    fn test_double_click_logs_in_twice() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        let _dispatcher = start(&page, &sdk);

        let button = &page.buttons("btn-github")[0];
        page.click(button);
        page.click(button);

        let navigations = page.navigations();
        assert_eq!(navigations.len(), 2);
        assert_eq!(navigations[0], navigations[1]);
    }

    #[test]
    fn test_each_button_uses_its_own_id() {
        let page = login_page();
        page.add_button("btn-github", Some("second-app"));
        let sdk = Rc::new(RecordingSdk::builder().build());
        let _dispatcher = start(&page, &sdk);

        let buttons = page.buttons("btn-github");
        assert_eq!(buttons.len(), 2);

        page.click(&buttons[1]);
        page.click(&buttons[0]);

        let urls: Vec<_> = page.navigations().into_iter().map(|n| n.url).collect();
        assert!(urls[0].contains("client_id=second-app&"));
        assert!(urls[1].contains("client_id=xyz&"));
    }

    #[test]
    fn test_late_buttons_stay_unbound() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        let dispatcher = start(&page, &sdk);

        let late = page.add_button("btn-google", Some("late"));
        let event = page.click(&late);

        assert!(!event.is_default_prevented());
        assert!(page.navigations().is_empty());
        assert_eq!(dispatcher.bind().unwrap(), 0);
        assert_eq!(page.bound_handlers(), 4);
    }

    #[test]
    fn test_facebook_click_waits_for_connected_status() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().access_token("EAAtoken").build());
        let _dispatcher = start(&page, &sdk);

        let event = page.click(&page.buttons("btn-facebook")[0]);
        assert!(event.is_default_prevented());
        assert!(page.navigations().is_empty());

        let init = &sdk.inits()[0];
        assert_eq!(init.app_id, "fb-app");
        assert!(init.cookie);
        assert!(init.xfbml);
        assert_eq!(init.version, "v2.4");

        assert_eq!(sdk.complete_logins(), 1);
        assert_eq!(
            page.last_navigation().as_deref(),
            Some("https://example.com/oauth/facebook?next=%2Fhome&accessToken=EAAtoken")
        );
    }

    #[test]
    fn test_facebook_other_status_stays_put() {
        let page = login_page();
        let sdk = Rc::new(
            RecordingSdk::builder()
                .status(crate::model::LoginStatus::NotAuthorized)
                .access_token("EAAtoken")
                .build(),
        );
        let _dispatcher = start(&page, &sdk);

        page.click(&page.buttons("btn-facebook")[0]);
        sdk.complete_logins();

        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_facebook_without_sdk_is_swallowed() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().loaded(false).build());
        let _dispatcher = start(&page, &sdk);

        let event = page.click(&page.buttons("btn-facebook")[0]);

        assert!(event.is_default_prevented());
        assert_eq!(sdk.pending_logins(), 0);
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_saml_click_is_inert_when_disabled() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        let _dispatcher = start(&page, &sdk);

        let event = page.click(&page.buttons("btn-saml")[0]);

        assert!(event.is_default_prevented());
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_dropped_dispatcher_only_prevents_default() {
        let page = login_page();
        let sdk = Rc::new(RecordingSdk::builder().build());
        drop(start(&page, &sdk));

        let event = page.click(&page.buttons("btn-google")[0]);

        assert!(event.is_default_prevented());
        assert!(page.navigations().is_empty());
    }
}
