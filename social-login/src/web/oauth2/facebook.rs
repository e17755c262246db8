use std::{cell::Cell, rc::Rc};

use social_login_config::FacebookSdkSettings;
use tracing::{debug, info, warn};

use crate::{
    core::{SharedPage, SharedSdk},
    model::{InitOptions, LoginOptions, LoginResponse, Provider},
    page::Page,
    web::reader::PageConfigReader,
    AppError,
};

/// Injects the SDK script unless `injected` is already set or the page
/// already carries an element with the script id. Returns whether a script
/// was inserted.
///
/// `injected` starts out false and is only ever set, never cleared.
pub(crate) fn bootstrap_sdk(
    page: &dyn Page,
    settings: &FacebookSdkSettings,
    injected: &Cell<bool>,
) -> Result<bool, AppError> {
    if injected.get() || page.has_element(&settings.script_id) {
        debug!("Facebook SDK already present, skipping injection");
        return Ok(false);
    }

    page.insert_script(&settings.script_id, &settings.script_src)?;
    injected.set(true);
    info!("Injected Facebook SDK from {}", settings.script_src);
    Ok(true)
}

/// Where the page goes once the SDK reports a connected login. The current
/// query string, minus its first `?`, is carried over ahead of the token.
pub fn facebook_callback_url(callback_url: &str, location_search: &str, access_token: &str) -> String {
    let query = location_search.replacen('?', "", 1);
    if query.is_empty() {
        format!("{}?accessToken={}", callback_url, access_token)
    } else {
        format!("{}?{}&accessToken={}", callback_url, query, access_token)
    }
}

/// Initializes the SDK for `app_id` and opens its login dialog. Returns as
/// soon as the dialog is requested; navigation happens when the SDK answers.
pub(crate) fn facebook_login(
    page: &SharedPage,
    sdk: &SharedSdk,
    settings: &FacebookSdkSettings,
    app_id: &str,
) -> Result<(), AppError> {
    let scope = PageConfigReader::new(page.as_ref()).scope(Provider::Facebook)?;

    sdk.init(&InitOptions {
        app_id: app_id.to_string(),
        cookie: settings.cookie,
        xfbml: settings.xfbml,
        version: settings.version.clone(),
    })?;

    let on_complete = {
        let page = Rc::clone(page);
        let sdk = Rc::clone(sdk);
        move |response: LoginResponse| complete_login(&page, &sdk, &response)
    };

    debug!("Requesting Facebook login for app {} with scope {}", app_id, scope);
    sdk.login(Box::new(on_complete), &LoginOptions { scope })
}

fn complete_login(page: &SharedPage, sdk: &SharedSdk, response: &LoginResponse) {
    if !response.status.is_connected() {
        debug!("Facebook login ended with status {}", response.status);
        return;
    }

    let Some(auth) = sdk.auth_response() else {
        warn!("Facebook reported a connected login without an auth response");
        return;
    };

    let result = PageConfigReader::new(page.as_ref())
        .callback_url(Provider::Facebook)
        .and_then(|callback_url| {
            let url = facebook_callback_url(
                &callback_url,
                &page.location_search(),
                &auth.access_token,
            );
            info!("Redirecting to Facebook callback {}", callback_url);
            page.replace_location(&url)
        });

    if let Err(e) = result {
        warn!("Facebook login could not redirect: {}", e);
    }
}
