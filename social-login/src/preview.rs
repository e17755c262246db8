//! Dry run of a configured login page: renders it in memory, clicks every
//! bound button once and reports where each click would have sent the user.

use std::{fmt, rc::Rc};

use social_login_config::Config;
use strum::IntoEnumIterator;
use tracing::info;

use crate::{
    model::{LoginStatus, Provider},
    page::{MemoryPage, Page, RecordingSdk},
    AppError, Dispatcher,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub provider: Provider,
    pub client_id: String,
    pub navigation: Option<String>,
}

impl fmt::Display for PreviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.navigation {
            Some(url) => write!(f, "{} [{}] -> {}", self.provider, self.client_id, url),
            None => write!(f, "{} [{}] -> (stays on page)", self.provider, self.client_id),
        }
    }
}

/// # Errors
///
/// Fails when the configured page location is not an absolute URL.
pub fn run(config: &Config) -> Result<Vec<PreviewOutcome>, AppError> {
    let page = Rc::new(MemoryPage::from_page_config(&config.page)?);

    let facebook = &config.preview.facebook;
    let status = facebook
        .status
        .parse()
        .unwrap_or_else(|_| LoginStatus::Other(facebook.status.clone()));
    let sdk = Rc::new(
        RecordingSdk::builder()
            .status(status)
            .access_token(facebook.access_token.clone())
            .build(),
    );

    let dispatcher = Dispatcher::new(page.clone(), sdk.clone(), config.dispatcher.clone());
    let bound = dispatcher.start()?;
    info!("Previewing {} login buttons", bound);

    let mut outcomes = Vec::with_capacity(bound);
    for provider in Provider::iter() {
        for button in page.buttons(provider.button_class()) {
            let before = page.navigations().len();
            page.click(&button);
            sdk.complete_logins();

            outcomes.push(PreviewOutcome {
                provider,
                client_id: page.attribute(&button, "id").unwrap_or_default(),
                navigation: page.navigations().get(before).map(|n| n.url.clone()),
            });
        }
    }

    Ok(outcomes)
}
