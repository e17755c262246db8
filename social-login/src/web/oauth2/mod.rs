use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

mod facebook;
pub use facebook::facebook_callback_url;
pub(crate) use facebook::{bootstrap_sdk, facebook_login};

mod login;
pub use login::{github_authorization_url, google_authorization_url, linkedin_authorization_url};

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `value` as a single URI component.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
